//! Project configuration (dts-rewrap.toml) parsing and types.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{GenerateError, Result};
use crate::rewrite::QualifyRule;
use crate::separation::{
    SeparationPolicy, SeparationSet, DEFAULT_ENUMS, DEFAULT_INTERFACES, DEFAULT_TYPE_ALIASES,
};

/// Name of the configuration file looked up in the project root.
pub const CONFIG_FILE_NAME: &str = "dts-rewrap.toml";

/// Root configuration structure for dts-rewrap.toml.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Explicit path to the compiler's declaration file.
    pub input: Option<PathBuf>,
    /// Output module path, relative to the project root.
    pub output: PathBuf,
    /// Namespace read from the declaration file.
    pub source_namespace: String,
    /// Name of the exported wrapping namespace.
    pub namespace: String,
    /// Module specifier of the compiler runtime.
    pub compiler_module: String,
    /// Local alias for the compiler import.
    pub compiler_alias: String,
    /// Object merge helper called at load time.
    pub merge_utility: String,
    pub merge_utility_module: String,
    /// Declarations hoisted to the module top level.
    pub separate: SeparateConfig,
    pub brand: BrandConfig,
    /// Union qualification rules. Absent means the built-in rule.
    pub qualify: Option<Vec<QualifyRule>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: None,
            output: PathBuf::from("src/typescript/typescript.ts"),
            source_namespace: "ts".to_string(),
            namespace: "ts".to_string(),
            compiler_module: "typescript".to_string(),
            compiler_alias: "tsCompiler".to_string(),
            merge_utility: "ObjectUtils".to_string(),
            merge_utility_module: "../utils".to_string(),
            separate: SeparateConfig::default(),
            brand: BrandConfig::default(),
            qualify: None,
        }
    }
}

/// `[separate]` section. A list that is present replaces the built-in one.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeparateConfig {
    pub enums: Option<Vec<String>>,
    pub interfaces: Option<Vec<String>>,
    pub type_aliases: Option<Vec<String>>,
}

/// `[brand]` section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BrandConfig {
    /// Interface in the wrapping namespace that receives the brand.
    pub interface: String,
    /// Property name of the brand.
    pub property: String,
    /// JSDoc attached to the brand property.
    pub doc: String,
}

impl Default for BrandConfig {
    fn default() -> Self {
        Self {
            interface: "Node".to_string(),
            property: "_compilerBrand".to_string(),
            doc: "Nominal brand. Keeps nodes from this module distinct from structurally identical compiler nodes."
                .to_string(),
        }
    }
}

fn set_or_default(list: &Option<Vec<String>>, defaults: &[&str]) -> SeparationSet {
    match list {
        Some(names) => SeparationSet::new(names.iter().cloned()),
        None => SeparationSet::new(defaults.iter().copied()),
    }
}

impl Config {
    /// Parse config from a TOML string.
    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load config from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| GenerateError::io(path, e))?;
        Self::parse(&content)
            .map_err(|e| GenerateError::Config(format!("{}: {}", path.display(), e.message())))
    }

    /// Load `dts-rewrap.toml` from `root`, or defaults when there is none.
    pub fn load_or_default(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::load_from_path(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Build the separation policy, rejecting overlapping lists.
    pub fn separation_policy(&self) -> Result<SeparationPolicy> {
        SeparationPolicy::new(
            set_or_default(&self.separate.enums, DEFAULT_ENUMS),
            set_or_default(&self.separate.interfaces, DEFAULT_INTERFACES),
            set_or_default(&self.separate.type_aliases, DEFAULT_TYPE_ALIASES),
        )
    }

    pub fn qualify_rules(&self) -> Vec<QualifyRule> {
        match &self.qualify {
            Some(rules) => rules.clone(),
            None => QualifyRule::defaults(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dts::DeclarationKind;
    use crate::separation::Placement;

    #[test]
    fn test_parse_empty_config() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.output, PathBuf::from("src/typescript/typescript.ts"));
        assert_eq!(config.qualify_rules(), QualifyRule::defaults());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
input = "vendor/typescript.d.ts"
output = "lib/ts.ts"
source_namespace = "ts"
namespace = "tsc"
compiler_module = "typescript"
compiler_alias = "compiler"
merge_utility = "Merge"
merge_utility_module = "./merge"

[separate]
enums = ["SyntaxKind"]
type_aliases = ["Path"]

[brand]
interface = "Symbol"
property = "_brand"
doc = "Brand."

[[qualify]]
interface = "CompilerOptions"
names = ["CompilerOptionsValue"]
"#;
        let config = Config::parse(toml).unwrap();
        assert_eq!(config.input, Some(PathBuf::from("vendor/typescript.d.ts")));
        assert_eq!(config.namespace, "tsc");
        assert_eq!(config.brand.interface, "Symbol");
        assert_eq!(
            config.qualify_rules(),
            vec![QualifyRule::new("CompilerOptions", ["CompilerOptionsValue"])]
        );

        let policy = config.separation_policy().unwrap();
        assert_eq!(
            policy.classify(DeclarationKind::Enum, "SyntaxKind"),
            Placement::Hoisted
        );
        assert_eq!(
            policy.classify(DeclarationKind::Enum, "ScriptTarget"),
            Placement::Nested,
            "a configured list replaces the defaults"
        );
        assert_eq!(
            policy.classify(DeclarationKind::Interface, "CompilerOptions"),
            Placement::Hoisted,
            "an absent list keeps the defaults"
        );
        assert_eq!(
            policy.classify(DeclarationKind::TypeAlias, "Path"),
            Placement::Hoisted
        );
    }

    #[test]
    fn test_brand_defaults() {
        let config = Config::parse("[brand]\nproperty = \"_mine\"").unwrap();
        assert_eq!(config.brand.interface, "Node");
        assert_eq!(config.brand.property, "_mine");
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(Config::parse("outptu = \"x.ts\"").is_err());
    }

    #[test]
    fn test_overlapping_separation_is_config_error() {
        let config = Config::parse("[separate]\nenums = [\"Shared\"]\ninterfaces = [\"Shared\"]")
            .unwrap();
        assert!(matches!(
            config.separation_policy(),
            Err(GenerateError::Config(_))
        ));
    }

    #[test]
    fn test_load_or_default_without_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::load_or_default(dir.path()).unwrap(), Config::default());
    }

    #[test]
    fn test_load_reports_path_on_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "namespace = 3").unwrap();
        let err = Config::load_or_default(dir.path()).unwrap_err();
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }
}
