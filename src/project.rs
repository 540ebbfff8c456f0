//! Project context: locating the compiler declarations and running a
//! regeneration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::assemble::Assembler;
use crate::config::Config;
use crate::dts;
use crate::error::{GenerateError, Result};
use crate::finalize::finalize;

/// Location of the compiler declarations inside an installed package.
const COMPILER_DECLARATIONS: &str = "node_modules/typescript/lib/typescript.d.ts";

/// The fields of package.json this tool reads.
#[derive(Debug, Deserialize)]
struct PackageManifest {
    version: Option<String>,
}

/// Walk up from `start` looking for an installed compiler.
pub fn find_compiler_declarations(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(COMPILER_DECLARATIONS))
        .find(|candidate| candidate.is_file())
}

/// Read `version` from the package.json that owns `declarations`
/// (`<package>/lib/typescript.d.ts` -> `<package>/package.json`).
pub fn read_compiler_version(declarations: &Path) -> Option<String> {
    let manifest = declarations.parent()?.parent()?.join("package.json");
    let content = fs::read_to_string(&manifest).ok()?;
    match serde_json::from_str::<PackageManifest>(&content) {
        Ok(package) => package.version,
        Err(err) => {
            warn!(path = %manifest.display(), error = %err, "ignoring unreadable package.json");
            None
        }
    }
}

/// An initialized project: root, configuration and compiler location.
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    config: Config,
    compiler: PathBuf,
}

impl Project {
    /// Open the project at `root`, loading `dts-rewrap.toml` if present.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let config = Config::load_or_default(&root)?;
        Self::with_config(root, config)
    }

    /// Use an already loaded configuration.
    pub fn with_config(root: impl Into<PathBuf>, config: Config) -> Result<Self> {
        let root = root.into();
        let compiler = match &config.input {
            Some(input) => root.join(input),
            None => find_compiler_declarations(&root)
                .ok_or_else(|| GenerateError::CompilerNotFound(root.clone()))?,
        };
        debug!(compiler = %compiler.display(), "resolved compiler declarations");

        Ok(Self {
            root,
            config,
            compiler,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn compiler_path(&self) -> &Path {
        &self.compiler
    }

    pub fn output_path(&self) -> PathBuf {
        self.root.join(&self.config.output)
    }

    /// Rebuild the output module from scratch and persist it. Returns the
    /// path written.
    pub fn regenerate(&self) -> Result<PathBuf> {
        let text = fs::read_to_string(&self.compiler)
            .map_err(|e| GenerateError::io(&self.compiler, e))?;
        let file = dts::parse(&text).map_err(|source| GenerateError::Parse {
            path: self.compiler.clone(),
            text: text.clone(),
            source,
        })?;

        let version = read_compiler_version(&self.compiler);
        info!(
            compiler = %self.compiler.display(),
            version = version.as_deref().unwrap_or("unknown"),
            "regenerating"
        );

        let output = self.output_path();
        let module = Assembler::new(&self.config)?
            .with_compiler_version(version)
            .assemble(&file, &output)?;

        finalize(&output, &module.render())?;
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn install_compiler(root: &Path, version: &str) -> PathBuf {
        let lib = root.join("node_modules/typescript/lib");
        fs::create_dir_all(&lib).unwrap();
        fs::write(
            root.join("node_modules/typescript/package.json"),
            format!(r#"{{ "name": "typescript", "version": "{version}" }}"#),
        )
        .unwrap();
        let dts = lib.join("typescript.d.ts");
        fs::write(&dts, "declare namespace ts {}").unwrap();
        dts
    }

    #[test]
    fn test_find_compiler_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        let expected = install_compiler(dir.path(), "5.4.2");
        let nested = dir.path().join("packages/common");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_compiler_declarations(&nested), Some(expected));
    }

    #[test]
    fn test_read_compiler_version() {
        let dir = tempfile::tempdir().unwrap();
        let dts = install_compiler(dir.path(), "5.4.2");
        assert_eq!(read_compiler_version(&dts).as_deref(), Some("5.4.2"));
    }

    #[test]
    fn test_unreadable_manifest_has_no_version() {
        let dir = tempfile::tempdir().unwrap();
        let dts = install_compiler(dir.path(), "5.4.2");
        fs::write(dir.path().join("node_modules/typescript/package.json"), "{ not json").unwrap();
        assert_eq!(read_compiler_version(&dts), None);
    }

    #[test]
    fn test_explicit_input_wins() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            input: Some(PathBuf::from("vendor/typescript.d.ts")),
            ..Config::default()
        };
        let project = Project::with_config(dir.path(), config).unwrap();
        assert_eq!(
            project.compiler_path(),
            dir.path().join("vendor/typescript.d.ts")
        );
    }

    #[test]
    fn test_missing_compiler() {
        let dir = tempfile::tempdir().unwrap();
        // The temp dir may sit under a tree with its own node_modules, so
        // only check the error kind when nothing was found.
        match Project::open(dir.path()) {
            Err(GenerateError::CompilerNotFound(root)) => assert_eq!(root, dir.path()),
            Ok(project) => assert!(!project.compiler_path().starts_with(dir.path())),
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
}
