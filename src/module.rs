//! The generated module file: header, imports, hoisted declarations and the
//! wrapping namespace.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::dts::printer::{self, Context};
use crate::dts::{DtsInterface, DtsItem};

/// An import statement at the top of the module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportDeclaration {
    /// `import * as alias from "module";`
    Namespace { alias: String, module: String },
    /// `import { a, b } from "module";`
    Named { names: Vec<String>, module: String },
}

impl fmt::Display for ImportDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportDeclaration::Namespace { alias, module } => {
                write!(f, "import * as {alias} from {};", printer::quote_string(module))
            }
            ImportDeclaration::Named { names, module } => write!(
                f,
                "import {{ {} }} from {};",
                names.join(", "),
                printer::quote_string(module)
            ),
        }
    }
}

/// A statement evaluated when the generated module loads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeStatement {
    /// `utility.assign(target, source);`
    MergeAssign {
        utility: String,
        target: String,
        source: String,
    },
}

impl fmt::Display for RuntimeStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeStatement::MergeAssign {
                utility,
                target,
                source,
            } => write!(f, "{utility}.assign({target}, {source});"),
        }
    }
}

/// The single exported namespace holding every non-hoisted declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct WrappingNamespace {
    pub name: String,
    pub items: Vec<DtsItem>,
    pub runtime: Vec<RuntimeStatement>,
}

impl WrappingNamespace {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: Vec::new(),
            runtime: Vec::new(),
        }
    }

    /// First interface with this name directly inside the namespace.
    pub fn interface_mut(&mut self, name: &str) -> Option<&mut DtsInterface> {
        self.items.iter_mut().find_map(|item| match item {
            DtsItem::Interface(i) if i.name == name => Some(i),
            _ => None,
        })
    }
}

/// The module file under construction.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputModule {
    pub path: PathBuf,
    /// Comment block printed before everything else, without a trailing newline.
    pub header: Option<String>,
    pub imports: Vec<ImportDeclaration>,
    /// Hoisted declarations.
    pub items: Vec<DtsItem>,
    pub namespace: Option<WrappingNamespace>,
}

impl OutputModule {
    /// A fresh, empty module. Nothing at `path` is read.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            header: None,
            imports: Vec::new(),
            items: Vec::new(),
            namespace: None,
        }
    }

    /// First top-level interface with this name.
    pub fn interface_mut(&mut self, name: &str) -> Option<&mut DtsInterface> {
        self.items.iter_mut().find_map(|item| match item {
            DtsItem::Interface(i) if i.name == name => Some(i),
            _ => None,
        })
    }

    /// Print the module as TypeScript with `\n` line endings.
    pub fn render(&self) -> String {
        let mut out = String::new();

        if let Some(header) = &self.header {
            out.push_str(header);
            out.push('\n');
        }

        for import in &self.imports {
            out.push_str(&import.to_string());
            out.push('\n');
        }

        let top_level = Context {
            exported: true,
            ambient: false,
        };

        if !self.items.is_empty() {
            out.push('\n');
            for item in &self.items {
                printer::write_item(item, top_level, 0, &mut out);
            }
        }

        if let Some(namespace) = &self.namespace {
            out.push('\n');
            out.push_str("export namespace ");
            out.push_str(&namespace.name);
            out.push_str(" {\n");
            for item in &namespace.items {
                printer::write_item(item, top_level, 1, &mut out);
            }
            for statement in &namespace.runtime {
                printer::indent(1, &mut out);
                out.push_str(&statement.to_string());
                out.push('\n');
            }
            out.push_str("}\n");
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dts::{DtsEnum, DtsNamespace, EnumMember};

    #[test]
    fn test_import_display() {
        let ns = ImportDeclaration::Namespace {
            alias: "tsCompiler".to_string(),
            module: "typescript".to_string(),
        };
        let named = ImportDeclaration::Named {
            names: vec!["ObjectUtils".to_string()],
            module: "../utils".to_string(),
        };
        assert_eq!(ns.to_string(), r#"import * as tsCompiler from "typescript";"#);
        assert_eq!(named.to_string(), r#"import { ObjectUtils } from "../utils";"#);
    }

    #[test]
    fn test_render_layout() {
        let mut module = OutputModule::new("out/typescript.ts");
        module.header = Some("/* header */".to_string());
        module.imports.push(ImportDeclaration::Namespace {
            alias: "tsCompiler".to_string(),
            module: "typescript".to_string(),
        });
        module.items.push(DtsItem::Enum(DtsEnum {
            name: "Kind".to_string(),
            doc: None,
            is_const: false,
            members: vec![EnumMember {
                name: "A".to_string(),
                doc: None,
                initializer: Some("0".to_string()),
            }],
        }));

        let mut namespace = WrappingNamespace::new("ts");
        namespace.items.push(DtsItem::Namespace(DtsNamespace::new("server")));
        namespace.runtime.push(RuntimeStatement::MergeAssign {
            utility: "ObjectUtils".to_string(),
            target: "ts".to_string(),
            source: "tsCompiler".to_string(),
        });
        module.namespace = Some(namespace);

        assert_eq!(
            module.render(),
            "/* header */\n\
             import * as tsCompiler from \"typescript\";\n\
             \n\
             export declare enum Kind {\n    A = 0\n}\n\
             \n\
             export namespace ts {\n    export declare namespace server {\n    }\n    ObjectUtils.assign(ts, tsCompiler);\n}\n"
        );
    }
}
