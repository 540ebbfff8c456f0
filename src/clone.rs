//! Structural cloning of declarations into destination containers.

use tracing::debug;

use crate::dts::{
    DeclarationKind, DtsClass, DtsEnum, DtsFunction, DtsInterface, DtsItem, DtsNamespace,
    DtsTypeAlias, DtsVariableStatement,
};
use crate::error::{GenerateError, Result};
use crate::module::{OutputModule, WrappingNamespace};
use crate::separation::SeparationPolicy;
use crate::source::{SourceDeclaration, SourceNamespace};

/// An owned copy of a source declaration, ready to be placed.
#[derive(Debug, Clone, PartialEq)]
pub enum ClonedDeclaration {
    Namespace(DtsNamespace),
    Interface(DtsInterface),
    Enum(DtsEnum),
    TypeAlias(DtsTypeAlias),
    Class(DtsClass),
    Function(DtsFunction),
    Variable(DtsVariableStatement),
}

impl ClonedDeclaration {
    pub fn kind(&self) -> DeclarationKind {
        match self {
            ClonedDeclaration::Namespace(_) => DeclarationKind::Namespace,
            ClonedDeclaration::Interface(_) => DeclarationKind::Interface,
            ClonedDeclaration::Enum(_) => DeclarationKind::Enum,
            ClonedDeclaration::TypeAlias(_) => DeclarationKind::TypeAlias,
            ClonedDeclaration::Class(_) => DeclarationKind::Class,
            ClonedDeclaration::Function(_) => DeclarationKind::Function,
            ClonedDeclaration::Variable(_) => DeclarationKind::VariableStatement,
        }
    }

    pub fn into_item(self) -> DtsItem {
        match self {
            ClonedDeclaration::Namespace(ns) => DtsItem::Namespace(ns),
            ClonedDeclaration::Interface(i) => DtsItem::Interface(i),
            ClonedDeclaration::Enum(e) => DtsItem::Enum(e),
            ClonedDeclaration::TypeAlias(t) => DtsItem::TypeAlias(t),
            ClonedDeclaration::Class(c) => DtsItem::Class(c),
            ClonedDeclaration::Function(f) => DtsItem::Function(f),
            ClonedDeclaration::Variable(v) => DtsItem::Variable(v),
        }
    }
}

/// Something declarations can be cloned into.
pub trait DeclarationContainer {
    /// Human-readable description used in errors.
    fn container_name(&self) -> String;

    fn accepts(&self, kind: DeclarationKind) -> bool;

    /// Append without checking `accepts`.
    fn push_item(&mut self, item: DtsItem);

    fn add_declaration(&mut self, declaration: ClonedDeclaration) -> Result<()> {
        let kind = declaration.kind();
        if !self.accepts(kind) {
            return Err(GenerateError::StructuralMismatch {
                container: self.container_name(),
                kind,
            });
        }
        self.push_item(declaration.into_item());
        Ok(())
    }
}

impl DeclarationContainer for OutputModule {
    fn container_name(&self) -> String {
        format!("module file {}", self.path.display())
    }

    fn accepts(&self, kind: DeclarationKind) -> bool {
        SeparationPolicy::is_separable(kind)
    }

    fn push_item(&mut self, item: DtsItem) {
        self.items.push(item);
    }
}

impl DeclarationContainer for WrappingNamespace {
    fn container_name(&self) -> String {
        format!("namespace {}", self.name)
    }

    fn accepts(&self, _kind: DeclarationKind) -> bool {
        true
    }

    fn push_item(&mut self, item: DtsItem) {
        self.items.push(item);
    }
}

impl DeclarationContainer for DtsNamespace {
    fn container_name(&self) -> String {
        format!("namespace {}", self.name)
    }

    fn accepts(&self, _kind: DeclarationKind) -> bool {
        true
    }

    fn push_item(&mut self, item: DtsItem) {
        self.items.push(item);
    }
}

/// Copy one declaration. Namespaces are rebuilt child by child.
pub fn clone_declaration(declaration: SourceDeclaration<'_>) -> Result<ClonedDeclaration> {
    let cloned = match declaration {
        SourceDeclaration::Namespace(ns) => ClonedDeclaration::Namespace(clone_namespace(ns)?),
        SourceDeclaration::Interface(i) => ClonedDeclaration::Interface(i.clone()),
        SourceDeclaration::Enum(e) => ClonedDeclaration::Enum(e.clone()),
        SourceDeclaration::TypeAlias(t) => ClonedDeclaration::TypeAlias(t.clone()),
        SourceDeclaration::Class(c) => ClonedDeclaration::Class(c.clone()),
        SourceDeclaration::Function(f) => ClonedDeclaration::Function(f.clone()),
        SourceDeclaration::Variable(v) => ClonedDeclaration::Variable(v.clone()),
    };
    Ok(cloned)
}

/// A fresh namespace whose children are cloned kind by kind in
/// [`DeclarationKind::CLONE_ORDER`].
pub fn clone_namespace(source: &DtsNamespace) -> Result<DtsNamespace> {
    let view = SourceNamespace::new(source);
    let mut fresh = DtsNamespace::new(view.name());
    fresh.doc = view.doc().map(str::to_string);

    for kind in DeclarationKind::CLONE_ORDER {
        clone_into(&mut fresh, view.declarations(kind))?;
    }
    Ok(fresh)
}

/// Clone each declaration into `dest`, in order. Returns how many were added.
pub fn clone_into<'a, C, I>(dest: &mut C, declarations: I) -> Result<usize>
where
    C: DeclarationContainer + ?Sized,
    I: IntoIterator<Item = SourceDeclaration<'a>>,
{
    let mut count = 0;
    for declaration in declarations {
        dest.add_declaration(clone_declaration(declaration)?)?;
        count += 1;
    }
    Ok(count)
}

/// Clone one kind into `dest`, logging the count.
pub fn clone_kind<'a, C, I>(dest: &mut C, kind: DeclarationKind, declarations: I) -> Result<usize>
where
    C: DeclarationContainer + ?Sized,
    I: IntoIterator<Item = SourceDeclaration<'a>>,
{
    let count = clone_into(dest, declarations)?;
    debug!(kind = %kind, count, container = %dest.container_name(), "cloned declarations");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dts::parse;
    use crate::source::DeclarationSource;

    #[test]
    fn test_module_top_level_rejects_class() {
        let file = parse("declare namespace ts { class Printer {} }").unwrap();
        let namespaces = DeclarationSource::new(&file).namespaces_named("ts");
        let mut module = OutputModule::new("out.ts");

        let err = clone_into(&mut module, namespaces[0].declarations(DeclarationKind::Class))
            .unwrap_err();
        match err {
            GenerateError::StructuralMismatch { container, kind } => {
                assert_eq!(container, "module file out.ts");
                assert_eq!(kind, DeclarationKind::Class);
            }
            other => panic!("expected structural mismatch, got {other:?}"),
        }
        assert!(module.items.is_empty());
    }

    #[test]
    fn test_module_top_level_accepts_separable_kinds() {
        let file = parse("declare namespace ts { enum E {} interface I {} type T = string; }")
            .unwrap();
        let namespaces = DeclarationSource::new(&file).namespaces_named("ts");
        let mut module = OutputModule::new("out.ts");

        for kind in [
            DeclarationKind::Enum,
            DeclarationKind::Interface,
            DeclarationKind::TypeAlias,
        ] {
            assert_eq!(clone_into(&mut module, namespaces[0].declarations(kind)).unwrap(), 1);
        }
        assert_eq!(module.items.len(), 3);
    }

    #[test]
    fn test_nested_namespace_children_regrouped_by_kind() {
        let src = r#"
            declare namespace ts {
                namespace server {
                    /** Starts it. */
                    function start(): void;
                    const port: number;
                    class Session {}
                    interface Options {}
                    namespace protocol { type Command = string; }
                    enum Mode { A }
                }
            }
        "#;
        let file = parse(src).unwrap();
        let namespaces = DeclarationSource::new(&file).namespaces_named("ts");
        let server = namespaces[0].namespaces().next().unwrap();

        let cloned = clone_namespace(server).unwrap();
        let kinds: Vec<_> = cloned.items.iter().filter_map(DtsItem::kind).collect();
        assert_eq!(
            kinds,
            vec![
                DeclarationKind::Namespace,
                DeclarationKind::Interface,
                DeclarationKind::Enum,
                DeclarationKind::Class,
                DeclarationKind::Function,
                DeclarationKind::VariableStatement,
            ]
        );
        match &cloned.items[4] {
            DtsItem::Function(f) => assert_eq!(f.doc.as_deref(), Some("Starts it.")),
            other => panic!("expected function, got {other:?}"),
        }
        match &cloned.items[0] {
            DtsItem::Namespace(ns) => assert_eq!(ns.items.len(), 1),
            other => panic!("expected namespace, got {other:?}"),
        }
    }

    #[test]
    fn test_clone_preserves_order_and_duplicates() {
        let src = "declare namespace ts { function f(a: string): void; function f(a: number): void; function g(): void; }";
        let file = parse(src).unwrap();
        let namespaces = DeclarationSource::new(&file).namespaces_named("ts");
        let mut namespace = WrappingNamespace::new("ts");

        let count = clone_kind(
            &mut namespace,
            DeclarationKind::Function,
            namespaces[0].declarations(DeclarationKind::Function),
        )
        .unwrap();
        assert_eq!(count, 3);
        let names: Vec<_> = namespace.items.iter().filter_map(DtsItem::name).collect();
        assert_eq!(names, vec!["f", "f", "g"]);
    }
}
