//! Read-only views over the parsed compiler declarations.

use crate::dts::{
    DeclarationKind, DtsClass, DtsEnum, DtsFile, DtsFunction, DtsInterface, DtsItem,
    DtsNamespace, DtsTypeAlias, DtsVariableStatement,
};

/// A borrowed declaration of one of the seven cloneable kinds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SourceDeclaration<'a> {
    Namespace(&'a DtsNamespace),
    Interface(&'a DtsInterface),
    Enum(&'a DtsEnum),
    TypeAlias(&'a DtsTypeAlias),
    Class(&'a DtsClass),
    Function(&'a DtsFunction),
    Variable(&'a DtsVariableStatement),
}

impl<'a> SourceDeclaration<'a> {
    /// View an item as a declaration. Modules and export statements are not
    /// declarations in this sense.
    pub fn from_item(item: &'a DtsItem) -> Option<Self> {
        match item {
            DtsItem::Namespace(ns) => Some(SourceDeclaration::Namespace(ns)),
            DtsItem::Interface(i) => Some(SourceDeclaration::Interface(i)),
            DtsItem::Enum(e) => Some(SourceDeclaration::Enum(e)),
            DtsItem::TypeAlias(t) => Some(SourceDeclaration::TypeAlias(t)),
            DtsItem::Class(c) => Some(SourceDeclaration::Class(c)),
            DtsItem::Function(f) => Some(SourceDeclaration::Function(f)),
            DtsItem::Variable(v) => Some(SourceDeclaration::Variable(v)),
            DtsItem::Module(_) | DtsItem::Export(_) => None,
        }
    }

    pub fn kind(&self) -> DeclarationKind {
        match self {
            SourceDeclaration::Namespace(_) => DeclarationKind::Namespace,
            SourceDeclaration::Interface(_) => DeclarationKind::Interface,
            SourceDeclaration::Enum(_) => DeclarationKind::Enum,
            SourceDeclaration::TypeAlias(_) => DeclarationKind::TypeAlias,
            SourceDeclaration::Class(_) => DeclarationKind::Class,
            SourceDeclaration::Function(_) => DeclarationKind::Function,
            SourceDeclaration::Variable(_) => DeclarationKind::VariableStatement,
        }
    }

    /// Declared name. A variable statement answers with its first declarator.
    pub fn name(&self) -> &'a str {
        match self {
            SourceDeclaration::Namespace(ns) => &ns.name,
            SourceDeclaration::Interface(i) => &i.name,
            SourceDeclaration::Enum(e) => &e.name,
            SourceDeclaration::TypeAlias(t) => &t.name,
            SourceDeclaration::Class(c) => &c.name,
            SourceDeclaration::Function(f) => &f.name,
            SourceDeclaration::Variable(v) => v
                .declarations
                .first()
                .map(|d| d.name.as_str())
                .unwrap_or_default(),
        }
    }
}

/// A namespace in the declaration source, with its children grouped by kind.
#[derive(Debug, Clone, Copy)]
pub struct SourceNamespace<'a> {
    namespace: &'a DtsNamespace,
}

impl<'a> SourceNamespace<'a> {
    pub fn new(namespace: &'a DtsNamespace) -> Self {
        Self { namespace }
    }

    pub fn name(&self) -> &'a str {
        &self.namespace.name
    }

    pub fn doc(&self) -> Option<&'a str> {
        self.namespace.doc.as_deref()
    }

    /// Children of one kind, in source order.
    pub fn declarations(&self, kind: DeclarationKind) -> impl Iterator<Item = SourceDeclaration<'a>> {
        self.namespace
            .items
            .iter()
            .filter_map(SourceDeclaration::from_item)
            .filter(move |decl| decl.kind() == kind)
    }

    pub fn namespaces(&self) -> impl Iterator<Item = &'a DtsNamespace> {
        self.namespace.items.iter().filter_map(|item| match item {
            DtsItem::Namespace(ns) => Some(ns),
            _ => None,
        })
    }

    pub fn interfaces(&self) -> impl Iterator<Item = &'a DtsInterface> {
        self.namespace.items.iter().filter_map(|item| match item {
            DtsItem::Interface(i) => Some(i),
            _ => None,
        })
    }

    pub fn enums(&self) -> impl Iterator<Item = &'a DtsEnum> {
        self.namespace.items.iter().filter_map(|item| match item {
            DtsItem::Enum(e) => Some(e),
            _ => None,
        })
    }
}

/// The parsed compiler declaration file, queryable by namespace name.
#[derive(Debug, Clone, Copy)]
pub struct DeclarationSource<'a> {
    file: &'a DtsFile,
}

impl<'a> DeclarationSource<'a> {
    pub fn new(file: &'a DtsFile) -> Self {
        Self { file }
    }

    /// Every top-level namespace with this exact name, in source order.
    pub fn namespaces_named(&self, name: &str) -> Vec<SourceNamespace<'a>> {
        self.file
            .items
            .iter()
            .filter_map(|item| match item {
                DtsItem::Namespace(ns) if ns.name == name => Some(SourceNamespace::new(ns)),
                _ => None,
            })
            .collect()
    }
}

/// Concatenate the children of one kind across several namespaces.
pub fn flatten<'a>(
    namespaces: &[SourceNamespace<'a>],
    kind: DeclarationKind,
) -> Vec<SourceDeclaration<'a>> {
    namespaces
        .iter()
        .flat_map(|ns| ns.declarations(kind))
        .collect()
}
