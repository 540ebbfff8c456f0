//! Which declarations are hoisted out of the wrapping namespace.

use indexmap::IndexSet;

use crate::dts::DeclarationKind;
use crate::error::{GenerateError, Result};

/// Enums hoisted to the module top level by default.
pub const DEFAULT_ENUMS: &[&str] = &[
    "SyntaxKind",
    "ScriptTarget",
    "ScriptKind",
    "JsxEmit",
    "ModuleKind",
    "ModuleResolutionKind",
    "NewLineKind",
    "TypeFlags",
    "ObjectFlags",
    "SymbolFlags",
    "TypeFormatFlags",
    "DiagnosticCategory",
    "IndentStyle",
];

/// Interfaces hoisted to the module top level by default.
pub const DEFAULT_INTERFACES: &[&str] = &["CompilerOptions", "MapLike", "EditorSettings"];

/// Type aliases hoisted to the module top level by default.
pub const DEFAULT_TYPE_ALIASES: &[&str] = &[];

/// Where a declaration ends up in the output module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Emitted at the top level of the module file.
    Hoisted,
    /// Emitted inside the wrapping namespace.
    Nested,
}

/// An ordered set of declaration names for one separable kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeparationSet {
    names: IndexSet<String>,
}

impl SeparationSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// The three separation sets. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeparationPolicy {
    enums: SeparationSet,
    interfaces: SeparationSet,
    type_aliases: SeparationSet,
}

impl SeparationPolicy {
    /// Build a policy, rejecting a name listed under more than one kind.
    pub fn new(
        enums: SeparationSet,
        interfaces: SeparationSet,
        type_aliases: SeparationSet,
    ) -> Result<Self> {
        let lists = [
            ("enums", &enums),
            ("interfaces", &interfaces),
            ("type_aliases", &type_aliases),
        ];
        for (i, (first_label, first)) in lists.iter().enumerate() {
            for (second_label, second) in &lists[i + 1..] {
                if let Some(name) = first.iter().find(|name| second.contains(name)) {
                    return Err(GenerateError::Config(format!(
                        "`{name}` is listed in both separate.{first_label} and separate.{second_label}"
                    )));
                }
            }
        }

        Ok(Self {
            enums,
            interfaces,
            type_aliases,
        })
    }

    /// Kinds that may be hoisted at all.
    pub fn is_separable(kind: DeclarationKind) -> bool {
        matches!(
            kind,
            DeclarationKind::Enum | DeclarationKind::Interface | DeclarationKind::TypeAlias
        )
    }

    pub fn set_for(&self, kind: DeclarationKind) -> Option<&SeparationSet> {
        match kind {
            DeclarationKind::Enum => Some(&self.enums),
            DeclarationKind::Interface => Some(&self.interfaces),
            DeclarationKind::TypeAlias => Some(&self.type_aliases),
            _ => None,
        }
    }

    /// Exact-name lookup. Non-separable kinds always stay nested.
    pub fn classify(&self, kind: DeclarationKind, name: &str) -> Placement {
        match self.set_for(kind) {
            Some(set) if set.contains(name) => Placement::Hoisted,
            _ => Placement::Nested,
        }
    }
}

impl Default for SeparationPolicy {
    fn default() -> Self {
        Self {
            enums: SeparationSet::new(DEFAULT_ENUMS.iter().copied()),
            interfaces: SeparationSet::new(DEFAULT_INTERFACES.iter().copied()),
            type_aliases: SeparationSet::new(DEFAULT_TYPE_ALIASES.iter().copied()),
        }
    }
}
