//! Error types for declaration regeneration.

use std::path::PathBuf;

use thiserror::Error;

use crate::dts::{DeclarationKind, ParseError};

/// Errors that abort a regeneration run.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// I/O error reading the source or writing the destination.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The compiler declaration file failed to parse.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        /// Full source text, kept for diagnostics.
        text: String,
        #[source]
        source: ParseError,
    },

    /// The configuration file is malformed or inconsistent.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// No compiler declaration file could be located.
    #[error("could not find node_modules/typescript/lib/typescript.d.ts above {}", .0.display())]
    CompilerNotFound(PathBuf),

    /// The source has no top-level namespace with the configured name.
    #[error("no namespace named `{0}` in the compiler declarations")]
    MissingNamespace(String),

    /// A container was asked to hold a kind it cannot hold.
    #[error("{container} cannot contain a {kind} declaration")]
    StructuralMismatch {
        container: String,
        kind: DeclarationKind,
    },

    /// A qualify rule did not find its interface, index signature or union.
    #[error("cannot qualify union in `{interface}`: {reason}")]
    RewriteTargetMissing { interface: String, reason: String },

    /// The brand interface is not in the wrapping namespace.
    #[error("brand target interface `{0}` not found in the wrapping namespace")]
    BrandTargetMissing(String),
}

impl GenerateError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GenerateError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = GenerateError> = std::result::Result<T, E>;
