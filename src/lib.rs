//! Regenerates a redistributable copy of the TypeScript compiler's
//! declarations.
//!
//! The compiler's `typescript.d.ts` is parsed, a chosen set of enums,
//! interfaces and type aliases is hoisted to the top of a new module, and
//! everything else is re-exported inside one wrapping namespace together
//! with a nominal brand property and a runtime merge of the real compiler
//! module. The result is written with `\r\n` line endings.

pub mod assemble;
pub mod clone;
pub mod config;
pub mod diagnostic;
pub mod dts;
pub mod error;
pub mod finalize;
pub mod module;
pub mod project;
pub mod rewrite;
pub mod separation;
pub mod source;

pub use assemble::Assembler;
pub use config::Config;
pub use error::GenerateError;
pub use module::OutputModule;
pub use project::Project;
pub use separation::{Placement, SeparationPolicy};
