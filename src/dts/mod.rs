//! TypeScript declaration file (.d.ts) model.
//!
//! A recursive descent parser turns declaration files into an AST, and the
//! printer writes that AST back out as TypeScript.

mod ast;
mod lexer;
mod parser;
pub mod printer;

pub use ast::*;
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{parse, ParseError, ParseResult};
