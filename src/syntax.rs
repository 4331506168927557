//! Syntax module: source text to ESTree-shaped trees.
//!
//! The grammar covers ES5. Any parser that emits the same node kinds and
//! attribute shapes can stand in for this one; the match engine only sees
//! [`SyntaxNode`](crate::ast::SyntaxNode) values.

pub mod error;
pub mod parser;

pub use error::SyntaxError;
pub use parser::{parse, parse_named};
