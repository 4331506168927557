//! Syntax errors raised while turning source text into a tree.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::ast::Span;

/// A source text that the grammar rejected.
#[derive(Debug, Error, Diagnostic)]
#[error("Parse error at line {line}, column {col}: {message}")]
#[diagnostic(code(compare_ast::syntax))]
pub struct SyntaxError {
    pub message: String,
    pub line: usize,
    pub col: usize,
    #[source_code]
    pub src: NamedSource<String>,
    #[label("here")]
    pub span: SourceSpan,
}

impl SyntaxError {
    pub fn new(name: &str, source: &str, span: Span, message: impl Into<String>) -> Self {
        let (line, col) = line_col(source, span.start);
        Self {
            message: message.into(),
            line,
            col,
            src: NamedSource::new(name, source.to_string()),
            span: to_source_span(span),
        }
    }
}

/// Converts a tree Span to a miette SourceSpan.
pub fn to_source_span(span: Span) -> SourceSpan {
    SourceSpan::from(span.start..span.end)
}

/// 1-based line and column of a byte offset.
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let before = source.get(..offset).unwrap_or(source);
    let line = before.matches('\n').count() + 1;
    let col = before.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;
    (line, col)
}
