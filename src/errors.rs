//! # Comparison Errors
//!
//! Every failed comparison is exactly one of three kinds, reported for the
//! first violation found:
//!
//! - **Parse**: either input failed to produce a tree
//! - **Rebinding**: a placeholder matched two different concrete values
//! - **Mismatch**: shapes, values, key sets or lengths differ
//!
//! Configuration loading has its own [`OptionsError`]; it never reaches the
//! match engine.

use std::fmt;
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::ast::json::JsonTreeError;
use crate::ast::Value;
use crate::bindings::{PlaceholderDomain, Rebinding};
use crate::path::TreePath;
use crate::syntax::SyntaxError;

// ============================================================================
// ERROR KINDS
// ============================================================================

/// Which input an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Actual,
    Expected,
}

impl Side {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Side::Actual => "actual",
            Side::Expected => "expected",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type-safe classification of a [`CompareError`], for assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Parse,
    Rebinding,
    Mismatch,
}

impl ErrorKind {
    /// Numeric code; also the CLI exit status.
    pub const fn code(&self) -> i32 {
        match self {
            ErrorKind::Parse => 1,
            ErrorKind::Rebinding => 2,
            ErrorKind::Mismatch => 3,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Parse => "parse",
            ErrorKind::Rebinding => "rebinding",
            ErrorKind::Mismatch => "mismatch",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// COMPARE ERROR
// ============================================================================

#[derive(Debug, Error, Diagnostic)]
pub enum CompareError {
    #[error("{side} source failed to parse")]
    #[diagnostic(code(compare_ast::parse))]
    Parse {
        side: Side,
        #[source]
        #[diagnostic_source]
        error: SyntaxError,
    },

    #[error("{side} tree is not a valid syntax tree: {error}")]
    #[diagnostic(code(compare_ast::parse))]
    Tree {
        side: Side,
        #[source]
        error: JsonTreeError,
    },

    #[error("{domain} placeholder '{placeholder}' is bound to '{bound}' but also matched '{found}'")]
    #[diagnostic(
        code(compare_ast::rebinding),
        help("every occurrence of a placeholder must stand for the same value")
    )]
    Rebinding {
        domain: PlaceholderDomain,
        placeholder: String,
        bound: String,
        found: String,
    },

    #[error("trees differ at {path}: {reason}")]
    #[diagnostic(code(compare_ast::mismatch))]
    Mismatch {
        path: TreePath,
        reason: String,
        /// The full actual working tree at the moment of failure.
        actual: Value,
        /// The full expected working tree, placeholders already substituted.
        expected: Value,
    },
}

impl CompareError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CompareError::Parse { .. } | CompareError::Tree { .. } => ErrorKind::Parse,
            CompareError::Rebinding { .. } => ErrorKind::Rebinding,
            CompareError::Mismatch { .. } => ErrorKind::Mismatch,
        }
    }

    pub fn code(&self) -> i32 {
        self.kind().code()
    }
}

impl From<Rebinding> for CompareError {
    fn from(rebinding: Rebinding) -> Self {
        CompareError::Rebinding {
            domain: rebinding.domain,
            placeholder: rebinding.placeholder,
            bound: rebinding.bound,
            found: rebinding.found,
        }
    }
}

// ============================================================================
// OPTIONS ERRORS
// ============================================================================

#[derive(Debug, Error, Diagnostic)]
pub enum OptionsError {
    #[error("failed to read {path}")]
    #[diagnostic(code(compare_ast::options::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}")]
    #[diagnostic(code(compare_ast::options::yaml))]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid {field} pattern '{pattern}'")]
    #[diagnostic(code(compare_ast::options::pattern))]
    InvalidPattern {
        field: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
