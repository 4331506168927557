//! Compare JavaScript syntax trees for equivalence modulo consistent
//! placeholder substitution and equivalent member-access forms.
//!
//! ```rust
//! use compare_ast::{compare_source, CompareOptions, ErrorKind};
//! use regex::Regex;
//!
//! let options = CompareOptions::new()
//!     .with_identifier_pattern(Regex::new(r"_v\d_").unwrap());
//!
//! assert!(compare_source("var x = a;", "var _v1_ = a;", &options).is_ok());
//!
//! let err = compare_source("a + b;", "_v1_ + _v1_;", &options).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::Rebinding);
//! ```

pub use crate::engine::{compare_json, compare_source, compare_trees, compare_values};
pub use crate::errors::{CompareError, ErrorKind, OptionsError, Side};
pub use crate::options::{CompareOptions, OptionsFile};

pub mod ast;
pub mod bindings;
pub mod cli;
pub mod comparators;
pub mod engine;
pub mod errors;
pub mod normalize;
pub mod options;
pub mod path;
pub mod syntax;
pub mod test_harness;
