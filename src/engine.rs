//! # Match Engine
//!
//! Recursive equivalence check over two trees.
//!
//! Each call owns working copies of both trees, a fresh [`Bindings`] and a
//! registry built from the options. The walk returns on the first violation;
//! nothing is aggregated.
//!
//! ## Algorithm
//!
//! 1. **Scalars** must be equal.
//! 2. **Lists** must have equal length; elements are compared by index.
//! 3. **Nodes** are normalized, then offered to the comparators. Without a
//!    decision, the node type and every attribute of the actual node are
//!    compared against the expected node. Expected-only attributes are
//!    ignored.

use serde_json::Value as Json;

use crate::ast::json::program_body;
use crate::ast::{SyntaxNode, Value};
use crate::bindings::{Bindings, Rebinding};
use crate::comparators::{ComparatorRegistry, Conflict, MatchContext, Verdict};
use crate::errors::{CompareError, Side};
use crate::normalize::normalize;
use crate::options::CompareOptions;
use crate::path::TreePath;
use crate::syntax;

// ============================================================================
// PUBLIC API
// ============================================================================

/// Parses both sources and compares their top-level statements.
///
/// ```rust
/// use compare_ast::{compare_source, CompareOptions};
///
/// let options = CompareOptions::new();
/// assert!(compare_source("a.b;", "a['b'];", &options).is_ok());
/// assert!(compare_source("a.b;", "a['c'];", &options).is_err());
/// ```
pub fn compare_source(
    actual: &str,
    expected: &str,
    options: &CompareOptions,
) -> Result<(), CompareError> {
    let actual = syntax::parse_named("actual", actual).map_err(|error| CompareError::Parse {
        side: Side::Actual,
        error,
    })?;
    let expected = syntax::parse_named("expected", expected).map_err(|error| CompareError::Parse {
        side: Side::Expected,
        error,
    })?;
    compare_trees(&actual, &expected, options)
}

/// Compares two pre-parsed statement lists. The inputs are left untouched.
pub fn compare_trees(
    actual: &[SyntaxNode],
    expected: &[SyntaxNode],
    options: &CompareOptions,
) -> Result<(), CompareError> {
    compare_values(statement_list(actual), statement_list(expected), options)
}

/// Compares two ESTree JSON programs (a `Program` node or a statement array).
pub fn compare_json(
    actual: &Json,
    expected: &Json,
    options: &CompareOptions,
) -> Result<(), CompareError> {
    let actual = program_body(actual).map_err(|error| CompareError::Tree {
        side: Side::Actual,
        error,
    })?;
    let expected = program_body(expected).map_err(|error| CompareError::Tree {
        side: Side::Expected,
        error,
    })?;
    compare_values(Value::List(actual), Value::List(expected), options)
}

/// Compares two arbitrary trees, consuming them as the working copies.
pub fn compare_values(
    mut actual: Value,
    mut expected: Value,
    options: &CompareOptions,
) -> Result<(), CompareError> {
    let mut walk = Walk {
        registry: options.registry(),
        bindings: Bindings::new(),
        path: TreePath::root(),
    };

    match walk.value(&mut actual, &mut expected) {
        Ok(()) => Ok(()),
        Err(Rejection::Rebinding(rebinding)) => Err(CompareError::from(rebinding)),
        Err(Rejection::Mismatch { path, reason }) => {
            tracing::debug!(%path, %reason, "trees differ");
            Err(CompareError::Mismatch {
                path,
                reason,
                actual,
                expected,
            })
        }
    }
}

fn statement_list(statements: &[SyntaxNode]) -> Value {
    Value::List(statements.iter().cloned().map(Value::from).collect())
}

// ============================================================================
// RECURSIVE WALK
// ============================================================================

/// Why the walk stopped. Converted into a [`CompareError`] once the working
/// trees are no longer borrowed.
enum Rejection {
    Rebinding(Rebinding),
    Mismatch { path: TreePath, reason: String },
}

struct Walk {
    registry: ComparatorRegistry,
    bindings: Bindings,
    path: TreePath,
}

type WalkResult = Result<(), Rejection>;

impl Walk {
    fn value(&mut self, actual: &mut Value, expected: &mut Value) -> WalkResult {
        match actual {
            Value::Node(actual) => match expected {
                Value::Node(expected) => self.node(actual, expected),
                other => self.mismatch(format!(
                    "expected {}, found {} node",
                    other.describe(),
                    actual.kind
                )),
            },
            Value::List(actual) => match expected {
                Value::List(expected) => self.list(actual, expected),
                other => self.mismatch(format!(
                    "expected {}, found a list of {}",
                    other.describe(),
                    actual.len()
                )),
            },
            scalar => {
                if scalar != expected {
                    return self.mismatch(format!(
                        "expected {}, found {}",
                        expected.describe(),
                        scalar.describe()
                    ));
                }
                Ok(())
            }
        }
    }

    fn list(&mut self, actual: &mut [Value], expected: &mut [Value]) -> WalkResult {
        if actual.len() != expected.len() {
            return self.mismatch(format!(
                "expected {} items, found {}",
                expected.len(),
                actual.len()
            ));
        }
        for (index, (a, e)) in actual.iter_mut().zip(expected.iter_mut()).enumerate() {
            self.path.push_index(index);
            self.value(a, e)?;
            self.path.pop();
        }
        Ok(())
    }

    fn node(&mut self, actual: &mut SyntaxNode, expected: &mut SyntaxNode) -> WalkResult {
        normalize(actual);
        normalize(expected);

        let mut cx = MatchContext {
            bindings: &mut self.bindings,
            path: &self.path,
        };
        match self.registry.dispatch(actual, expected, &mut cx) {
            Verdict::Equivalent => return Ok(()),
            Verdict::Conflict(Conflict::Rebinding(rebinding)) => {
                return Err(Rejection::Rebinding(rebinding))
            }
            Verdict::Conflict(Conflict::Mismatch { reason }) => return self.mismatch(reason),
            Verdict::Inconclusive => {}
        }

        if actual.kind != expected.kind {
            self.path.push_key("type");
            return self.mismatch(format!("expected {}, found {}", expected.kind, actual.kind));
        }

        for (key, a) in actual.attrs_mut() {
            self.path.push_key(key);
            let Some(e) = expected.get_mut(key) else {
                return self.mismatch(format!("attribute missing on expected {}", expected.kind));
            };
            self.value(a, e)?;
            self.path.pop();
        }
        Ok(())
    }

    fn mismatch(&self, reason: String) -> WalkResult {
        Err(Rejection::Mismatch {
            path: self.path.clone(),
            reason,
        })
    }
}
