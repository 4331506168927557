//! # Comparator Registry
//!
//! Comparators are equivalence rules scoped to an unordered pair of node
//! kinds. The engine consults them for every node pair before falling back
//! to attribute-by-attribute recursion.
//!
//! ## Module Structure
//!
//! - **`identifiers`**: identifier placeholder binding
//! - **`strings`**: string-literal placeholder binding
//! - **`member`**: dot/bracket property bridge
//!
//! ## Dispatch
//!
//! Built-ins run first, then caller-supplied rules in registration order.
//! The first [`Verdict::Equivalent`] or [`Verdict::Conflict`] wins; when every
//! comparator is [`Verdict::Inconclusive`] the engine recurses generically.

use std::fmt;
use std::sync::Arc;

use crate::ast::{NodeKind, SyntaxNode};
use crate::bindings::{Bindings, Rebinding};
use crate::path::TreePath;

pub mod identifiers;
pub mod member;
pub mod strings;

pub use identifiers::IdentifierPlaceholders;
pub use member::MemberPropertyBridge;
pub use strings::StringPlaceholders;

// ============================================================================
// CORE TYPES AND TRAITS
// ============================================================================

/// Outcome of one comparator on one node pair.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// The pair is equivalent; skip recursion into this subtree.
    Equivalent,
    /// No opinion; try the next comparator, then generic recursion.
    Inconclusive,
    /// Abort the whole comparison.
    Conflict(Conflict),
}

/// Why a comparator aborted the comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Conflict {
    /// A placeholder would bind to a second concrete value.
    Rebinding(Rebinding),
    /// The comparator rejected the pair outright.
    Mismatch { reason: String },
}

impl From<Rebinding> for Conflict {
    fn from(rebinding: Rebinding) -> Self {
        Conflict::Rebinding(rebinding)
    }
}

/// An unordered pair of node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindPair(pub NodeKind, pub NodeKind);

impl KindPair {
    pub fn new(a: NodeKind, b: NodeKind) -> Self {
        Self(a, b)
    }

    /// True when `(actual, expected)` is this pair in either order.
    pub fn matches(&self, actual: NodeKind, expected: NodeKind) -> bool {
        (self.0 == actual && self.1 == expected) || (self.0 == expected && self.1 == actual)
    }
}

impl fmt::Display for KindPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}

/// Per-call state a comparator may read or update.
pub struct MatchContext<'a> {
    pub bindings: &'a mut Bindings,
    pub path: &'a TreePath,
}

/// A type-pair-scoped equivalence rule.
///
/// Both nodes are the engine's working copies: a comparator may rewrite the
/// expected side (placeholder substitution) or either side (shape bridging).
pub trait Comparator: Send + Sync {
    fn name(&self) -> &str;

    fn scope(&self) -> KindPair;

    fn compare(
        &self,
        actual: &mut SyntaxNode,
        expected: &mut SyntaxNode,
        cx: &mut MatchContext<'_>,
    ) -> Verdict;
}

// ============================================================================
// CLOSURE-BACKED RULES
// ============================================================================

/// A comparator built from a closure, for caller-supplied rules.
///
/// ```rust
/// use compare_ast::ast::{NodeKind, Value};
/// use compare_ast::comparators::{ComparatorRule, Verdict};
///
/// let three_or_four = ComparatorRule::new(
///     "three-or-four",
///     NodeKind::Literal,
///     NodeKind::Literal,
///     |actual, expected, _cx| {
///         let allowed = |v: Option<&Value>| matches!(v, Some(Value::Number(n)) if *n == 3.0 || *n == 4.0);
///         if allowed(actual.literal_value()) && allowed(expected.literal_value()) {
///             Verdict::Equivalent
///         } else {
///             Verdict::Inconclusive
///         }
///     },
/// );
/// # let _ = three_or_four;
/// ```
pub struct ComparatorRule<F> {
    name: String,
    scope: KindPair,
    handler: F,
}

impl<F> ComparatorRule<F>
where
    F: Fn(&mut SyntaxNode, &mut SyntaxNode, &mut MatchContext<'_>) -> Verdict + Send + Sync,
{
    pub fn new(name: impl Into<String>, a: NodeKind, b: NodeKind, handler: F) -> Self {
        Self {
            name: name.into(),
            scope: KindPair::new(a, b),
            handler,
        }
    }
}

impl<F> Comparator for ComparatorRule<F>
where
    F: Fn(&mut SyntaxNode, &mut SyntaxNode, &mut MatchContext<'_>) -> Verdict + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn scope(&self) -> KindPair {
        self.scope
    }

    fn compare(
        &self,
        actual: &mut SyntaxNode,
        expected: &mut SyntaxNode,
        cx: &mut MatchContext<'_>,
    ) -> Verdict {
        (self.handler)(actual, expected, cx)
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Ordered comparators for one comparison call.
#[derive(Clone, Default)]
pub struct ComparatorRegistry {
    comparators: Vec<Arc<dyn Comparator>>,
}

impl ComparatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, comparator: Arc<dyn Comparator>) {
        self.comparators.push(comparator);
    }

    pub fn len(&self) -> usize {
        self.comparators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comparators.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.comparators.iter().map(|c| c.name().to_string()).collect()
    }

    /// Runs applicable comparators in order until one decides.
    pub fn dispatch(
        &self,
        actual: &mut SyntaxNode,
        expected: &mut SyntaxNode,
        cx: &mut MatchContext<'_>,
    ) -> Verdict {
        for comparator in &self.comparators {
            if !comparator.scope().matches(actual.kind, expected.kind) {
                continue;
            }
            let verdict = comparator.compare(actual, expected, cx);
            tracing::trace!(
                comparator = comparator.name(),
                path = %cx.path,
                verdict = ?verdict,
                "comparator verdict"
            );
            if verdict != Verdict::Inconclusive {
                return verdict;
            }
        }
        Verdict::Inconclusive
    }
}

impl fmt::Debug for ComparatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
