//! Dot/bracket bridge for `MemberExpression` pairs that reach dispatch with
//! different property shapes.
//!
//! The normalizer rewrites both sides before dispatch, so this only fires for
//! trees that skipped normalization (e.g. a custom comparator rewrote one
//! side). The dotted side is rewritten to the bracket form and generic
//! recursion compares the two property literals, so string placeholders in a
//! bracket key still get a chance to bind.

use super::{Comparator, KindPair, MatchContext, Verdict};
use crate::ast::{NodeKind, SyntaxNode, Value};
use crate::normalize::normalize;

pub struct MemberPropertyBridge;

impl Comparator for MemberPropertyBridge {
    fn name(&self) -> &str {
        "member-property-bridge"
    }

    fn scope(&self) -> KindPair {
        KindPair::new(NodeKind::MemberExpression, NodeKind::MemberExpression)
    }

    fn compare(
        &self,
        actual: &mut SyntaxNode,
        expected: &mut SyntaxNode,
        _cx: &mut MatchContext<'_>,
    ) -> Verdict {
        if is_dotted(actual) && is_bracketed(expected) {
            normalize(actual);
        } else if is_dotted(expected) && is_bracketed(actual) {
            normalize(expected);
        }
        Verdict::Inconclusive
    }
}

/// `.name` access.
fn is_dotted(node: &SyntaxNode) -> bool {
    node.get("computed") == Some(&Value::Bool(false))
        && node
            .get("property")
            .and_then(Value::as_node)
            .and_then(SyntaxNode::identifier_name)
            .is_some()
}

/// `["..."]` access.
fn is_bracketed(node: &SyntaxNode) -> bool {
    node.get("computed") == Some(&Value::Bool(true))
        && node
            .get("property")
            .and_then(Value::as_node)
            .and_then(SyntaxNode::literal_value)
            .and_then(Value::as_str)
            .is_some()
}
