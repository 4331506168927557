//! Tree normalization applied to every node pair before comparison.
//!
//! Rewrites non-computed member access into its bracket form so that
//! `obj.prop` and `obj["prop"]` reach the comparators with the same shape:
//!
//! ```text
//! object.property  =>  object["property"]
//! ```

use crate::ast::{builder, NodeKind, SyntaxNode, Value};

/// Canonicalizes `node` in place. Returns whether anything changed.
///
/// Idempotent: a second call on the same node is a no-op.
pub fn normalize(node: &mut SyntaxNode) -> bool {
    match node.kind {
        NodeKind::MemberExpression => normalize_member(node),
        _ => false,
    }
}

/// Normalizes every node in a tree, children first.
pub fn normalize_tree(value: &mut Value) {
    match value {
        Value::Node(node) => {
            for (_, child) in node.attrs_mut() {
                normalize_tree(child);
            }
            normalize(node);
        }
        Value::List(items) => items.iter_mut().for_each(normalize_tree),
        _ => {}
    }
}

fn normalize_member(node: &mut SyntaxNode) -> bool {
    if node.get("computed") != Some(&Value::Bool(false)) {
        return false;
    }
    let Some(property) = node.get("property").and_then(Value::as_node) else {
        return false;
    };
    let Some(name) = property.identifier_name() else {
        return false;
    };

    let literal = builder::literal(name, property.span);
    node.set("property", literal);
    node.set("computed", true);
    true
}
