//! Syntax tree model shared by the parser and the match engine.
//!
//! A tree is a [`Value`]: scalars, tagged [`SyntaxNode`]s, or ordered lists.
//! Nodes keep their attributes in grammar order so trees render the way
//! ESTree tooling prints them, with `type` first.

// ============================================================================
// IMPORTS
// ============================================================================

use std::fmt;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};

pub mod builder;
pub mod json;
pub mod kind;

pub use kind::{NodeKind, UnknownNodeKind};

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// Represents a span in the source code.
///
/// Spans are metadata for diagnostics; they never take part in comparison.
///
/// # Examples
///
/// ```rust
/// use compare_ast::ast::Span;
/// let span = Span { start: 0, end: 5 };
/// assert_eq!(span.len(), 5);
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An attribute value inside a tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Node(Box<SyntaxNode>),
    List(Vec<Value>),
}

/// A tagged construct: a node type plus its type-specific attributes.
#[derive(Debug, Clone)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    pub span: Span,
    attrs: Vec<(String, Value)>,
}

// ============================================================================
// VALUE
// ============================================================================

impl Value {
    /// True for `Null`, `Bool`, `Number` and `String`.
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Value::Node(_) | Value::List(_))
    }

    pub fn as_node(&self) -> Option<&SyntaxNode> {
        match self {
            Value::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_node_mut(&mut self) -> Option<&mut SyntaxNode> {
        match self {
            Value::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Short label used in messages: the node type, `[n items]`, or the scalar.
    pub fn describe(&self) -> String {
        match self {
            Value::Node(node) => node.kind.to_string(),
            Value::List(items) => format!("[{} items]", items.len()),
            scalar => scalar.to_string(),
        }
    }

    /// Renders the tree as indented ESTree JSON.
    pub fn pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| self.describe())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Node(node) => write!(f, "{}", node.kind),
            Value::List(items) => write!(f, "[{} items]", items.len()),
        }
    }
}

impl From<SyntaxNode> for Value {
    fn from(node: SyntaxNode) -> Self {
        Value::Node(Box::new(node))
    }
}

impl From<Option<SyntaxNode>> for Value {
    fn from(node: Option<SyntaxNode>) -> Self {
        node.map_or(Value::Null, Value::from)
    }
}

impl From<Vec<SyntaxNode>> for Value {
    fn from(nodes: Vec<SyntaxNode>) -> Self {
        Value::List(nodes.into_iter().map(Value::from).collect())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

// ============================================================================
// SYNTAX NODE
// ============================================================================

impl SyntaxNode {
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Self {
            kind,
            span,
            attrs: Vec::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Sets `key`, replacing an existing value in place to keep attribute order.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| k == key) {
            Some((_, slot)) => *slot = value,
            None => self.attrs.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attrs.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.attrs.iter_mut().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn attrs(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn attrs_mut(&mut self) -> impl Iterator<Item = (&str, &mut Value)> {
        self.attrs.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.attrs.iter().map(|(k, _)| k.as_str())
    }

    /// The `name` of an `Identifier`.
    pub fn identifier_name(&self) -> Option<&str> {
        match self.kind {
            NodeKind::Identifier => self.get("name").and_then(Value::as_str),
            _ => None,
        }
    }

    /// The `value` of a `Literal`.
    pub fn literal_value(&self) -> Option<&Value> {
        match self.kind {
            NodeKind::Literal => self.get("value"),
            _ => None,
        }
    }

    pub fn pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| self.kind.to_string())
    }
}

/// Equality ignores `span`.
impl PartialEq for SyntaxNode {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.attrs == other.attrs
    }
}

// ============================================================================
// SERIALIZATION
// ============================================================================

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            // Integral numbers print without a fractional part, as ESTree tools do.
            Value::Number(n) if n.fract() == 0.0 && n.abs() < 9.0e15 => {
                serializer.serialize_i64(*n as i64)
            }
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::Node(node) => node.serialize(serializer),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

impl Serialize for SyntaxNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.attrs.len() + 1))?;
        map.serialize_entry("type", self.kind.as_str())?;
        for (key, value) in &self.attrs {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
