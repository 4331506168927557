//! ESTree JSON import.
//!
//! Lets callers hand the engine trees produced by another JavaScript parser.
//! Location metadata and `raw` source text are dropped on the way in so that
//! imported trees have the same attribute sets as parsed ones.

use serde_json::Value as Json;
use thiserror::Error;

use super::{builder, NodeKind, Span, SyntaxNode, Value};

/// Keys that describe source text rather than program structure.
const IGNORED_KEYS: &[&str] = &["loc", "range", "start", "end", "raw"];

#[derive(Debug, Error, Clone, PartialEq)]
pub enum JsonTreeError {
    #[error("unknown node type '{kind}' at {path}")]
    UnknownType { kind: String, path: String },
    #[error("object without a string 'type' at {path}")]
    Untagged { path: String },
    #[error("number at {path} is not representable")]
    BadNumber { path: String },
    #[error("expected a Program node or a statement array, found {found}")]
    NotAProgram { found: String },
}

impl Value {
    /// Converts an ESTree JSON value into a tree.
    pub fn from_json(json: &Json) -> Result<Value, JsonTreeError> {
        convert(json, &mut String::from("$"))
    }

    pub fn to_json(&self) -> Json {
        // Serialize on our own types cannot fail.
        serde_json::to_value(self).unwrap_or(Json::Null)
    }
}

/// Accepts a `Program` object or a bare statement array and returns the
/// top-level statement list.
pub fn program_body(json: &Json) -> Result<Vec<Value>, JsonTreeError> {
    match Value::from_json(json)? {
        Value::List(items) => Ok(items),
        Value::Node(mut node) if node.kind == NodeKind::Program => match node.get_mut("body") {
            Some(Value::List(items)) => Ok(std::mem::take(items)),
            _ => Err(JsonTreeError::NotAProgram {
                found: "Program without a body list".into(),
            }),
        },
        other => Err(JsonTreeError::NotAProgram {
            found: other.describe(),
        }),
    }
}

fn convert(json: &Json, path: &mut String) -> Result<Value, JsonTreeError> {
    match json {
        Json::Null => Ok(Value::Null),
        Json::Bool(b) => Ok(Value::Bool(*b)),
        Json::Number(n) => n
            .as_f64()
            .map(Value::Number)
            .ok_or_else(|| JsonTreeError::BadNumber { path: path.clone() }),
        Json::String(s) => Ok(Value::String(s.clone())),
        Json::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                let len = path.len();
                path.push_str(&format!("[{}]", i));
                out.push(convert(item, path)?);
                path.truncate(len);
            }
            Ok(Value::List(out))
        }
        Json::Object(map) => {
            let kind = match map.get("type") {
                Some(Json::String(kind)) => {
                    kind.parse::<NodeKind>()
                        .map_err(|_| JsonTreeError::UnknownType {
                            kind: kind.clone(),
                            path: path.clone(),
                        })?
                }
                _ => return Err(JsonTreeError::Untagged { path: path.clone() }),
            };
            // ESTree puts regex literals under `regex: { pattern, flags }`.
            if let (NodeKind::Literal, Some(Json::Object(regex))) = (kind, map.get("regex")) {
                let pattern = regex_part(regex, "pattern");
                let flags = regex_part(regex, "flags");
                return Ok(Value::from(builder::regex_literal(pattern, flags, span_of(map))));
            }
            let mut node = SyntaxNode::new(kind, span_of(map));
            for (key, value) in map {
                if key == "type" || IGNORED_KEYS.contains(&key.as_str()) {
                    continue;
                }
                let len = path.len();
                path.push('.');
                path.push_str(key);
                node.set(key, convert(value, path)?);
                path.truncate(len);
            }
            Ok(Value::from(node))
        }
    }
}

fn regex_part<'a>(regex: &'a serde_json::Map<String, Json>, key: &str) -> &'a str {
    regex.get(key).and_then(Json::as_str).unwrap_or("")
}

/// Picks up `range: [start, end]` or `start`/`end` offsets when present.
fn span_of(map: &serde_json::Map<String, Json>) -> Span {
    let offset = |v: Option<&Json>| v.and_then(Json::as_u64).map(|n| n as usize);
    if let Some(Json::Array(range)) = map.get("range") {
        if let (Some(start), Some(end)) = (offset(range.first()), offset(range.get(1))) {
            return Span { start, end };
        }
    }
    match (offset(map.get("start")), offset(map.get("end"))) {
        (Some(start), Some(end)) => Span { start, end },
        _ => Span::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_import_drops_location_keys() {
        let json = json!({
            "type": "Literal",
            "value": "b",
            "raw": "'b'",
            "range": [4, 7]
        });
        let value = Value::from_json(&json).unwrap();
        let node = value.as_node().unwrap();
        assert_eq!(node.keys().collect::<Vec<_>>(), vec!["value"]);
        assert_eq!(node.span, Span { start: 4, end: 7 });
    }

    #[test]
    fn test_program_body_accepts_program_and_array() {
        let stmt = json!({ "type": "EmptyStatement" });
        let program = json!({ "type": "Program", "body": [stmt.clone()] });
        assert_eq!(program_body(&program).unwrap().len(), 1);
        assert_eq!(program_body(&json!([stmt])).unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_type_reports_path() {
        let json = json!([{ "type": "ExpressionStatement", "expression": { "type": "ArrowFunctionExpression" } }]);
        let err = Value::from_json(&json).unwrap_err();
        assert_eq!(
            err,
            JsonTreeError::UnknownType {
                kind: "ArrowFunctionExpression".into(),
                path: "$[0].expression".into(),
            }
        );
    }

    #[test]
    fn test_untagged_object_is_rejected() {
        let json = json!({ "type": "ObjectExpression", "properties": [{ "key": "a" }] });
        assert!(matches!(
            Value::from_json(&json),
            Err(JsonTreeError::Untagged { .. })
        ));
    }

    #[test]
    fn test_regex_literal_import() {
        let json = json!({
            "type": "Literal",
            "value": {},
            "raw": "/a+/g",
            "regex": { "pattern": "a+", "flags": "g" }
        });
        let value = Value::from_json(&json).unwrap();
        let node = value.as_node().unwrap();
        assert_eq!(node, &builder::regex_literal("a+", "g", Span::default()));
    }

    #[test]
    fn test_round_trip_through_json() {
        let json = json!({ "type": "Identifier", "name": "x" });
        let value = Value::from_json(&json).unwrap();
        assert_eq!(value.to_json(), json);
    }
}
