//! # AST Builder Module
//!
//! Constructors for every node shape the grammar produces. The parser, the
//! normalizer and tests all go through these so each node type always has the
//! same attribute keys in the same order.
//!
//! ## Invariants
//! - One constructor per node shape; attribute sets are fixed per kind
//! - Optional children are stored as `Value::Null`, never omitted

use super::{NodeKind, Span, SyntaxNode, Value};

fn node(kind: NodeKind, span: Span) -> SyntaxNode {
    SyntaxNode::new(kind, span)
}

// ============================================================================
// LEAVES
// ============================================================================

pub fn identifier(name: &str, span: Span) -> SyntaxNode {
    node(NodeKind::Identifier, span).with("name", name)
}

pub fn literal(value: impl Into<Value>, span: Span) -> SyntaxNode {
    node(NodeKind::Literal, span).with("value", value)
}

/// A regular expression literal. It has no scalar `value`; two regexes are
/// equal when their `pattern` and `flags` are.
pub fn regex_literal(pattern: &str, flags: &str, span: Span) -> SyntaxNode {
    literal(Value::Null, span)
        .with("pattern", pattern)
        .with("flags", flags)
}

pub fn null_literal(span: Span) -> SyntaxNode {
    literal(Value::Null, span)
}

pub fn this_expression(span: Span) -> SyntaxNode {
    node(NodeKind::ThisExpression, span)
}

// ============================================================================
// EXPRESSIONS
// ============================================================================

/// Array elements; `None` marks a hole (`[a, , b]`).
pub fn array(elements: Vec<Option<SyntaxNode>>, span: Span) -> SyntaxNode {
    let elements = elements.into_iter().map(Value::from).collect();
    node(NodeKind::ArrayExpression, span).with("elements", Value::List(elements))
}

pub fn object(properties: Vec<SyntaxNode>, span: Span) -> SyntaxNode {
    node(NodeKind::ObjectExpression, span).with("properties", properties)
}

/// `kind` is `init`, `get` or `set`.
pub fn property(key: SyntaxNode, value: SyntaxNode, kind: &str, span: Span) -> SyntaxNode {
    node(NodeKind::Property, span)
        .with("key", key)
        .with("value", value)
        .with("kind", kind)
}

pub fn function_expression(
    id: Option<SyntaxNode>,
    params: Vec<SyntaxNode>,
    body: SyntaxNode,
    span: Span,
) -> SyntaxNode {
    node(NodeKind::FunctionExpression, span)
        .with("id", id)
        .with("params", params)
        .with("body", body)
}

pub fn function_declaration(
    id: SyntaxNode,
    params: Vec<SyntaxNode>,
    body: SyntaxNode,
    span: Span,
) -> SyntaxNode {
    node(NodeKind::FunctionDeclaration, span)
        .with("id", id)
        .with("params", params)
        .with("body", body)
}

pub fn unary(operator: &str, argument: SyntaxNode, span: Span) -> SyntaxNode {
    node(NodeKind::UnaryExpression, span)
        .with("operator", operator)
        .with("argument", argument)
        .with("prefix", true)
}

pub fn update(operator: &str, argument: SyntaxNode, prefix: bool, span: Span) -> SyntaxNode {
    node(NodeKind::UpdateExpression, span)
        .with("operator", operator)
        .with("argument", argument)
        .with("prefix", prefix)
}

/// Builds a `LogicalExpression` for `||`/`&&`, otherwise a `BinaryExpression`.
pub fn binary(operator: &str, left: SyntaxNode, right: SyntaxNode, span: Span) -> SyntaxNode {
    let kind = match operator {
        "||" | "&&" => NodeKind::LogicalExpression,
        _ => NodeKind::BinaryExpression,
    };
    node(kind, span)
        .with("operator", operator)
        .with("left", left)
        .with("right", right)
}

pub fn assignment(operator: &str, left: SyntaxNode, right: SyntaxNode, span: Span) -> SyntaxNode {
    node(NodeKind::AssignmentExpression, span)
        .with("operator", operator)
        .with("left", left)
        .with("right", right)
}

pub fn conditional(
    test: SyntaxNode,
    consequent: SyntaxNode,
    alternate: SyntaxNode,
    span: Span,
) -> SyntaxNode {
    node(NodeKind::ConditionalExpression, span)
        .with("test", test)
        .with("consequent", consequent)
        .with("alternate", alternate)
}

pub fn call(callee: SyntaxNode, arguments: Vec<SyntaxNode>, span: Span) -> SyntaxNode {
    node(NodeKind::CallExpression, span)
        .with("callee", callee)
        .with("arguments", arguments)
}

pub fn new_expression(callee: SyntaxNode, arguments: Vec<SyntaxNode>, span: Span) -> SyntaxNode {
    node(NodeKind::NewExpression, span)
        .with("callee", callee)
        .with("arguments", arguments)
}

pub fn member(object: SyntaxNode, property: SyntaxNode, computed: bool, span: Span) -> SyntaxNode {
    node(NodeKind::MemberExpression, span)
        .with("computed", computed)
        .with("object", object)
        .with("property", property)
}

pub fn sequence(expressions: Vec<SyntaxNode>, span: Span) -> SyntaxNode {
    node(NodeKind::SequenceExpression, span).with("expressions", expressions)
}

// ============================================================================
// STATEMENTS
// ============================================================================

pub fn expression_statement(expression: SyntaxNode, span: Span) -> SyntaxNode {
    node(NodeKind::ExpressionStatement, span).with("expression", expression)
}

pub fn block(body: Vec<SyntaxNode>, span: Span) -> SyntaxNode {
    node(NodeKind::BlockStatement, span).with("body", body)
}

pub fn empty_statement(span: Span) -> SyntaxNode {
    node(NodeKind::EmptyStatement, span)
}

pub fn debugger_statement(span: Span) -> SyntaxNode {
    node(NodeKind::DebuggerStatement, span)
}

pub fn variable_declaration(declarations: Vec<SyntaxNode>, span: Span) -> SyntaxNode {
    node(NodeKind::VariableDeclaration, span)
        .with("declarations", declarations)
        .with("kind", "var")
}

pub fn variable_declarator(id: SyntaxNode, init: Option<SyntaxNode>, span: Span) -> SyntaxNode {
    node(NodeKind::VariableDeclarator, span)
        .with("id", id)
        .with("init", init)
}

pub fn if_statement(
    test: SyntaxNode,
    consequent: SyntaxNode,
    alternate: Option<SyntaxNode>,
    span: Span,
) -> SyntaxNode {
    node(NodeKind::IfStatement, span)
        .with("test", test)
        .with("consequent", consequent)
        .with("alternate", alternate)
}

pub fn for_statement(
    init: Option<SyntaxNode>,
    test: Option<SyntaxNode>,
    update: Option<SyntaxNode>,
    body: SyntaxNode,
    span: Span,
) -> SyntaxNode {
    node(NodeKind::ForStatement, span)
        .with("init", init)
        .with("test", test)
        .with("update", update)
        .with("body", body)
}

pub fn for_in_statement(left: SyntaxNode, right: SyntaxNode, body: SyntaxNode, span: Span) -> SyntaxNode {
    node(NodeKind::ForInStatement, span)
        .with("left", left)
        .with("right", right)
        .with("body", body)
}

pub fn while_statement(test: SyntaxNode, body: SyntaxNode, span: Span) -> SyntaxNode {
    node(NodeKind::WhileStatement, span)
        .with("test", test)
        .with("body", body)
}

pub fn do_while_statement(body: SyntaxNode, test: SyntaxNode, span: Span) -> SyntaxNode {
    node(NodeKind::DoWhileStatement, span)
        .with("body", body)
        .with("test", test)
}

pub fn return_statement(argument: Option<SyntaxNode>, span: Span) -> SyntaxNode {
    node(NodeKind::ReturnStatement, span).with("argument", argument)
}

pub fn break_statement(label: Option<SyntaxNode>, span: Span) -> SyntaxNode {
    node(NodeKind::BreakStatement, span).with("label", label)
}

pub fn continue_statement(label: Option<SyntaxNode>, span: Span) -> SyntaxNode {
    node(NodeKind::ContinueStatement, span).with("label", label)
}

pub fn throw_statement(argument: SyntaxNode, span: Span) -> SyntaxNode {
    node(NodeKind::ThrowStatement, span).with("argument", argument)
}

pub fn try_statement(
    block: SyntaxNode,
    handler: Option<SyntaxNode>,
    finalizer: Option<SyntaxNode>,
    span: Span,
) -> SyntaxNode {
    node(NodeKind::TryStatement, span)
        .with("block", block)
        .with("handler", handler)
        .with("finalizer", finalizer)
}

pub fn catch_clause(param: SyntaxNode, body: SyntaxNode, span: Span) -> SyntaxNode {
    node(NodeKind::CatchClause, span)
        .with("param", param)
        .with("body", body)
}

pub fn switch_statement(discriminant: SyntaxNode, cases: Vec<SyntaxNode>, span: Span) -> SyntaxNode {
    node(NodeKind::SwitchStatement, span)
        .with("discriminant", discriminant)
        .with("cases", cases)
}

/// `test` is `None` for the `default:` clause.
pub fn switch_case(test: Option<SyntaxNode>, consequent: Vec<SyntaxNode>, span: Span) -> SyntaxNode {
    node(NodeKind::SwitchCase, span)
        .with("test", test)
        .with("consequent", consequent)
}

pub fn labeled_statement(label: SyntaxNode, body: SyntaxNode, span: Span) -> SyntaxNode {
    node(NodeKind::LabeledStatement, span)
        .with("label", label)
        .with("body", body)
}

pub fn with_statement(object: SyntaxNode, body: SyntaxNode, span: Span) -> SyntaxNode {
    node(NodeKind::WithStatement, span)
        .with("object", object)
        .with("body", body)
}

pub fn program(body: Vec<SyntaxNode>, span: Span) -> SyntaxNode {
    node(NodeKind::Program, span).with("body", body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logical_operators_build_logical_expressions() {
        let span = Span::default();
        let or = binary("||", identifier("a", span), identifier("b", span), span);
        let plus = binary("+", identifier("a", span), identifier("b", span), span);
        assert_eq!(or.kind, NodeKind::LogicalExpression);
        assert_eq!(plus.kind, NodeKind::BinaryExpression);
    }

    #[test]
    fn test_missing_children_are_null() {
        let span = Span::default();
        let decl = variable_declarator(identifier("x", span), None, span);
        assert_eq!(decl.get("init"), Some(&Value::Null));
    }
}
