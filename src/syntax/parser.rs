//! ES5 Parser
//!
//! Converts JavaScript source into ESTree-shaped [`SyntaxNode`]s.
//! This parser is purely syntactic: no scope analysis, no early errors.

use once_cell::sync::Lazy;
use pest::iterators::Pair;
use pest::pratt_parser::{Assoc, Op, PrattParser};
use pest::Parser;
use pest_derive::Parser;

use crate::ast::builder;
use crate::ast::{Span, SyntaxNode};
use crate::syntax::error::SyntaxError;

#[derive(Parser)]
#[grammar = "syntax/grammar.pest"]
struct EsParser;

type Result<T> = std::result::Result<T, SyntaxError>;

/// Binary operator precedence, lowest first.
static PRATT: Lazy<PrattParser<Rule>> = Lazy::new(|| {
    PrattParser::new()
        .op(Op::infix(Rule::logical_or, Assoc::Left))
        .op(Op::infix(Rule::logical_and, Assoc::Left))
        .op(Op::infix(Rule::bitwise_or, Assoc::Left))
        .op(Op::infix(Rule::bitwise_xor, Assoc::Left))
        .op(Op::infix(Rule::bitwise_and, Assoc::Left))
        .op(Op::infix(Rule::equality, Assoc::Left))
        .op(Op::infix(Rule::relational, Assoc::Left))
        .op(Op::infix(Rule::shift, Assoc::Left))
        .op(Op::infix(Rule::additive, Assoc::Left))
        .op(Op::infix(Rule::multiplicative, Assoc::Left))
});

// ============================================================================
// PUBLIC API
// ============================================================================

/// Parse source text into its top-level statements.
pub fn parse(source: &str) -> Result<Vec<SyntaxNode>> {
    parse_named("input", source)
}

/// Parse with a source name used in diagnostics.
pub fn parse_named(name: &str, source: &str) -> Result<Vec<SyntaxNode>> {
    if source.trim().is_empty() {
        return Ok(vec![]);
    }

    let mut pairs =
        EsParser::parse(Rule::program, source).map_err(|e| convert_parse_error(e, name, source))?;

    let builder = AstBuilder { name, source };
    let program = pairs
        .next()
        .ok_or_else(|| builder.error(Span::default(), "empty parse result"))?;

    program
        .into_inner()
        .filter(|p| p.as_rule() != Rule::EOI)
        .map(|p| builder.statement(p))
        .collect()
}

// ============================================================================
// AST BUILDER
// ============================================================================

struct AstBuilder<'s> {
    name: &'s str,
    source: &'s str,
}

impl AstBuilder<'_> {
    // ------------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------------

    fn statement(&self, pair: Pair<Rule>) -> Result<SyntaxNode> {
        let span = get_span(&pair);
        let rule = pair.as_rule();
        if needs_terminator(rule) && !has_semicolon(&pair) {
            self.check_inserted_semicolon(span)?;
        }
        let mut inner = children(pair);

        match rule {
            Rule::block => Ok(builder::block(self.statements(inner)?, span)),

            Rule::variable_statement => {
                let declaration = self.expect(&mut inner, "declaration", span)?;
                let declarations = self.declarators(children(declaration))?;
                Ok(builder::variable_declaration(declarations, span))
            }

            Rule::variable_declaration => {
                Ok(builder::variable_declaration(self.declarators(inner)?, span))
            }

            Rule::empty_statement => Ok(builder::empty_statement(span)),

            Rule::debugger_statement => Ok(builder::debugger_statement(span)),

            Rule::expression_statement => {
                let expression = self.expression(self.expect(&mut inner, "expression", span)?)?;
                Ok(builder::expression_statement(expression, span))
            }

            Rule::if_statement => {
                let test = self.expression(self.expect(&mut inner, "condition", span)?)?;
                let consequent = self.statement(self.expect(&mut inner, "statement", span)?)?;
                let alternate = inner.next().map(|p| self.statement(p)).transpose()?;
                Ok(builder::if_statement(test, consequent, alternate, span))
            }

            Rule::for_in_statement => {
                let left = self.expect(&mut inner, "for-in target", span)?;
                let left = match left.as_rule() {
                    Rule::for_in_variable => self.for_in_variable(left)?,
                    _ => self.expression(left)?,
                };
                let right = self.expression(self.expect(&mut inner, "expression", span)?)?;
                let body = self.statement(self.expect(&mut inner, "loop body", span)?)?;
                Ok(builder::for_in_statement(left, right, body, span))
            }

            Rule::for_statement => {
                let init = self.for_clause(self.expect(&mut inner, "for initializer", span)?)?;
                let test = self.for_clause(self.expect(&mut inner, "for condition", span)?)?;
                let update = self.for_clause(self.expect(&mut inner, "for update", span)?)?;
                let body = self.statement(self.expect(&mut inner, "loop body", span)?)?;
                Ok(builder::for_statement(init, test, update, body, span))
            }

            Rule::while_statement => {
                let test = self.expression(self.expect(&mut inner, "condition", span)?)?;
                let body = self.statement(self.expect(&mut inner, "loop body", span)?)?;
                Ok(builder::while_statement(test, body, span))
            }

            Rule::do_while_statement => {
                let body = self.statement(self.expect(&mut inner, "loop body", span)?)?;
                let test = self.expression(self.expect(&mut inner, "condition", span)?)?;
                Ok(builder::do_while_statement(body, test, span))
            }

            Rule::continue_statement => {
                let label = inner.next().map(|p| self.identifier(&p));
                Ok(builder::continue_statement(label, span))
            }

            Rule::break_statement => {
                let label = inner.next().map(|p| self.identifier(&p));
                Ok(builder::break_statement(label, span))
            }

            Rule::return_statement => {
                let argument = inner.next().map(|p| self.expression(p)).transpose()?;
                Ok(builder::return_statement(argument, span))
            }

            Rule::throw_statement => {
                let argument = self.expression(self.expect(&mut inner, "expression", span)?)?;
                Ok(builder::throw_statement(argument, span))
            }

            Rule::with_statement => {
                let object = self.expression(self.expect(&mut inner, "expression", span)?)?;
                let body = self.statement(self.expect(&mut inner, "statement", span)?)?;
                Ok(builder::with_statement(object, body, span))
            }

            Rule::labeled_statement => {
                let label = self.identifier(&self.expect(&mut inner, "label", span)?);
                let body = self.statement(self.expect(&mut inner, "statement", span)?)?;
                Ok(builder::labeled_statement(label, body, span))
            }

            Rule::try_statement => {
                let block = self.statement(self.expect(&mut inner, "try block", span)?)?;
                let mut handler = None;
                let mut finalizer = None;
                for clause in inner {
                    let clause_span = get_span(&clause);
                    match clause.as_rule() {
                        Rule::catch_clause => {
                            let mut parts = children(clause);
                            let param = self.identifier(&self.expect(&mut parts, "catch parameter", clause_span)?);
                            let body = self.statement(self.expect(&mut parts, "catch body", clause_span)?)?;
                            handler = Some(builder::catch_clause(param, body, clause_span));
                        }
                        Rule::finally_clause => {
                            let mut parts = children(clause);
                            finalizer = Some(self.statement(self.expect(&mut parts, "finally body", clause_span)?)?);
                        }
                        other => return Err(self.unexpected(other, clause_span)),
                    }
                }
                Ok(builder::try_statement(block, handler, finalizer, span))
            }

            Rule::switch_statement => {
                let discriminant = self.expression(self.expect(&mut inner, "discriminant", span)?)?;
                let cases = inner.map(|p| self.switch_case(p)).collect::<Result<_>>()?;
                Ok(builder::switch_statement(discriminant, cases, span))
            }

            Rule::function_declaration => {
                let id = self.identifier(&self.expect(&mut inner, "function name", span)?);
                let params = self.parameters(self.expect(&mut inner, "parameter list", span)?);
                let body = self.function_body(self.expect(&mut inner, "function body", span)?)?;
                Ok(builder::function_declaration(id, params, body, span))
            }

            other => Err(self.unexpected(other, span)),
        }
    }

    fn statements<'i>(&self, pairs: impl Iterator<Item = Pair<'i, Rule>>) -> Result<Vec<SyntaxNode>> {
        pairs.map(|p| self.statement(p)).collect()
    }

    fn declarators<'i>(&self, pairs: impl Iterator<Item = Pair<'i, Rule>>) -> Result<Vec<SyntaxNode>> {
        pairs.map(|p| self.variable_declarator(p)).collect()
    }

    fn variable_declarator(&self, pair: Pair<Rule>) -> Result<SyntaxNode> {
        let span = get_span(&pair);
        let mut inner = children(pair);
        let id = self.identifier(&self.expect(&mut inner, "variable name", span)?);
        let init = inner.next().map(|p| self.expression(p)).transpose()?;
        Ok(builder::variable_declarator(id, init, span))
    }

    fn for_in_variable(&self, pair: Pair<Rule>) -> Result<SyntaxNode> {
        let span = get_span(&pair);
        let mut inner = children(pair);
        let id_pair = self.expect(&mut inner, "variable name", span)?;
        let declarator = builder::variable_declarator(self.identifier(&id_pair), None, get_span(&id_pair));
        Ok(builder::variable_declaration(vec![declarator], span))
    }

    /// `for_init`, `for_test` and `for_update` wrap an optional child.
    fn for_clause(&self, pair: Pair<Rule>) -> Result<Option<SyntaxNode>> {
        match children(pair).next() {
            Some(p) if p.as_rule() == Rule::variable_declaration => self.statement(p).map(Some),
            Some(p) => self.expression(p).map(Some),
            None => Ok(None),
        }
    }

    fn switch_case(&self, pair: Pair<Rule>) -> Result<SyntaxNode> {
        let span = get_span(&pair);
        // Keyword tokens are kept here: `default` is only visible as kw_default.
        let mut inner = pair.into_inner();
        let test = match inner.next() {
            Some(p) if p.as_rule() == Rule::kw_default => None,
            Some(p) if p.as_rule() == Rule::kw_case => {
                Some(self.expression(self.expect(&mut inner, "case expression", span)?)?)
            }
            _ => return Err(self.error(span, "malformed switch case")),
        };
        let consequent = self.statements(inner)?;
        Ok(builder::switch_case(test, consequent, span))
    }

    fn parameters(&self, pair: Pair<Rule>) -> Vec<SyntaxNode> {
        children(pair).map(|p| self.identifier(&p)).collect()
    }

    fn function_body(&self, pair: Pair<Rule>) -> Result<SyntaxNode> {
        let span = get_span(&pair);
        Ok(builder::block(self.statements(children(pair))?, span))
    }

    // ------------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------------

    fn expression(&self, pair: Pair<Rule>) -> Result<SyntaxNode> {
        let span = get_span(&pair);

        match pair.as_rule() {
            Rule::expression => {
                let mut items = children(pair)
                    .map(|p| self.expression(p))
                    .collect::<Result<Vec<_>>>()?;
                match items.len() {
                    0 => Err(self.error(span, "empty expression")),
                    1 => Ok(items.remove(0)),
                    _ => Ok(builder::sequence(items, span)),
                }
            }

            Rule::assignment_expression => {
                let mut inner = children(pair);
                let target = self.expression(self.expect(&mut inner, "expression", span)?)?;
                match inner.next() {
                    None => Ok(target),
                    Some(op) => {
                        let value = self.expression(self.expect(&mut inner, "assigned value", span)?)?;
                        Ok(builder::assignment(op.as_str(), target, value, span))
                    }
                }
            }

            Rule::conditional_expression => {
                let mut inner = children(pair);
                let test = self.expression(self.expect(&mut inner, "expression", span)?)?;
                match inner.next() {
                    None => Ok(test),
                    Some(consequent) => {
                        let consequent = self.expression(consequent)?;
                        let alternate = self.expression(self.expect(&mut inner, "alternate", span)?)?;
                        Ok(builder::conditional(test, consequent, alternate, span))
                    }
                }
            }

            Rule::binary_expression => {
                let mut inner = pair.into_inner().peekable();
                let first = self.expect(&mut inner, "operand", span)?;
                if inner.peek().is_none() {
                    return self.expression(first);
                }
                PRATT
                    .map_primary(|operand| self.expression(operand))
                    .map_infix(|lhs, op, rhs| {
                        let (lhs, rhs) = (lhs?, rhs?);
                        let span = Span {
                            start: lhs.span.start,
                            end: rhs.span.end,
                        };
                        Ok(builder::binary(op.as_str(), lhs, rhs, span))
                    })
                    .parse(std::iter::once(first).chain(inner))
            }

            Rule::unary_expression => {
                let mut operators = Vec::new();
                let mut operand = None;
                for p in pair.into_inner() {
                    match p.as_rule() {
                        Rule::unary_operator => operators.push(p),
                        _ => operand = Some(p),
                    }
                }
                let operand = operand.ok_or_else(|| self.error(span, "missing operand"))?;
                let mut node = self.expression(operand)?;
                for op in operators.into_iter().rev() {
                    let span = Span {
                        start: op.as_span().start(),
                        end: node.span.end,
                    };
                    node = match op.as_str() {
                        "++" | "--" => builder::update(op.as_str(), node, true, span),
                        other => builder::unary(other, node, span),
                    };
                }
                Ok(node)
            }

            Rule::postfix_expression => {
                let mut inner = pair.into_inner();
                let argument = self.expression(self.expect(&mut inner, "operand", span)?)?;
                match inner.next() {
                    Some(op) => Ok(builder::update(op.as_str(), argument, false, span)),
                    None => Ok(argument),
                }
            }

            Rule::left_hand_side_expression | Rule::new_target => {
                let mut inner = children(pair);
                let base = self.expression(self.expect(&mut inner, "expression", span)?)?;
                inner.try_fold(base, |object, accessor| self.accessor(object, accessor))
            }

            Rule::new_expression => {
                let mut inner = children(pair);
                let callee = self.expression(self.expect(&mut inner, "constructor", span)?)?;
                let arguments = match inner.next() {
                    Some(args) => self.arguments(args)?,
                    None => Vec::new(),
                };
                Ok(builder::new_expression(callee, arguments, span))
            }

            Rule::parenthesized => {
                let mut inner = children(pair);
                self.expression(self.expect(&mut inner, "expression", span)?)
            }

            Rule::this_expression => Ok(builder::this_expression(span)),

            Rule::identifier => Ok(self.identifier(&pair)),

            Rule::null_literal => Ok(builder::null_literal(span)),

            Rule::boolean_literal => Ok(builder::literal(pair.as_str() == "true", span)),

            Rule::numeric_literal => self.number(pair),

            Rule::string_literal => self.string(pair),

            Rule::regex_literal => self.regex(pair),

            Rule::function_expression => {
                let mut id = None;
                let mut params = Vec::new();
                let mut body = None;
                for p in children(pair) {
                    match p.as_rule() {
                        Rule::identifier => id = Some(self.identifier(&p)),
                        Rule::formal_parameters => params = self.parameters(p),
                        Rule::function_body => body = Some(self.function_body(p)?),
                        other => return Err(self.unexpected(other, span)),
                    }
                }
                let body = body.ok_or_else(|| self.error(span, "missing function body"))?;
                Ok(builder::function_expression(id, params, body, span))
            }

            Rule::array_literal => {
                let mut elements = Vec::new();
                let mut expecting = true;
                for p in children(pair) {
                    if p.as_rule() == Rule::elision {
                        if expecting {
                            elements.push(None);
                        }
                        expecting = true;
                    } else {
                        elements.push(Some(self.expression(p)?));
                        expecting = false;
                    }
                }
                Ok(builder::array(elements, span))
            }

            Rule::object_literal => {
                let properties = children(pair)
                    .map(|p| self.property(p))
                    .collect::<Result<_>>()?;
                Ok(builder::object(properties, span))
            }

            other => Err(self.unexpected(other, span)),
        }
    }

    /// Applies one `.name`, `[expr]` or `(args)` suffix to `object`.
    fn accessor(&self, object: SyntaxNode, pair: Pair<Rule>) -> Result<SyntaxNode> {
        let span = Span {
            start: object.span.start,
            end: pair.as_span().end(),
        };
        match pair.as_rule() {
            Rule::dot_access => {
                let mut inner = children(pair);
                let name = self.expect(&mut inner, "property name", span)?;
                Ok(builder::member(object, self.identifier(&name), false, span))
            }
            Rule::bracket_access => {
                let mut inner = children(pair);
                let property = self.expression(self.expect(&mut inner, "property expression", span)?)?;
                Ok(builder::member(object, property, true, span))
            }
            Rule::arguments => Ok(builder::call(object, self.arguments(pair)?, span)),
            other => Err(self.unexpected(other, span)),
        }
    }

    fn arguments(&self, pair: Pair<Rule>) -> Result<Vec<SyntaxNode>> {
        children(pair).map(|p| self.expression(p)).collect()
    }

    fn property(&self, pair: Pair<Rule>) -> Result<SyntaxNode> {
        let span = get_span(&pair);
        let mut outer = children(pair);
        let form = self.expect(&mut outer, "property", span)?;
        let form_rule = form.as_rule();
        let mut inner = children(form);
        let key = self.property_key(self.expect(&mut inner, "property name", span)?)?;

        match form_rule {
            Rule::init_property => {
                let value = self.expression(self.expect(&mut inner, "property value", span)?)?;
                Ok(builder::property(key, value, "init", span))
            }
            Rule::getter => {
                let body = self.function_body(self.expect(&mut inner, "getter body", span)?)?;
                let value = builder::function_expression(None, vec![], body, span);
                Ok(builder::property(key, value, "get", span))
            }
            Rule::setter => {
                let param = self.identifier(&self.expect(&mut inner, "setter parameter", span)?);
                let body = self.function_body(self.expect(&mut inner, "setter body", span)?)?;
                let value = builder::function_expression(None, vec![param], body, span);
                Ok(builder::property(key, value, "set", span))
            }
            other => Err(self.unexpected(other, span)),
        }
    }

    fn property_key(&self, pair: Pair<Rule>) -> Result<SyntaxNode> {
        match pair.as_rule() {
            Rule::identifier_name => Ok(self.identifier(&pair)),
            _ => self.expression(pair),
        }
    }

    // ------------------------------------------------------------------------
    // Leaves
    // ------------------------------------------------------------------------

    fn identifier(&self, pair: &Pair<Rule>) -> SyntaxNode {
        builder::identifier(pair.as_str(), get_span(pair))
    }

    fn number(&self, pair: Pair<Rule>) -> Result<SyntaxNode> {
        let span = get_span(&pair);
        let text = pair.as_str();
        let value = if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
            // Folded as f64: hex literals may be wider than any integer type.
            Some(
                hex.chars()
                    .filter_map(|c| c.to_digit(16))
                    .fold(0.0, |acc, digit| acc * 16.0 + f64::from(digit)),
            )
        } else {
            text.parse::<f64>().ok()
        };
        let value = value.ok_or_else(|| self.error(span, format!("invalid number '{}'", text)))?;
        Ok(builder::literal(value, span))
    }

    fn string(&self, pair: Pair<Rule>) -> Result<SyntaxNode> {
        let span = get_span(&pair);
        let raw = pair.into_inner().next().map_or("", |p| p.as_str());
        Ok(builder::literal(unescape_string(raw), span))
    }

    fn regex(&self, pair: Pair<Rule>) -> Result<SyntaxNode> {
        let span = get_span(&pair);
        let mut inner = pair.into_inner();
        let body = self.expect(&mut inner, "regular expression body", span)?;
        let flags = inner.next().map_or("", |p| p.as_str());
        Ok(builder::regex_literal(body.as_str(), flags, span))
    }

    // ------------------------------------------------------------------------
    // Utilities
    // ------------------------------------------------------------------------

    /// A statement without `;` must be followed by `}`, end of input, or a
    /// line break.
    fn check_inserted_semicolon(&self, span: Span) -> Result<()> {
        let next = skip_trivia(self.source, span.end);
        let rest = &self.source[next..];
        if rest.is_empty() || rest.starts_with('}') || line_break_before(self.source, next) {
            return Ok(());
        }
        let end = next + rest.chars().next().map_or(0, char::len_utf8);
        Err(self.error(Span { start: next, end }, "missing semicolon"))
    }

    fn expect<'i>(
        &self,
        inner: &mut impl Iterator<Item = Pair<'i, Rule>>,
        element: &str,
        span: Span,
    ) -> Result<Pair<'i, Rule>> {
        inner
            .next()
            .ok_or_else(|| self.error(span, format!("missing {}", element)))
    }

    fn error(&self, span: Span, message: impl Into<String>) -> SyntaxError {
        SyntaxError::new(self.name, self.source, span, message)
    }

    fn unexpected(&self, rule: Rule, span: Span) -> SyntaxError {
        self.error(span, format!("unsupported construct: {:?}", rule))
    }
}

// ============================================================================
// UTILITIES
// ============================================================================

fn get_span(pair: &Pair<Rule>) -> Span {
    Span {
        start: pair.as_span().start(),
        end: pair.as_span().end(),
    }
}

/// Inner pairs with keyword and semicolon tokens removed.
fn children(pair: Pair<'_, Rule>) -> impl Iterator<Item = Pair<'_, Rule>> {
    pair.into_inner().filter(|p| !is_token(p.as_rule()))
}

fn is_token(rule: Rule) -> bool {
    matches!(
        rule,
        Rule::semi
            | Rule::kw_break
            | Rule::kw_case
            | Rule::kw_catch
            | Rule::kw_continue
            | Rule::kw_debugger
            | Rule::kw_default
            | Rule::kw_do
            | Rule::kw_else
            | Rule::kw_finally
            | Rule::kw_for
            | Rule::kw_function
            | Rule::kw_get
            | Rule::kw_if
            | Rule::kw_in
            | Rule::kw_new
            | Rule::kw_return
            | Rule::kw_set
            | Rule::kw_switch
            | Rule::kw_throw
            | Rule::kw_try
            | Rule::kw_var
            | Rule::kw_while
            | Rule::kw_with
    )
}

// ----------------------------------------------------------------------------
// Semicolon insertion
// ----------------------------------------------------------------------------

fn needs_terminator(rule: Rule) -> bool {
    matches!(
        rule,
        Rule::variable_statement
            | Rule::expression_statement
            | Rule::continue_statement
            | Rule::break_statement
            | Rule::return_statement
            | Rule::throw_statement
            | Rule::debugger_statement
    )
}

fn has_semicolon(pair: &Pair<Rule>) -> bool {
    pair.clone().into_inner().any(|p| p.as_rule() == Rule::semi)
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

fn is_inline_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\u{0B}' | '\u{0C}' | '\u{A0}' | '\u{FEFF}')
}

/// Position of the first token at or after `pos`.
fn skip_trivia(source: &str, mut pos: usize) -> usize {
    loop {
        let rest = &source[pos..];
        let trimmed = rest.trim_start_matches(|c: char| is_inline_space(c) || is_line_terminator(c));
        pos += rest.len() - trimmed.len();
        if let Some(comment) = trimmed.strip_prefix("//") {
            pos += 2 + comment.find(is_line_terminator).unwrap_or(comment.len());
        } else if let Some(comment) = trimmed.strip_prefix("/*") {
            match comment.find("*/") {
                Some(close) => pos += close + 4,
                None => return source.len(),
            }
        } else {
            return pos;
        }
    }
}

/// True when the whitespace and comments that end at `pos` hold a line
/// terminator. A multi-line block comment counts as one.
fn line_break_before(source: &str, pos: usize) -> bool {
    let mut before = &source[..pos];
    loop {
        let trimmed = before.trim_end_matches(is_inline_space);
        if trimmed.ends_with(is_line_terminator) {
            return true;
        }
        let Some(body) = trimmed.strip_suffix("*/") else {
            return false;
        };
        let Some(open) = body.rfind("/*") else {
            return false;
        };
        if body[open..].contains(is_line_terminator) {
            return true;
        }
        before = &body[..open];
    }
}

/// Resolves JavaScript escape sequences in the body of a string literal.
fn unescape_string(raw: &str) -> String {
    let mut result = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('b') => result.push('\u{08}'),
            Some('f') => result.push('\u{0C}'),
            Some('v') => result.push('\u{0B}'),
            Some('0') if !chars.peek().is_some_and(|c| c.is_ascii_digit()) => result.push('\0'),
            Some('x') => match read_hex(&mut chars, 2) {
                Some(code) => result.push(char::from_u32(code).unwrap_or('\u{FFFD}')),
                None => result.push('x'),
            },
            Some('u') => match read_hex(&mut chars, 4) {
                Some(high @ 0xD800..=0xDBFF) => {
                    let low = read_low_surrogate(&mut chars);
                    let code = low.map(|low| 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00));
                    result.push(code.and_then(char::from_u32).unwrap_or('\u{FFFD}'));
                }
                Some(code) => result.push(char::from_u32(code).unwrap_or('\u{FFFD}')),
                None => result.push('u'),
            },
            // Line continuation
            Some('\n') | Some('\u{2028}') | Some('\u{2029}') => {}
            Some('\r') => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            Some(other) => result.push(other),
            None => result.push('\\'),
        }
    }

    result
}

fn read_hex(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, digits: usize) -> Option<u32> {
    let lookahead: String = chars.clone().take(digits).collect();
    if lookahead.len() != digits || !lookahead.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    for _ in 0..digits {
        chars.next();
    }
    u32::from_str_radix(&lookahead, 16).ok()
}

fn read_low_surrogate(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<u32> {
    let mut lookahead = chars.clone();
    if lookahead.next() != Some('\\') || lookahead.next() != Some('u') {
        return None;
    }
    let code = read_hex(&mut lookahead, 4).filter(|c| (0xDC00..=0xDFFF).contains(c))?;
    *chars = lookahead;
    Some(code)
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

fn convert_parse_error(error: pest::error::Error<Rule>, name: &str, source: &str) -> SyntaxError {
    let span = match error.location {
        pest::error::InputLocation::Pos(pos) => Span {
            start: pos,
            end: pos,
        },
        pest::error::InputLocation::Span((start, end)) => Span { start, end },
    };
    let message = error.variant.message().to_string();
    SyntaxError::new(name, source, span, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{NodeKind, Value};

    fn first_expression(source: &str) -> SyntaxNode {
        let statements = parse(source).unwrap();
        let statement = statements.into_iter().next().unwrap();
        assert_eq!(statement.kind, NodeKind::ExpressionStatement);
        statement.get("expression").and_then(Value::as_node).unwrap().clone()
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("  \n\t").unwrap().is_empty());
    }

    #[test]
    fn test_comment_only_input() {
        assert!(parse("// nothing here\n/* or here */").unwrap().is_empty());
    }

    #[test]
    fn test_unary_operand_required() {
        assert!(parse("var a = !;").is_err());
    }

    #[test]
    fn test_precedence() {
        let expr = first_expression("a + b * c;");
        assert_eq!(expr.get("operator"), Some(&Value::from("+")));
        let right = expr.get("right").and_then(Value::as_node).unwrap();
        assert_eq!(right.get("operator"), Some(&Value::from("*")));
    }

    #[test]
    fn test_left_associativity() {
        let expr = first_expression("a - b - c;");
        let left = expr.get("left").and_then(Value::as_node).unwrap();
        assert_eq!(left.kind, NodeKind::BinaryExpression);
        assert_eq!(left.get("operator"), Some(&Value::from("-")));
    }

    #[test]
    fn test_logical_expression_kind() {
        let expr = first_expression("a || b && c;");
        assert_eq!(expr.kind, NodeKind::LogicalExpression);
        assert_eq!(expr.get("operator"), Some(&Value::from("||")));
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape_string(r"a\nb"), "a\nb");
        assert_eq!(unescape_string(r"\x41B"), "AB");
        assert_eq!(unescape_string(r"\uD83D\uDE00"), "\u{1F600}");
        assert_eq!(unescape_string(r#"\"q\'"#), "\"q'");
        assert_eq!(unescape_string("a\\\nb"), "ab");
    }

    #[test]
    fn test_hex_number() {
        let expr = first_expression("0x1F;");
        assert_eq!(expr.literal_value(), Some(&Value::Number(31.0)));
    }

    #[test]
    fn test_hex_number_wider_than_u64() {
        let expr = first_expression("0x10000000000000000;");
        assert_eq!(expr.literal_value(), Some(&Value::Number(18446744073709551616.0)));
    }

    #[test]
    fn test_skip_trivia() {
        assert_eq!(skip_trivia("a  // c\n /* d */ b", 1), 17);
        assert_eq!(skip_trivia("a /* open", 1), 9);
        assert_eq!(skip_trivia("a", 1), 1);
    }

    #[test]
    fn test_line_break_before() {
        assert!(line_break_before("a\n  b", 4));
        assert!(line_break_before("a /*\n*/ b", 8));
        assert!(line_break_before("a // c\nb", 7));
        assert!(!line_break_before("a /* c */ b", 10));
        assert!(!line_break_before("a b", 2));
    }
}
