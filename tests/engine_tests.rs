// tests/engine_tests.rs

use compare_ast::ast::{NodeKind, SyntaxNode, Value};
use compare_ast::comparators::{ComparatorRule, Conflict, Verdict};
use compare_ast::{compare_source, CompareError, CompareOptions, ErrorKind};
use regex::Regex;

fn plain() -> CompareOptions {
    CompareOptions::new()
}

fn vars(pattern: &str) -> CompareOptions {
    CompareOptions::new().with_identifier_pattern(Regex::new(pattern).unwrap())
}

fn strings(pattern: &str) -> CompareOptions {
    CompareOptions::new().with_string_pattern(Regex::new(pattern).unwrap())
}

fn kind(actual: &str, expected: &str, options: &CompareOptions) -> Option<ErrorKind> {
    compare_source(actual, expected, options).err().map(|e| e.kind())
}

fn is_number(value: Option<&Value>, n: f64) -> bool {
    value == Some(&Value::Number(n))
}

fn is_undefined(node: &SyntaxNode) -> bool {
    node.identifier_name() == Some("undefined")
}

fn is_void(node: &SyntaxNode) -> bool {
    node.kind == NodeKind::UnaryExpression && node.get("operator") == Some(&Value::from("void"))
}

/// Equates the literal values 3 and 4.
fn three_is_four() -> CompareOptions {
    plain().with_comparator(ComparatorRule::new(
        "three-is-four",
        NodeKind::Literal,
        NodeKind::Literal,
        |actual, expected, _cx| {
            let (a, e) = (actual.literal_value(), expected.literal_value());
            if (is_number(a, 3.0) && is_number(e, 4.0)) || (is_number(a, 4.0) && is_number(e, 3.0)) {
                Verdict::Equivalent
            } else {
                Verdict::Inconclusive
            }
        },
    ))
}

// ---
// Equivalent programs
// ---

#[test]
fn test_whitespace_is_ignored() {
    assert!(compare_source("var a = 3;", "var    a\n   =\n3;", &plain()).is_ok());
}

#[test]
fn test_dot_and_bracket_access_are_equivalent() {
    assert!(compare_source("a.b;", "a[\"b\"];", &plain()).is_ok());
    assert!(compare_source("a[\"b\"];", "a.b;", &plain()).is_ok());
    assert!(compare_source("a.b.c;", "a['b']['c'];", &plain()).is_ok());
}

#[test]
fn test_iife_parenthesis_placement() {
    assert!(compare_source("(function() {}());", "(function() {})();", &plain()).is_ok());
}

#[test]
fn test_redundant_parentheses() {
    assert!(compare_source("(a + (b * c));", "a + b * c;", &plain()).is_ok());
}

#[test]
fn test_quote_style_and_number_spelling() {
    assert!(compare_source("'x'; 16; 1;", "\"x\"; 0x10; 1.0;", &plain()).is_ok());
}

#[test]
fn test_variable_binding() {
    let actual = "(function(a, b) { console.log(a + b); })(1, 3);";
    let expected = "(function(__UNBOUND0__, __UNBOUND1__) { console.log(__UNBOUND0__ + __UNBOUND1__); })(1,3);";
    assert!(compare_source(actual, expected, &vars(r"__UNBOUND\d+__")).is_ok());
}

#[test]
fn test_string_binding() {
    let actual = "a[\"something\"]; \"something2\"; \"something\";";
    let expected = "a[\"__STR1__\"]; \"__STR2__\"; \"__STR1__\";";
    assert!(compare_source(actual, expected, &strings(r"__STR\d+__")).is_ok());
}

#[test]
fn test_string_binding_through_dot_access() {
    assert!(compare_source("a.b;", "a['_s1_'];", &strings(r"_s\d_")).is_ok());
}

#[test]
fn test_variable_and_string_binding() {
    let options = vars(r"_v\d_").with_string_pattern(Regex::new(r"_s\d_").unwrap());
    assert!(compare_source("a[\"b\"];", "_v1_[\"_s1_\"];", &options).is_ok());
}

#[test]
fn test_custom_comparator() {
    let options = three_is_four();
    assert!(compare_source("a.b + 3", "a[\"b\"] + 4", &options).is_ok());
    assert_eq!(kind("a.b + 3", "a[\"b\"] + 5", &options), Some(ErrorKind::Mismatch));
}

#[test]
fn test_custom_comparator_may_bridge_kinds() {
    let options = plain().with_comparator(ComparatorRule::new(
        "undefined-is-void",
        NodeKind::Identifier,
        NodeKind::UnaryExpression,
        |a, e, _| {
            if (is_undefined(a) && is_void(e)) || (is_void(a) && is_undefined(e)) {
                Verdict::Equivalent
            } else {
                Verdict::Inconclusive
            }
        },
    ));
    assert!(compare_source("x = undefined;", "x = void 0;", &options).is_ok());
}

#[test]
fn test_custom_comparator_conflict_is_mismatch() {
    let options = plain().with_comparator(ComparatorRule::new(
        "literals-never-match",
        NodeKind::Literal,
        NodeKind::Literal,
        |_, _, _| {
            Verdict::Conflict(Conflict::Mismatch {
                reason: "literals are refused".to_string(),
            })
        },
    ));
    assert_eq!(kind("1;", "1;", &options), Some(ErrorKind::Mismatch));
    assert!(compare_source("a;", "a;", &options).is_ok());
}

#[test]
fn test_reflexive_without_patterns() {
    let source = r#"
        var list = [1, , 'two', { three: 3, get four() { return 4; } }];
        function f(a, b) {
            for (var i = 0; i < a.length; i++) { if (a[i] === b) break; }
            for (var k in b) continue;
            do { a--; } while (a > 0)
            try { throw new Error('x'); } catch (e) { return e; } finally { f = null; }
        }
        switch (typeof list) { case 'object': list.length; default: void 0; }
        label: while (true) { break label; }
    "#;
    assert!(compare_source(source, source, &plain()).is_ok());
}

// ---
// Rebinding conflicts
// ---

#[test]
fn test_double_variable_binding_fails() {
    assert_eq!(
        kind("(function(a, b) {});", "(function(_v1_, _v1_) {});", &vars(r"_v\d_")),
        Some(ErrorKind::Rebinding)
    );
}

#[test]
fn test_variable_binding_used_with_other_name_fails() {
    let actual = "(function(a, b) { console.log(a + b); })(1, 3);";
    let expected = "(function(__UNBOUND0__, __UNBOUND1__) { console.log(__UNBOUND1__ + __UNBOUND1__); })(1,3);";
    let err = compare_source(actual, expected, &vars(r"__UNBOUND\d+__")).unwrap_err();
    match err {
        CompareError::Rebinding {
            placeholder,
            bound,
            found,
            ..
        } => {
            assert_eq!(placeholder, "__UNBOUND1__");
            assert_eq!(bound, "b");
            assert_eq!(found, "a");
        }
        other => panic!("expected rebinding, got {:?}", other),
    }
}

#[test]
fn test_rebinding_regardless_of_visit_order() {
    let options = vars(r"_v\d_");
    assert_eq!(kind("a; b;", "_v1_; _v1_;", &options), Some(ErrorKind::Rebinding));
    assert_eq!(kind("b; a;", "_v1_; _v1_;", &options), Some(ErrorKind::Rebinding));
}

#[test]
fn test_double_string_binding_fails() {
    assert_eq!(
        kind("'a'; 'b';", "'_s1_'; '_s1_';", &strings(r"_s\d_")),
        Some(ErrorKind::Rebinding)
    );
}

#[test]
fn test_double_string_binding_through_dot_access_fails() {
    assert_eq!(
        kind("a.b; a.c;", "a['_s1_']; a['_s1_'];", &strings(r"_s\d")),
        Some(ErrorKind::Rebinding)
    );
}

#[test]
fn test_empty_string_binding_is_a_real_binding() {
    assert_eq!(
        kind("''; 'x';", "'_s1_'; '_s1_';", &strings(r"_s\d_")),
        Some(ErrorKind::Rebinding)
    );
}

#[test]
fn test_bindings_do_not_leak_between_calls() {
    let options = vars(r"_v\d_");
    assert!(compare_source("a;", "_v1_;", &options).is_ok());
    assert!(compare_source("b;", "_v1_;", &options).is_ok());
}

// ---
// Structural mismatches
// ---

#[test]
fn test_unmatched_statements_fail() {
    assert_eq!(kind("a;", "b;", &plain()), Some(ErrorKind::Mismatch));
}

#[test]
fn test_name_change_fails() {
    assert_eq!(
        kind("(function(a) {});", "(function(b) {});", &plain()),
        Some(ErrorKind::Mismatch)
    );
}

#[test]
fn test_value_change_fails() {
    assert_eq!(kind("var a = 3;", "var a = 4;", &plain()), Some(ErrorKind::Mismatch));
}

#[test]
fn test_property_with_trailing_space_fails() {
    assert_eq!(kind("a.b;", "a[\"b \"];", &plain()), Some(ErrorKind::Mismatch));
}

#[test]
fn test_computed_identifier_is_not_dot_access() {
    assert_eq!(kind("a[b];", "a['b'];", &plain()), Some(ErrorKind::Mismatch));
}

#[test]
fn test_extra_statements_fail() {
    assert_eq!(kind("var a = 3;", "var a = 3; a;", &plain()), Some(ErrorKind::Mismatch));
    assert_eq!(kind("var a = 3; a;", "var a = 3;", &plain()), Some(ErrorKind::Mismatch));
}

#[test]
fn test_sequence_length_mismatch_both_ways() {
    assert_eq!(kind("", "var x = 0;", &plain()), Some(ErrorKind::Mismatch));
    assert_eq!(kind("var x = 0;", "", &plain()), Some(ErrorKind::Mismatch));
}

#[test]
fn test_different_node_types_fail() {
    assert_eq!(kind("a.b;", "3;", &plain()), Some(ErrorKind::Mismatch));
}

#[test]
fn test_initializer_against_missing_initializer_fails() {
    assert_eq!(kind("var a = 1;", "var a;", &plain()), Some(ErrorKind::Mismatch));
    assert_eq!(kind("var a;", "var a = 1;", &plain()), Some(ErrorKind::Mismatch));
}

#[test]
fn test_numeric_literal_does_not_bind_string_placeholder() {
    assert_eq!(kind("3;", "'_s1_';", &strings(r"_s\d_")), Some(ErrorKind::Mismatch));
}

#[test]
fn test_mismatch_carries_working_trees() {
    let err = compare_source("a.b;", "_v1_.c;", &vars(r"_v\d_")).unwrap_err();
    match err {
        CompareError::Mismatch {
            path,
            actual,
            expected,
            ..
        } => {
            assert_eq!(path.to_string(), "[0].expression.property.value");
            let expected = expected.to_json().to_string();
            // The placeholder has already been substituted in the working copy.
            assert!(expected.contains("\"name\":\"a\""));
            assert!(!expected.contains("_v1_"));
            assert!(actual.to_json().to_string().contains("\"value\":\"b\""));
        }
        other => panic!("expected mismatch, got {:?}", other),
    }
}

// ---
// Regular expression literals
// ---

#[test]
fn test_regex_literals_compare_by_pattern_and_flags() {
    assert!(compare_source("s.match(/a+/g);", "s.match(/a+/g);", &plain()).is_ok());
    assert_eq!(kind("s.match(/a+/g);", "s.match(/a+/i);", &plain()), Some(ErrorKind::Mismatch));
    assert_eq!(kind("s.match(/a+/);", "s.match(/a*/);", &plain()), Some(ErrorKind::Mismatch));
}

#[test]
fn test_regex_is_not_a_string() {
    assert_eq!(kind("x = /a/;", "x = \"a\";", &plain()), Some(ErrorKind::Mismatch));
}

#[test]
fn test_wide_hex_literal() {
    assert!(compare_source("x = 0x10000000000000000;", "x = 18446744073709551616;", &plain()).is_ok());
}

// ---
// Parse failures
// ---

#[test]
fn test_parse_failure_on_both_sides() {
    assert_eq!(kind("var a = !;", "var a = !;", &plain()), Some(ErrorKind::Parse));
}

#[test]
fn test_parse_failure_names_side() {
    match compare_source("a;", "var = ;", &plain()).unwrap_err() {
        CompareError::Parse { side, .. } => assert_eq!(side, compare_ast::Side::Expected),
        other => panic!("expected parse failure, got {:?}", other),
    }
}

#[test]
fn test_statements_on_one_line_are_a_parse_failure() {
    assert_eq!(kind("a b;", "a; b;", &plain()), Some(ErrorKind::Parse));
    assert_eq!(kind("var a = 1 2;", "var a = 1; 2;", &plain()), Some(ErrorKind::Parse));
    assert_eq!(kind("a; b;", "a b;", &plain()), Some(ErrorKind::Parse));
}

#[test]
fn test_line_break_separates_statements() {
    assert!(compare_source("a\n++b", "a; ++b;", &plain()).is_ok());
    assert!(compare_source("return\na", "return; a;", &plain()).is_ok());
    assert_eq!(kind("return\na", "return a;", &plain()), Some(ErrorKind::Mismatch));
}

#[test]
fn test_parse_failure_wins_over_mismatch() {
    assert_eq!(kind("a;", "b; )", &plain()), Some(ErrorKind::Parse));
}

#[test]
fn test_error_codes() {
    assert_eq!(compare_source("!", "a;", &plain()).unwrap_err().code(), 1);
    assert_eq!(compare_source("a; b;", "_v1_; _v1_;", &vars("_v")).unwrap_err().code(), 2);
    assert_eq!(compare_source("a;", "b;", &plain()).unwrap_err().code(), 3);
}
