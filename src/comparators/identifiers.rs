//! Identifier placeholders: an expected `Identifier` whose name matches the
//! configured pattern binds to the actual identifier's name.

use regex::Regex;

use super::{Comparator, Conflict, KindPair, MatchContext, Verdict};
use crate::ast::{NodeKind, SyntaxNode};

pub struct IdentifierPlaceholders {
    pattern: Regex,
}

impl IdentifierPlaceholders {
    pub fn new(pattern: Regex) -> Self {
        Self { pattern }
    }
}

impl Comparator for IdentifierPlaceholders {
    fn name(&self) -> &str {
        "identifier-placeholders"
    }

    fn scope(&self) -> KindPair {
        KindPair::new(NodeKind::Identifier, NodeKind::Identifier)
    }

    fn compare(
        &self,
        actual: &mut SyntaxNode,
        expected: &mut SyntaxNode,
        cx: &mut MatchContext<'_>,
    ) -> Verdict {
        let (Some(concrete), Some(placeholder)) =
            (actual.identifier_name(), expected.identifier_name())
        else {
            return Verdict::Inconclusive;
        };
        if !self.pattern.is_match(placeholder) {
            return Verdict::Inconclusive;
        }

        let concrete = concrete.to_string();
        if let Err(rebinding) = cx.bindings.identifiers.bind(placeholder, &concrete) {
            return Verdict::Conflict(Conflict::from(rebinding));
        }
        expected.set("name", concrete);
        Verdict::Equivalent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{builder, Span};
    use crate::bindings::{Bindings, PlaceholderDomain};
    use crate::path::TreePath;

    fn run(
        comparator: &IdentifierPlaceholders,
        bindings: &mut Bindings,
        actual: &str,
        expected: &str,
    ) -> (Verdict, SyntaxNode) {
        let path = TreePath::root();
        let mut cx = MatchContext { bindings, path: &path };
        let mut actual = builder::identifier(actual, Span::default());
        let mut expected = builder::identifier(expected, Span::default());
        let verdict = comparator.compare(&mut actual, &mut expected, &mut cx);
        (verdict, expected)
    }

    #[test]
    fn test_binds_and_substitutes_expected_name() {
        let comparator = IdentifierPlaceholders::new(Regex::new(r"__UNBOUND\d+__").unwrap());
        let mut bindings = Bindings::new();

        let (verdict, expected) = run(&comparator, &mut bindings, "a", "__UNBOUND0__");
        assert_eq!(verdict, Verdict::Equivalent);
        assert_eq!(expected.identifier_name(), Some("a"));
        assert_eq!(bindings.identifiers.get("__UNBOUND0__"), Some("a"));
    }

    #[test]
    fn test_second_value_is_rebinding() {
        let comparator = IdentifierPlaceholders::new(Regex::new(r"_v\d_").unwrap());
        let mut bindings = Bindings::new();

        run(&comparator, &mut bindings, "a", "_v1_");
        let (verdict, _) = run(&comparator, &mut bindings, "b", "_v1_");
        match verdict {
            Verdict::Conflict(Conflict::Rebinding(r)) => {
                assert_eq!(r.domain, PlaceholderDomain::Identifier);
                assert_eq!(r.placeholder, "_v1_");
                assert_eq!(r.bound, "a");
                assert_eq!(r.found, "b");
            }
            other => panic!("expected rebinding, got {:?}", other),
        }
    }

    #[test]
    fn test_non_matching_name_is_inconclusive() {
        let comparator = IdentifierPlaceholders::new(Regex::new(r"_v\d_").unwrap());
        let mut bindings = Bindings::new();

        let (verdict, expected) = run(&comparator, &mut bindings, "a", "b");
        assert_eq!(verdict, Verdict::Inconclusive);
        assert_eq!(expected.identifier_name(), Some("b"));
        assert!(bindings.identifiers.is_empty());
    }
}
