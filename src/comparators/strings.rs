//! String placeholders: an expected string `Literal` whose value matches the
//! configured pattern binds to the actual literal's string value.

use regex::Regex;

use super::{Comparator, Conflict, KindPair, MatchContext, Verdict};
use crate::ast::{NodeKind, SyntaxNode, Value};

pub struct StringPlaceholders {
    pattern: Regex,
}

impl StringPlaceholders {
    pub fn new(pattern: Regex) -> Self {
        Self { pattern }
    }
}

impl Comparator for StringPlaceholders {
    fn name(&self) -> &str {
        "string-placeholders"
    }

    fn scope(&self) -> KindPair {
        KindPair::new(NodeKind::Literal, NodeKind::Literal)
    }

    fn compare(
        &self,
        actual: &mut SyntaxNode,
        expected: &mut SyntaxNode,
        cx: &mut MatchContext<'_>,
    ) -> Verdict {
        let Some(Value::String(placeholder)) = expected.literal_value() else {
            return Verdict::Inconclusive;
        };
        if !self.pattern.is_match(placeholder) {
            return Verdict::Inconclusive;
        }
        // Numbers, booleans and null never bind a string placeholder.
        let Some(Value::String(concrete)) = actual.literal_value() else {
            return Verdict::Inconclusive;
        };

        let concrete = concrete.clone();
        if let Err(rebinding) = cx.bindings.strings.bind(placeholder, &concrete) {
            return Verdict::Conflict(Conflict::from(rebinding));
        }
        expected.set("value", concrete);
        Verdict::Equivalent
    }
}
