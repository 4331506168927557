//! Comparison configuration: placeholder patterns and extra comparators.
//!
//! Options hold no binding state and can be shared across calls and threads.
//! The YAML form covers the patterns only; comparators are code.

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use regex::Regex;
use serde::Deserialize;

use crate::comparators::{
    Comparator, ComparatorRegistry, IdentifierPlaceholders, MemberPropertyBridge,
    StringPlaceholders,
};
use crate::errors::OptionsError;

#[derive(Clone, Default)]
pub struct CompareOptions {
    pub identifier_pattern: Option<Regex>,
    pub string_pattern: Option<Regex>,
    pub comparators: Vec<Arc<dyn Comparator>>,
}

impl CompareOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_identifier_pattern(mut self, pattern: Regex) -> Self {
        self.identifier_pattern = Some(pattern);
        self
    }

    pub fn with_string_pattern(mut self, pattern: Regex) -> Self {
        self.string_pattern = Some(pattern);
        self
    }

    /// Appends a caller-supplied comparator after the built-ins.
    pub fn with_comparator(mut self, comparator: impl Comparator + 'static) -> Self {
        self.comparators.push(Arc::new(comparator));
        self
    }

    /// Builds the ordered registry for one call: placeholder comparators for
    /// the configured patterns, the member bridge, then custom comparators.
    pub fn registry(&self) -> ComparatorRegistry {
        let mut registry = ComparatorRegistry::new();
        if let Some(pattern) = &self.identifier_pattern {
            registry.register(Arc::new(IdentifierPlaceholders::new(pattern.clone())));
        }
        if let Some(pattern) = &self.string_pattern {
            registry.register(Arc::new(StringPlaceholders::new(pattern.clone())));
        }
        registry.register(Arc::new(MemberPropertyBridge));
        for comparator in &self.comparators {
            registry.register(Arc::clone(comparator));
        }
        registry
    }
}

impl fmt::Debug for CompareOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompareOptions")
            .field("identifier_pattern", &self.identifier_pattern.as_ref().map(Regex::as_str))
            .field("string_pattern", &self.string_pattern.as_ref().map(Regex::as_str))
            .field(
                "comparators",
                &self.comparators.iter().map(|c| c.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

// ============================================================================
// YAML CONFIGURATION
// ============================================================================

/// Pattern settings as written in a YAML config file.
///
/// ```yaml
/// var_pattern: "__UNBOUND\\d+__"
/// string_pattern: "__STR\\d+__"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionsFile {
    #[serde(default)]
    pub var_pattern: Option<String>,
    #[serde(default)]
    pub string_pattern: Option<String>,
}

impl OptionsFile {
    pub fn load(path: &Path) -> Result<Self, OptionsError> {
        let content = fs::read_to_string(path).map_err(|source| OptionsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| OptionsError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Later settings win; used to let CLI flags override a config file.
    pub fn merge(self, other: OptionsFile) -> Self {
        Self {
            var_pattern: other.var_pattern.or(self.var_pattern),
            string_pattern: other.string_pattern.or(self.string_pattern),
        }
    }

    pub fn compile(&self) -> Result<CompareOptions, OptionsError> {
        let mut options = CompareOptions::new();
        if let Some(pattern) = &self.var_pattern {
            options.identifier_pattern = Some(compile_pattern("var_pattern", pattern)?);
        }
        if let Some(pattern) = &self.string_pattern {
            options.string_pattern = Some(compile_pattern("string_pattern", pattern)?);
        }
        Ok(options)
    }
}

fn compile_pattern(field: &'static str, pattern: &str) -> Result<Regex, OptionsError> {
    Regex::new(pattern).map_err(|source| OptionsError::InvalidPattern {
        field,
        pattern: pattern.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NodeKind;
    use crate::comparators::{ComparatorRule, Verdict};

    #[test]
    fn test_registry_order() {
        let options = CompareOptions::new()
            .with_string_pattern(Regex::new("_s").unwrap())
            .with_identifier_pattern(Regex::new("_v").unwrap())
            .with_comparator(ComparatorRule::new(
                "custom",
                NodeKind::Literal,
                NodeKind::Literal,
                |_, _, _| Verdict::Inconclusive,
            ));
        assert_eq!(
            options.registry().names(),
            vec![
                "identifier-placeholders",
                "string-placeholders",
                "member-property-bridge",
                "custom"
            ]
        );
    }

    #[test]
    fn test_registry_without_patterns_has_only_bridge() {
        assert_eq!(
            CompareOptions::new().registry().names(),
            vec!["member-property-bridge"]
        );
    }

    #[test]
    fn test_yaml_options() {
        let file: OptionsFile =
            serde_yaml::from_str("var_pattern: '_v\\d_'\nstring_pattern: '_s\\d_'\n").unwrap();
        let options = file.compile().unwrap();
        assert!(options.identifier_pattern.unwrap().is_match("_v1_"));
        assert!(options.string_pattern.unwrap().is_match("_s2_"));
    }

    #[test]
    fn test_invalid_pattern() {
        let file = OptionsFile {
            var_pattern: Some("(".into()),
            string_pattern: None,
        };
        assert!(matches!(
            file.compile(),
            Err(OptionsError::InvalidPattern { field: "var_pattern", .. })
        ));
    }

    #[test]
    fn test_merge_prefers_later() {
        let base = OptionsFile {
            var_pattern: Some("a".into()),
            string_pattern: Some("b".into()),
        };
        let flags = OptionsFile {
            var_pattern: Some("c".into()),
            string_pattern: None,
        };
        let merged = base.merge(flags);
        assert_eq!(merged.var_pattern.as_deref(), Some("c"));
        assert_eq!(merged.string_pattern.as_deref(), Some("b"));
    }
}
