//! Per-call placeholder bindings.
//!
//! A placeholder binds to the first concrete value it is matched against and
//! must match that same value everywhere else in the call. Bindings live for
//! exactly one comparison; the engine creates a fresh [`Bindings`] per call.

use std::collections::BTreeMap;
use std::fmt;

/// Which table a placeholder lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceholderDomain {
    Identifier,
    String,
}

impl PlaceholderDomain {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaceholderDomain::Identifier => "identifier",
            PlaceholderDomain::String => "string",
        }
    }
}

impl fmt::Display for PlaceholderDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A placeholder seen with a second, different concrete value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rebinding {
    pub domain: PlaceholderDomain,
    pub placeholder: String,
    /// Value committed by the first occurrence.
    pub bound: String,
    /// Value found at the conflicting occurrence.
    pub found: String,
}

/// Placeholder token to concrete value, for one domain.
#[derive(Debug, Clone)]
pub struct BindingTable {
    domain: PlaceholderDomain,
    entries: BTreeMap<String, String>,
}

impl BindingTable {
    pub fn new(domain: PlaceholderDomain) -> Self {
        Self {
            domain,
            entries: BTreeMap::new(),
        }
    }

    pub fn domain(&self) -> PlaceholderDomain {
        self.domain
    }

    /// Records `placeholder -> value` on first sight; afterwards accepts only
    /// the recorded value.
    pub fn bind(&mut self, placeholder: &str, value: &str) -> Result<(), Rebinding> {
        match self.entries.get(placeholder) {
            None => {
                tracing::debug!(
                    domain = %self.domain,
                    placeholder,
                    value,
                    "bound placeholder"
                );
                self.entries.insert(placeholder.to_string(), value.to_string());
                Ok(())
            }
            Some(bound) if bound == value => Ok(()),
            Some(bound) => Err(Rebinding {
                domain: self.domain,
                placeholder: placeholder.to_string(),
                bound: bound.clone(),
                found: value.to_string(),
            }),
        }
    }

    pub fn get(&self, placeholder: &str) -> Option<&str> {
        self.entries.get(placeholder).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Both binding tables for one comparison call.
#[derive(Debug, Clone)]
pub struct Bindings {
    pub identifiers: BindingTable,
    pub strings: BindingTable,
}

impl Bindings {
    pub fn new() -> Self {
        Self {
            identifiers: BindingTable::new(PlaceholderDomain::Identifier),
            strings: BindingTable::new(PlaceholderDomain::String),
        }
    }

    pub fn table_mut(&mut self, domain: PlaceholderDomain) -> &mut BindingTable {
        match domain {
            PlaceholderDomain::Identifier => &mut self.identifiers,
            PlaceholderDomain::String => &mut self.strings,
        }
    }
}

impl Default for Bindings {
    fn default() -> Self {
        Self::new()
    }
}
