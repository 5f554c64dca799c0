//! Core type definitions for schema representation.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Which group a field declaration belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Group {
    /// Keys that must be present in the input.
    #[default]
    Required,
    /// Keys that may be omitted.
    Optional,
}

impl Group {
    /// Get a human-readable label for the group.
    pub fn label(&self) -> &'static str {
        match self {
            Group::Required => "required",
            Group::Optional => "optional",
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How a declaration selects input keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyMatcher {
    /// Matches exactly one literal key.
    Exact(String),
    /// Matches any key no exact declaration has claimed.
    Wildcard,
}

impl KeyMatcher {
    /// The key spelling that declares a wildcard.
    pub const WILDCARD: &'static str = "*";

    /// Interpret a declared key, treating `"*"` as the wildcard.
    pub fn parse(key: impl Into<String>) -> Self {
        let key = key.into();
        if key == Self::WILDCARD {
            KeyMatcher::Wildcard
        } else {
            KeyMatcher::Exact(key)
        }
    }

    /// Returns true if this matcher is the wildcard.
    pub fn is_wildcard(&self) -> bool {
        matches!(self, KeyMatcher::Wildcard)
    }

    /// The literal key for exact matchers.
    pub fn key(&self) -> Option<&str> {
        match self {
            KeyMatcher::Exact(key) => Some(key),
            KeyMatcher::Wildcard => None,
        }
    }

    /// The declared spelling, `"*"` for the wildcard.
    pub fn as_str(&self) -> &str {
        match self {
            KeyMatcher::Exact(key) => key,
            KeyMatcher::Wildcard => Self::WILDCARD,
        }
    }
}

impl fmt::Display for KeyMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for KeyMatcher {
    fn from(key: &str) -> Self {
        KeyMatcher::parse(key)
    }
}

impl From<String> for KeyMatcher {
    fn from(key: String) -> Self {
        KeyMatcher::parse(key)
    }
}

/// Opaque configuration handed to a coercer on every call.
///
/// The engine never inspects these; each coercer reads the keys it
/// understands (`min_length`, `matches`, `in`, ...) and ignores the rest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoercerOptions(Map<String, Value>);

impl CoercerOptions {
    /// Create an empty option set.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Set an option.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Insert an option in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Raw access to an option.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Read a boolean option, falling back to `default` when unset.
    pub fn flag(&self, key: &str, default: bool) -> bool {
        self.0.get(key).and_then(Value::as_bool).unwrap_or(default)
    }

    /// Read a non-negative integer option.
    pub fn usize(&self, key: &str) -> Option<usize> {
        self.0
            .get(key)
            .and_then(Value::as_u64)
            .and_then(|v| usize::try_from(v).ok())
    }

    /// Read a signed integer option.
    pub fn i64(&self, key: &str) -> Option<i64> {
        self.0.get(key).and_then(Value::as_i64)
    }

    /// Read a numeric option as a float.
    pub fn f64(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(Value::as_f64)
    }

    /// Read a string option.
    pub fn str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Read a list option.
    pub fn list(&self, key: &str) -> Option<&[Value]> {
        self.0.get(key).and_then(Value::as_array).map(Vec::as_slice)
    }

    /// Iterate over all options in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<Map<String, Value>> for CoercerOptions {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Per-field options: nil/empty policy plus the coercer's own options.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldOptions {
    /// Treat a present-but-nil value as if the key were absent.
    pub discard_nils: bool,
    /// Treat an empty value (per the coercer) as if the key were absent.
    pub discard_empty: bool,
    /// Passed through to the coercer untouched.
    pub params: CoercerOptions,
}

impl FieldOptions {
    /// Create the default options: nils discarded, empties kept.
    pub fn new() -> Self {
        Self {
            discard_nils: true,
            discard_empty: false,
            params: CoercerOptions::new(),
        }
    }

    /// Set the nil policy.
    pub fn with_discard_nils(mut self, discard: bool) -> Self {
        self.discard_nils = discard;
        self
    }

    /// Set the empty policy.
    pub fn with_discard_empty(mut self, discard: bool) -> Self {
        self.discard_empty = discard;
        self
    }

    /// Set a coercer option.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key, value);
        self
    }

    /// Replace all coercer options.
    pub fn with_params(mut self, params: CoercerOptions) -> Self {
        self.params = params;
        self
    }
}

impl Default for FieldOptions {
    fn default() -> Self {
        Self::new()
    }
}
