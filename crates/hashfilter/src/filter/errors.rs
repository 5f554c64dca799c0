//! Symbolic validation errors and their aggregation.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Machine-readable reason a value was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorSymbol {
    /// Value is not a map.
    Hash,
    /// Required key is absent.
    Required,
    /// Value is nil and nils are not discarded.
    Nils,
    /// Value is empty and the coercer rejects emptiness.
    Empty,
    String,
    Integer,
    Float,
    Boolean,
    Date,
    Array,
    /// Too short (string characters or array elements).
    MinLength,
    /// Too long (string characters or array elements).
    MaxLength,
    /// String does not match the configured pattern.
    Matches,
    /// Value is not one of the allowed values.
    In,
    /// Number below the minimum.
    Min,
    /// Number above the maximum.
    Max,
    /// Date not before the configured bound.
    Before,
    /// Date not after the configured bound.
    After,
}

impl ErrorSymbol {
    /// The symbol as it appears in symbolic output.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorSymbol::Hash => "hash",
            ErrorSymbol::Required => "required",
            ErrorSymbol::Nils => "nils",
            ErrorSymbol::Empty => "empty",
            ErrorSymbol::String => "string",
            ErrorSymbol::Integer => "integer",
            ErrorSymbol::Float => "float",
            ErrorSymbol::Boolean => "boolean",
            ErrorSymbol::Date => "date",
            ErrorSymbol::Array => "array",
            ErrorSymbol::MinLength => "min_length",
            ErrorSymbol::MaxLength => "max_length",
            ErrorSymbol::Matches => "matches",
            ErrorSymbol::In => "in",
            ErrorSymbol::Min => "min",
            ErrorSymbol::Max => "max",
            ErrorSymbol::Before => "before",
            ErrorSymbol::After => "after",
        }
    }

    /// Predicate used when rendering a plain-English message.
    pub fn describe(&self) -> &'static str {
        match self {
            ErrorSymbol::Hash => "isn't a hash",
            ErrorSymbol::Required => "is required",
            ErrorSymbol::Nils => "can't be nil",
            ErrorSymbol::Empty => "can't be blank",
            ErrorSymbol::String => "isn't a string",
            ErrorSymbol::Integer => "isn't an integer",
            ErrorSymbol::Float => "isn't a decimal",
            ErrorSymbol::Boolean => "isn't a boolean",
            ErrorSymbol::Date => "isn't a date",
            ErrorSymbol::Array => "isn't an array",
            ErrorSymbol::MinLength => "is too short",
            ErrorSymbol::MaxLength => "is too long",
            ErrorSymbol::Matches => "isn't in the right format",
            ErrorSymbol::In => "isn't an option",
            ErrorSymbol::Min => "is too small",
            ErrorSymbol::Max => "is too big",
            ErrorSymbol::Before => "isn't before the allowed date",
            ErrorSymbol::After => "isn't after the allowed date",
        }
    }
}

impl fmt::Display for ErrorSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a single field failed.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldError {
    /// A plain symbolic reason.
    Symbol(ErrorSymbol),
    /// Field errors of a nested hash, kept unflattened.
    Nested(ErrorMap),
    /// Per-element errors of an array; `None` marks a valid element.
    Elements(Vec<Option<FieldError>>),
}

impl FieldError {
    /// The symbol, when this is a plain symbolic error.
    pub fn symbol(&self) -> Option<ErrorSymbol> {
        match self {
            FieldError::Symbol(symbol) => Some(*symbol),
            _ => None,
        }
    }

    /// Plain symbolic form: a string, an object of nested errors, or an
    /// array with `null` at valid positions.
    pub fn symbolic(&self) -> Value {
        match self {
            FieldError::Symbol(symbol) => Value::String(symbol.as_str().to_string()),
            FieldError::Nested(errors) => errors.symbolic(),
            FieldError::Elements(elements) => Value::Array(
                elements
                    .iter()
                    .map(|e| e.as_ref().map_or(Value::Null, FieldError::symbolic))
                    .collect(),
            ),
        }
    }

    fn collect_messages(&self, path: &str, out: &mut Vec<String>) {
        match self {
            FieldError::Symbol(symbol) => out.push(format!("{path} {}", symbol.describe())),
            FieldError::Nested(errors) => {
                for (key, error) in errors.iter() {
                    error.collect_messages(&format!("{path}.{key}"), out);
                }
            }
            FieldError::Elements(elements) => {
                for (index, error) in elements.iter().enumerate() {
                    if let Some(error) = error {
                        error.collect_messages(&format!("{path}[{index}]"), out);
                    }
                }
            }
        }
    }
}

impl From<ErrorSymbol> for FieldError {
    fn from(symbol: ErrorSymbol) -> Self {
        FieldError::Symbol(symbol)
    }
}

impl From<ErrorMap> for FieldError {
    fn from(errors: ErrorMap) -> Self {
        FieldError::Nested(errors)
    }
}

/// Field errors keyed by input key, in the order they were found.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorMap(IndexMap<String, FieldError>);

impl ErrorMap {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Record an error for a key.
    pub fn insert(&mut self, key: impl Into<String>, error: impl Into<FieldError>) {
        self.0.insert(key.into(), error.into());
    }

    pub fn get(&self, key: &str) -> Option<&FieldError> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldError)> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Plain `key -> symbol` object, recursing into nested errors.
    pub fn symbolic(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(key, error)| (key.clone(), error.symbolic()))
                .collect(),
        )
    }

    /// Plain-English messages, one per failing leaf.
    pub fn messages(&self) -> Vec<String> {
        let mut out = Vec::new();
        for (key, error) in &self.0 {
            error.collect_messages(&humanize(key), &mut out);
        }
        out
    }

    pub fn into_inner(self) -> IndexMap<String, FieldError> {
        self.0
    }
}

impl fmt::Display for ErrorMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, error)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}: {}", error.symbolic())?;
        }
        Ok(())
    }
}

impl FromIterator<(String, FieldError)> for ErrorMap {
    fn from_iter<I: IntoIterator<Item = (String, FieldError)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ErrorMap {
    type Item = (String, FieldError);
    type IntoIter = indexmap::map::IntoIter<String, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Why a whole filter call failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    /// The input was not a map; nothing else was evaluated.
    #[error("input isn't a hash")]
    Hash,
    /// One or more fields failed.
    #[error("invalid fields: {0}")]
    Fields(ErrorMap),
}

impl FilterError {
    /// Per-field errors, if the input was a map.
    pub fn fields(&self) -> Option<&ErrorMap> {
        match self {
            FilterError::Hash => None,
            FilterError::Fields(errors) => Some(errors),
        }
    }

    /// Symbolic form: `"hash"` or the field error object.
    pub fn symbolic(&self) -> Value {
        match self {
            FilterError::Hash => Value::String(ErrorSymbol::Hash.as_str().to_string()),
            FilterError::Fields(errors) => errors.symbolic(),
        }
    }

    /// Plain-English messages.
    pub fn messages(&self) -> Vec<String> {
        match self {
            FilterError::Hash => vec![format!("Data {}", ErrorSymbol::Hash.describe())],
            FilterError::Fields(errors) => errors.messages(),
        }
    }
}

/// `"first_name"` -> `"First name"`.
fn humanize(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => spaced,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn nested_errors() -> ErrorMap {
        let mut address = ErrorMap::new();
        address.insert("city", ErrorSymbol::Required);

        let mut errors = ErrorMap::new();
        errors.insert("first_name", ErrorSymbol::Nils);
        errors.insert("address", address);
        errors.insert(
            "tags",
            FieldError::Elements(vec![None, Some(ErrorSymbol::String.into())]),
        );
        errors
    }

    #[test]
    fn test_symbolic_is_recursive() {
        assert_eq!(
            nested_errors().symbolic(),
            json!({
                "first_name": "nils",
                "address": {"city": "required"},
                "tags": [null, "string"]
            })
        );
    }

    #[test]
    fn test_messages_use_paths() {
        assert_eq!(
            nested_errors().messages(),
            vec![
                "First name can't be nil",
                "Address.city is required",
                "Tags[1] isn't a string",
            ]
        );
    }

    #[test]
    fn test_filter_error_hash() {
        assert_eq!(FilterError::Hash.symbolic(), json!("hash"));
        assert!(FilterError::Hash.fields().is_none());
        assert_eq!(FilterError::Hash.messages(), vec!["Data isn't a hash"]);
    }

    #[test]
    fn test_display_lists_symbols() {
        let mut errors = ErrorMap::new();
        errors.insert("foo", ErrorSymbol::Required);
        errors.insert("bar", ErrorSymbol::Integer);
        assert_eq!(
            FilterError::Fields(errors).to_string(),
            r#"invalid fields: foo: "required", bar: "integer""#
        );
    }

    #[test]
    fn test_symbol_serializes_snake_case() {
        assert_eq!(serde_json::to_value(ErrorSymbol::MinLength).unwrap(), json!("min_length"));
        assert_eq!(ErrorSymbol::MaxLength.to_string(), "max_length");
    }
}
