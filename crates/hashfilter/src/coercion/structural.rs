//! Structural coercers: arrays and nested hashes.

use std::sync::Arc;

use serde_json::Value;

use crate::filter::{ErrorSymbol, FieldError, FilterError};
use crate::schema::{CoercerOptions, Schema};

use super::coercer::Coercer;

/// The coercer applied to each element of an array.
#[derive(Debug, Clone)]
pub struct ArrayElement {
    coercer: Arc<dyn Coercer>,
    options: CoercerOptions,
}

impl ArrayElement {
    pub fn new(coercer: Arc<dyn Coercer>) -> Self {
        Self::with_options(coercer, CoercerOptions::new())
    }

    pub fn with_options(coercer: Arc<dyn Coercer>, options: CoercerOptions) -> Self {
        Self { coercer, options }
    }

    pub fn kind(&self) -> &str {
        self.coercer.kind()
    }

    fn coerce(&self, value: &Value) -> Result<Value, FieldError> {
        if value.is_null() {
            return Err(ErrorSymbol::Nils.into());
        }
        self.coercer.coerce(value, &self.options)
    }
}

/// Arrays, optionally coercing every element.
///
/// Options: `arrayize` (wrap a scalar in an array, `""` becomes `[]`),
/// `min_length`, `max_length`. Element failures are reported per index.
#[derive(Debug, Clone, Default)]
pub struct ArrayCoercer {
    element: Option<ArrayElement>,
}

impl ArrayCoercer {
    /// An array whose elements pass through unchanged.
    pub fn new() -> Self {
        Self::default()
    }

    /// An array whose elements go through `element`.
    pub fn of(element: ArrayElement) -> Self {
        Self {
            element: Some(element),
        }
    }

    pub fn element(&self) -> Option<&ArrayElement> {
        self.element.as_ref()
    }
}

impl Coercer for ArrayCoercer {
    fn kind(&self) -> &str {
        "array"
    }

    fn coerce(&self, value: &Value, options: &CoercerOptions) -> Result<Value, FieldError> {
        let items = match value {
            Value::Array(items) => items.clone(),
            Value::String(s) if s.is_empty() && options.flag("arrayize", false) => Vec::new(),
            other if options.flag("arrayize", false) => vec![other.clone()],
            _ => return Err(ErrorSymbol::Array.into()),
        };

        let items = match &self.element {
            Some(element) => {
                let results: Vec<_> = items.iter().map(|item| element.coerce(item)).collect();
                if results.iter().any(Result::is_err) {
                    return Err(FieldError::Elements(
                        results.into_iter().map(Result::err).collect(),
                    ));
                }
                results.into_iter().filter_map(Result::ok).collect()
            }
            None => items,
        };

        if options.usize("min_length").is_some_and(|min| items.len() < min) {
            return Err(ErrorSymbol::MinLength.into());
        }
        if options.usize("max_length").is_some_and(|max| items.len() > max) {
            return Err(ErrorSymbol::MaxLength.into());
        }

        Ok(Value::Array(items))
    }

    fn is_empty(&self, value: &Value, _options: &CoercerOptions) -> bool {
        match value {
            Value::Array(items) => items.is_empty(),
            Value::String(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    fn validate_options(&self, _options: &CoercerOptions) -> Result<(), String> {
        match &self.element {
            Some(element) => element
                .coercer
                .validate_options(&element.options)
                .map_err(|message| format!("element {message}")),
            None => Ok(()),
        }
    }
}

/// A nested hash filtered by its own schema.
///
/// Nested field errors are returned verbatim as [`FieldError::Nested`].
#[derive(Debug, Clone)]
pub struct HashCoercer {
    schema: Arc<Schema>,
}

impl HashCoercer {
    pub fn new(schema: Schema) -> Self {
        Self::shared(Arc::new(schema))
    }

    /// Reuse a schema that is also used elsewhere.
    pub fn shared(schema: Arc<Schema>) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}

impl Coercer for HashCoercer {
    fn kind(&self) -> &str {
        "hash"
    }

    fn coerce(&self, value: &Value, _options: &CoercerOptions) -> Result<Value, FieldError> {
        match self.schema.filter(value) {
            Ok(filtered) => Ok(Value::Object(filtered.into_iter().collect())),
            Err(FilterError::Hash) => Err(ErrorSymbol::Hash.into()),
            Err(FilterError::Fields(errors)) => Err(FieldError::Nested(errors)),
        }
    }

    fn is_empty(&self, value: &Value, _options: &CoercerOptions) -> bool {
        match value {
            Value::Object(map) => map.is_empty(),
            Value::String(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coercion::{IntegerCoercer, StringCoercer};
    use serde_json::json;

    fn none() -> CoercerOptions {
        CoercerOptions::new()
    }

    fn err(symbol: ErrorSymbol) -> Result<Value, FieldError> {
        Err(FieldError::Symbol(symbol))
    }

    #[test]
    fn test_array_passthrough() {
        let array = ArrayCoercer::new();
        assert_eq!(array.coerce(&json!([1, "a", null]), &none()), Ok(json!([1, "a", null])));
        assert_eq!(array.coerce(&json!("a"), &none()), err(ErrorSymbol::Array));
    }

    #[test]
    fn test_array_arrayize() {
        let array = ArrayCoercer::of(ArrayElement::new(Arc::new(IntegerCoercer)));
        let opts = none().with("arrayize", true);
        assert_eq!(array.coerce(&json!("3"), &opts), Ok(json!([3])));
        assert_eq!(array.coerce(&json!(""), &opts), Ok(json!([])));
    }

    #[test]
    fn test_array_element_errors_by_index() {
        let array = ArrayCoercer::of(ArrayElement::new(Arc::new(IntegerCoercer)));
        let err = array.coerce(&json!(["1", "x", null]), &none()).unwrap_err();
        assert_eq!(err.symbolic(), json!([null, "integer", "nils"]));
    }

    #[test]
    fn test_array_length_bounds() {
        let array = ArrayCoercer::new();
        let opts = none().with("min_length", 1).with("max_length", 2);
        assert_eq!(array.coerce(&json!([]), &opts), err(ErrorSymbol::MinLength));
        assert_eq!(array.coerce(&json!([1, 2, 3]), &opts), err(ErrorSymbol::MaxLength));
        assert!(array.is_empty(&json!([]), &opts));
    }

    #[test]
    fn test_hash_nests_errors() {
        let nested = Schema::builder().string("city").integer("zip").build();
        let hash = HashCoercer::new(nested);

        assert_eq!(
            hash.coerce(&json!({"city": "Oslo", "zip": "150"}), &none()),
            Ok(json!({"city": "Oslo", "zip": 150}))
        );
        assert_eq!(hash.coerce(&json!("Oslo"), &none()), err(ErrorSymbol::Hash));

        let err = hash.coerce(&json!({"zip": "x"}), &none()).unwrap_err();
        assert_eq!(err.symbolic(), json!({"city": "required", "zip": "integer"}));
    }

    #[test]
    fn test_hash_as_array_element() {
        let item = Schema::builder().string("name").build();
        let array = ArrayCoercer::of(ArrayElement::new(Arc::new(HashCoercer::new(item))));
        let err = array
            .coerce(&json!([{"name": "a"}, {"name": []}]), &none())
            .unwrap_err();
        assert_eq!(err.symbolic(), json!([null, {"name": "string"}]));
        assert_eq!(ArrayElement::new(Arc::new(StringCoercer)).kind(), "string");
    }

    #[test]
    fn test_array_validates_element_options() {
        let bad = ArrayElement::with_options(
            Arc::new(StringCoercer),
            none().with("matches", "(unclosed"),
        );
        assert!(ArrayCoercer::of(bad).validate_options(&none()).is_err());
        assert!(ArrayCoercer::new().validate_options(&none()).is_ok());
    }
}
