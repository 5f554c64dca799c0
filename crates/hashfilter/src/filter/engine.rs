//! The filtering pass: type gate, exact keys, wildcards, composition.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, trace};

use crate::schema::{FieldDeclaration, Group, Schema};

use super::errors::{ErrorMap, ErrorSymbol, FieldError, FilterError};

/// Coerced output of a successful filter, keyed by input key.
pub type Filtered = IndexMap<String, Value>;

/// Outcome of a filter call: the full output, or why it was rejected.
pub type FilterResult = std::result::Result<Filtered, FilterError>;

/// What the nil/empty policy and the coercer decided for one value.
enum Verdict {
    Keep(Value),
    Discard,
    Reject(FieldError),
}

/// Filter `input` against `schema`.
///
/// Exact-key declarations are matched first (required group, then
/// optional), claiming the keys they find. Wildcards then see only the
/// keys nobody claimed. Input keys no declaration covers are dropped.
/// Any field error discards the whole output.
pub fn filter(schema: &Schema, input: &Value) -> FilterResult {
    let Some(data) = input.as_object() else {
        debug!(kind = value_kind(input), "rejecting non-hash input");
        return Err(FilterError::Hash);
    };

    let mut output = Filtered::with_capacity(data.len());
    let mut errors = ErrorMap::new();
    let mut claimed: HashSet<&str> = HashSet::with_capacity(data.len());

    for (group, field) in schema.exact_fields() {
        let Some(key) = field.matcher.key() else {
            continue;
        };
        match data.get(key) {
            Some(value) => {
                if !claimed.insert(key) {
                    continue;
                }
                trace!(key, %group, kind = field.kind(), "exact match");
                settle(key, evaluate(field, value), &mut output, &mut errors);
            }
            None if group == Group::Required => {
                errors.insert(key, ErrorSymbol::Required);
            }
            None => {}
        }
    }

    for (group, field) in schema.wildcard_fields() {
        for (key, value) in data {
            if !claimed.insert(key.as_str()) {
                continue;
            }
            trace!(key = key.as_str(), %group, kind = field.kind(), "wildcard match");
            settle(key, evaluate(field, value), &mut output, &mut errors);
        }
    }

    if errors.is_empty() {
        debug!(keys = output.len(), dropped = data.len() - claimed.len(), "input accepted");
        Ok(output)
    } else {
        debug!(errors = errors.len(), "input rejected");
        Err(FilterError::Fields(errors))
    }
}

/// Apply nil/empty policy, then the coercer.
fn evaluate(field: &FieldDeclaration, value: &Value) -> Verdict {
    let options = &field.options;

    if value.is_null() {
        return if options.discard_nils {
            Verdict::Discard
        } else {
            Verdict::Reject(ErrorSymbol::Nils.into())
        };
    }

    if options.discard_empty && field.coercer.is_empty(value, &options.params) {
        return Verdict::Discard;
    }

    match field.coercer.coerce(value, &options.params) {
        Ok(coerced) => Verdict::Keep(coerced),
        Err(error) => Verdict::Reject(error),
    }
}

fn settle(key: &str, verdict: Verdict, output: &mut Filtered, errors: &mut ErrorMap) {
    match verdict {
        Verdict::Keep(value) => {
            output.insert(key.to_string(), value);
        }
        Verdict::Discard => {}
        Verdict::Reject(error) => errors.insert(key, error),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldOptions;
    use serde_json::json;

    fn foo_bar(bar: FieldOptions) -> Schema {
        Schema::builder()
            .required(|r| r.string("foo"))
            .optional(|o| o.string_with("bar", bar))
            .build()
    }

    #[test]
    fn test_non_hash_short_circuits() {
        let schema = Schema::builder().string("foo").build();
        for input in [json!("bar"), json!(null), json!([1, 2]), json!(3)] {
            assert_eq!(filter(&schema, &input), Err(FilterError::Hash));
        }
    }

    #[test]
    fn test_missing_required_key() {
        let schema = foo_bar(FieldOptions::default());
        let err = filter(&schema, &json!({"bar": "x"})).unwrap_err();
        assert_eq!(err.symbolic(), json!({"foo": "required"}));
    }

    #[test]
    fn test_required_nil_is_dropped() {
        let schema = foo_bar(FieldOptions::default());
        let filtered = filter(&schema, &json!({"foo": null})).unwrap();
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_required_nil_rejected_when_kept() {
        let schema = Schema::builder()
            .string_with("foo", FieldOptions::new().with_discard_nils(false))
            .build();
        let err = filter(&schema, &json!({"foo": null})).unwrap_err();
        assert_eq!(err.symbolic(), json!({"foo": "nils"}));
    }

    #[test]
    fn test_exact_claim_is_not_repeated_by_optional_duplicate() {
        let schema = Schema::builder()
            .required(|r| r.string("foo"))
            .optional(|o| o.integer("foo"))
            .build();
        let filtered = filter(&schema, &json!({"foo": "abc"})).unwrap();
        assert_eq!(filtered["foo"], json!("abc"));
    }

    #[test]
    fn test_required_wildcard_claims_before_optional_wildcard() {
        let schema = Schema::builder()
            .required(|r| r.integer("*"))
            .optional(|o| o.string("*"))
            .build();
        let err = filter(&schema, &json!({"a": "1", "b": "x"})).unwrap_err();
        assert_eq!(err.symbolic(), json!({"b": "integer"}));
    }

    #[test]
    fn test_unmatched_keys_are_dropped() {
        let schema = foo_bar(FieldOptions::default());
        let filtered = filter(&schema, &json!({"foo": "a", "zzz": [1]})).unwrap();
        assert_eq!(filtered.len(), 1);
        assert!(!filtered.contains_key("zzz"));
    }

    #[test]
    fn test_errors_discard_partial_output() {
        let schema = Schema::builder().string("foo").integer("bar").build();
        let err = filter(&schema, &json!({"foo": "ok", "bar": "nope"})).unwrap_err();
        let fields = err.fields().unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get("bar"), Some(&FieldError::Symbol(ErrorSymbol::Integer)));
    }
}
