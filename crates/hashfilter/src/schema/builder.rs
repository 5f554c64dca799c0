//! Fluent construction of schemas.
//!
//! ```
//! use hashfilter::{FieldOptions, Schema};
//! use serde_json::json;
//!
//! let schema = Schema::builder()
//!     .required(|r| r.string("name").integer("age"))
//!     .optional(|o| o.string_with("nickname", FieldOptions::new().with_discard_empty(true)))
//!     .build();
//!
//! let filtered = schema.filter(&json!({"name": "Ada", "age": "36"})).unwrap();
//! assert_eq!(filtered["age"], json!(36));
//! ```

use std::sync::Arc;

use crate::coercion::{
    ArrayCoercer, ArrayElement, BooleanCoercer, Coercer, DateCoercer, FloatCoercer,
    HashCoercer, IntegerCoercer, StringCoercer,
};

use crate::error::HashFilterError;

use super::definition::Schema;
use super::field::{FieldDeclaration, FieldGroup};
use super::types::{FieldOptions, Group, KeyMatcher};

/// Builder assembling the declaration lists of a [`Schema`].
///
/// Declarations made outside `required`/`optional` land in the required
/// group. Passing `"*"` as a key declares the group's wildcard.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    required: FieldGroup,
    optional: FieldGroup,
    current: Group,
}

impl SchemaBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare fields in the required group.
    pub fn required(self, declare: impl FnOnce(Self) -> Self) -> Self {
        self.scoped(Group::Required, declare)
    }

    /// Declare fields in the optional group.
    pub fn optional(self, declare: impl FnOnce(Self) -> Self) -> Self {
        self.scoped(Group::Optional, declare)
    }

    fn scoped(mut self, group: Group, declare: impl FnOnce(Self) -> Self) -> Self {
        let outer = self.current;
        self.current = group;
        let mut builder = declare(self);
        builder.current = outer;
        builder
    }

    /// Declare a field with an arbitrary coercer.
    ///
    /// # Panics
    ///
    /// Panics if the key (or a wildcard) was already declared in the same
    /// group, or if the coercer rejects the field's options.
    pub fn field(
        mut self,
        key: impl Into<KeyMatcher>,
        coercer: Arc<dyn Coercer>,
        options: FieldOptions,
    ) -> Self {
        let key = key.into();
        if let Err(message) = coercer.validate_options(&options.params) {
            panic!(
                "{}",
                HashFilterError::InvalidOption {
                    key: key.as_str().to_string(),
                    message,
                }
            );
        }

        let group = self.current;
        let target = match group {
            Group::Required => &mut self.required,
            Group::Optional => &mut self.optional,
        };
        if let Err(err) = target.insert(group, FieldDeclaration::new(key, coercer, options)) {
            panic!("{err}");
        }
        self
    }

    pub fn string(self, key: impl Into<KeyMatcher>) -> Self {
        self.string_with(key, FieldOptions::default())
    }

    pub fn string_with(self, key: impl Into<KeyMatcher>, options: FieldOptions) -> Self {
        self.field(key, Arc::new(StringCoercer), options)
    }

    pub fn integer(self, key: impl Into<KeyMatcher>) -> Self {
        self.integer_with(key, FieldOptions::default())
    }

    pub fn integer_with(self, key: impl Into<KeyMatcher>, options: FieldOptions) -> Self {
        self.field(key, Arc::new(IntegerCoercer), options)
    }

    pub fn float(self, key: impl Into<KeyMatcher>) -> Self {
        self.float_with(key, FieldOptions::default())
    }

    pub fn float_with(self, key: impl Into<KeyMatcher>, options: FieldOptions) -> Self {
        self.field(key, Arc::new(FloatCoercer), options)
    }

    pub fn boolean(self, key: impl Into<KeyMatcher>) -> Self {
        self.boolean_with(key, FieldOptions::default())
    }

    pub fn boolean_with(self, key: impl Into<KeyMatcher>, options: FieldOptions) -> Self {
        self.field(key, Arc::new(BooleanCoercer), options)
    }

    pub fn date(self, key: impl Into<KeyMatcher>) -> Self {
        self.date_with(key, FieldOptions::default())
    }

    pub fn date_with(self, key: impl Into<KeyMatcher>, options: FieldOptions) -> Self {
        self.field(key, Arc::new(DateCoercer), options)
    }

    /// Declare an array whose elements are passed through unchecked.
    pub fn array(self, key: impl Into<KeyMatcher>) -> Self {
        self.array_with(key, FieldOptions::default(), None)
    }

    /// Declare an array whose elements go through `element`.
    pub fn array_of(self, key: impl Into<KeyMatcher>, element: ArrayElement) -> Self {
        self.array_with(key, FieldOptions::default(), Some(element))
    }

    pub fn array_with(
        self,
        key: impl Into<KeyMatcher>,
        options: FieldOptions,
        element: Option<ArrayElement>,
    ) -> Self {
        let coercer = match element {
            Some(element) => ArrayCoercer::of(element),
            None => ArrayCoercer::new(),
        };
        self.field(key, Arc::new(coercer), options)
    }

    /// Declare a nested hash filtered by its own schema.
    pub fn hash(self, key: impl Into<KeyMatcher>, declare: impl FnOnce(Self) -> Self) -> Self {
        self.hash_with(key, FieldOptions::default(), declare)
    }

    pub fn hash_with(
        self,
        key: impl Into<KeyMatcher>,
        options: FieldOptions,
        declare: impl FnOnce(Self) -> Self,
    ) -> Self {
        let nested = declare(SchemaBuilder::new()).build();
        self.field(key, Arc::new(HashCoercer::new(nested)), options)
    }

    /// Finish the schema.
    pub fn build(self) -> Schema {
        Schema::new(self.required, self.optional)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ungrouped_fields_are_required() {
        let schema = SchemaBuilder::new().string("foo").integer("*").build();
        assert_eq!(schema.required_keys(), vec!["foo"]);
        assert!(schema.required().wildcard().is_some());
        assert!(schema.optional().is_empty());
    }

    #[test]
    fn test_group_scope_is_restored() {
        let schema = SchemaBuilder::new()
            .optional(|o| o.string("bar"))
            .string("foo")
            .build();
        assert_eq!(schema.required_keys(), vec!["foo"]);
        assert_eq!(schema.optional_keys(), vec!["bar"]);
    }

    #[test]
    fn test_same_key_in_both_groups_is_allowed() {
        let schema = SchemaBuilder::new()
            .required(|r| r.string("foo"))
            .optional(|o| o.integer("foo"))
            .build();
        assert_eq!(schema.field_count(), 2);
    }

    #[test]
    #[should_panic(expected = "declared more than once")]
    fn test_duplicate_key_panics() {
        SchemaBuilder::new().string("foo").integer("foo").build();
    }

    #[test]
    #[should_panic(expected = "Invalid options for field 'code'")]
    fn test_invalid_pattern_panics() {
        SchemaBuilder::new()
            .string_with("code", FieldOptions::new().with_param("matches", "(unclosed"))
            .build();
    }

    #[test]
    #[should_panic(expected = "Invalid options for field 'tags'")]
    fn test_invalid_element_option_panics() {
        let element = ArrayElement::with_options(
            Arc::new(DateCoercer),
            crate::schema::CoercerOptions::new().with("after", "soon"),
        );
        SchemaBuilder::new().array_of("tags", element).build();
    }

    #[test]
    fn test_nested_hash_kind() {
        let schema = SchemaBuilder::new()
            .hash("address", |h| h.string("city"))
            .array_of("tags", ArrayElement::new(Arc::new(StringCoercer)))
            .build();
        let kinds: Vec<_> = schema.fields().map(|(_, f)| f.kind()).collect();
        assert_eq!(kinds, vec!["hash", "array"]);
    }
}
