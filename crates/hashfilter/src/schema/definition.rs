//! The immutable schema a filter runs against.

use serde_json::Value;

use crate::filter::{self, FilterResult};

use super::builder::SchemaBuilder;
use super::field::{FieldDeclaration, FieldGroup};
use super::types::Group;

/// A reusable, immutable description of the keys a map may carry.
///
/// Schemas are `Send + Sync` and can be shared across threads; filtering
/// never mutates them.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    required: FieldGroup,
    optional: FieldGroup,
}

impl Schema {
    /// Assemble a schema from prepared groups.
    pub fn new(required: FieldGroup, optional: FieldGroup) -> Self {
        Self { required, optional }
    }

    /// Start declaring a schema.
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    /// Filter `input` against this schema.
    pub fn filter(&self, input: &Value) -> FilterResult {
        filter::filter(self, input)
    }

    pub fn required(&self) -> &FieldGroup {
        &self.required
    }

    pub fn optional(&self) -> &FieldGroup {
        &self.optional
    }

    /// Get a group by name.
    pub fn group(&self, group: Group) -> &FieldGroup {
        match group {
            Group::Required => &self.required,
            Group::Optional => &self.optional,
        }
    }

    /// Every declaration tagged with its group, required group first.
    pub fn fields(&self) -> impl Iterator<Item = (Group, &FieldDeclaration)> {
        self.required
            .iter()
            .map(|f| (Group::Required, f))
            .chain(self.optional.iter().map(|f| (Group::Optional, f)))
    }

    /// Exact-key declarations in matching order: required, then optional.
    pub fn exact_fields(&self) -> impl Iterator<Item = (Group, &FieldDeclaration)> {
        self.required
            .exact()
            .iter()
            .map(|f| (Group::Required, f))
            .chain(self.optional.exact().iter().map(|f| (Group::Optional, f)))
    }

    /// Wildcard declarations in matching order: required, then optional.
    pub fn wildcard_fields(&self) -> impl Iterator<Item = (Group, &FieldDeclaration)> {
        self.required
            .wildcard()
            .map(|f| (Group::Required, f))
            .into_iter()
            .chain(self.optional.wildcard().map(|f| (Group::Optional, f)))
    }

    /// Literal keys of the required group.
    pub fn required_keys(&self) -> Vec<&str> {
        self.required.exact().iter().filter_map(|f| f.matcher.key()).collect()
    }

    /// Literal keys of the optional group.
    pub fn optional_keys(&self) -> Vec<&str> {
        self.optional.exact().iter().filter_map(|f| f.matcher.key()).collect()
    }

    /// Returns true if either group declares a wildcard.
    pub fn has_wildcard(&self) -> bool {
        self.required.wildcard().is_some() || self.optional.wildcard().is_some()
    }

    /// Total number of declarations across both groups.
    pub fn field_count(&self) -> usize {
        self.required.len() + self.optional.len()
    }
}
