//! Field declarations and the groups that hold them.

use std::sync::Arc;

use crate::coercion::Coercer;
use crate::error::{HashFilterError, Result};

use super::types::{FieldOptions, Group, KeyMatcher};

/// One schema entry: a key matcher bound to a coercer and its options.
#[derive(Debug, Clone)]
pub struct FieldDeclaration {
    /// Which input keys this declaration applies to.
    pub matcher: KeyMatcher,
    /// Coercer invoked on matched values.
    pub coercer: Arc<dyn Coercer>,
    /// Nil/empty policy and coercer options.
    pub options: FieldOptions,
}

impl FieldDeclaration {
    /// Create a new declaration.
    pub fn new(
        matcher: impl Into<KeyMatcher>,
        coercer: Arc<dyn Coercer>,
        options: FieldOptions,
    ) -> Self {
        Self {
            matcher: matcher.into(),
            coercer,
            options,
        }
    }

    /// The coercer kind name (`"string"`, `"hash"`, ...).
    pub fn kind(&self) -> &str {
        self.coercer.kind()
    }

    pub fn is_wildcard(&self) -> bool {
        self.matcher.is_wildcard()
    }
}

/// An ordered set of declarations: exact keys in declaration order plus at
/// most one wildcard.
#[derive(Debug, Clone, Default)]
pub struct FieldGroup {
    exact: Vec<FieldDeclaration>,
    wildcard: Option<FieldDeclaration>,
}

impl FieldGroup {
    /// Create an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a declaration, rejecting a second declaration for the same key
    /// (or a second wildcard).
    pub fn insert(&mut self, group: Group, field: FieldDeclaration) -> Result<()> {
        let duplicate = match &field.matcher {
            KeyMatcher::Wildcard => self.wildcard.is_some(),
            KeyMatcher::Exact(key) => self.get(key).is_some(),
        };
        if duplicate {
            return Err(HashFilterError::DuplicateField {
                group,
                key: field.matcher.to_string(),
            });
        }

        if field.is_wildcard() {
            self.wildcard = Some(field);
        } else {
            self.exact.push(field);
        }
        Ok(())
    }

    /// Exact-key declarations in declaration order.
    pub fn exact(&self) -> &[FieldDeclaration] {
        &self.exact
    }

    /// The wildcard declaration, if any.
    pub fn wildcard(&self) -> Option<&FieldDeclaration> {
        self.wildcard.as_ref()
    }

    /// Look up the exact declaration for a key.
    pub fn get(&self, key: &str) -> Option<&FieldDeclaration> {
        self.exact.iter().find(|f| f.matcher.key() == Some(key))
    }

    /// All declarations, exact keys first then the wildcard.
    pub fn iter(&self) -> impl Iterator<Item = &FieldDeclaration> {
        self.exact.iter().chain(self.wildcard.iter())
    }

    pub fn len(&self) -> usize {
        self.exact.len() + usize::from(self.wildcard.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
