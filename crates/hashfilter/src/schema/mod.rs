//! Schema types: field declarations, groups, the builder and documents.

mod builder;
mod definition;
mod document;
mod field;
mod types;

pub use builder::SchemaBuilder;
pub use definition::Schema;
pub use document::{DocumentFormat, FieldSpec, SchemaDocument};
pub use field::{FieldDeclaration, FieldGroup};
pub use types::{CoercerOptions, FieldOptions, Group, KeyMatcher};
