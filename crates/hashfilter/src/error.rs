//! Error types for the hashfilter library.
//!
//! These cover failures to *build* a schema (loading documents, resolving
//! coercer kinds). Validation failures produced while filtering are plain
//! values, see [`crate::filter::FilterError`].

use std::path::PathBuf;
use thiserror::Error;

use crate::schema::Group;

/// Main error type for hashfilter operations.
#[derive(Debug, Error)]
pub enum HashFilterError {
    /// Error reading a schema document from disk.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Schema document format not supported.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A field names a coercer kind the registry does not know.
    #[error("Unknown coercer '{kind}' for field '{key}'")]
    UnknownCoercer { key: String, kind: String },

    /// The same key was declared twice within one group.
    #[error("Field '{key}' declared more than once in the {group} group")]
    DuplicateField { group: Group, key: String },

    /// A field declaration carries options its coercer cannot use.
    #[error("Invalid options for field '{key}': {message}")]
    InvalidOption { key: String, message: String },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML deserialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for hashfilter operations.
pub type Result<T> = std::result::Result<T, HashFilterError>;
