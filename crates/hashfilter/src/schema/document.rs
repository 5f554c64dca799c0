//! Schema documents: JSON or YAML descriptions compiled into a [`Schema`].
//!
//! ```yaml
//! required:
//!   name: { type: string, max_length: 40 }
//!   "*": { type: integer }
//! optional:
//!   address:
//!     type: hash
//!     schema:
//!       required:
//!         city: { type: string }
//!   tags: { type: array, element: { type: string } }
//! ```
//!
//! Every key of a field entry other than `type`, `discard_nils`,
//! `discard_empty`, `schema` and `element` is passed to the coercer as an
//! option.

use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::coercion::{ArrayCoercer, ArrayElement, Coercer, CoercerRegistry, HashCoercer};
use crate::error::{HashFilterError, Result};

use super::definition::Schema;
use super::field::{FieldDeclaration, FieldGroup};
use super::types::{CoercerOptions, FieldOptions, Group};

fn default_true() -> bool {
    true
}

/// Serialized form of a schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDocument {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub required: IndexMap<String, FieldSpec>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub optional: IndexMap<String, FieldSpec>,
}

/// Serialized form of one field declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Coercer kind name.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default = "default_true")]
    pub discard_nils: bool,
    #[serde(default)]
    pub discard_empty: bool,
    /// Nested schema for `hash` fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaDocument>,
    /// Element declaration for `array` fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element: Option<Box<FieldSpec>>,
    /// Everything else, handed to the coercer.
    #[serde(flatten)]
    pub params: CoercerOptions,
}

impl FieldSpec {
    /// Create a spec for the given kind with default options.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            discard_nils: true,
            discard_empty: false,
            schema: None,
            element: None,
            params: CoercerOptions::new(),
        }
    }
}

/// Document formats understood by [`SchemaDocument::load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Pick a format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "json" => Ok(DocumentFormat::Json),
            "yaml" | "yml" => Ok(DocumentFormat::Yaml),
            _ => Err(HashFilterError::UnsupportedFormat(format!(
                "'{}' (expected .json, .yaml or .yml)",
                path.display()
            ))),
        }
    }
}

impl SchemaDocument {
    /// Read a document from disk, choosing the format by extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = DocumentFormat::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|source| HashFilterError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), ?format, "loading schema document");
        Self::parse(&content, format)
    }

    /// Parse a document from a string.
    pub fn parse(content: &str, format: DocumentFormat) -> Result<Self> {
        match format {
            DocumentFormat::Json => Self::from_json_str(content),
            DocumentFormat::Yaml => Self::from_yaml_str(content),
        }
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Compile into a schema, resolving coercer kinds through `registry`.
    pub fn compile(&self, registry: &CoercerRegistry) -> Result<Schema> {
        let required = compile_group(Group::Required, &self.required, registry)?;
        let optional = compile_group(Group::Optional, &self.optional, registry)?;
        Ok(Schema::new(required, optional))
    }
}

impl Schema {
    /// Load and compile a schema document using the built-in coercers.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        SchemaDocument::load(path)?.compile(&CoercerRegistry::with_builtins())
    }
}

fn compile_group(
    group: Group,
    specs: &IndexMap<String, FieldSpec>,
    registry: &CoercerRegistry,
) -> Result<FieldGroup> {
    let mut fields = FieldGroup::new();
    for (key, spec) in specs {
        let coercer = compile_coercer(key, spec, registry)?;
        let options = FieldOptions::new()
            .with_discard_nils(spec.discard_nils)
            .with_discard_empty(spec.discard_empty)
            .with_params(spec.params.clone());
        fields.insert(group, FieldDeclaration::new(key.as_str(), coercer, options))?;
    }
    Ok(fields)
}

fn compile_coercer(
    key: &str,
    spec: &FieldSpec,
    registry: &CoercerRegistry,
) -> Result<Arc<dyn Coercer>> {
    let coercer = resolve_coercer(key, spec, registry)?;
    coercer
        .validate_options(&spec.params)
        .map_err(|message| HashFilterError::InvalidOption {
            key: key.to_string(),
            message,
        })?;
    Ok(coercer)
}

fn resolve_coercer(
    key: &str,
    spec: &FieldSpec,
    registry: &CoercerRegistry,
) -> Result<Arc<dyn Coercer>> {
    match spec.kind.as_str() {
        "hash" => {
            let nested = spec.schema.as_ref().ok_or_else(|| HashFilterError::InvalidOption {
                key: key.to_string(),
                message: "hash fields need a nested `schema`".to_string(),
            })?;
            Ok(Arc::new(HashCoercer::new(nested.compile(registry)?)))
        }
        "array" => {
            let coercer = match &spec.element {
                Some(element) => {
                    let element_key = format!("{key}[]");
                    ArrayCoercer::of(ArrayElement::with_options(
                        compile_coercer(&element_key, element, registry)?,
                        element.params.clone(),
                    ))
                }
                None => ArrayCoercer::new(),
            };
            Ok(Arc::new(coercer))
        }
        kind => {
            if spec.schema.is_some() || spec.element.is_some() {
                return Err(HashFilterError::InvalidOption {
                    key: key.to_string(),
                    message: format!("'{kind}' fields take neither `schema` nor `element`"),
                });
            }
            registry
                .get(kind)
                .ok_or_else(|| HashFilterError::UnknownCoercer {
                    key: key.to_string(),
                    kind: kind.to_string(),
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_yaml_document() {
        let doc = SchemaDocument::from_yaml_str(
            r#"
required:
  foo: { type: string, max_length: 3 }
optional:
  bar: { type: integer, discard_nils: false, min: 1 }
"#,
        )
        .unwrap();

        assert_eq!(doc.required["foo"].kind, "string");
        assert_eq!(doc.required["foo"].params.usize("max_length"), Some(3));
        assert!(!doc.optional["bar"].discard_nils);
        assert!(!doc.optional["bar"].discard_empty);
        assert_eq!(doc.optional["bar"].params.i64("min"), Some(1));
        assert!(doc.optional["bar"].params.get("discard_nils").is_none());
    }

    #[test]
    fn test_compile_preserves_order_and_options() {
        let doc = SchemaDocument::from_json_str(
            r#"{"required": {"b": {"type": "string"}, "*": {"type": "integer"}, "a": {"type": "boolean"}},
                "optional": {"c": {"type": "float", "discard_empty": true}}}"#,
        )
        .unwrap();
        let schema = doc.compile(&CoercerRegistry::with_builtins()).unwrap();

        assert_eq!(schema.required_keys(), vec!["b", "a"]);
        assert_eq!(schema.required().wildcard().map(|f| f.kind()), Some("integer"));
        assert!(schema.optional().get("c").unwrap().options.discard_empty);
    }

    #[test]
    fn test_compile_nested_hash_and_array() {
        let doc = SchemaDocument::from_json_str(
            r#"{"required": {
                "address": {"type": "hash", "schema": {"required": {"city": {"type": "string"}}}},
                "tags": {"type": "array", "element": {"type": "integer"}}
            }}"#,
        )
        .unwrap();
        let schema = doc.compile(&CoercerRegistry::with_builtins()).unwrap();

        let filtered = schema
            .filter(&json!({"address": {"city": "Oslo"}, "tags": ["1", 2]}))
            .unwrap();
        assert_eq!(filtered["address"], json!({"city": "Oslo"}));
        assert_eq!(filtered["tags"], json!([1, 2]));
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let doc = SchemaDocument::from_json_str(r#"{"required": {"foo": {"type": "model"}}}"#).unwrap();
        let err = doc.compile(&CoercerRegistry::with_builtins()).unwrap_err();
        assert!(matches!(err, HashFilterError::UnknownCoercer { ref kind, .. } if kind == "model"));
    }

    #[test]
    fn test_hash_without_schema_is_rejected() {
        let doc = SchemaDocument::from_json_str(r#"{"required": {"foo": {"type": "hash"}}}"#).unwrap();
        let err = doc.compile(&CoercerRegistry::with_builtins()).unwrap_err();
        assert!(matches!(err, HashFilterError::InvalidOption { .. }));
    }

    #[test]
    fn test_invalid_regex_is_rejected() {
        let doc = SchemaDocument::from_json_str(
            r#"{"required": {"foo": {"type": "string", "matches": "(unclosed"}}}"#,
        )
        .unwrap();
        let err = doc.compile(&CoercerRegistry::with_builtins()).unwrap_err();
        assert!(matches!(err, HashFilterError::InvalidOption { ref key, .. } if key == "foo"));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(DocumentFormat::from_path(Path::new("s.json")).unwrap(), DocumentFormat::Json);
        assert_eq!(DocumentFormat::from_path(Path::new("s.YML")).unwrap(), DocumentFormat::Yaml);
        assert!(DocumentFormat::from_path(Path::new("s.toml")).is_err());
    }
}
