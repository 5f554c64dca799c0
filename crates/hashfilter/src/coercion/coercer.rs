//! The coercer contract and the name-keyed registry.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::filter::FieldError;
use crate::schema::CoercerOptions;

use super::scalars::{BooleanCoercer, DateCoercer, FloatCoercer, IntegerCoercer, StringCoercer};

/// A pluggable unit that validates and converts one raw value.
///
/// Implementations must be thread-safe (Send + Sync) so schemas can be
/// shared across threads. The engine hands over the raw value with the
/// field's options and uses the verdict as-is.
pub trait Coercer: Send + Sync + fmt::Debug {
    /// Kind name used in schema documents and introspection.
    fn kind(&self) -> &str;

    /// Convert `value` or explain why it cannot be converted.
    ///
    /// Never called with a nil value; the engine applies nil policy first.
    fn coerce(&self, value: &Value, options: &CoercerOptions) -> Result<Value, FieldError>;

    /// Whether `value` counts as empty for `discard_empty`.
    ///
    /// Defaults to blank strings.
    fn is_empty(&self, value: &Value, _options: &CoercerOptions) -> bool {
        matches!(value, Value::String(s) if s.trim().is_empty())
    }

    /// Check options once, when the field is declared.
    ///
    /// Returns a description of the first unusable option.
    fn validate_options(&self, _options: &CoercerOptions) -> Result<(), String> {
        Ok(())
    }
}

/// Maps kind names to coercer instances.
#[derive(Clone, Default)]
pub struct CoercerRegistry {
    coercers: HashMap<String, Arc<dyn Coercer>>,
}

impl CoercerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in scalar coercers.
    ///
    /// `array` and `hash` are structural and are assembled from their
    /// element/nested declarations instead of being looked up here.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(StringCoercer));
        registry.register(Arc::new(IntegerCoercer));
        registry.register(Arc::new(FloatCoercer));
        registry.register(Arc::new(BooleanCoercer));
        registry.register(Arc::new(DateCoercer));
        registry
    }

    /// Register a coercer under its own kind name, replacing any previous one.
    pub fn register(&mut self, coercer: Arc<dyn Coercer>) {
        self.coercers.insert(coercer.kind().to_string(), coercer);
    }

    /// Register a coercer under an alias.
    pub fn register_as(&mut self, name: impl Into<String>, coercer: Arc<dyn Coercer>) {
        self.coercers.insert(name.into(), coercer);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Coercer>> {
        self.coercers.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.coercers.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.coercers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for CoercerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoercerRegistry")
            .field("names", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::ErrorSymbol;
    use serde_json::json;

    #[derive(Debug)]
    struct Uppercase;

    impl Coercer for Uppercase {
        fn kind(&self) -> &str {
            "uppercase"
        }

        fn coerce(&self, value: &Value, _options: &CoercerOptions) -> Result<Value, FieldError> {
            value
                .as_str()
                .map(|s| Value::String(s.to_uppercase()))
                .ok_or(FieldError::Symbol(ErrorSymbol::String))
        }
    }

    #[test]
    fn test_builtins_registered() {
        let registry = CoercerRegistry::with_builtins();
        assert_eq!(registry.names(), vec!["boolean", "date", "float", "integer", "string"]);
        assert!(!registry.contains("hash"));
    }

    #[test]
    fn test_register_custom_coercer() {
        let mut registry = CoercerRegistry::with_builtins();
        registry.register(Arc::new(Uppercase));
        registry.register_as("shout", Arc::new(Uppercase));

        let coercer = registry.get("shout").unwrap();
        assert_eq!(coercer.kind(), "uppercase");
        assert_eq!(
            coercer.coerce(&json!("hi"), &CoercerOptions::new()),
            Ok(json!("HI"))
        );
    }

    #[test]
    fn test_default_emptiness() {
        let options = CoercerOptions::new();
        assert!(Uppercase.is_empty(&json!(""), &options));
        assert!(Uppercase.is_empty(&json!("  "), &options));
        assert!(!Uppercase.is_empty(&json!("x"), &options));
        assert!(!Uppercase.is_empty(&json!(0), &options));
    }
}
