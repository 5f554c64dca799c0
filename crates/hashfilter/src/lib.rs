//! Hashfilter: declarative validation and coercion of untyped maps.
//!
//! A [`Schema`] lists the keys a payload may carry, each bound to a
//! [`Coercer`] and a nil/empty policy. Filtering an input either yields a
//! cleanly typed map holding only the declared keys, or a [`FilterError`]
//! naming every failing key with a symbolic reason.
//!
//! # Matching rules
//!
//! - **Exact before wildcard**: literal keys are matched first (required
//!   group, then optional); a `"*"` declaration only sees keys nobody
//!   claimed.
//! - **Nils are absence**: a nil value is dropped unless the field sets
//!   `discard_nils: false`, in which case it fails with `nils`.
//! - **All or nothing**: a single failing key discards the whole output.
//!
//! # Example
//!
//! ```
//! use hashfilter::Schema;
//! use serde_json::json;
//!
//! let schema = Schema::builder()
//!     .string("foo")
//!     .integer("*")
//!     .build();
//!
//! let filtered = schema.filter(&json!({"foo": "bar", "baz": "4"})).unwrap();
//! assert_eq!(filtered["baz"], json!(4));
//!
//! let errors = schema.filter(&json!({"foo": "bar", "baz": "poopin"})).unwrap_err();
//! assert_eq!(errors.symbolic(), json!({"baz": "integer"}));
//! ```

pub mod coercion;
pub mod error;
pub mod filter;
pub mod schema;

pub use coercion::{ArrayElement, Coercer, CoercerRegistry};
pub use error::{HashFilterError, Result};
pub use filter::{filter, ErrorMap, ErrorSymbol, FieldError, FilterError, FilterResult, Filtered};
pub use schema::{
    CoercerOptions, FieldDeclaration, FieldOptions, Group, KeyMatcher, Schema, SchemaBuilder,
    SchemaDocument,
};
