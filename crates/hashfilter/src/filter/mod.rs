//! Filter engine and the error model it reports with.

mod engine;
mod errors;

pub use engine::{filter, FilterResult, Filtered};
pub use errors::{ErrorMap, ErrorSymbol, FieldError, FilterError};
