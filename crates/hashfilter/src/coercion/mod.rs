//! Coercers: the pluggable units that turn raw values into typed ones.

mod coercer;
mod scalars;
mod structural;

pub use coercer::{Coercer, CoercerRegistry};
pub use scalars::{BooleanCoercer, DateCoercer, FloatCoercer, IntegerCoercer, StringCoercer};
pub use structural::{ArrayCoercer, ArrayElement, HashCoercer};
