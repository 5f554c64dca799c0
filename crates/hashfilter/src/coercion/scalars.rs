//! Built-in scalar coercers: string, integer, float, boolean and date.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::NaiveDate;
use chrono::format::{Item, StrftimeItems};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Number, Value};

use crate::filter::{ErrorSymbol, FieldError};
use crate::schema::CoercerOptions;

use super::coercer::Coercer;

static INTEGER_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?\d+$").unwrap());

/// Compiled `matches` patterns, keyed by source.
static PATTERNS: Lazy<RwLock<HashMap<String, Regex>>> = Lazy::new(Default::default);

const ISO_DATE: &str = "%Y-%m-%d";

/// Compile `source` once and reuse it for every later value.
fn pattern(source: &str) -> Result<Regex, regex::Error> {
    if let Some(re) = PATTERNS.read().ok().and_then(|cache| cache.get(source).cloned()) {
        return Ok(re);
    }
    let re = Regex::new(source)?;
    if let Ok(mut cache) = PATTERNS.write() {
        cache.insert(source.to_string(), re.clone());
    }
    Ok(re)
}

fn reject<T>(symbol: ErrorSymbol) -> Result<T, FieldError> {
    Err(FieldError::Symbol(symbol))
}

/// Strings, optionally trimmed and constrained.
///
/// Options: `strict` (only accept strings, default false), `strip` (trim,
/// default true), `empty` (allow blank, default false), `min_length`,
/// `max_length`, `matches`, `in`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringCoercer;

impl Coercer for StringCoercer {
    fn kind(&self) -> &str {
        "string"
    }

    fn coerce(&self, value: &Value, options: &CoercerOptions) -> Result<Value, FieldError> {
        let strict = options.flag("strict", false);
        let raw = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) if !strict => n.to_string(),
            Value::Bool(b) if !strict => b.to_string(),
            _ => return reject(ErrorSymbol::String),
        };

        let s = if options.flag("strip", true) {
            raw.trim().to_string()
        } else {
            raw
        };

        if s.is_empty() && !options.flag("empty", false) {
            return reject(ErrorSymbol::Empty);
        }

        let length = s.chars().count();
        if options.usize("min_length").is_some_and(|min| length < min) {
            return reject(ErrorSymbol::MinLength);
        }
        if options.usize("max_length").is_some_and(|max| length > max) {
            return reject(ErrorSymbol::MaxLength);
        }

        if let Some(source) = options.str("matches") {
            let matched = pattern(source).is_ok_and(|re| re.is_match(&s));
            if !matched {
                return reject(ErrorSymbol::Matches);
            }
        }

        if let Some(allowed) = options.list("in") {
            if !allowed.iter().any(|v| v.as_str() == Some(s.as_str())) {
                return reject(ErrorSymbol::In);
            }
        }

        Ok(Value::String(s))
    }

    fn is_empty(&self, value: &Value, options: &CoercerOptions) -> bool {
        match value {
            Value::String(s) if options.flag("strip", true) => s.trim().is_empty(),
            Value::String(s) => s.is_empty(),
            _ => false,
        }
    }

    fn validate_options(&self, options: &CoercerOptions) -> Result<(), String> {
        match options.get("matches") {
            None => Ok(()),
            Some(Value::String(source)) => pattern(source)
                .map(|_| ())
                .map_err(|err| format!("invalid `matches` pattern: {err}")),
            Some(other) => Err(format!("`matches` must be a string, got {other}")),
        }
    }
}

/// Whole numbers, from numbers or integer-looking strings.
///
/// Options: `min`, `max`, `in`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerCoercer;

impl Coercer for IntegerCoercer {
    fn kind(&self) -> &str {
        "integer"
    }

    fn coerce(&self, value: &Value, options: &CoercerOptions) -> Result<Value, FieldError> {
        let n = match value {
            Value::Number(n) => match n.as_i64() {
                Some(n) => n,
                None => return reject(ErrorSymbol::Integer),
            },
            Value::String(s) => {
                let s = s.trim();
                if s.is_empty() {
                    return reject(ErrorSymbol::Empty);
                }
                if !INTEGER_PATTERN.is_match(s) {
                    return reject(ErrorSymbol::Integer);
                }
                match s.parse::<i64>() {
                    Ok(n) => n,
                    Err(_) => return reject(ErrorSymbol::Integer),
                }
            }
            _ => return reject(ErrorSymbol::Integer),
        };

        if options.i64("min").is_some_and(|min| n < min) {
            return reject(ErrorSymbol::Min);
        }
        if options.i64("max").is_some_and(|max| n > max) {
            return reject(ErrorSymbol::Max);
        }
        if let Some(allowed) = options.list("in") {
            if !allowed.iter().any(|v| v.as_i64() == Some(n)) {
                return reject(ErrorSymbol::In);
            }
        }

        Ok(Value::from(n))
    }
}

/// Decimal numbers, from numbers or numeric strings.
///
/// Options: `min`, `max`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloatCoercer;

impl Coercer for FloatCoercer {
    fn kind(&self) -> &str {
        "float"
    }

    fn coerce(&self, value: &Value, options: &CoercerOptions) -> Result<Value, FieldError> {
        let f = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => {
                let s = s.trim();
                if s.is_empty() {
                    return reject(ErrorSymbol::Empty);
                }
                s.parse::<f64>().ok()
            }
            _ => None,
        };
        let Some(number) = f.and_then(Number::from_f64) else {
            return reject(ErrorSymbol::Float);
        };
        let f = number.as_f64().unwrap_or_default();

        if options.f64("min").is_some_and(|min| f < min) {
            return reject(ErrorSymbol::Min);
        }
        if options.f64("max").is_some_and(|max| f > max) {
            return reject(ErrorSymbol::Max);
        }

        Ok(Value::Number(number))
    }
}

/// Booleans, from booleans, `"true"/"false"/"1"/"0"` or `1`/`0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanCoercer;

impl Coercer for BooleanCoercer {
    fn kind(&self) -> &str {
        "boolean"
    }

    fn coerce(&self, value: &Value, _options: &CoercerOptions) -> Result<Value, FieldError> {
        match value {
            Value::Bool(b) => Ok(Value::Bool(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(1) => Ok(Value::Bool(true)),
                Some(0) => Ok(Value::Bool(false)),
                _ => reject(ErrorSymbol::Boolean),
            },
            Value::String(s) => match s.trim().to_lowercase().as_str() {
                "" => reject(ErrorSymbol::Empty),
                "true" | "1" => Ok(Value::Bool(true)),
                "false" | "0" => Ok(Value::Bool(false)),
                _ => reject(ErrorSymbol::Boolean),
            },
            _ => reject(ErrorSymbol::Boolean),
        }
    }
}

/// Calendar dates, normalized to `YYYY-MM-DD`.
///
/// Options: `format` (chrono format string, ISO dates are always
/// accepted too), `after`, `before` (ISO dates, exclusive).
#[derive(Debug, Clone, Copy, Default)]
pub struct DateCoercer;

impl DateCoercer {
    fn parse(s: &str, format: Option<&str>) -> Option<NaiveDate> {
        format
            .and_then(|f| NaiveDate::parse_from_str(s, f).ok())
            .or_else(|| NaiveDate::parse_from_str(s, ISO_DATE).ok())
    }

    fn bound(options: &CoercerOptions, key: &str) -> Option<NaiveDate> {
        options
            .str(key)
            .and_then(|s| NaiveDate::parse_from_str(s, ISO_DATE).ok())
    }

    fn check_bound(options: &CoercerOptions, key: &str) -> Result<(), String> {
        match options.get(key) {
            None => Ok(()),
            Some(Value::String(s)) if NaiveDate::parse_from_str(s, ISO_DATE).is_ok() => Ok(()),
            Some(other) => Err(format!("`{key}` must be a YYYY-MM-DD date, got {other}")),
        }
    }
}

impl Coercer for DateCoercer {
    fn kind(&self) -> &str {
        "date"
    }

    fn coerce(&self, value: &Value, options: &CoercerOptions) -> Result<Value, FieldError> {
        let Value::String(raw) = value else {
            return reject(ErrorSymbol::Date);
        };
        let raw = raw.trim();
        if raw.is_empty() {
            return reject(ErrorSymbol::Empty);
        }
        let Some(date) = Self::parse(raw, options.str("format")) else {
            return reject(ErrorSymbol::Date);
        };

        if Self::bound(options, "after").is_some_and(|after| date <= after) {
            return reject(ErrorSymbol::After);
        }
        if Self::bound(options, "before").is_some_and(|before| date >= before) {
            return reject(ErrorSymbol::Before);
        }

        Ok(Value::String(date.format(ISO_DATE).to_string()))
    }

    fn validate_options(&self, options: &CoercerOptions) -> Result<(), String> {
        match options.get("format") {
            None => {}
            Some(Value::String(format))
                if !StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) => {}
            Some(other) => return Err(format!("invalid date `format` {other}")),
        }
        Self::check_bound(options, "after")?;
        Self::check_bound(options, "before")
    }
}
