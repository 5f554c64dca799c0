//! Check command - filter a JSON payload through a schema document.

use std::fmt;
use std::io::Read;
use std::path::PathBuf;

use colored::Colorize;
use hashfilter::{FilterError, Schema};
use serde_json::Value;

/// Returned when the payload fails validation, after the errors are printed.
#[derive(Debug)]
struct Rejected(usize);

impl fmt::Display for Rejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            1 => write!(f, "input rejected (1 error)"),
            n => write!(f, "input rejected ({} errors)", n),
        }
    }
}

impl std::error::Error for Rejected {}

pub fn run(
    schema_path: PathBuf,
    input: Option<PathBuf>,
    messages: bool,
    compact: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !schema_path.exists() {
        return Err(format!("Schema not found: {}", schema_path.display()).into());
    }

    let schema = Schema::from_path(&schema_path)?;
    if verbose {
        eprintln!(
            "{} {} ({} fields)",
            "Loaded".cyan().bold(),
            schema_path.display().to_string().white(),
            schema.field_count()
        );
    }

    let raw = match &input {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("Cannot read {}: {}", path.display(), e))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let payload: Value = serde_json::from_str(&raw)?;
    tracing::debug!(bytes = raw.len(), "payload parsed");

    match schema.filter(&payload) {
        Ok(filtered) => {
            let value = Value::Object(filtered.into_iter().collect());
            let text = if compact {
                serde_json::to_string(&value)?
            } else {
                serde_json::to_string_pretty(&value)?
            };
            println!("{}", text);
            Ok(())
        }
        Err(err) => {
            let count = report(&err, messages)?;
            Err(Box::new(Rejected(count)))
        }
    }
}

/// Print the errors and return how many were reported.
fn report(err: &FilterError, messages: bool) -> Result<usize, Box<dyn std::error::Error>> {
    if messages {
        let lines = err.messages();
        for line in &lines {
            println!("  {} {}", "✗".red(), line);
        }
        return Ok(lines.len());
    }

    println!("{}", serde_json::to_string_pretty(&err.symbolic())?);
    Ok(err.fields().map_or(1, |fields| fields.len()))
}
