//! Inspect command - list the fields a schema declares.

use std::path::PathBuf;

use colored::Colorize;
use hashfilter::{FieldDeclaration, Group, Schema};

pub fn run(
    schema_path: PathBuf,
    json_output: bool,
    _verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !schema_path.exists() {
        return Err(format!("Schema not found: {}", schema_path.display()).into());
    }

    let schema = Schema::from_path(&schema_path)?;

    if json_output {
        let fields: Vec<_> = schema
            .fields()
            .map(|(group, field)| {
                serde_json::json!({
                    "group": group,
                    "key": field.matcher.as_str(),
                    "type": field.kind(),
                    "discard_nils": field.options.discard_nils,
                    "discard_empty": field.options.discard_empty,
                    "options": field.options.params,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&fields)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Schema".cyan().bold(),
        schema_path.display().to_string().white()
    );

    for group in [Group::Required, Group::Optional] {
        let fields = schema.group(group);
        println!();
        println!(
            "{} ({})",
            format!("{}:", capitalize(group.label())).yellow().bold(),
            fields.len()
        );
        if fields.is_empty() {
            println!("  {}", "none".dimmed());
        }
        for field in fields.iter() {
            print_field(field);
        }
    }

    Ok(())
}

fn print_field(field: &FieldDeclaration) {
    let key = if field.is_wildcard() {
        field.matcher.as_str().magenta().to_string()
    } else {
        field.matcher.as_str().white().to_string()
    };

    let mut flags = Vec::new();
    if !field.options.discard_nils {
        flags.push("keeps nils".to_string());
    }
    if field.options.discard_empty {
        flags.push("discards empty".to_string());
    }
    for (name, value) in field.options.params.iter() {
        flags.push(format!("{}={}", name, value));
    }

    if flags.is_empty() {
        println!("  {:20} {}", key, field.kind().green());
    } else {
        println!(
            "  {:20} {} {}",
            key,
            field.kind().green(),
            format!("[{}]", flags.join(", ")).dimmed()
        );
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
