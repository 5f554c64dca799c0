//! Example: filter request parameters before handing them to business logic.
//!
//! Run with: cargo run --example api_params -- '{"email": "a@b.c", "age": "41"}'

use std::sync::Arc;

use hashfilter::coercion::StringCoercer;
use hashfilter::{ArrayElement, CoercerOptions, FieldOptions, Schema};
use serde_json::{json, Value};

fn main() {
    let role = ArrayElement::with_options(
        Arc::new(StringCoercer),
        CoercerOptions::new().with("in", json!(["admin", "editor"])),
    );

    let schema = Schema::builder()
        .required(|r| {
            r.string_with(
                "email",
                FieldOptions::new().with_param("matches", r"^[^@\s]+@[^@\s]+$"),
            )
            .integer_with("age", FieldOptions::new().with_param("min", 13))
        })
        .optional(|o| {
            o.string_with("name", FieldOptions::new().with_discard_empty(true))
                .array_of("roles", role)
                .hash("address", |a| a.string("city").optional(|o| o.string("zip")))
        })
        .build();

    let payload: Value = match std::env::args().nth(1) {
        Some(arg) => match serde_json::from_str(&arg) {
            Ok(value) => value,
            Err(e) => {
                eprintln!("Error: invalid JSON: {}", e);
                std::process::exit(1);
            }
        },
        None => json!({
            "email": "ada@example.com",
            "age": "36",
            "name": "",
            "roles": ["admin"],
            "address": {"city": "London"},
            "ignored": true
        }),
    };

    match schema.filter(&payload) {
        Ok(params) => {
            println!("Accepted parameters:");
            for (key, value) in &params {
                println!("  {:10} {}", key, value);
            }
        }
        Err(err) => {
            println!("Rejected: {}", err.symbolic());
            for message in err.messages() {
                println!("  - {}", message);
            }
        }
    }
}
