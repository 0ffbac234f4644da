//! Example building a set of custom scalars from a JSON document.
//!
//! Shows how definitions are loaded, how bad option values surface at
//! validation time, and how failures are rendered as JSON for an API error.
//!
//! Run with:
//! ```bash
//! cargo run --example registry_from_json
//! ```

use scalar_guard::formatters::{FailureFormatter, FormatterConfig, JsonFormatter};
use scalar_guard::logging::setup::{init_logging, LoggingConfig};
use scalar_guard::scalar::{LiteralNode, ScalarRegistry};
use scalar_guard::value::Value;
use tracing::{info, warn};

const SCHEMA_SCALARS: &str = r#"{
    "scalars": [
        {
            "name": "Username",
            "kind": "string",
            "description": "Lowercase letters and digits",
            "options": {"alphanum": true, "min": 3, "max": 16, "lowercase": true}
        },
        {"name": "Age", "kind": "number", "options": {"integer": true, "min": 0, "max": 150}},
        {"name": "Consent", "kind": "boolean", "options": {"truthy": ["Y", "yes"], "falsy": ["N", "no"]}},
        {"name": "Birthday", "kind": "date", "options": {"iso": true, "max": "now"}},
        {"name": "Tags", "kind": "array", "options": {"unique": true, "max": 3, "single": true}},
        {"name": "Broken", "kind": "string", "options": {"min": "three"}}
    ]
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(LoggingConfig::default())?;

    let registry = ScalarRegistry::from_json(SCHEMA_SCALARS)?;
    info!(scalars = registry.len(), "loaded schema scalars");

    for adapter in registry.iter() {
        let names: Vec<String> = adapter
            .rule()
            .constraints()
            .into_iter()
            .map(|constraint| constraint.name)
            .collect();
        println!("{:<10} {:<8} [{}]", adapter.name(), adapter.kind(), names.join(", "));
        if !adapter.rule().issues().is_empty() {
            warn!(scalar = adapter.name(), "scalar rejects every value until its options are fixed");
        }
    }

    let formatter = JsonFormatter::with_config(FormatterConfig::detailed()).with_pretty(true);
    let inputs = [
        ("Username", LiteralNode::value("Roger42")),
        ("Username", LiteralNode::value("r!")),
        ("Age", LiteralNode::value("42")),
        ("Age", LiteralNode::value(4.5)),
        ("Consent", LiteralNode::value("yes")),
        ("Birthday", LiteralNode::value("1990-05-17")),
        ("Birthday", LiteralNode::value(0)),
        ("Tags", LiteralNode::value("rust")),
        ("Tags", LiteralNode::list(vec![Value::from("a"), Value::from("a")])),
        ("Broken", LiteralNode::value("anything")),
    ];

    println!();
    for (name, mut node) in inputs {
        let Some(scalar) = registry.get(name) else {
            continue;
        };
        match scalar.parse_literal(&mut node) {
            Ok(value) => println!(
                "{name}: accepted {}",
                value.map(|v| v.to_string()).unwrap_or_default()
            ),
            Err(err) => match err.as_validation() {
                Some(failure) => println!("{name}: rejected\n{}", formatter.format(failure)?),
                None => return Err(err.into()),
            },
        }
    }

    Ok(())
}
