//! Basic example showing the six built-in scalars.
//!
//! Each scalar is compiled from constraint options and then fed the inputs a
//! query-execution layer would hand it.
//!
//! Run with:
//! ```bash
//! cargo run --example basic_scalars
//! ```

use chrono::{Duration, Utc};
use scalar_guard::core::ConstraintOptions;
use scalar_guard::formatters::{FailureFormatter, FormatterConfig, HumanFormatter};
use scalar_guard::logging::setup::{init_logging, LoggingConfig};
use scalar_guard::scalar::{self, LiteralNode, ScalarType, Serialized};
use scalar_guard::value::Value;
use tracing::Level;

fn check(scalar: &dyn ScalarType, input: LiteralNode, formatter: &HumanFormatter) {
    let mut node = input;
    let shown = match (&node.value, &node.values) {
        (_, Some(items)) => Value::List(items.clone()).to_string(),
        (Some(value), None) => format!("{value:?}"),
        (None, None) => "<missing>".to_string(),
    };
    match scalar.parse_literal(&mut node) {
        Ok(Some(value)) => println!("  ✓ {shown} -> {value}"),
        Ok(None) => println!("  ✓ {shown} -> <none>"),
        Err(err) => match err.as_validation() {
            Some(failure) => match formatter.format(failure) {
                Ok(text) => println!("  ✗ {shown}: {text}"),
                Err(_) => println!("  ✗ {shown}: {err}"),
            },
            None => println!("  ✗ {shown}: {err}"),
        },
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(LoggingConfig::development().with_guard_level(Level::INFO))?;

    let formatter = HumanFormatter::with_config(FormatterConfig::default());

    println!("=== JoiString {{min: [2, \"utf8\"], max: 10}} ===");
    let name = scalar::string(&serde_json::from_str::<ConstraintOptions>(
        r#"{"min": [2, "utf8"], "max": 10}"#,
    )?);
    check(&name, LiteralNode::value("roger"), &formatter);
    check(&name, LiteralNode::value("1"), &formatter);
    check(&name, LiteralNode::value("toolongofaname"), &formatter);

    println!("\n=== JoiAny {{valid: [roger, william, true]}} ===");
    let any = scalar::any(
        &ConstraintOptions::new().with(
            "valid",
            vec![Value::from("roger"), Value::from("william"), Value::from(true)],
        ),
    );
    check(&any, LiteralNode::value("william"), &formatter);
    check(&any, LiteralNode::value("sarah"), &formatter);

    println!("\n=== JoiNumber {{min: 2, max: 10}} ===");
    let age = scalar::number(&ConstraintOptions::new().with("min", 2).with("max", 10));
    check(&age, LiteralNode::value("5"), &formatter);
    check(&age, LiteralNode::value(12), &formatter);
    check(&age, LiteralNode::value(true), &formatter);

    println!("\n=== JoiBoolean {{truthy: \"Y\"}} ===");
    let flag = scalar::boolean(&ConstraintOptions::new().with("truthy", "Y"));
    check(&flag, LiteralNode::value("Y"), &formatter);
    check(&flag, LiteralNode::value("boo"), &formatter);

    println!("\n=== JoiDate {{max: now}} ===");
    let birthday = scalar::date(&ConstraintOptions::new().with("max", "now"));
    check(&birthday, LiteralNode::value("1990-05-17"), &formatter);
    check(
        &birthday,
        LiteralNode::value(Utc::now() + Duration::days(7)),
        &formatter,
    );

    println!("\n=== JoiArray {{length: 1}} ===");
    let items = scalar::array(&ConstraintOptions::new().with("length", 1));
    check(&items, LiteralNode::list(vec![Value::from("roger")]), &formatter);
    check(
        &items,
        LiteralNode::list(vec![Value::from("roger"), Value::from("sarah")]),
        &formatter,
    );

    println!("\n=== Serializing outgoing values ===");
    let detailed = HumanFormatter::with_config(FormatterConfig::detailed());
    for value in [Value::from(5), Value::from("7"), Value::from(42)] {
        match age.serialize(value.clone()) {
            Serialized::Valid(output) => println!("  ✓ {value:?} -> {output}"),
            Serialized::Invalid(failure) => {
                println!("  ✗ {value:?}: {}", detailed.format(&failure)?)
            }
        }
    }

    Ok(())
}
