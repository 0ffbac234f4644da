//! # scalar-guard - constraint-checked custom scalars
//!
//! scalar-guard turns a primitive kind plus a declarative map of constraint
//! options into a custom scalar for a query-execution layer. The scalar checks
//! every value that crosses it: outgoing results (after a loose coercion) and
//! incoming variables and literals.
//!
//! ## Quick Start
//!
//! ```rust
//! use scalar_guard::prelude::*;
//! use scalar_guard::scalar;
//!
//! # fn main() -> Result<()> {
//! let options: ConstraintOptions = serde_json::from_str(r#"{"min": [2, "utf8"], "max": 10}"#)?;
//! let username = scalar::string(&options);
//!
//! // incoming literals are validated and written back
//! let mut node = LiteralNode::value("roger");
//! assert_eq!(username.parse_literal(&mut node)?, Some(Value::from("roger")));
//!
//! // failures are errors on the way in...
//! let err = username.parse_literal(&mut LiteralNode::value("r")).unwrap_err();
//! assert_eq!(err.to_string(), "\"value\" length must be at least 2 characters long");
//!
//! // ...and values on the way out
//! assert!(!username.serialize(Value::from("toolongofaname")).is_valid());
//! # Ok(())
//! # }
//! ```
//!
//! ## Kinds
//!
//! | kind      | scalar       | example options                              |
//! |-----------|--------------|----------------------------------------------|
//! | `any`     | `JoiAny`     | `{"valid": ["roger", "william"]}`            |
//! | `array`   | `JoiArray`   | `{"min": 2, "unique": true}`                 |
//! | `boolean` | `JoiBoolean` | `{"truthy": "Y", "falsy": "N"}`              |
//! | `date`    | `JoiDate`    | `{"max": "now", "iso": true}`                |
//! | `number`  | `JoiNumber`  | `{"min": 2, "max": 10, "integer": true}`     |
//! | `string`  | `JoiString`  | `{"alphanum": true, "lowercase": true}`      |
//!
//! Option names a kind does not support are ignored. Options with unusable
//! parameters make the scalar reject every value with an `any.argument`
//! failure.
//!
//! ## Modules
//!
//! - **`core`**: kinds, options, the compiler and rules
//! - **`constraints`**: built-in constraints and base type conversion
//! - **`scalar`**: adapters, the six built-in scalars and JSON definitions
//! - **`value`**: the dynamic value model
//! - **`error`**: error types and result aliases
//! - **`logging`**: logging configuration and subscriber setup
//! - **`formatters`**: rendering failures for responses and logs

pub mod constraints;
pub mod core;
pub mod error;
pub mod formatters;
pub mod logging;
pub mod prelude;
pub mod scalar;
pub mod value;

pub use error::{GuardError, Result};
