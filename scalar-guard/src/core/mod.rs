//! Core validation types for the scalar-guard library.
//!
//! ## Overview
//!
//! - **[`Kind`]**: the primitive category of a scalar (any, array, boolean,
//!   date, number, string)
//! - **[`ConstraintOptions`]**: ordered constraint names and parameters
//! - **[`compile`]**: turns a kind and options into a [`Rule`]
//! - **[`Rule`]**: base type, flags, value sets and [`Constraint`]s
//! - **[`ValidationFailure`]**: why a value was rejected
//!
//! ## Architecture
//!
//! ```text
//! (Kind, ConstraintOptions)
//!     └── compile ── per-kind constraint table
//!             └── Rule
//!                 ├── BaseType (type check + conversion)
//!                 ├── allowed / invalid values
//!                 └── Constraint 1 .. n
//! ```
//!
//! ## Example
//!
//! ```rust
//! use scalar_guard::core::{compile, ConstraintOptions, FailureKind, Kind};
//! use scalar_guard::value::Value;
//!
//! let options: ConstraintOptions = serde_json::from_str(r#"{"min": 2, "max": 10}"#).unwrap();
//! let rule = compile(Kind::Number, &options);
//!
//! assert_eq!(rule.validate(Value::from("5")), Ok(Value::from(5)));
//! let failure = rule.validate(Value::from(12)).unwrap_err();
//! assert_eq!(failure.kind(), FailureKind::OutOfRange);
//! ```

pub mod compiler;
mod constraint;
mod kind;
mod options;
mod result;
mod rule;

pub use compiler::{compile, lookup, supported_constraints, ApplyFn};
pub use constraint::{Constraint, ConstraintMetadata, EvalContext, Outcome};
pub use kind::Kind;
pub use options::{ConstraintOptions, Params};
pub use result::{FailureContext, FailureKind, ValidationFailure};
pub use rule::{ArgumentIssue, Presence, Rule, RuleDescription};
