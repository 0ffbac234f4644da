//! Prelude for commonly used types and traits in scalar-guard.

pub use crate::core::{compile, ConstraintOptions, Kind, Rule, ValidationFailure};
pub use crate::error::{ErrorContext, GuardError, Result};
pub use crate::formatters::{FailureFormatter, FormatterConfig};
pub use crate::logging::LogConfig;
pub use crate::scalar::{LiteralNode, ScalarAdapter, ScalarType, Serialized};
pub use crate::value::Value;
