//! Constraint trait and related types for validation rules.

use super::{FailureContext, FailureKind, ValidationFailure};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// The outcome of evaluating a constraint: the (possibly converted) value, or
/// the failure that stopped validation.
pub type Outcome = std::result::Result<Value, ValidationFailure>;

/// Per-call evaluation settings handed to every constraint.
#[derive(Debug, Clone, Copy)]
pub struct EvalContext<'a> {
    label: &'a str,
    convert: bool,
}

impl<'a> EvalContext<'a> {
    pub fn new(label: &'a str, convert: bool) -> Self {
        Self { label, convert }
    }

    /// The label used at the start of failure messages.
    pub fn label(&self) -> &'a str {
        self.label
    }

    /// Whether constraints may convert values (false in strict mode).
    pub fn convert(&self) -> bool {
        self.convert
    }

    /// Builds a failure labelled for this evaluation.
    pub fn fail(
        &self,
        kind: FailureKind,
        code: &str,
        body: impl AsRef<str>,
        context: FailureContext,
    ) -> ValidationFailure {
        ValidationFailure::new(kind, code, self.label, body, context)
    }
}

/// A human-readable summary of one constraint, used by [`Rule::describe`].
///
/// [`Rule::describe`]: crate::core::Rule::describe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintMetadata {
    /// The constraint name, e.g. `min`
    pub name: String,
    /// What the constraint requires
    pub description: String,
}

/// A validation constraint that can be evaluated against a single value.
///
/// Implementations are immutable and shared between clones of a rule, so
/// they must be `Send + Sync`. A constraint may return a converted value
/// (e.g. lower-casing a string) when [`EvalContext::convert`] is true.
///
/// # Examples
///
/// ```rust
/// use scalar_guard::core::{Constraint, EvalContext, FailureContext, FailureKind, Outcome};
/// use scalar_guard::value::Value;
///
/// #[derive(Debug)]
/// struct NotZero;
///
/// impl Constraint for NotZero {
///     fn evaluate(&self, value: Value, ctx: &EvalContext<'_>) -> Outcome {
///         match value.as_f64() {
///             Some(n) if n == 0.0 => Err(ctx.fail(
///                 FailureKind::OutOfRange,
///                 "number.zero",
///                 "must not be zero",
///                 FailureContext::new().with_value(value),
///             )),
///             _ => Ok(value),
///         }
///     }
///
///     fn name(&self) -> &str {
///         "not_zero"
///     }
///
///     fn description(&self) -> String {
///         "not zero".to_string()
///     }
/// }
/// ```
pub trait Constraint: Debug + Send + Sync {
    /// Evaluates the constraint, returning the value to pass to the next one.
    fn evaluate(&self, value: Value, ctx: &EvalContext<'_>) -> Outcome;

    /// Returns the name of the constraint.
    fn name(&self) -> &str;

    /// Returns a description of what this constraint requires.
    fn description(&self) -> String;

    /// Returns the metadata associated with this constraint.
    fn metadata(&self) -> ConstraintMetadata {
        ConstraintMetadata {
            name: self.name().to_string(),
            description: self.description(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Always;

    impl Constraint for Always {
        fn evaluate(&self, value: Value, _ctx: &EvalContext<'_>) -> Outcome {
            Ok(value)
        }

        fn name(&self) -> &str {
            "always"
        }

        fn description(&self) -> String {
            "anything".to_string()
        }
    }

    #[test]
    fn test_default_metadata() {
        let metadata = Always.metadata();
        assert_eq!(metadata.name, "always");
        assert_eq!(metadata.description, "anything");
    }

    #[test]
    fn test_context_labels_failures() {
        let ctx = EvalContext::new("age", true);
        let failure = ctx.fail(
            FailureKind::TypeMismatch,
            "number.base",
            "must be a number",
            FailureContext::new(),
        );
        assert_eq!(failure.message(), "\"age\" must be a number");
        assert!(ctx.convert());
    }
}
