//! Validation failure types.

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The category of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// A required value was missing
    Required,
    /// A value was present where none is allowed
    Forbidden,
    /// The value is not of the rule's type and could not be converted
    TypeMismatch,
    /// A numeric, length or date bound was violated
    OutOfRange,
    /// The value is outside the allowed set or inside the invalid set
    NotAllowed,
    /// The value does not match a required format
    PatternMismatch,
    /// A list contains the same item twice
    Duplicate,
    /// A constraint was configured with unusable parameters
    InvalidArgument,
}

impl FailureKind {
    /// Returns a short human-readable name for this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Required => "required value missing",
            FailureKind::Forbidden => "forbidden value present",
            FailureKind::TypeMismatch => "type mismatch",
            FailureKind::OutOfRange => "out of range",
            FailureKind::NotAllowed => "not in allowed set",
            FailureKind::PatternMismatch => "pattern mismatch",
            FailureKind::Duplicate => "duplicate value",
            FailureKind::InvalidArgument => "invalid constraint argument",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured details attached to a failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FailureContext {
    /// The bound that was violated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<Value>,
    /// The offending value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// The allowed set, for allowed-set failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valids: Option<Vec<Value>>,
    /// The pattern, for pattern failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// The constraint the failure belongs to, for argument failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraint: Option<String>,
}

impl FailureContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: impl Into<Value>) -> Self {
        self.limit = Some(limit.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_valids(mut self, valids: Vec<Value>) -> Self {
        self.valids = Some(valids);
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn with_constraint(mut self, constraint: impl Into<String>) -> Self {
        self.constraint = Some(constraint.into());
        self
    }
}

/// A value failed its rule.
///
/// The message always starts with the quoted label followed by the violated
/// constraint, e.g. `"value" must be one of [roger, william]`.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ValidationFailure {
    kind: FailureKind,
    code: String,
    label: String,
    message: String,
    context: FailureContext,
}

impl ValidationFailure {
    /// Creates a failure; `body` is the message text following the label.
    pub fn new(
        kind: FailureKind,
        code: impl Into<String>,
        label: impl Into<String>,
        body: impl AsRef<str>,
        context: FailureContext,
    ) -> Self {
        let label = label.into();
        let message = format!("\"{label}\" {}", body.as_ref());
        Self {
            kind,
            code: code.into(),
            label,
            message,
            context,
        }
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    /// The machine-readable code, e.g. `string.min`.
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn context(&self) -> &FailureContext {
        &self.context
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_starts_with_label() {
        let failure = ValidationFailure::new(
            FailureKind::OutOfRange,
            "string.min",
            "name",
            "length must be at least 2 characters long",
            FailureContext::new().with_limit(2).with_value("a"),
        );
        assert_eq!(
            failure.to_string(),
            "\"name\" length must be at least 2 characters long"
        );
        assert_eq!(failure.code(), "string.min");
        assert_eq!(failure.context().limit, Some(Value::from(2)));
    }

    #[test]
    fn test_failure_serializes_without_empty_context() {
        let failure = ValidationFailure::new(
            FailureKind::Required,
            "any.required",
            "value",
            "is required",
            FailureContext::new(),
        );
        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(json["kind"], "required");
        assert_eq!(json["context"], serde_json::json!({}));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(FailureKind::NotAllowed.to_string(), "not in allowed set");
        assert_eq!(FailureKind::PatternMismatch.as_str(), "pattern mismatch");
    }
}
