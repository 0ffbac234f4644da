//! Assertion types for numeric bounds.

use crate::value::format_number;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An assertion that can be evaluated against a numeric value.
///
/// Used by number constraints and, through millisecond timestamps, by date
/// constraints.
///
/// # Examples
///
/// ```rust
/// use scalar_guard::constraints::Assertion;
///
/// let assertion = Assertion::GreaterThanOrEqual(2.0);
/// assert!(assertion.evaluate(2.0));
/// assert!(!assertion.evaluate(1.0));
/// assert_eq!(assertion.description(), "larger than or equal to 2");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Assertion {
    /// Value must be greater than the specified value
    GreaterThan(f64),
    /// Value must be greater than or equal to the specified value
    GreaterThanOrEqual(f64),
    /// Value must be less than the specified value
    LessThan(f64),
    /// Value must be less than or equal to the specified value
    LessThanOrEqual(f64),
}

impl Assertion {
    /// Evaluates the assertion against a value.
    pub fn evaluate(&self, value: f64) -> bool {
        match self {
            Assertion::GreaterThan(threshold) => value > *threshold,
            Assertion::GreaterThanOrEqual(threshold) => value >= *threshold,
            Assertion::LessThan(threshold) => value < *threshold,
            Assertion::LessThanOrEqual(threshold) => value <= *threshold,
        }
    }

    /// Returns the constraint name that produces this assertion.
    pub fn name(&self) -> &'static str {
        match self {
            Assertion::GreaterThan(_) => "greater",
            Assertion::GreaterThanOrEqual(_) => "min",
            Assertion::LessThan(_) => "less",
            Assertion::LessThanOrEqual(_) => "max",
        }
    }

    /// Returns the bound that a failing value is reported against.
    pub fn limit(&self) -> f64 {
        match self {
            Assertion::GreaterThan(v)
            | Assertion::GreaterThanOrEqual(v)
            | Assertion::LessThan(v)
            | Assertion::LessThanOrEqual(v) => *v,
        }
    }

    /// Returns a human-readable description of the assertion.
    pub fn description(&self) -> String {
        self.describe_with(format_number)
    }

    /// Describes the assertion, rendering bounds with `render`.
    pub fn describe_with(&self, render: impl Fn(f64) -> String) -> String {
        match self {
            Assertion::GreaterThan(v) => format!("greater than {}", render(*v)),
            Assertion::GreaterThanOrEqual(v) => format!("larger than or equal to {}", render(*v)),
            Assertion::LessThan(v) => format!("less than {}", render(*v)),
            Assertion::LessThanOrEqual(v) => format!("less than or equal to {}", render(*v)),
        }
    }
}

impl fmt::Display for Assertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}
