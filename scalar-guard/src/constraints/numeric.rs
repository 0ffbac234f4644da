//! Numeric constraints: bounds, integrality, sign, precision, multiples and ports.

use super::Assertion;
use crate::core::{Constraint, EvalContext, FailureContext, FailureKind, Outcome};
use crate::value::{format_number, Value};
use serde::{Deserialize, Serialize};

const EPSILON: f64 = 1e-10;

/// The numeric property a [`NumberConstraint`] checks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NumberCheck {
    /// A comparison against a bound
    Bound(Assertion),
    /// No fractional part
    Integer,
    /// Strictly greater than zero
    Positive,
    /// Strictly less than zero
    Negative,
    /// At most this many decimal places
    Precision(u32),
    /// An integral multiple of the base
    Multiple(f64),
    /// A TCP/UDP port number
    Port,
}

/// A constraint on a number.
///
/// # Examples
///
/// ```rust
/// use scalar_guard::constraints::{Assertion, NumberConstraint};
/// use scalar_guard::core::{Constraint, EvalContext};
/// use scalar_guard::value::Value;
///
/// let ctx = EvalContext::new("age", true);
/// let max = NumberConstraint::bound(Assertion::LessThanOrEqual(10.0));
/// assert!(max.evaluate(Value::from(5), &ctx).is_ok());
///
/// let failure = max.evaluate(Value::from(12), &ctx).unwrap_err();
/// assert_eq!(failure.message(), "\"age\" must be less than or equal to 10");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumberConstraint {
    check: NumberCheck,
}

impl NumberConstraint {
    pub fn new(check: NumberCheck) -> Self {
        Self { check }
    }

    pub fn bound(assertion: Assertion) -> Self {
        Self::new(NumberCheck::Bound(assertion))
    }

    pub fn check(&self) -> NumberCheck {
        self.check
    }

    fn passes(&self, n: f64) -> bool {
        match self.check {
            NumberCheck::Bound(assertion) => assertion.evaluate(n),
            NumberCheck::Integer => n.fract() == 0.0,
            NumberCheck::Positive => n > 0.0,
            NumberCheck::Negative => n < 0.0,
            NumberCheck::Precision(digits) => decimal_places(n) <= digits,
            NumberCheck::Multiple(base) => {
                let ratio = n / base;
                (ratio - ratio.round()).abs() < EPSILON
            }
            NumberCheck::Port => n.fract() == 0.0 && (0.0..=65535.0).contains(&n),
        }
    }

    fn code(&self) -> &'static str {
        match self.check {
            NumberCheck::Bound(Assertion::GreaterThan(_)) => "number.greater",
            NumberCheck::Bound(Assertion::GreaterThanOrEqual(_)) => "number.min",
            NumberCheck::Bound(Assertion::LessThan(_)) => "number.less",
            NumberCheck::Bound(Assertion::LessThanOrEqual(_)) => "number.max",
            NumberCheck::Integer => "number.integer",
            NumberCheck::Positive => "number.positive",
            NumberCheck::Negative => "number.negative",
            NumberCheck::Precision(_) => "number.precision",
            NumberCheck::Multiple(_) => "number.multiple",
            NumberCheck::Port => "number.port",
        }
    }

    fn limit(&self) -> Option<Value> {
        match self.check {
            NumberCheck::Bound(assertion) => Some(Value::from(assertion.limit())),
            NumberCheck::Precision(digits) => Some(Value::from(digits)),
            NumberCheck::Multiple(base) => Some(Value::from(base)),
            _ => None,
        }
    }
}

/// Counts the decimal places of `n` as written in its shortest representation.
fn decimal_places(n: f64) -> u32 {
    let text = format_number(n);
    let (mantissa, exponent) = match text.split_once(['e', 'E']) {
        Some((m, e)) => (m, e.parse::<i64>().unwrap_or(0)),
        None => (text.as_str(), 0),
    };
    let fraction = mantissa
        .split_once('.')
        .map_or(0, |(_, digits)| digits.len() as i64);
    (fraction - exponent).max(0) as u32
}

/// Largest number of decimal places `precision` accepts.
pub const MAX_PRECISION: u32 = 100;

/// Rounds `n` to `digits` decimal places.
///
/// Returns `n` unchanged when the scaled value leaves the finite range.
pub fn round_to(n: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits.min(MAX_PRECISION) as i32);
    let scaled = n * factor;
    if !scaled.is_finite() {
        return n;
    }
    scaled.round() / factor
}

impl Constraint for NumberConstraint {
    fn evaluate(&self, value: Value, ctx: &EvalContext<'_>) -> Outcome {
        let Some(n) = value.as_f64() else {
            return Ok(value);
        };
        if self.passes(n) {
            return Ok(value);
        }

        let mut context = FailureContext::new().with_value(n);
        if let Some(limit) = self.limit() {
            context.limit = Some(limit);
        }
        Err(ctx.fail(
            FailureKind::OutOfRange,
            self.code(),
            format!("must be {}", self.description()),
            context,
        ))
    }

    fn name(&self) -> &str {
        match self.check {
            NumberCheck::Bound(assertion) => assertion.name(),
            NumberCheck::Integer => "integer",
            NumberCheck::Positive => "positive",
            NumberCheck::Negative => "negative",
            NumberCheck::Precision(_) => "precision",
            NumberCheck::Multiple(_) => "multiple",
            NumberCheck::Port => "port",
        }
    }

    fn description(&self) -> String {
        match self.check {
            NumberCheck::Bound(assertion) => assertion.description(),
            NumberCheck::Integer => "an integer".to_string(),
            NumberCheck::Positive => "a positive number".to_string(),
            NumberCheck::Negative => "a negative number".to_string(),
            NumberCheck::Precision(digits) => {
                format!("a number with no more than {digits} decimal places")
            }
            NumberCheck::Multiple(base) => format!("a multiple of {}", format_number(base)),
            NumberCheck::Port => "a port".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(check: NumberCheck, n: f64) -> Outcome {
        NumberConstraint::new(check).evaluate(Value::from(n), &EvalContext::new("value", true))
    }

    #[test]
    fn test_min_max_bounds() {
        let min = NumberCheck::Bound(Assertion::GreaterThanOrEqual(2.0));
        assert!(eval(min, 2.0).is_ok());
        let failure = eval(min, 1.0).unwrap_err();
        assert_eq!(failure.code(), "number.min");
        assert_eq!(
            failure.message(),
            "\"value\" must be larger than or equal to 2"
        );
        assert_eq!(failure.context().limit, Some(Value::from(2)));
    }

    #[test]
    fn test_integer_and_sign() {
        assert!(eval(NumberCheck::Integer, 4.0).is_ok());
        assert!(eval(NumberCheck::Integer, 4.5).is_err());
        assert!(eval(NumberCheck::Positive, 0.0).is_err());
        assert!(eval(NumberCheck::Negative, -0.5).is_ok());
    }

    #[test]
    fn test_precision() {
        assert!(eval(NumberCheck::Precision(2), 1.25).is_ok());
        assert!(eval(NumberCheck::Precision(2), 1.255).is_err());
        assert!(eval(NumberCheck::Precision(0), 1e22).is_ok());
        assert_eq!(decimal_places(1e-7), 7);
    }

    #[test]
    fn test_multiple() {
        assert!(eval(NumberCheck::Multiple(0.5), 2.5).is_ok());
        let failure = eval(NumberCheck::Multiple(3.0), 10.0).unwrap_err();
        assert_eq!(failure.message(), "\"value\" must be a multiple of 3");
    }

    #[test]
    fn test_port() {
        assert!(eval(NumberCheck::Port, 8080.0).is_ok());
        assert!(eval(NumberCheck::Port, 70000.0).is_err());
        assert!(eval(NumberCheck::Port, 80.5).is_err());
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.256, 2), 1.26);
        assert_eq!(round_to(3.0, 0), 3.0);
    }

    #[test]
    fn test_round_to_keeps_values_it_cannot_scale() {
        assert_eq!(round_to(1e300, 20), 1e300);
        assert!(round_to(1.5, u32::MAX).is_finite());
        assert!(round_to(f64::MAX, 2).is_finite());
    }
}
