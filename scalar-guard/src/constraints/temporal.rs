//! Date parsing and date bound constraints.
//!
//! Dates are accepted as [`Value::Date`], as millisecond (or, with the unix
//! timestamp format, second) timestamps given as numbers or numeric strings,
//! and as ISO 8601 strings. Bounds may be fixed instants or `"now"`, which is
//! resolved every time a value is validated.

use super::Assertion;
use crate::core::{Constraint, EvalContext, FailureContext, FailureKind, Outcome};
use crate::value::{format_date, Value};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

static NUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*[+-]?\d+(\.\d+)?\s*$").unwrap());

/// The unit of numeric timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampUnit {
    /// Milliseconds since the epoch
    Javascript,
    /// Seconds since the epoch
    Unix,
}

impl TimestampUnit {
    fn multiplier(&self) -> f64 {
        match self {
            TimestampUnit::Javascript => 1.0,
            TimestampUnit::Unix => 1000.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimestampUnit::Javascript => "javascript",
            TimestampUnit::Unix => "unix",
        }
    }
}

/// Which inputs a date rule accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateFormat {
    /// Timestamps in milliseconds and ISO strings
    #[default]
    Any,
    /// ISO 8601 strings only
    Iso,
    /// Numeric timestamps only, in the given unit
    Timestamp(TimestampUnit),
}

impl DateFormat {
    /// The failure code and message used when a value is not a date.
    pub fn base_failure(&self) -> (&'static str, &'static str) {
        match self {
            DateFormat::Any => (
                "date.base",
                "must be a number of milliseconds or valid date string",
            ),
            DateFormat::Iso => ("date.isoDate", "must be a valid ISO 8601 date"),
            DateFormat::Timestamp(TimestampUnit::Javascript) => (
                "date.timestamp.javascript",
                "must be a valid timestamp or number of milliseconds",
            ),
            DateFormat::Timestamp(TimestampUnit::Unix) => (
                "date.timestamp.unix",
                "must be a valid timestamp or number of seconds",
            ),
        }
    }
}

fn from_timestamp(n: f64, unit: TimestampUnit) -> Option<DateTime<Utc>> {
    let millis = n * unit.multiplier();
    if !millis.is_finite() {
        return None;
    }
    DateTime::<Utc>::from_timestamp_millis(millis.trunc() as i64)
}

/// Parses an ISO 8601 date or date-time; naive values are taken as UTC.
pub fn parse_iso(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(s) {
        return Some(date.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Converts a value into a date according to `format`.
///
/// Returns `None` when the value cannot be read as a date.
pub fn to_date(value: &Value, format: DateFormat) -> Option<DateTime<Utc>> {
    let unit = match format {
        DateFormat::Timestamp(unit) => unit,
        _ => TimestampUnit::Javascript,
    };
    match value {
        Value::Date(date) => Some(*date),
        Value::Number(n) if format != DateFormat::Iso => from_timestamp(*n, unit),
        Value::String(s) if NUMERIC.is_match(s) => match format {
            DateFormat::Iso => None,
            _ => s.trim().parse::<f64>().ok().and_then(|n| from_timestamp(n, unit)),
        },
        Value::String(s) => match format {
            DateFormat::Timestamp(_) => None,
            _ => parse_iso(s),
        },
        _ => None,
    }
}

/// A date bound: a fixed instant or the moment of validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateLimit {
    Now,
    At(DateTime<Utc>),
}

impl DateLimit {
    /// Reads a limit from a constraint parameter: `"now"`, a millisecond
    /// timestamp, an ISO string or a date.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if s.eq_ignore_ascii_case("now") => Some(DateLimit::Now),
            other => to_date(other, DateFormat::Any).map(DateLimit::At),
        }
    }

    pub fn resolve(&self) -> DateTime<Utc> {
        match self {
            DateLimit::Now => Utc::now(),
            DateLimit::At(date) => *date,
        }
    }
}

impl fmt::Display for DateLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateLimit::Now => f.write_str("now"),
            DateLimit::At(date) => f.write_str(&format_date(date)),
        }
    }
}

/// The comparison a [`DateConstraint`] makes against its limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateComparison {
    Min,
    Max,
    Greater,
    Less,
}

/// A constraint that bounds a date.
///
/// # Examples
///
/// ```rust
/// use scalar_guard::constraints::{DateComparison, DateConstraint, DateLimit};
/// use scalar_guard::core::{Constraint, EvalContext};
/// use scalar_guard::value::Value;
/// use chrono::{TimeZone, Utc};
///
/// let limit = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
/// let max = DateConstraint::new(DateComparison::Max, DateLimit::At(limit));
/// let ctx = EvalContext::new("birthday", true);
///
/// assert!(max.evaluate(Value::from(limit), &ctx).is_ok());
/// let later = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
/// assert!(max.evaluate(Value::from(later), &ctx).is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateConstraint {
    comparison: DateComparison,
    limit: DateLimit,
}

impl DateConstraint {
    pub fn new(comparison: DateComparison, limit: DateLimit) -> Self {
        Self { comparison, limit }
    }

    fn assertion(&self, limit: &DateTime<Utc>) -> Assertion {
        let millis = limit.timestamp_millis() as f64;
        match self.comparison {
            DateComparison::Min => Assertion::GreaterThanOrEqual(millis),
            DateComparison::Max => Assertion::LessThanOrEqual(millis),
            DateComparison::Greater => Assertion::GreaterThan(millis),
            DateComparison::Less => Assertion::LessThan(millis),
        }
    }

    fn code(&self) -> &'static str {
        match self.comparison {
            DateComparison::Min => "date.min",
            DateComparison::Max => "date.max",
            DateComparison::Greater => "date.greater",
            DateComparison::Less => "date.less",
        }
    }
}

fn render_millis(millis: f64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis as i64)
        .map(|date| format!("\"{}\"", format_date(&date)))
        .unwrap_or_else(|| millis.to_string())
}

impl Constraint for DateConstraint {
    fn evaluate(&self, value: Value, ctx: &EvalContext<'_>) -> Outcome {
        let Some(date) = value.as_date().copied() else {
            return Ok(value);
        };
        let limit = self.limit.resolve();
        let assertion = self.assertion(&limit);
        if assertion.evaluate(date.timestamp_millis() as f64) {
            return Ok(value);
        }

        Err(ctx.fail(
            FailureKind::OutOfRange,
            self.code(),
            format!("must be {}", assertion.describe_with(render_millis)),
            FailureContext::new().with_limit(limit).with_value(date),
        ))
    }

    fn name(&self) -> &str {
        match self.comparison {
            DateComparison::Min => "min",
            DateComparison::Max => "max",
            DateComparison::Greater => "greater",
            DateComparison::Less => "less",
        }
    }

    fn description(&self) -> String {
        let relation = match self.comparison {
            DateComparison::Min => "on or after",
            DateComparison::Max => "on or before",
            DateComparison::Greater => "after",
            DateComparison::Less => "before",
        };
        format!("{relation} {}", self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_timestamps() {
        let date = to_date(&Value::from(1_000i64), DateFormat::Any).unwrap();
        assert_eq!(date.timestamp_millis(), 1_000);

        let date = to_date(&Value::from("1000"), DateFormat::Any).unwrap();
        assert_eq!(date.timestamp_millis(), 1_000);

        let date = to_date(
            &Value::from(2i64),
            DateFormat::Timestamp(TimestampUnit::Unix),
        )
        .unwrap();
        assert_eq!(date.timestamp_millis(), 2_000);
    }

    #[test]
    fn test_iso_strings() {
        let expected = Utc.with_ymd_and_hms(2020, 5, 17, 10, 30, 0).unwrap();
        assert_eq!(parse_iso("2020-05-17T10:30:00Z"), Some(expected));
        assert_eq!(parse_iso("2020-05-17T12:30:00+02:00"), Some(expected));
        assert_eq!(parse_iso("2020-05-17T10:30:00"), Some(expected));
        assert_eq!(
            parse_iso("2020-05-17"),
            Some(Utc.with_ymd_and_hms(2020, 5, 17, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_rejects_non_dates() {
        assert_eq!(to_date(&Value::from("Infinity"), DateFormat::Any), None);
        assert_eq!(to_date(&Value::from(f64::INFINITY), DateFormat::Any), None);
        assert_eq!(to_date(&Value::from(true), DateFormat::Any), None);
        assert_eq!(to_date(&Value::from("1000"), DateFormat::Iso), None);
        assert_eq!(
            to_date(
                &Value::from("2020-05-17"),
                DateFormat::Timestamp(TimestampUnit::Javascript)
            ),
            None
        );
    }

    #[test]
    fn test_limit_from_value() {
        assert_eq!(DateLimit::from_value(&Value::from("now")), Some(DateLimit::Now));
        assert!(matches!(
            DateLimit::from_value(&Value::from(0)),
            Some(DateLimit::At(_))
        ));
        assert_eq!(DateLimit::from_value(&Value::from("tomorrow")), None);
    }

    #[test]
    fn test_max_failure_message() {
        let limit = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let constraint = DateConstraint::new(DateComparison::Max, DateLimit::At(limit));
        let failure = constraint
            .evaluate(
                Value::from(limit + Duration::milliseconds(100)),
                &EvalContext::new("value", true),
            )
            .unwrap_err();
        assert_eq!(failure.code(), "date.max");
        assert_eq!(
            failure.message(),
            "\"value\" must be less than or equal to \"2020-01-01T00:00:00.000Z\""
        );
    }

    #[test]
    fn test_now_is_resolved_per_call() {
        let constraint = DateConstraint::new(DateComparison::Less, DateLimit::Now);
        let ctx = EvalContext::new("value", true);
        let past = Utc::now() - Duration::seconds(5);
        let future = Utc::now() + Duration::hours(1);
        assert!(constraint.evaluate(Value::from(past), &ctx).is_ok());
        assert!(constraint.evaluate(Value::from(future), &ctx).is_err());
    }
}
