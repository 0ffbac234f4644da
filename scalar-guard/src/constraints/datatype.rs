//! Base type checks and conversions for each scalar kind.
//!
//! Every rule starts from a [`BaseType`]. It decides whether an input has the
//! rule's type and, when conversion is enabled, turns compatible inputs into
//! that type (numeric strings into numbers, `"true"` into `true`, JSON array
//! strings into lists and so on).

use super::{round_to, to_date, Case, DateFormat, ValueSet};
use crate::core::{EvalContext, FailureContext, FailureKind, Kind, Outcome};
use crate::value::Value;
use tracing::trace;

/// The type a rule checks values against.
#[derive(Debug, Clone, PartialEq)]
pub enum BaseType {
    /// Any value is accepted as is
    Any,
    /// Strings, optionally case-folded and trimmed during conversion
    String { case: Option<Case>, trim: bool },
    /// Finite numbers, optionally rounded during conversion
    Number { precision: Option<u32> },
    /// Booleans, with extra values that count as true or false
    Boolean {
        truthy: ValueSet,
        falsy: ValueSet,
        insensitive: bool,
    },
    /// Dates in the given input format
    Date { format: DateFormat },
    /// Lists; with `single`, a lone value is wrapped into a list
    Array { single: bool },
}

impl BaseType {
    /// The unconstrained base type for `kind`.
    pub fn for_kind(kind: Kind) -> Self {
        match kind {
            Kind::Any => BaseType::Any,
            Kind::String => BaseType::String {
                case: None,
                trim: false,
            },
            Kind::Number => BaseType::Number { precision: None },
            Kind::Boolean => BaseType::Boolean {
                truthy: ValueSet::new(),
                falsy: ValueSet::new(),
                insensitive: true,
            },
            Kind::Date => BaseType::Date {
                format: DateFormat::default(),
            },
            Kind::Array => BaseType::Array { single: false },
        }
    }

    /// Checks `value` against the base type, converting it when the context
    /// allows conversion.
    pub fn convert(&self, value: Value, ctx: &EvalContext<'_>) -> Outcome {
        match self {
            BaseType::Any => Ok(value),
            BaseType::String { case, trim } => convert_string(value, *case, *trim, ctx),
            BaseType::Number { precision } => convert_number(value, *precision, ctx),
            BaseType::Boolean {
                truthy,
                falsy,
                insensitive,
            } => convert_boolean(value, truthy, falsy, *insensitive, ctx),
            BaseType::Date { format } => convert_date(value, *format, ctx),
            BaseType::Array { single } => convert_array(value, *single, ctx),
        }
    }
}

fn type_mismatch(ctx: &EvalContext<'_>, code: &str, body: &str, value: Value) -> Outcome {
    Err(ctx.fail(
        FailureKind::TypeMismatch,
        code,
        body,
        FailureContext::new().with_value(value),
    ))
}

fn convert_string(value: Value, case: Option<Case>, trim: bool, ctx: &EvalContext<'_>) -> Outcome {
    let Value::String(mut s) = value else {
        return type_mismatch(ctx, "string.base", "must be a string", value);
    };
    if ctx.convert() {
        if let Some(case) = case {
            s = case.apply(&s);
        }
        if trim {
            s = s.trim().to_string();
        }
    }
    Ok(Value::String(s))
}

/// Reads a whole string as a finite number; anything else is NaN.
fn parse_number(s: &str) -> f64 {
    match s.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        _ => f64::NAN,
    }
}

fn convert_number(value: Value, precision: Option<u32>, ctx: &EvalContext<'_>) -> Outcome {
    let n = match &value {
        Value::Number(n) => *n,
        Value::String(s) if ctx.convert() => parse_number(s),
        _ => return type_mismatch(ctx, "number.base", "must be a number", value),
    };
    if n.is_nan() {
        return type_mismatch(ctx, "number.base", "must be a number", value);
    }
    if n.is_infinite() {
        return type_mismatch(ctx, "number.infinity", "cannot be infinity", value);
    }
    match precision {
        Some(digits) if ctx.convert() => Ok(Value::Number(round_to(n, digits))),
        _ => Ok(Value::Number(n)),
    }
}

fn convert_boolean(
    value: Value,
    truthy: &ValueSet,
    falsy: &ValueSet,
    insensitive: bool,
    ctx: &EvalContext<'_>,
) -> Outcome {
    if let Value::Bool(_) = value {
        return Ok(value);
    }
    if let (Value::String(s), true) = (&value, ctx.convert()) {
        let normalized = if insensitive { s.to_lowercase() } else { s.clone() };
        match normalized.as_str() {
            "true" => return Ok(Value::Bool(true)),
            "false" => return Ok(Value::Bool(false)),
            _ => {}
        }
    }
    if truthy.contains(&value, insensitive) {
        Ok(Value::Bool(true))
    } else if falsy.contains(&value, insensitive) {
        Ok(Value::Bool(false))
    } else {
        type_mismatch(ctx, "boolean.base", "must be a boolean", value)
    }
}

fn convert_date(value: Value, format: DateFormat, ctx: &EvalContext<'_>) -> Outcome {
    if let Value::Date(_) = value {
        return Ok(value);
    }
    if !ctx.convert() {
        return type_mismatch(ctx, "date.strict", "must be a valid date", value);
    }
    match to_date(&value, format) {
        Some(date) => Ok(Value::Date(date)),
        None => {
            let (code, body) = format.base_failure();
            type_mismatch(ctx, code, body, value)
        }
    }
}

fn convert_array(value: Value, single: bool, ctx: &EvalContext<'_>) -> Outcome {
    let value = match value {
        Value::String(s) if ctx.convert() => match serde_json::from_str::<serde_json::Value>(&s) {
            Ok(parsed @ serde_json::Value::Array(_)) => {
                trace!(input = %s, "converted JSON array string");
                Value::from(parsed)
            }
            _ => Value::String(s),
        },
        other => other,
    };
    match value {
        Value::List(_) => Ok(value),
        other if single && ctx.convert() => Ok(Value::List(vec![other])),
        other => type_mismatch(ctx, "array.base", "must be an array", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::TimestampUnit;

    fn convert(base: &BaseType, value: impl Into<Value>) -> Outcome {
        base.convert(value.into(), &EvalContext::new("value", true))
    }

    fn strict(base: &BaseType, value: impl Into<Value>) -> Outcome {
        base.convert(value.into(), &EvalContext::new("value", false))
    }

    #[test]
    fn test_string_base() {
        let base = BaseType::for_kind(Kind::String);
        assert_eq!(convert(&base, "roger"), Ok(Value::from("roger")));
        let failure = convert(&base, 5).unwrap_err();
        assert_eq!(failure.code(), "string.base");
        assert_eq!(failure.message(), "\"value\" must be a string");
    }

    #[test]
    fn test_string_case_and_trim_only_when_converting() {
        let base = BaseType::String {
            case: Some(Case::Upper),
            trim: true,
        };
        assert_eq!(convert(&base, "  roger "), Ok(Value::from("ROGER")));
        assert_eq!(strict(&base, "  roger "), Ok(Value::from("  roger ")));
    }

    #[test]
    fn test_number_conversion() {
        let base = BaseType::for_kind(Kind::Number);
        assert_eq!(convert(&base, "5"), Ok(Value::from(5)));
        assert_eq!(convert(&base, " 2.5 "), Ok(Value::from(2.5)));
        assert_eq!(convert(&base, "boo").unwrap_err().code(), "number.base");
        assert_eq!(convert(&base, "").unwrap_err().code(), "number.base");
        assert_eq!(convert(&base, "Infinity").unwrap_err().code(), "number.base");
        assert_eq!(convert(&base, true).unwrap_err().code(), "number.base");
        assert_eq!(
            convert(&base, f64::INFINITY).unwrap_err().code(),
            "number.infinity"
        );
        assert_eq!(strict(&base, "5").unwrap_err().code(), "number.base");
    }

    #[test]
    fn test_number_precision_rounds() {
        let base = BaseType::Number { precision: Some(2) };
        assert_eq!(convert(&base, 1.256), Ok(Value::from(1.26)));
        assert_eq!(strict(&base, 1.256), Ok(Value::from(1.256)));
    }

    #[test]
    fn test_boolean_conversion() {
        let base = BaseType::Boolean {
            truthy: std::iter::once(Value::from("Y")).collect(),
            falsy: std::iter::once(Value::from("N")).collect(),
            insensitive: true,
        };
        assert_eq!(convert(&base, "Y"), Ok(Value::from(true)));
        assert_eq!(convert(&base, "y"), Ok(Value::from(true)));
        assert_eq!(convert(&base, "n"), Ok(Value::from(false)));
        assert_eq!(convert(&base, "TRUE"), Ok(Value::from(true)));
        assert_eq!(convert(&base, true), Ok(Value::from(true)));
        let failure = convert(&base, "boo").unwrap_err();
        assert_eq!(failure.message(), "\"value\" must be a boolean");
    }

    #[test]
    fn test_boolean_sensitive() {
        let base = BaseType::Boolean {
            truthy: ValueSet::new(),
            falsy: ValueSet::new(),
            insensitive: false,
        };
        assert_eq!(convert(&base, "true"), Ok(Value::from(true)));
        assert!(convert(&base, "TRUE").is_err());
        assert!(strict(&base, "true").is_err());
    }

    #[test]
    fn test_date_conversion() {
        let base = BaseType::for_kind(Kind::Date);
        let converted = convert(&base, "1000").unwrap();
        assert_eq!(converted.as_date().unwrap().timestamp_millis(), 1000);
        let failure = convert(&base, "Infinity").unwrap_err();
        assert_eq!(failure.code(), "date.base");
        assert_eq!(
            failure.message(),
            "\"value\" must be a number of milliseconds or valid date string"
        );
        assert_eq!(strict(&base, 1000).unwrap_err().code(), "date.strict");
    }

    #[test]
    fn test_date_format_codes() {
        let iso = BaseType::Date {
            format: DateFormat::Iso,
        };
        assert_eq!(convert(&iso, 1000).unwrap_err().code(), "date.isoDate");

        let unix = BaseType::Date {
            format: DateFormat::Timestamp(TimestampUnit::Unix),
        };
        let converted = convert(&unix, 2).unwrap();
        assert_eq!(converted.as_date().unwrap().timestamp_millis(), 2000);
        assert_eq!(
            convert(&unix, "2020-01-01").unwrap_err().code(),
            "date.timestamp.unix"
        );
    }

    #[test]
    fn test_array_conversion() {
        let base = BaseType::for_kind(Kind::Array);
        assert_eq!(
            convert(&base, "[1, \"a\"]"),
            Ok(Value::from(vec![Value::from(1), Value::from("a")]))
        );
        let failure = convert(&base, "boo").unwrap_err();
        assert_eq!(failure.code(), "array.base");
        assert_eq!(failure.message(), "\"value\" must be an array");
        assert!(strict(&base, "[1]").is_err());
    }

    #[test]
    fn test_array_single_wraps() {
        let base = BaseType::Array { single: true };
        assert_eq!(convert(&base, "boo"), Ok(Value::from(vec!["boo"])));
        assert!(strict(&base, "boo").is_err());
    }
}
