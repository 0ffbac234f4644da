//! Output coercions applied by [`ScalarAdapter::serialize`] before validation.
//!
//! They mirror the loose conversions a JavaScript-facing API performs when a
//! resolver hands back a value of roughly the right type.
//!
//! [`ScalarAdapter::serialize`]: super::ScalarAdapter::serialize

use crate::core::Kind;
use crate::value::Value;

/// Converts an outgoing value before it is validated.
pub type CoerceFn = fn(Value) -> Value;

/// The coercion used by the built-in scalar of `kind`.
pub fn for_kind(kind: Kind) -> CoerceFn {
    match kind {
        Kind::Any | Kind::Date => identity,
        Kind::Array => to_list,
        Kind::Boolean => to_boolean,
        Kind::Number => to_number,
        Kind::String => to_string,
    }
}

pub fn identity(value: Value) -> Value {
    value
}

/// Lists pass through and strings split into characters; null stays null so
/// the rule can report it. Other scalars become an empty list.
pub fn to_list(value: Value) -> Value {
    match value {
        Value::List(_) | Value::Null => value,
        Value::String(s) => Value::List(s.chars().map(|c| Value::String(c.to_string())).collect()),
        _ => Value::List(Vec::new()),
    }
}

/// Truthiness: false, 0, NaN, null and the empty string are false.
pub fn to_boolean(value: Value) -> Value {
    let truthy = match &value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => *n != 0.0 && !n.is_nan(),
        Value::String(s) => !s.is_empty(),
        Value::Date(_) | Value::List(_) | Value::Object(_) => true,
    };
    Value::Bool(truthy)
}

fn parse_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if let Some(n) = parse_radix(trimmed) {
        return n;
    }
    match trimmed {
        "" => 0.0,
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        _ if trimmed.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') => f64::NAN,
        _ => trimmed.parse().unwrap_or(f64::NAN),
    }
}

/// Unsigned `0x`, `0o` and `0b` literals. Signed or empty ones are NaN.
fn parse_radix(s: &str) -> Option<f64> {
    let radix = match s.get(..2)?.to_ascii_lowercase().as_str() {
        "0x" => 16,
        "0o" => 8,
        "0b" => 2,
        _ => return None,
    };
    let digits = &s[2..];
    if digits.is_empty() {
        return Some(f64::NAN);
    }
    let n = digits
        .chars()
        .try_fold(0.0, |acc: f64, c| {
            c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
        })
        .unwrap_or(f64::NAN);
    Some(n)
}

/// Numeric conversion: null is 0, booleans are 0 or 1, strings are parsed
/// whole (blank is 0, `0x`/`0o`/`0b` prefixes select a radix), dates are
/// milliseconds and a one-item list converts its item. Everything else is NaN.
pub fn to_number(value: Value) -> Value {
    let n = match value {
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(b)),
        Value::Number(n) => n,
        Value::String(s) => parse_number(&s),
        Value::Date(date) => date.timestamp_millis() as f64,
        Value::List(mut items) => match items.len() {
            0 => 0.0,
            1 => match to_number(items.remove(0)) {
                Value::Number(n) => n,
                _ => f64::NAN,
            },
            _ => f64::NAN,
        },
        Value::Object(_) => f64::NAN,
    };
    Value::Number(n)
}

/// String conversion using the value's display form.
pub fn to_string(value: Value) -> Value {
    match value {
        Value::String(_) => value,
        other => Value::String(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_list() {
        assert_eq!(to_list(Value::from(vec![1, 2])), Value::from(vec![1, 2]));
        assert_eq!(to_list(Value::from("ab")), Value::from(vec!["a", "b"]));
        assert_eq!(to_list(Value::Null), Value::Null);
        assert_eq!(to_list(Value::from(5)), Value::List(Vec::new()));
    }

    #[test]
    fn test_to_boolean() {
        assert_eq!(to_boolean(Value::from("Y")), Value::from(true));
        assert_eq!(to_boolean(Value::from("")), Value::from(false));
        assert_eq!(to_boolean(Value::from(0)), Value::from(false));
        assert_eq!(to_boolean(Value::from(f64::NAN)), Value::from(false));
        assert_eq!(to_boolean(Value::Null), Value::from(false));
        assert_eq!(to_boolean(Value::List(Vec::new())), Value::from(true));
    }

    #[test]
    fn test_to_number() {
        assert_eq!(to_number(Value::from("5")), Value::from(5));
        assert_eq!(to_number(Value::from(" 2.5 ")), Value::from(2.5));
        assert_eq!(to_number(Value::from("")), Value::from(0));
        assert_eq!(to_number(Value::from(true)), Value::from(1));
        assert_eq!(to_number(Value::Null), Value::from(0));
        assert_eq!(to_number(Value::from(vec!["7"])), Value::from(7));
        assert_eq!(to_number(Value::from("1e3")), Value::from(1000));
        assert_eq!(to_number(Value::from("-Infinity")), Value::from(f64::NEG_INFINITY));
        assert!(to_number(Value::from("boo")).as_f64().unwrap().is_nan());
        assert!(to_number(Value::from("inf")).as_f64().unwrap().is_nan());
        assert!(to_number(Value::from(vec![1, 2])).as_f64().unwrap().is_nan());
    }

    #[test]
    fn test_to_number_radix_prefixes() {
        assert_eq!(to_number(Value::from("0x10")), Value::from(16));
        assert_eq!(to_number(Value::from("0XfF")), Value::from(255));
        assert_eq!(to_number(Value::from(" 0b101 ")), Value::from(5));
        assert_eq!(to_number(Value::from("0o7")), Value::from(7));
        assert!(to_number(Value::from("0x")).as_f64().unwrap().is_nan());
        assert!(to_number(Value::from("0b2")).as_f64().unwrap().is_nan());
        assert!(to_number(Value::from("-0x10")).as_f64().unwrap().is_nan());
    }

    #[test]
    fn test_to_string() {
        assert_eq!(to_string(Value::from(1)), Value::from("1"));
        assert_eq!(to_string(Value::from(true)), Value::from("true"));
        assert_eq!(to_string(Value::Null), Value::from("null"));
        assert_eq!(to_string(Value::from("roger")), Value::from("roger"));
    }

    #[test]
    fn test_for_kind() {
        assert_eq!(for_kind(Kind::Number)(Value::from("5")), Value::from(5));
        assert_eq!(for_kind(Kind::Date)(Value::from("x")), Value::from("x"));
    }
}
