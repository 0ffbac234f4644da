//! Primitive scalar kinds.

use crate::error::GuardError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The primitive validation category of a scalar.
///
/// Each kind has its own base rule and its own table of constraints; see
/// [`crate::core::compiler`].
///
/// # Examples
///
/// ```rust
/// use scalar_guard::core::Kind;
///
/// let kind: Kind = "string".parse().unwrap();
/// assert_eq!(kind, Kind::String);
/// assert_eq!(kind.to_string(), "string");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// Accepts any value
    Any,
    /// Lists of values
    Array,
    /// Booleans, with configurable truthy and falsy values
    Boolean,
    /// Points in time
    Date,
    /// Finite numbers
    Number,
    /// Strings
    String,
}

impl Kind {
    /// All kinds in declaration order.
    pub const ALL: [Kind; 6] = [
        Kind::Any,
        Kind::Array,
        Kind::Boolean,
        Kind::Date,
        Kind::Number,
        Kind::String,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Any => "any",
            Kind::Array => "array",
            Kind::Boolean => "boolean",
            Kind::Date => "date",
            Kind::Number => "number",
            Kind::String => "string",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = GuardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Kind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| GuardError::configuration(format!("unknown scalar kind '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_names() {
        for kind in Kind::ALL {
            assert_eq!(kind.as_str().parse::<Kind>().unwrap(), kind);
        }
        assert_eq!("Number".parse::<Kind>().unwrap(), Kind::Number);
    }

    #[test]
    fn test_unknown_kind() {
        let err = "object".parse::<Kind>().unwrap_err();
        assert!(err.to_string().contains("unknown scalar kind 'object'"));
    }

    #[test]
    fn test_serde_lowercase() {
        let kind: Kind = serde_json::from_str("\"date\"").unwrap();
        assert_eq!(kind, Kind::Date);
        assert_eq!(serde_json::to_string(&Kind::Array).unwrap(), "\"array\"");
    }
}
