//! Unified length constraint for strings and lists.
//!
//! String length is measured the way a JavaScript runtime measures it: in
//! UTF-16 code units, or in bytes of a given encoding when one is supplied
//! (`min: [2, "utf8"]`). List length is the number of items.

use crate::core::{Constraint, EvalContext, FailureContext, FailureKind, Outcome};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Types of length assertions that can be made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LengthAssertion {
    /// Length must be at least this
    Min(usize),
    /// Length must be at most this
    Max(usize),
    /// Length must be exactly this
    Exactly(usize),
}

impl LengthAssertion {
    fn evaluate(&self, length: usize) -> bool {
        match self {
            LengthAssertion::Min(min) => length >= *min,
            LengthAssertion::Max(max) => length <= *max,
            LengthAssertion::Exactly(len) => length == *len,
        }
    }

    /// Returns the constraint name for this assertion.
    pub fn name(&self) -> &'static str {
        match self {
            LengthAssertion::Min(_) => "min",
            LengthAssertion::Max(_) => "max",
            LengthAssertion::Exactly(_) => "length",
        }
    }

    pub fn limit(&self) -> usize {
        match self {
            LengthAssertion::Min(n) | LengthAssertion::Max(n) | LengthAssertion::Exactly(n) => *n,
        }
    }

    fn bound(&self) -> String {
        match self {
            LengthAssertion::Min(min) => format!("at least {min}"),
            LengthAssertion::Max(max) => format!("less than or equal to {max}"),
            LengthAssertion::Exactly(len) => len.to_string(),
        }
    }
}

impl fmt::Display for LengthAssertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.bound())
    }
}

/// What a length is counted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LengthTarget {
    /// Characters of a string
    Characters,
    /// Items of a list
    Items,
}

/// Byte encodings a string length can be measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    Utf8,
    Ucs2,
    Latin1,
    Ascii,
}

impl Encoding {
    /// Returns the byte length of `s` in this encoding.
    pub fn byte_len(&self, s: &str) -> usize {
        match self {
            Encoding::Utf8 => s.len(),
            Encoding::Ucs2 => s.encode_utf16().count() * 2,
            Encoding::Latin1 | Encoding::Ascii => s.encode_utf16().count(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Encoding::Utf8 => "utf8",
            Encoding::Ucs2 => "ucs2",
            Encoding::Latin1 => "latin1",
            Encoding::Ascii => "ascii",
        }
    }
}

impl FromStr for Encoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Ok(Encoding::Utf8),
            "ucs2" | "ucs-2" | "utf16le" | "utf-16le" => Ok(Encoding::Ucs2),
            "latin1" | "binary" => Ok(Encoding::Latin1),
            "ascii" => Ok(Encoding::Ascii),
            other => Err(format!("unknown encoding '{other}'")),
        }
    }
}

/// A constraint that checks the length of a string or a list.
///
/// # Examples
///
/// ```rust
/// use scalar_guard::constraints::{Encoding, LengthConstraint};
/// use scalar_guard::core::{Constraint, EvalContext};
/// use scalar_guard::value::Value;
///
/// let ctx = EvalContext::new("value", true);
/// let constraint = LengthConstraint::min(2).with_encoding(Some(Encoding::Utf8));
/// assert!(constraint.evaluate(Value::from("é"), &ctx).is_ok());
/// assert!(constraint.evaluate(Value::from("e"), &ctx).is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LengthConstraint {
    assertion: LengthAssertion,
    target: LengthTarget,
    encoding: Option<Encoding>,
}

impl LengthConstraint {
    /// Creates a new string length constraint.
    pub fn new(assertion: LengthAssertion) -> Self {
        Self {
            assertion,
            target: LengthTarget::Characters,
            encoding: None,
        }
    }

    pub fn min(min_length: usize) -> Self {
        Self::new(LengthAssertion::Min(min_length))
    }

    pub fn max(max_length: usize) -> Self {
        Self::new(LengthAssertion::Max(max_length))
    }

    pub fn exactly(length: usize) -> Self {
        Self::new(LengthAssertion::Exactly(length))
    }

    /// Counts list items instead of string characters.
    pub fn items(mut self) -> Self {
        self.target = LengthTarget::Items;
        self
    }

    /// Measures strings in bytes of the given encoding.
    pub fn with_encoding(mut self, encoding: Option<Encoding>) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn assertion(&self) -> LengthAssertion {
        self.assertion
    }

    fn measure(&self, value: &Value) -> Option<usize> {
        match (self.target, value) {
            (LengthTarget::Characters, Value::String(s)) => Some(match self.encoding {
                Some(encoding) => encoding.byte_len(s),
                None => s.encode_utf16().count(),
            }),
            (LengthTarget::Items, Value::List(items)) => Some(items.len()),
            _ => None,
        }
    }

    fn code(&self) -> String {
        let prefix = match self.target {
            LengthTarget::Characters => "string",
            LengthTarget::Items => "array",
        };
        format!("{prefix}.{}", self.assertion.name())
    }
}

impl Constraint for LengthConstraint {
    fn evaluate(&self, value: Value, ctx: &EvalContext<'_>) -> Outcome {
        let Some(length) = self.measure(&value) else {
            return Ok(value);
        };
        if self.assertion.evaluate(length) {
            return Ok(value);
        }

        let context = FailureContext::new()
            .with_limit(self.assertion.limit())
            .with_value(value);
        Err(ctx.fail(
            FailureKind::OutOfRange,
            &self.code(),
            self.description(),
            context,
        ))
    }

    fn name(&self) -> &str {
        self.assertion.name()
    }

    fn description(&self) -> String {
        match self.target {
            LengthTarget::Characters => {
                format!("length must be {} characters long", self.assertion)
            }
            LengthTarget::Items => format!("must contain {} items", self.assertion),
        }
    }
}
