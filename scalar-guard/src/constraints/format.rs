//! Unified format validation constraint for string patterns.
//!
//! A single [`FormatConstraint`] covers the built-in character classes
//! (alphanumeric, token, hex), structured formats (email, GUID), custom
//! regular expressions, and case/whitespace requirements.
//!
//! Built-in patterns are compiled once and shared. Custom patterns are
//! compiled when the constraint is created so that a broken pattern is
//! reported through the rule rather than on every evaluation.
//!
//! ## Examples
//!
//! ```rust
//! use scalar_guard::constraints::{FormatConstraint, FormatType};
//! use scalar_guard::core::{Constraint, EvalContext};
//! use scalar_guard::value::Value;
//!
//! let ctx = EvalContext::new("value", true);
//! let alphanum = FormatConstraint::new(FormatType::Alphanum);
//! assert!(alphanum.evaluate(Value::from("abc123"), &ctx).is_ok());
//! assert!(alphanum.evaluate(Value::from("@@@"), &ctx).is_err());
//!
//! let code = FormatConstraint::regex(r"^[A-Z]{2}\d{4}$", Some("product code")).unwrap();
//! assert!(code.evaluate(Value::from("AB1234"), &ctx).is_ok());
//! ```

use crate::core::{Constraint, EvalContext, FailureContext, FailureKind, Outcome};
use crate::value::Value;
use once_cell::sync::Lazy;
use regex::Regex;

static ALPHANUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9]+$").unwrap());
static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_]+$").unwrap());
static HEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-fA-F0-9]+$").unwrap());
static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$").unwrap()
});
static GUID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\[{(]?[0-9a-fA-F]{8}-?[0-9a-fA-F]{4}-?[0-9a-fA-F]{4}-?[0-9a-fA-F]{4}-?[0-9a-fA-F]{12}[\]})]?$")
        .unwrap()
});

/// Letter case a string must be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    Lower,
    Upper,
}

impl Case {
    /// Converts `s` into this case.
    pub fn apply(&self, s: &str) -> String {
        match self {
            Case::Lower => s.to_lowercase(),
            Case::Upper => s.to_uppercase(),
        }
    }
}

/// The format a string must match.
#[derive(Debug, Clone)]
pub enum FormatType {
    /// Only ASCII letters and digits
    Alphanum,
    /// Only ASCII letters, digits and underscores
    Token,
    /// Only hexadecimal digits
    Hex,
    /// An email address
    Email,
    /// A GUID, optionally braced
    Guid,
    /// A custom pattern with an optional display name
    Regex { pattern: Regex, name: Option<String> },
    /// A particular letter case
    Case(Case),
    /// No leading or trailing whitespace
    Trim,
}

impl FormatType {
    fn name(&self) -> &str {
        match self {
            FormatType::Alphanum => "alphanum",
            FormatType::Token => "token",
            FormatType::Hex => "hex",
            FormatType::Email => "email",
            FormatType::Guid => "guid",
            FormatType::Regex { .. } => "regex",
            FormatType::Case(Case::Lower) => "lowercase",
            FormatType::Case(Case::Upper) => "uppercase",
            FormatType::Trim => "trim",
        }
    }

    fn code(&self) -> &'static str {
        match self {
            FormatType::Alphanum => "string.alphanum",
            FormatType::Token => "string.token",
            FormatType::Hex => "string.hex",
            FormatType::Email => "string.email",
            FormatType::Guid => "string.guid",
            FormatType::Regex { name: None, .. } => "string.regex.base",
            FormatType::Regex { name: Some(_), .. } => "string.regex.name",
            FormatType::Case(Case::Lower) => "string.lowercase",
            FormatType::Case(Case::Upper) => "string.uppercase",
            FormatType::Trim => "string.trim",
        }
    }

    fn matches(&self, s: &str) -> bool {
        match self {
            FormatType::Alphanum => ALPHANUM.is_match(s),
            FormatType::Token => TOKEN.is_match(s),
            FormatType::Hex => HEX.is_match(s),
            FormatType::Email => EMAIL.is_match(s),
            FormatType::Guid => GUID.is_match(s),
            FormatType::Regex { pattern, .. } => pattern.is_match(s),
            FormatType::Case(case) => case.apply(s) == s,
            FormatType::Trim => s.trim() == s,
        }
    }

    fn requirement(&self, s: &str) -> String {
        match self {
            FormatType::Alphanum => "must only contain alpha-numeric characters".to_string(),
            FormatType::Token => {
                "must only contain alpha-numeric and underscore characters".to_string()
            }
            FormatType::Hex => "must only contain hexadecimal characters".to_string(),
            FormatType::Email => "must be a valid email".to_string(),
            FormatType::Guid => "must be a valid GUID".to_string(),
            FormatType::Regex {
                pattern,
                name: None,
            } => format!(
                "with value \"{s}\" fails to match the required pattern: /{}/",
                pattern.as_str()
            ),
            FormatType::Regex {
                name: Some(name), ..
            } => format!("with value \"{s}\" fails to match the {name} pattern"),
            FormatType::Case(Case::Lower) => "must only contain lowercase characters".to_string(),
            FormatType::Case(Case::Upper) => "must only contain uppercase characters".to_string(),
            FormatType::Trim => "must not have leading or trailing whitespace".to_string(),
        }
    }
}

/// A constraint that checks a string against a [`FormatType`].
#[derive(Debug, Clone)]
pub struct FormatConstraint {
    format: FormatType,
}

impl FormatConstraint {
    pub fn new(format: FormatType) -> Self {
        Self { format }
    }

    /// Creates a custom pattern constraint.
    ///
    /// # Errors
    ///
    /// Returns the regex compilation error message if `pattern` is invalid.
    pub fn regex(pattern: &str, name: Option<&str>) -> Result<Self, String> {
        let pattern = Regex::new(pattern).map_err(|e| format!("invalid pattern: {e}"))?;
        Ok(Self::new(FormatType::Regex {
            pattern,
            name: name.map(str::to_string),
        }))
    }

    pub fn format(&self) -> &FormatType {
        &self.format
    }
}

impl Constraint for FormatConstraint {
    fn evaluate(&self, value: Value, ctx: &EvalContext<'_>) -> Outcome {
        let Some(s) = value.as_str() else {
            return Ok(value);
        };
        if self.format.matches(s) {
            return Ok(value);
        }

        let mut context = FailureContext::new().with_value(s);
        if let FormatType::Regex { pattern, .. } = &self.format {
            context = context.with_pattern(pattern.as_str());
        }
        Err(ctx.fail(
            FailureKind::PatternMismatch,
            self.format.code(),
            self.format.requirement(s),
            context,
        ))
    }

    fn name(&self) -> &str {
        self.format.name()
    }

    fn description(&self) -> String {
        match &self.format {
            FormatType::Regex { pattern, .. } => format!("matches /{}/", pattern.as_str()),
            other => other.name().to_string(),
        }
    }
}
