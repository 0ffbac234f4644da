//! Composed validation rules.
//!
//! A [`Rule`] is a base type plus flags, allowed and invalid value sets and an
//! ordered list of constraints. Rules are built by value: every builder method
//! consumes the rule and returns the extended one, so a rule can be threaded
//! through a sequence of constraint applications.

use super::{
    Constraint, ConstraintMetadata, EvalContext, FailureContext, FailureKind, Kind,
    ValidationFailure,
};
use crate::constraints::{BaseType, ValueSet};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const DEFAULT_LABEL: &str = "value";

/// Whether a value must, may or must not be present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    #[default]
    Optional,
    Required,
    Forbidden,
}

/// A constraint that could not be applied because of its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentIssue {
    pub constraint: String,
    pub message: String,
}

/// A composed validator for one scalar kind.
///
/// Validation runs in a fixed order and stops at the first failure:
///
/// 1. argument issues recorded while building the rule
/// 2. presence (`required`, `optional` with default, `forbidden`)
/// 3. the allowed set, then the invalid set, against the input
/// 4. the base type check and conversion
/// 5. the allowed and invalid sets again, against the converted value
/// 6. `valid` (allowed values only)
/// 7. constraints, in the order they were added
///
/// # Examples
///
/// ```rust
/// use scalar_guard::core::{Kind, Rule};
/// use scalar_guard::value::Value;
///
/// let rule = Rule::base(Kind::Any).valid(vec![Value::from("roger"), Value::from("william")]);
/// assert!(rule.validate(Value::from("roger")).is_ok());
///
/// let failure = rule.validate(Value::from("sarah")).unwrap_err();
/// assert_eq!(failure.message(), "\"value\" must be one of [roger, william]");
/// ```
#[derive(Debug, Clone)]
pub struct Rule {
    kind: Kind,
    base: BaseType,
    presence: Presence,
    label: Option<String>,
    description: Option<String>,
    convert: bool,
    raw: bool,
    allow_only: bool,
    insensitive: bool,
    valids: ValueSet,
    invalids: ValueSet,
    default: Option<Value>,
    constraints: Vec<Arc<dyn Constraint>>,
    issues: Vec<ArgumentIssue>,
}

impl Rule {
    /// The unconstrained rule for `kind`.
    ///
    /// String rules reject the empty string until it is explicitly allowed.
    pub fn base(kind: Kind) -> Self {
        let mut invalids = ValueSet::new();
        if kind == Kind::String {
            invalids.add(Value::from(""));
        }
        Self {
            kind,
            base: BaseType::for_kind(kind),
            presence: Presence::default(),
            label: None,
            description: None,
            convert: true,
            raw: false,
            allow_only: false,
            insensitive: kind == Kind::Boolean,
            valids: ValueSet::new(),
            invalids,
            default: None,
            constraints: Vec::new(),
            issues: Vec::new(),
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn presence(&self) -> Presence {
        self.presence
    }

    /// The label failure messages start with; `value` unless set.
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(DEFAULT_LABEL)
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_strict(&self) -> bool {
        !self.convert
    }

    pub fn base_type(&self) -> &BaseType {
        &self.base
    }

    /// Mutable access to the base type, for constraints that adjust conversion.
    pub fn base_type_mut(&mut self) -> &mut BaseType {
        &mut self.base
    }

    pub fn issues(&self) -> &[ArgumentIssue] {
        &self.issues
    }

    /// Metadata for the attached constraints, in evaluation order.
    pub fn constraints(&self) -> Vec<ConstraintMetadata> {
        self.constraints.iter().map(|c| c.metadata()).collect()
    }

    /// Adds values that are accepted without further checks.
    pub fn allow(mut self, values: impl IntoIterator<Item = Value>) -> Self {
        for value in values {
            self.invalids.remove(&value);
            self.valids.add(value);
        }
        self
    }

    /// Accepts only the given values.
    pub fn valid(mut self, values: impl IntoIterator<Item = Value>) -> Self {
        self = self.allow(values);
        self.allow_only = true;
        self
    }

    /// Rejects the given values.
    pub fn invalid(mut self, values: impl IntoIterator<Item = Value>) -> Self {
        for value in values {
            self.valids.remove(&value);
            self.invalids.add(value);
        }
        self
    }

    pub fn required(mut self) -> Self {
        self.presence = Presence::Required;
        self
    }

    pub fn optional(mut self) -> Self {
        self.presence = Presence::Optional;
        self
    }

    pub fn forbidden(mut self) -> Self {
        self.presence = Presence::Forbidden;
        self
    }

    /// The value produced when an optional value is missing.
    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Disables (or re-enables) conversion of inputs.
    pub fn strict(mut self, enabled: bool) -> Self {
        self.convert = !enabled;
        self
    }

    /// Returns the original input instead of the converted value on success.
    pub fn raw(mut self, enabled: bool) -> Self {
        self.raw = enabled;
        self
    }

    /// Compares allowed, invalid, truthy and falsy strings ignoring case.
    pub fn insensitive(mut self, enabled: bool) -> Self {
        self.insensitive = enabled;
        if let BaseType::Boolean { insensitive, .. } = &mut self.base {
            *insensitive = enabled;
        }
        self
    }

    /// Appends a constraint; constraints run in the order they are added.
    pub fn constrain(mut self, constraint: impl Constraint + 'static) -> Self {
        self.constraints.push(Arc::new(constraint));
        self
    }

    /// Records that `constraint` was given unusable parameters. The rule then
    /// rejects every value with an `any.argument` failure.
    pub fn argument_issue(mut self, constraint: &str, message: impl Into<String>) -> Self {
        self.issues.push(ArgumentIssue {
            constraint: constraint.to_string(),
            message: message.into(),
        });
        self
    }

    fn context(&self) -> EvalContext<'_> {
        EvalContext::new(self.label(), self.convert)
    }

    /// Validates a possibly missing value.
    ///
    /// Returns the validated value, or `None` when an optional value without
    /// a default is missing.
    pub fn attempt(&self, input: Option<Value>) -> Result<Option<Value>, ValidationFailure> {
        let ctx = self.context();
        if let Some(issue) = self.issues.first() {
            return Err(ctx.fail(
                FailureKind::InvalidArgument,
                "any.argument",
                format!(
                    "cannot be validated: invalid argument for {}: {}",
                    issue.constraint, issue.message
                ),
                FailureContext::new().with_constraint(issue.constraint.as_str()),
            ));
        }

        let value = match (input, self.presence) {
            (None, Presence::Required) => {
                return Err(ctx.fail(
                    FailureKind::Required,
                    "any.required",
                    "is required",
                    FailureContext::new(),
                ))
            }
            (None, _) => return Ok(self.default.clone()),
            (Some(value), Presence::Forbidden) => {
                return Err(ctx.fail(
                    FailureKind::Forbidden,
                    "any.unknown",
                    "is not allowed",
                    FailureContext::new().with_value(value),
                ))
            }
            (Some(value), _) => value,
        };

        self.check(value, &ctx).map(Some)
    }

    /// Validates a present value.
    pub fn validate(&self, value: Value) -> Result<Value, ValidationFailure> {
        self.attempt(Some(value))
            .map(|validated| validated.unwrap_or(Value::Null))
    }

    fn check(&self, value: Value, ctx: &EvalContext<'_>) -> Result<Value, ValidationFailure> {
        let original = self.raw.then(|| value.clone());
        let finish = |validated: Value| original.clone().unwrap_or(validated);

        if self.valids.contains(&value, self.insensitive) {
            return Ok(finish(value));
        }
        self.reject_invalid(&value, ctx)?;

        let value = self.base.convert(value, ctx)?;
        if self.valids.contains(&value, self.insensitive) {
            return Ok(finish(value));
        }
        self.reject_invalid(&value, ctx)?;

        if self.allow_only {
            return Err(ctx.fail(
                FailureKind::NotAllowed,
                "any.allowOnly",
                format!("must be one of {}", self.valids),
                FailureContext::new()
                    .with_value(value)
                    .with_valids(self.valids.values().to_vec()),
            ));
        }

        let mut value = value;
        for constraint in &self.constraints {
            value = constraint.evaluate(value, ctx)?;
        }
        Ok(finish(value))
    }

    fn reject_invalid(&self, value: &Value, ctx: &EvalContext<'_>) -> Result<(), ValidationFailure> {
        if !self.invalids.contains(value, self.insensitive) {
            return Ok(());
        }
        let (code, body) = match value {
            Value::String(s) if s.is_empty() => ("any.empty", "is not allowed to be empty"),
            _ => ("any.invalid", "contains an invalid value"),
        };
        Err(ctx.fail(
            FailureKind::NotAllowed,
            code,
            body,
            FailureContext::new()
                .with_value(value.clone())
                .with_valids(self.invalids.values().to_vec()),
        ))
    }

    /// A serializable summary of the rule.
    pub fn describe(&self) -> RuleDescription {
        RuleDescription {
            kind: self.kind,
            presence: self.presence,
            label: self.label.clone(),
            description: self.description.clone(),
            strict: !self.convert,
            raw: self.raw,
            only: self.allow_only,
            insensitive: self.insensitive,
            valids: self.valids.values().to_vec(),
            invalids: self.invalids.values().to_vec(),
            default: self.default.clone(),
            constraints: self.constraints(),
            issues: self.issues.clone(),
        }
    }
}

/// The shape of a [`Rule`], as returned by [`Rule::describe`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDescription {
    pub kind: Kind,
    pub presence: Presence,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub strict: bool,
    pub raw: bool,
    pub only: bool,
    pub insensitive: bool,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub valids: Vec<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub invalids: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    pub constraints: Vec<ConstraintMetadata>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub issues: Vec<ArgumentIssue>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::{LengthConstraint, UniqueItemsConstraint};

    #[test]
    fn test_presence() {
        let optional = Rule::base(Kind::String);
        assert_eq!(optional.attempt(None), Ok(None));

        let defaulted = Rule::base(Kind::String).default_value(Value::from("roger"));
        assert_eq!(defaulted.attempt(None), Ok(Some(Value::from("roger"))));

        let required = Rule::base(Kind::String).required();
        let failure = required.attempt(None).unwrap_err();
        assert_eq!(failure.kind(), FailureKind::Required);
        assert_eq!(failure.message(), "\"value\" is required");

        let forbidden = Rule::base(Kind::Any).forbidden();
        assert_eq!(forbidden.attempt(None), Ok(None));
        assert_eq!(
            forbidden.validate(Value::from(1)).unwrap_err().code(),
            "any.unknown"
        );
    }

    #[test]
    fn test_allowed_values_skip_type_check() {
        let rule = Rule::base(Kind::Number).allow(vec![Value::Null]);
        assert_eq!(rule.validate(Value::Null), Ok(Value::Null));
        assert_eq!(
            rule.validate(Value::from("x")).unwrap_err().code(),
            "number.base"
        );
    }

    #[test]
    fn test_valid_mixed_values() {
        let rule = Rule::base(Kind::Any).valid(vec![
            Value::from("roger"),
            Value::from("william"),
            Value::from(true),
        ]);
        assert_eq!(rule.validate(Value::from(true)), Ok(Value::from(true)));
        let failure = rule.validate(Value::from("sarah")).unwrap_err();
        assert_eq!(failure.code(), "any.allowOnly");
        assert!(failure.message().contains("[roger, william, true]"));
    }

    #[test]
    fn test_valid_matches_converted_value() {
        let rule = Rule::base(Kind::Number).valid(vec![Value::from(5)]);
        assert_eq!(rule.validate(Value::from("5")), Ok(Value::from(5)));
    }

    #[test]
    fn test_empty_string_rejected_unless_allowed() {
        let rule = Rule::base(Kind::String);
        let failure = rule.validate(Value::from("")).unwrap_err();
        assert_eq!(failure.code(), "any.empty");
        assert_eq!(failure.message(), "\"value\" is not allowed to be empty");

        let rule = Rule::base(Kind::String).allow(vec![Value::from("")]);
        assert_eq!(rule.validate(Value::from("")), Ok(Value::from("")));
    }

    #[test]
    fn test_invalid_values() {
        let rule = Rule::base(Kind::Number).invalid(vec![Value::from(13)]);
        assert_eq!(
            rule.validate(Value::from("13")).unwrap_err().code(),
            "any.invalid"
        );
        assert!(rule.validate(Value::from(12)).is_ok());
    }

    #[test]
    fn test_insensitive_valids() {
        let rule = Rule::base(Kind::String)
            .valid(vec![Value::from("Roger")])
            .insensitive(true);
        assert!(rule.validate(Value::from("ROGER")).is_ok());
    }

    #[test]
    fn test_constraints_run_in_order() {
        let rule = Rule::base(Kind::String)
            .constrain(LengthConstraint::min(2))
            .constrain(LengthConstraint::max(3));
        assert_eq!(rule.validate(Value::from("a")).unwrap_err().code(), "string.min");
        assert_eq!(
            rule.validate(Value::from("abcd")).unwrap_err().code(),
            "string.max"
        );
        assert_eq!(rule.validate(Value::from("abc")), Ok(Value::from("abc")));
    }

    #[test]
    fn test_strict_and_raw() {
        let strict = Rule::base(Kind::Number).strict(true);
        assert!(strict.validate(Value::from("5")).is_err());

        let raw = Rule::base(Kind::Number).raw(true);
        assert_eq!(raw.validate(Value::from("5")), Ok(Value::from("5")));
    }

    #[test]
    fn test_argument_issue_rejects_everything() {
        let rule = Rule::base(Kind::String).argument_issue("min", "limit must be a positive integer");
        let failure = rule.validate(Value::from("roger")).unwrap_err();
        assert_eq!(failure.kind(), FailureKind::InvalidArgument);
        assert_eq!(failure.context().constraint.as_deref(), Some("min"));
        assert!(rule.attempt(None).is_err());
    }

    #[test]
    fn test_label() {
        let rule = Rule::base(Kind::Number).with_label("age").required();
        assert_eq!(rule.attempt(None).unwrap_err().message(), "\"age\" is required");
    }

    #[test]
    fn test_describe() {
        let rule = Rule::base(Kind::Array)
            .constrain(LengthConstraint::min(2).items())
            .constrain(UniqueItemsConstraint::new())
            .required()
            .with_description("tags");
        let description = rule.describe();
        assert_eq!(description.kind, Kind::Array);
        assert_eq!(description.presence, Presence::Required);
        assert_eq!(description.description.as_deref(), Some("tags"));
        let names: Vec<_> = description.constraints.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["min", "unique"]);

        let json = serde_json::to_value(&description).unwrap();
        assert_eq!(json["kind"], "array");
        assert_eq!(json["presence"], "required");
    }
}
