//! The scalar adapter: a named custom scalar backed by a compiled rule.
//!
//! An execution layer calls three entry points on a scalar:
//!
//! - [`ScalarAdapter::serialize`] for outgoing values. The value is coerced
//!   first and a failure is *returned* as [`Serialized::Invalid`].
//! - [`ScalarAdapter::parse_value`] and [`ScalarAdapter::parse_literal`] for
//!   incoming variables and literals. A failure is an `Err`.
//!
//! Both parse entry points write the validated value back into the
//! [`LiteralNode`] they were given.

use super::coerce::CoerceFn;
use crate::core::{compile, ConstraintOptions, Kind, Rule, ValidationFailure};
use crate::error::Result;
use crate::logging::LogConfig;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// An input literal as handed over by the execution layer.
///
/// List literals carry their items in `values`; every other literal carries
/// its value in `value`. A missing `value` is an absent input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiteralNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<Value>>,
}

impl LiteralNode {
    /// A node holding a single value.
    pub fn value(value: impl Into<Value>) -> Self {
        Self {
            value: Some(value.into()),
            values: None,
        }
    }

    /// A list literal.
    pub fn list(values: Vec<Value>) -> Self {
        Self {
            value: None,
            values: Some(values),
        }
    }

    /// A node without a value.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// The outcome of [`ScalarAdapter::serialize`].
#[must_use]
#[derive(Debug, Clone, PartialEq)]
pub enum Serialized {
    /// The coerced value passed validation
    Valid(Value),
    /// The coerced value was rejected
    Invalid(ValidationFailure),
}

impl Serialized {
    pub fn is_valid(&self) -> bool {
        matches!(self, Serialized::Valid(_))
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            Serialized::Valid(value) => Some(value),
            Serialized::Invalid(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&ValidationFailure> {
        match self {
            Serialized::Valid(_) => None,
            Serialized::Invalid(failure) => Some(failure),
        }
    }

    pub fn into_result(self) -> std::result::Result<Value, ValidationFailure> {
        match self {
            Serialized::Valid(value) => Ok(value),
            Serialized::Invalid(failure) => Err(failure),
        }
    }
}

/// The scalar contract of a query-execution layer.
pub trait ScalarType: Send + Sync {
    /// The scalar's type name.
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Prepares an outgoing value; failures are returned, not raised.
    fn serialize(&self, value: Value) -> Serialized;

    /// Validates an incoming variable value.
    fn parse_value(&self, node: &mut LiteralNode) -> Result<Option<Value>>;

    /// Validates an incoming inline literal.
    fn parse_literal(&self, node: &mut LiteralNode) -> Result<Option<Value>>;
}

/// A custom scalar validated by a compiled [`Rule`].
///
/// Adapters are immutable after construction and can be shared between
/// threads.
///
/// # Examples
///
/// ```rust
/// use scalar_guard::core::{ConstraintOptions, Kind};
/// use scalar_guard::scalar::{coerce, LiteralNode, ScalarAdapter};
/// use scalar_guard::value::Value;
///
/// let options = ConstraintOptions::new().with("min", 2).with("max", 10);
/// let adapter = ScalarAdapter::new("Age", Kind::Number, coerce::to_number, &options);
///
/// let mut node = LiteralNode::value("5");
/// assert_eq!(adapter.parse_literal(&mut node).unwrap(), Some(Value::from(5)));
/// assert_eq!(node.value, Some(Value::from(5)));
///
/// assert!(!adapter.serialize(Value::from(12)).is_valid());
/// ```
#[derive(Debug, Clone)]
pub struct ScalarAdapter {
    name: String,
    description: String,
    kind: Kind,
    rule: Rule,
    coerce: CoerceFn,
    log_config: LogConfig,
}

impl ScalarAdapter {
    /// Compiles `options` for `kind` and wraps the rule. The description
    /// defaults to the name.
    #[instrument(skip_all, fields(kind = %kind, option_count = options.len()))]
    pub fn new(
        name: impl Into<String>,
        kind: Kind,
        coerce: CoerceFn,
        options: &ConstraintOptions,
    ) -> Self {
        let name = name.into();
        let rule = compile(kind, options);
        debug!(
            scalar = %name,
            constraints = rule.constraints().len(),
            issues = rule.issues().len(),
            "created scalar adapter"
        );
        Self {
            description: name.clone(),
            name,
            kind,
            rule,
            coerce,
            log_config: LogConfig::default(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_log_config(mut self, log_config: LogConfig) -> Self {
        self.log_config = log_config;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    pub fn log_config(&self) -> &LogConfig {
        &self.log_config
    }

    /// Coerces and validates an outgoing value.
    pub fn serialize(&self, value: Value) -> Serialized {
        let coerced = (self.coerce)(value);
        match self.check(Some(coerced)) {
            Ok(validated) => Serialized::Valid(validated.unwrap_or(Value::Null)),
            Err(failure) => Serialized::Invalid(failure),
        }
    }

    /// Validates an incoming variable, writing the result back into `node`.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::Validation`](crate::GuardError::Validation) if
    /// the value fails the rule; `node` is then left unchanged.
    pub fn parse_value(&self, node: &mut LiteralNode) -> Result<Option<Value>> {
        self.validate_node(node)
    }

    /// Validates an inline literal, writing the result back into `node`.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::Validation`](crate::GuardError::Validation) if
    /// the value fails the rule; `node` is then left unchanged.
    pub fn parse_literal(&self, node: &mut LiteralNode) -> Result<Option<Value>> {
        self.validate_node(node)
    }

    #[instrument(level = "debug", skip_all, fields(scalar = %self.name))]
    fn validate_node(&self, node: &mut LiteralNode) -> Result<Option<Value>> {
        if let Some(values) = &node.values {
            let validated = self.check(Some(Value::List(values.clone())))?;
            return Ok(match validated {
                Some(Value::List(items)) => {
                    node.values = Some(items.clone());
                    Some(Value::List(items))
                }
                other => {
                    node.values = None;
                    node.value = other.clone();
                    other
                }
            });
        }

        let validated = self.check(node.value.clone())?;
        node.value = validated.clone();
        Ok(validated)
    }

    fn check(&self, input: Option<Value>) -> std::result::Result<Option<Value>, ValidationFailure> {
        match self.rule.attempt(input) {
            Ok(validated) => {
                crate::perf_debug!(self.log_config, scalar = %self.name, "value accepted");
                Ok(validated)
            }
            Err(failure) => {
                let value = failure
                    .context()
                    .value
                    .as_ref()
                    .map(|value| self.log_config.render(value))
                    .unwrap_or_default();
                crate::log_constraint!(
                    self.log_config,
                    scalar = %self.name,
                    code = failure.code(),
                    value = %value,
                    "value rejected"
                );
                Err(failure)
            }
        }
    }
}

impl ScalarType for ScalarAdapter {
    fn name(&self) -> &str {
        ScalarAdapter::name(self)
    }

    fn description(&self) -> &str {
        ScalarAdapter::description(self)
    }

    fn serialize(&self, value: Value) -> Serialized {
        ScalarAdapter::serialize(self, value)
    }

    fn parse_value(&self, node: &mut LiteralNode) -> Result<Option<Value>> {
        ScalarAdapter::parse_value(self, node)
    }

    fn parse_literal(&self, node: &mut LiteralNode) -> Result<Option<Value>> {
        ScalarAdapter::parse_literal(self, node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FailureKind;
    use crate::scalar::coerce;

    fn adapter(kind: Kind, options: serde_json::Value) -> ScalarAdapter {
        let options = ConstraintOptions::try_from(options).unwrap();
        ScalarAdapter::new("Test", kind, coerce::for_kind(kind), &options)
    }

    #[test]
    fn test_description_defaults_to_name() {
        let scalar = adapter(Kind::Any, serde_json::json!({}));
        assert_eq!(scalar.name(), "Test");
        assert_eq!(scalar.description(), "Test");
        let scalar = scalar.with_description("A test scalar");
        assert_eq!(ScalarType::description(&scalar), "A test scalar");
    }

    #[test]
    fn test_serialize_returns_failures() {
        let scalar = adapter(Kind::Number, serde_json::json!({"max": 10}));
        assert_eq!(scalar.serialize(Value::from("5")), Serialized::Valid(Value::from(5)));

        let result = scalar.serialize(Value::from(12));
        assert!(!result.is_valid());
        assert_eq!(result.failure().map(|f| f.code()), Some("number.max"));
    }

    #[test]
    fn test_serialize_null_through_any() {
        let scalar = adapter(Kind::Any, serde_json::json!({}));
        assert_eq!(scalar.serialize(Value::Null), Serialized::Valid(Value::Null));
    }

    #[test]
    fn test_parse_errors_leave_node_untouched() {
        let scalar = adapter(Kind::String, serde_json::json!({"min": 2}));
        let mut node = LiteralNode::value("a");
        let err = scalar.parse_literal(&mut node).unwrap_err();
        assert_eq!(
            err.as_validation().map(|f| f.kind()),
            Some(FailureKind::OutOfRange)
        );
        assert_eq!(node, LiteralNode::value("a"));
    }

    #[test]
    fn test_parse_value_writes_back() {
        let scalar = adapter(Kind::Boolean, serde_json::json!({"truthy": "Y"}));
        let mut node = LiteralNode::value("Y");
        assert_eq!(scalar.parse_value(&mut node).unwrap(), Some(Value::from(true)));
        assert_eq!(node.value, Some(Value::from(true)));
    }

    #[test]
    fn test_list_literals_validate_as_one_list() {
        let scalar = adapter(Kind::Array, serde_json::json!({"length": 1}));
        let mut node = LiteralNode::list(vec![Value::from("roger")]);
        let parsed = scalar.parse_literal(&mut node).unwrap();
        assert_eq!(parsed, Some(Value::from(vec!["roger"])));
        assert_eq!(node.values, Some(vec![Value::from("roger")]));

        let mut node = LiteralNode::list(vec![Value::from("a"), Value::from("b")]);
        assert!(scalar.parse_literal(&mut node).is_err());
        assert_eq!(node.values.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn test_missing_value() {
        let optional = adapter(Kind::String, serde_json::json!({}));
        let mut node = LiteralNode::empty();
        assert_eq!(optional.parse_value(&mut node).unwrap(), None);

        let required = adapter(Kind::String, serde_json::json!({"required": true}));
        assert!(required.parse_value(&mut LiteralNode::empty()).is_err());
    }

    #[test]
    fn test_adapters_are_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ScalarAdapter>();
    }
}
