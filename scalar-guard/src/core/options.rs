//! Ordered constraint options and positional constraint parameters.

use crate::error::GuardError;
use crate::value::Value;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// An ordered mapping from constraint names to parameters.
///
/// Order matters: constraints are applied, and therefore evaluated, in the
/// order they appear. Deserializing from a JSON object keeps the document
/// order.
///
/// # Examples
///
/// ```rust
/// use scalar_guard::core::ConstraintOptions;
/// use scalar_guard::value::Value;
///
/// let options = ConstraintOptions::new()
///     .with("min", vec![Value::from(2), Value::from("utf8")])
///     .with("max", 10);
///
/// let names: Vec<&str> = options.iter().map(|(name, _)| name).collect();
/// assert_eq!(names, vec!["min", "max"]);
///
/// let parsed: ConstraintOptions = serde_json::from_str(r#"{"max": 10, "min": 2}"#).unwrap();
/// assert_eq!(parsed.iter().next().map(|(name, _)| name), Some("max"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct ConstraintOptions {
    entries: Vec<(String, Value)>,
}

impl ConstraintOptions {
    /// Creates an empty set of options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a constraint parameter, replacing an earlier value for the same
    /// name in place.
    pub fn with(mut self, name: impl Into<String>, params: impl Into<Value>) -> Self {
        self.insert(name, params);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, params: impl Into<Value>) {
        let name = name.into();
        let params = params.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = params,
            None => self.entries.push((name, params)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, params)| params)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries
            .iter()
            .map(|(name, params)| (name.as_str(), params))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ConstraintOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut options = ConstraintOptions::new();
        for (name, params) in iter {
            options.insert(name, params);
        }
        options
    }
}

impl TryFrom<serde_json::Value> for ConstraintOptions {
    type Error = GuardError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::Null => Ok(ConstraintOptions::new()),
            serde_json::Value::Object(map) => Ok(map.into_iter().collect()),
            other => Err(GuardError::configuration(format!(
                "constraint options must be a JSON object, got {other}"
            ))),
        }
    }
}

impl Serialize for ConstraintOptions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, params) in &self.entries {
            map.serialize_entry(name, params)?;
        }
        map.end()
    }
}

/// The positional arguments of one constraint.
///
/// A list option is spread into positional slots (`min: [2, "utf8"]` is
/// `min(2, "utf8")`); any other option is the sole argument.
#[derive(Debug, Clone, Copy)]
pub struct Params<'a> {
    args: &'a [Value],
}

impl<'a> Params<'a> {
    pub fn from_option(option: &'a Value) -> Self {
        let args = match option {
            Value::List(items) => items.as_slice(),
            single => std::slice::from_ref(single),
        };
        Self { args }
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&'a Value> {
        self.args.get(index)
    }

    /// All arguments, for constraints that take a variable number of values.
    pub fn values(&self) -> &'a [Value] {
        self.args
    }

    fn required(&self, index: usize, what: &str) -> Result<&'a Value, String> {
        self.get(index)
            .ok_or_else(|| format!("missing {what} at position {index}"))
    }

    /// A finite number.
    pub fn number(&self, index: usize) -> Result<f64, String> {
        match self.required(index, "number")? {
            Value::Number(n) if n.is_finite() => Ok(*n),
            other => Err(format!("expected a finite number, got {}", other.type_name())),
        }
    }

    /// A non-negative integer, such as a length limit.
    pub fn count(&self, index: usize) -> Result<usize, String> {
        match self.required(index, "limit")? {
            Value::Number(n) if n.is_finite() && *n >= 0.0 && n.fract() == 0.0 => Ok(*n as usize),
            other => Err(format!("limit must be a positive integer, got {other}")),
        }
    }

    pub fn string(&self, index: usize) -> Result<&'a str, String> {
        match self.required(index, "string")? {
            Value::String(s) => Ok(s),
            other => Err(format!("expected a string, got {}", other.type_name())),
        }
    }

    /// A string that may be missing or null.
    pub fn optional_string(&self, index: usize) -> Result<Option<&'a str>, String> {
        match self.get(index) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(other) => Err(format!("expected a string, got {}", other.type_name())),
        }
    }

    /// An on/off switch; a missing or null argument means on.
    pub fn flag(&self, index: usize) -> Result<bool, String> {
        match self.get(index) {
            None | Some(Value::Null) => Ok(true),
            Some(Value::Bool(enabled)) => Ok(*enabled),
            Some(other) => Err(format!("expected a boolean, got {}", other.type_name())),
        }
    }
}
