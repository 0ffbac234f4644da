//! Value-based validation: allowed and invalid sets, and duplicate detection.

use crate::core::{Constraint, EvalContext, FailureContext, FailureKind, Outcome};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An ordered, duplicate-free set of values.
///
/// Used for a rule's allowed and invalid values and for boolean truthy and
/// falsy values. Displays as `[a, b, c]`.
///
/// # Examples
///
/// ```rust
/// use scalar_guard::constraints::ValueSet;
/// use scalar_guard::value::Value;
///
/// let mut set = ValueSet::new();
/// set.add(Value::from("roger"));
/// set.add(Value::from("william"));
/// assert!(set.contains(&Value::from("roger"), false));
/// assert_eq!(set.to_string(), "[roger, william]");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueSet {
    values: Vec<Value>,
}

impl ValueSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value unless an equal one is already present.
    pub fn add(&mut self, value: Value) {
        if !self.values.contains(&value) {
            self.values.push(value);
        }
    }

    pub fn remove(&mut self, value: &Value) {
        self.values.retain(|v| v != value);
    }

    /// Returns true if the set holds `value`; strings compare
    /// case-insensitively when `insensitive` is set.
    pub fn contains(&self, value: &Value, insensitive: bool) -> bool {
        if insensitive {
            self.values.iter().any(|v| v.eq_ignore_case(value))
        } else {
            self.values.contains(value)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

impl fmt::Display for ValueSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items = self
            .values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        write!(f, "[{}]", items.join(", "))
    }
}

impl FromIterator<Value> for ValueSet {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        let mut set = ValueSet::new();
        for value in iter {
            set.add(value);
        }
        set
    }
}

/// A constraint that rejects lists containing the same item twice.
#[derive(Debug, Clone, Default)]
pub struct UniqueItemsConstraint;

impl UniqueItemsConstraint {
    pub fn new() -> Self {
        Self
    }
}

impl Constraint for UniqueItemsConstraint {
    fn evaluate(&self, value: Value, ctx: &EvalContext<'_>) -> Outcome {
        let duplicate = value.as_list().and_then(|items| {
            items
                .iter()
                .enumerate()
                .find(|(i, item)| items[..*i].contains(item))
                .map(|(i, item)| (i, item.clone()))
        });

        match duplicate {
            Some((position, item)) => Err(ctx.fail(
                FailureKind::Duplicate,
                "array.unique",
                format!("position {position} contains a duplicate value"),
                FailureContext::new().with_value(item).with_limit(position),
            )),
            None => Ok(value),
        }
    }

    fn name(&self) -> &str {
        "unique"
    }

    fn description(&self) -> String {
        "unique items".to_string()
    }
}
