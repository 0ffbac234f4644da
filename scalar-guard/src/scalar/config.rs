//! Declarative scalar definitions.
//!
//! A schema can declare its custom scalars in JSON instead of code:
//!
//! ```json
//! {
//!   "scalars": [
//!     { "name": "Username", "kind": "string", "options": { "alphanum": true, "min": 3 } },
//!     { "name": "Age", "kind": "number", "options": { "integer": true, "min": 0 } }
//!   ]
//! }
//! ```
//!
//! Option *values* stay tolerant (unknown names are skipped), but a document
//! that is malformed, names an unknown kind or defines a scalar twice is a
//! configuration error.

use super::adapter::ScalarAdapter;
use super::coerce;
use crate::core::{ConstraintOptions, Kind};
use crate::error::{ErrorContext, GuardError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, instrument};

/// One custom scalar: its name, kind and constraint options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarDefinition {
    pub name: String,
    pub kind: Kind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub options: ConstraintOptions,
}

impl ScalarDefinition {
    pub fn new(name: impl Into<String>, kind: Kind) -> Self {
        Self {
            name: name.into(),
            kind,
            description: None,
            options: ConstraintOptions::new(),
        }
    }

    pub fn with_options(mut self, options: ConstraintOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Compiles the definition into an adapter using the kind's coercion.
    pub fn build(&self) -> ScalarAdapter {
        let adapter = ScalarAdapter::new(
            self.name.as_str(),
            self.kind,
            coerce::for_kind(self.kind),
            &self.options,
        );
        match &self.description {
            Some(description) => adapter.with_description(description.as_str()),
            None => adapter,
        }
    }
}

#[derive(Deserialize)]
struct DefinitionDocument {
    scalars: Vec<ScalarDefinition>,
}

/// Adapters built from scalar definitions, keyed by name.
///
/// # Examples
///
/// ```rust
/// use scalar_guard::scalar::{LiteralNode, ScalarRegistry};
///
/// let registry = ScalarRegistry::from_json(
///     r#"{"scalars": [{"name": "Username", "kind": "string", "options": {"alphanum": true}}]}"#,
/// )
/// .unwrap();
///
/// let username = registry.get("Username").unwrap();
/// assert!(username.parse_literal(&mut LiteralNode::value("roger1")).is_ok());
/// assert!(username.parse_literal(&mut LiteralNode::value("@@@")).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScalarRegistry {
    scalars: BTreeMap<String, ScalarAdapter>,
}

impl ScalarRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds every definition.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if two definitions share a name.
    #[instrument(skip_all)]
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = ScalarDefinition>,
    ) -> Result<Self> {
        let mut registry = Self::new();
        for definition in definitions {
            registry.register(definition.build())?;
        }
        info!(scalars = registry.len(), "built scalar registry");
        Ok(registry)
    }

    /// Parses a `{"scalars": [...]}` document and builds every definition.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for malformed JSON, unknown kinds and
    /// duplicate names.
    pub fn from_json(json: &str) -> Result<Self> {
        let document: DefinitionDocument =
            serde_json::from_str(json).context("invalid scalar definitions")?;
        Self::from_definitions(document.scalars)
    }

    /// Adds an adapter.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the name is already registered.
    pub fn register(&mut self, adapter: ScalarAdapter) -> Result<()> {
        if self.scalars.contains_key(adapter.name()) {
            return Err(GuardError::configuration(format!(
                "duplicate scalar '{}'",
                adapter.name()
            )));
        }
        self.scalars.insert(adapter.name().to_string(), adapter);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ScalarAdapter> {
        self.scalars.get(name)
    }

    pub fn len(&self) -> usize {
        self.scalars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scalars.is_empty()
    }

    /// Scalar names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.scalars.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScalarAdapter> {
        self.scalars.values()
    }
}
