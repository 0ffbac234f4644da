//! Error types for the scalar-guard library.
//!
//! Every fallible operation in the crate reports a [`GuardError`]. Validation
//! failures carry the full [`ValidationFailure`] so an execution layer can
//! translate them into a user-facing response without re-parsing messages.

use crate::core::ValidationFailure;
use thiserror::Error;

/// The main error type for the scalar-guard library.
#[derive(Error, Debug)]
pub enum GuardError {
    /// A value did not satisfy the compiled rule of a scalar.
    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    /// Scalar definitions or logging setup could not be applied.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A document could not be serialized or deserialized.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// A type alias for `Result<T, GuardError>`.
///
/// # Examples
///
/// ```rust
/// use scalar_guard::error::Result;
///
/// fn load() -> Result<()> {
///     Ok(())
/// }
/// ```
pub type Result<T> = std::result::Result<T, GuardError>;

impl GuardError {
    /// Creates a new configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates a new serialization error.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Returns the validation failure if this error wraps one.
    pub fn as_validation(&self) -> Option<&ValidationFailure> {
        match self {
            Self::Validation(failure) => Some(failure),
            _ => None,
        }
    }

    /// Returns true if this error is a validation failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<serde_json::Error> for GuardError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Extension trait for adding context to errors.
pub trait ErrorContext<T> {
    /// Adds context to an error.
    fn context(self, msg: &str) -> Result<T>;

    /// Adds context with a lazy message.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<GuardError>,
{
    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|e| wrap(msg, e.into()))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| wrap(&f(), e.into()))
    }
}

// Validation failures keep their structure; everything else becomes a
// configuration error carrying the prefix.
fn wrap(msg: &str, err: GuardError) -> GuardError {
    match err {
        GuardError::Validation(failure) => GuardError::Validation(failure),
        GuardError::Configuration(inner) | GuardError::Serialization(inner) => {
            GuardError::Configuration(format!("{msg}: {inner}"))
        }
    }
}
