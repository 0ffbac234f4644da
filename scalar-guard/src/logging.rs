//! Logging configuration for scalar-guard.
//!
//! The library only emits `tracing` events; it never installs a subscriber on
//! its own. [`LogConfig`] controls how chatty scalar adapters are, and
//! [`setup::init_logging`] is a convenience for binaries that want a ready
//! made subscriber.

use tracing::Level;

/// Per-adapter logging behaviour.
///
/// Validation sits on the request path of an API, so the defaults keep
/// per-value logging off.
#[derive(Debug, Clone, PartialEq)]
pub struct LogConfig {
    /// Level at or below which adapter debug events are emitted
    pub base_level: Level,
    /// Whether to log every rejected value with its failure code
    pub log_constraint_details: bool,
    /// Whether logged events may contain the offending values
    pub log_values: bool,
    /// Maximum length for logged field values
    pub max_field_length: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            base_level: Level::INFO,
            log_constraint_details: false,
            log_values: false,
            max_field_length: 256,
        }
    }
}

impl LogConfig {
    /// Logs every rejection together with the offending value.
    pub fn verbose() -> Self {
        Self {
            base_level: Level::DEBUG,
            log_constraint_details: true,
            log_values: true,
            max_field_length: 1024,
        }
    }

    /// Lowest overhead; values never reach the logs.
    pub fn production() -> Self {
        Self {
            base_level: Level::WARN,
            log_constraint_details: false,
            log_values: false,
            max_field_length: 128,
        }
    }

    /// Renders a value for a log field, honouring `log_values` and
    /// `max_field_length`.
    pub fn render(&self, value: &impl std::fmt::Display) -> String {
        if self.log_values {
            truncate_field(&value.to_string(), self.max_field_length)
        } else {
            "<redacted>".to_string()
        }
    }
}

/// Debug logging that is skipped entirely when the configured level is
/// above `DEBUG`.
#[macro_export]
macro_rules! perf_debug {
    ($config:expr, $($arg:tt)*) => {
        if $config.base_level >= tracing::Level::DEBUG {
            tracing::debug!($($arg)*);
        }
    };
}

/// Logs constraint outcomes when `log_constraint_details` is enabled.
#[macro_export]
macro_rules! log_constraint {
    ($config:expr, $($arg:tt)*) => {
        if $config.log_constraint_details {
            tracing::debug!($($arg)*);
        }
    };
}

/// Truncates a string to at most `max_length` bytes, on a character boundary.
pub fn truncate_field(value: &str, max_length: usize) -> String {
    if value.len() <= max_length {
        return value.to_string();
    }
    let end = value
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|i| *i <= max_length)
        .last()
        .unwrap_or(0);
    format!("{}...(truncated)", &value[..end])
}

/// Subscriber setup for binaries and demos.
pub mod setup {
    use crate::error::{GuardError, Result};
    use tracing::Level;

    /// Configuration for [`init_logging`].
    #[derive(Debug, Clone)]
    pub struct LoggingConfig {
        /// Log level for everything else
        pub level: Level,
        /// Log level for scalar-guard itself
        pub guard_level: Level,
        /// Whether to emit JSON lines instead of text
        pub json_format: bool,
        /// Filter directives replacing the computed ones
        pub env_filter: Option<String>,
    }

    impl Default for LoggingConfig {
        fn default() -> Self {
            Self {
                level: Level::INFO,
                guard_level: Level::INFO,
                json_format: false,
                env_filter: None,
            }
        }
    }

    impl LoggingConfig {
        pub fn production() -> Self {
            Self {
                level: Level::WARN,
                guard_level: Level::WARN,
                json_format: true,
                env_filter: None,
            }
        }

        pub fn development() -> Self {
            Self {
                level: Level::DEBUG,
                guard_level: Level::DEBUG,
                json_format: false,
                env_filter: None,
            }
        }

        pub fn with_level(mut self, level: Level) -> Self {
            self.level = level;
            self
        }

        pub fn with_guard_level(mut self, level: Level) -> Self {
            self.guard_level = level;
            self
        }

        pub fn with_json_format(mut self, enabled: bool) -> Self {
            self.json_format = enabled;
            self
        }

        pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
            self.env_filter = Some(filter.into());
            self
        }

        /// Builds the filter directives, e.g. `info,scalar_guard=debug`.
        pub fn env_filter(&self) -> String {
            match &self.env_filter {
                Some(filter) => filter.clone(),
                None => format!(
                    "{},scalar_guard={}",
                    self.level.as_str().to_lowercase(),
                    self.guard_level.as_str().to_lowercase()
                ),
            }
        }
    }

    /// Installs a global `tracing` subscriber.
    ///
    /// `RUST_LOG`, when set, takes precedence over the configured filter.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a global subscriber is already set.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use scalar_guard::logging::setup::{init_logging, LoggingConfig};
    ///
    /// init_logging(LoggingConfig::development().with_json_format(true)).unwrap();
    /// ```
    pub fn init_logging(config: LoggingConfig) -> Result<()> {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.env_filter()));

        let fmt_layer = if config.json_format {
            tracing_subscriber::fmt::layer().json().boxed()
        } else {
            tracing_subscriber::fmt::layer().boxed()
        };

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| GuardError::configuration(format!("failed to install logger: {e}")))
    }
}
