//! Rendering validation failures for API responses and logs.
//!
//! # Examples
//!
//! ```rust
//! use scalar_guard::formatters::{FailureFormatter, FormatterConfig, HumanFormatter, JsonFormatter};
//! use scalar_guard::core::{compile, ConstraintOptions, Kind};
//! use scalar_guard::value::Value;
//!
//! let rule = compile(Kind::Number, &ConstraintOptions::new().with("max", 10));
//! let failure = rule.validate(Value::from(12)).unwrap_err();
//!
//! let text = HumanFormatter::new().format(&failure).unwrap();
//! assert!(text.starts_with("\"value\" must be less than or equal to 10"));
//!
//! let json = JsonFormatter::with_config(FormatterConfig::minimal()).format(&failure).unwrap();
//! assert!(json.contains("\"message\""));
//! ```

use crate::core::ValidationFailure;
use crate::error::Result;
use crate::logging::truncate_field;
use serde_json::json;
use std::fmt::Write;

/// Which parts of a failure are rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatterConfig {
    /// Include the machine-readable failure code
    pub include_code: bool,
    /// Include the limit, offending value, allowed values and pattern
    pub include_context: bool,
    /// Maximum length of rendered values
    pub max_value_length: usize,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            include_code: true,
            include_context: false,
            max_value_length: 256,
        }
    }
}

impl FormatterConfig {
    /// The message only.
    pub fn minimal() -> Self {
        Self {
            include_code: false,
            include_context: false,
            max_value_length: 64,
        }
    }

    /// Everything known about the failure.
    pub fn detailed() -> Self {
        Self {
            include_code: true,
            include_context: true,
            max_value_length: 1024,
        }
    }

    pub fn with_code(mut self, include: bool) -> Self {
        self.include_code = include;
        self
    }

    pub fn with_context(mut self, include: bool) -> Self {
        self.include_context = include;
        self
    }

    pub fn with_max_value_length(mut self, max: usize) -> Self {
        self.max_value_length = max;
        self
    }
}

/// Renders a [`ValidationFailure`] into a string.
pub trait FailureFormatter {
    /// Formats with the formatter's own configuration.
    fn format(&self, failure: &ValidationFailure) -> Result<String>;

    fn format_with_config(
        &self,
        failure: &ValidationFailure,
        config: &FormatterConfig,
    ) -> Result<String>;
}

/// JSON output, suitable for the `extensions` of an API error.
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    config: FormatterConfig,
    pretty: bool,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FormatterConfig) -> Self {
        Self {
            config,
            pretty: false,
        }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl FailureFormatter for JsonFormatter {
    fn format(&self, failure: &ValidationFailure) -> Result<String> {
        self.format_with_config(failure, &self.config)
    }

    fn format_with_config(
        &self,
        failure: &ValidationFailure,
        config: &FormatterConfig,
    ) -> Result<String> {
        let mut output = json!({
            "message": failure.message(),
            "label": failure.label(),
            "kind": failure.kind(),
        });
        if config.include_code {
            output["code"] = json!(failure.code());
        }
        if config.include_context {
            let mut context = serde_json::to_value(failure.context())?;
            if let Some(value) = context.get_mut("value") {
                if let Some(text) = value.as_str() {
                    *value = json!(truncate_field(text, config.max_value_length));
                }
            }
            output["context"] = context;
        }

        let rendered = if self.pretty {
            serde_json::to_string_pretty(&output)?
        } else {
            serde_json::to_string(&output)?
        };
        Ok(rendered)
    }
}

/// Plain text output for terminals and logs.
#[derive(Debug, Clone, Default)]
pub struct HumanFormatter {
    config: FormatterConfig,
}

impl HumanFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FormatterConfig) -> Self {
        Self { config }
    }
}

impl FailureFormatter for HumanFormatter {
    fn format(&self, failure: &ValidationFailure) -> Result<String> {
        self.format_with_config(failure, &self.config)
    }

    fn format_with_config(
        &self,
        failure: &ValidationFailure,
        config: &FormatterConfig,
    ) -> Result<String> {
        let mut output = failure.message().to_string();
        if config.include_code {
            let _ = write!(output, " [{}]", failure.code());
        }
        if config.include_context {
            let context = failure.context();
            if let Some(value) = &context.value {
                let _ = write!(
                    output,
                    "\n  value: {}",
                    truncate_field(&value.to_string(), config.max_value_length)
                );
            }
            if let Some(limit) = &context.limit {
                let _ = write!(output, "\n  limit: {limit}");
            }
            if let Some(valids) = &context.valids {
                let items: Vec<String> = valids.iter().map(ToString::to_string).collect();
                let _ = write!(output, "\n  values: [{}]", items.join(", "));
            }
            if let Some(pattern) = &context.pattern {
                let _ = write!(output, "\n  pattern: /{pattern}/");
            }
            if let Some(constraint) = &context.constraint {
                let _ = write!(output, "\n  constraint: {constraint}");
            }
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FailureContext, FailureKind};
    use crate::value::Value;

    fn failure() -> ValidationFailure {
        ValidationFailure::new(
            FailureKind::NotAllowed,
            "any.allowOnly",
            "name",
            "must be one of [roger, william]",
            FailureContext::new()
                .with_value("sarah")
                .with_valids(vec![Value::from("roger"), Value::from("william")]),
        )
    }

    #[test]
    fn test_formatter_config() {
        let minimal = FormatterConfig::minimal();
        assert!(!minimal.include_code);
        assert!(!minimal.include_context);

        let detailed = FormatterConfig::detailed();
        assert!(detailed.include_context);

        let custom = FormatterConfig::default().with_code(false).with_max_value_length(8);
        assert!(!custom.include_code);
        assert_eq!(custom.max_value_length, 8);
    }

    #[test]
    fn test_human_formatter() {
        let text = HumanFormatter::new().format(&failure()).unwrap();
        assert_eq!(text, "\"name\" must be one of [roger, william] [any.allowOnly]");

        let detailed = HumanFormatter::with_config(FormatterConfig::detailed())
            .format(&failure())
            .unwrap();
        assert!(detailed.contains("\n  value: sarah"));
        assert!(detailed.contains("\n  values: [roger, william]"));
    }

    #[test]
    fn test_json_formatter() {
        let output = JsonFormatter::with_config(FormatterConfig::detailed())
            .format(&failure())
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["code"], "any.allowOnly");
        assert_eq!(parsed["kind"], "not_allowed");
        assert_eq!(parsed["context"]["value"], "sarah");
        assert_eq!(parsed["context"]["valids"], json!(["roger", "william"]));
    }

    #[test]
    fn test_json_formatter_minimal() {
        let output = JsonFormatter::with_config(FormatterConfig::minimal())
            .format(&failure())
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert!(parsed.get("code").is_none());
        assert!(parsed.get("context").is_none());
    }

    #[test]
    fn test_json_value_truncation() {
        let config = FormatterConfig::detailed().with_max_value_length(3);
        let output = JsonFormatter::new()
            .format_with_config(&failure(), &config)
            .unwrap();
        assert!(output.contains("sar...(truncated)"));
    }
}
