//! # Cloud Event Errors
//!
//! Two failure categories reach callers of the parser:
//!
//! - **Parsing**: the text is not well-formed JSON, or a valid tree cannot
//!   be bound to the requested type, or (on the write path) conversion or
//!   re-validation failed. Carries the offending input and its cause.
//! - **Validation**: well-formed JSON that breaks one or more schema
//!   constraints. Carries every violation, in engine order.
//!
//! Schema load failures are a third, construction-time category; see
//! [`cce_schema::SchemaLoadError`].

use cce_schema::ValidationViolations;
use thiserror::Error;

/// Why a parsing-category failure happened.
#[derive(Error, Debug)]
pub enum ParsingCause {
    /// Syntax error, or the tree does not bind to the requested type.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// The value produced on the write path does not satisfy the schema.
    #[error("schema violations:\n{0}")]
    Schema(ValidationViolations),
}

/// Failure to parse, validate or serialize a cloud event.
#[derive(Error, Debug)]
pub enum CloudEventError {
    /// Malformed input, or a conversion failure.
    #[error("{message}: {source}")]
    Parsing {
        /// What was being attempted and on which input.
        message: String,
        /// The offending input: JSON text, or the rendered value on the write path.
        input: String,
        /// Underlying cause.
        source: ParsingCause,
    },

    /// Well-formed JSON that does not conform to the event schema.
    #[error("{message}:\n{violations}")]
    Validation {
        /// What was being attempted and on which input.
        message: String,
        /// Every violation found.
        violations: ValidationViolations,
    },
}

impl CloudEventError {
    pub(crate) fn parsing(
        message: &str,
        input: impl Into<String>,
        source: impl Into<ParsingCause>,
    ) -> Self {
        let input = input.into();
        Self::Parsing {
            message: format!("{message} for: {input}"),
            input,
            source: source.into(),
        }
    }

    pub(crate) fn validation(message: &str, input: &str, violations: ValidationViolations) -> Self {
        Self::Validation {
            message: format!("{message} for: {input}"),
            violations,
        }
    }

    /// True for parsing-category failures.
    pub fn is_parsing(&self) -> bool {
        matches!(self, Self::Parsing { .. })
    }

    /// True for validation-category failures.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Schema violations behind this error, from either category.
    pub fn violations(&self) -> Option<&ValidationViolations> {
        match self {
            Self::Validation { violations, .. } => Some(violations),
            Self::Parsing {
                source: ParsingCause::Schema(violations),
                ..
            } => Some(violations),
            Self::Parsing { .. } => None,
        }
    }

    /// The input the failure refers to, when one was recorded.
    pub fn input(&self) -> Option<&str> {
        match self {
            Self::Parsing { input, .. } => Some(input),
            Self::Validation { .. } => None,
        }
    }
}

impl From<ValidationViolations> for ParsingCause {
    fn from(violations: ValidationViolations) -> Self {
        Self::Schema(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cce_schema::Violation;

    fn violations() -> ValidationViolations {
        ValidationViolations::new(vec![Violation {
            instance_path: String::new(),
            schema_path: "/required".to_string(),
            message: r#""time" is a required property"#.to_string(),
        }])
    }

    #[test]
    fn test_parsing_error_keeps_input_and_cause() {
        let cause = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = CloudEventError::parsing("Cloud event parsing failed", "{", cause);
        assert!(err.is_parsing());
        assert_eq!(err.input(), Some("{"));
        assert!(err.violations().is_none());
        assert!(err.to_string().starts_with("Cloud event parsing failed for: {"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_validation_error_lists_violations() {
        let err = CloudEventError::validation("Cloud event validation failed", "{}", violations());
        assert!(err.is_validation());
        assert_eq!(err.violations().map(|v| v.len()), Some(1));
        assert!(err.to_string().contains("\"time\" is a required property"));
    }

    #[test]
    fn test_parsing_error_wrapping_violations() {
        let err = CloudEventError::parsing("Cloud event serialization failed", "{}", violations());
        assert!(err.is_parsing());
        assert_eq!(err.violations().map(|v| v.len()), Some(1));
    }
}
