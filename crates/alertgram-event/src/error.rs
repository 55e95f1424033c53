//! Error types for the alertgram-event crate.

use thiserror::Error;

/// Errors raised while validating an incoming notification event.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EventError {
    /// A required field was not supplied or was empty.
    #[error("missing required field: {field}")]
    MissingField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// A value could not be mapped onto one of the known enum variants.
    #[error("invalid {kind}: '{value}'")]
    InvalidValue {
        /// The kind of value being parsed (e.g. "host state").
        kind: &'static str,
        /// The rejected input.
        value: String,
    },

    /// The timestamp is outside the range representable as a date.
    #[error("timestamp out of range: {0}")]
    TimestampOutOfRange(i64),

    /// The strftime-style format string is malformed.
    #[error("invalid time format: '{0}'")]
    InvalidTimeFormat(String),

    /// The monitoring console URL could not be parsed.
    #[error("invalid console URL '{url}': {reason}")]
    InvalidConsoleUrl {
        /// The rejected URL.
        url: String,
        /// Why parsing failed.
        reason: String,
    },
}

/// Result type for event operations.
pub type Result<T> = std::result::Result<T, EventError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_missing_field() {
        let err = EventError::MissingField { field: "hostname" };
        assert_eq!(err.to_string(), "missing required field: hostname");
    }

    #[test]
    fn error_display_invalid_value() {
        let err = EventError::InvalidValue {
            kind: "host state",
            value: "SIDEWAYS".to_string(),
        };
        assert_eq!(err.to_string(), "invalid host state: 'SIDEWAYS'");
    }

    #[test]
    fn error_display_invalid_console_url() {
        let err = EventError::InvalidConsoleUrl {
            url: "nope".to_string(),
            reason: "relative URL without a base".to_string(),
        };
        assert!(err.to_string().contains("invalid console URL 'nope'"));
    }
}
