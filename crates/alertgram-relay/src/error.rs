//! Error types for the alertgram-relay crate.

use std::time::Duration;

use alertgram_ledger::LedgerError;
use thiserror::Error;

/// Errors reported by a messaging transport.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The messaging API rejected the request.
    #[error("messaging API error: {description}")]
    Api {
        /// Description returned by the API.
        description: String,
    },

    /// The request did not reach the messaging API or timed out.
    #[error("network error: {0}")]
    Network(String),

    /// The API answered with something that could not be decoded.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Errors reported by the monitoring control API.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MonitoringError {
    /// The credentials were rejected.
    #[error("monitoring API rejected credentials")]
    Unauthorized,

    /// No object matched the acknowledgement filter.
    #[error("no matching object for filter: {filter}")]
    NoMatchingObject {
        /// The filter that matched nothing.
        filter: String,
    },

    /// The API refused the acknowledgement.
    #[error("acknowledgement rejected (status {status}): {reason}")]
    Rejected {
        /// Status code reported by the API.
        status: u16,
        /// Reason reported by the API.
        reason: String,
    },

    /// The request did not complete in time.
    #[error("monitoring API timed out after {0:?}")]
    Timeout(Duration),

    /// The request did not reach the API.
    #[error("network error: {0}")]
    Network(String),
}

/// Errors surfaced by the notification dispatcher.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Sending the notification failed; nothing was recorded.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The ledger entry for a sent notification could not be written.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

/// Result type for relay operations.
pub type Result<T> = std::result::Result<T, RelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_error_display() {
        let err = TransportError::Api {
            description: "Bad Request: chat not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "messaging API error: Bad Request: chat not found"
        );
    }

    #[test]
    fn monitoring_error_display() {
        let err = MonitoringError::Rejected {
            status: 409,
            reason: "already acknowledged".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "acknowledgement rejected (status 409): already acknowledged"
        );
        assert_eq!(
            MonitoringError::Timeout(Duration::from_secs(10)).to_string(),
            "monitoring API timed out after 10s"
        );
    }

    #[test]
    fn relay_error_from_transport() {
        let err: RelayError = TransportError::Network("connection reset".into()).into();
        assert!(matches!(err, RelayError::Transport(_)));
        assert_eq!(err.to_string(), "transport error: network error: connection reset");
    }
}
