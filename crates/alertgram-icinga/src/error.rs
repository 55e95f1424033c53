//! Error types for setting up the Icinga2 client.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while configuring the Icinga2 API client.
#[derive(Debug, Error)]
pub enum IcingaError {
    /// The API URL cannot be used.
    #[error("invalid Icinga2 API URL '{url}': {reason}")]
    InvalidUrl {
        /// The offending URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The CA certificate could not be read.
    #[error("failed to read CA certificate {}: {source}", path.display())]
    CertificateIo {
        /// Certificate path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The CA certificate is not valid PEM.
    #[error("invalid CA certificate {}: {reason}", path.display())]
    InvalidCertificate {
        /// Certificate path.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Result type for Icinga2 client setup.
pub type Result<T> = std::result::Result<T, IcingaError>;
