//! Error types for the alertgram-ledger crate.

use std::path::PathBuf;

use thiserror::Error;

use crate::entry::LedgerKey;

/// Errors that can occur while reading or writing ledger entries.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// An entry for the key is already pending.
    #[error("ledger entry already exists: {key}")]
    AlreadyExists {
        /// The conflicting key.
        key: LedgerKey,
    },

    /// A stored entry could not be decoded.
    #[error("corrupt ledger entry at {}: {reason}", path.display())]
    Corrupt {
        /// The file holding the entry.
        path: PathBuf,
        /// Why decoding failed.
        reason: String,
    },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
