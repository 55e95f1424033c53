//! Ledger keys and entries.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity of a sent message: the chat it lives in and its message id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LedgerKey {
    /// Numeric chat identifier.
    pub chat_id: i64,
    /// Transport-assigned message identifier, unique within the chat.
    pub message_id: i64,
}

impl LedgerKey {
    /// Creates a key.
    #[must_use]
    pub const fn new(chat_id: i64, message_id: i64) -> Self {
        Self {
            chat_id,
            message_id,
        }
    }

    /// File name used by the spool directory backing.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}-{}.json", self.chat_id, self.message_id)
    }
}

impl fmt::Display for LedgerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.chat_id, self.message_id)
    }
}

/// What an entry asks the monitoring system to acknowledge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckTarget<'a> {
    /// A host problem.
    Host {
        /// Host object name.
        host: &'a str,
    },
    /// A service problem.
    Service {
        /// Host object name.
        host: &'a str,
        /// Service object name.
        service: &'a str,
    },
}

/// A pending acknowledgeable problem, bound to the message that shows it.
///
/// Serialized with the same keys the spool files have always used
/// (`chat_id`, `message_id`, `hostname`, `servicename`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Chat the message was sent to.
    pub chat_id: i64,
    /// Message carrying the acknowledge control.
    pub message_id: i64,
    /// Host object name.
    #[serde(rename = "hostname")]
    pub host_name: String,
    /// Service object name; absent for host problems.
    #[serde(
        rename = "servicename",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub service_name: Option<String>,
    /// Rendered message text, used to restore the message once acknowledged.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    /// When the entry was written. Entries from older spools may lack it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl LedgerEntry {
    /// Creates an entry stamped with the current time.
    #[must_use]
    pub fn new(key: LedgerKey, host_name: impl Into<String>, service_name: Option<String>) -> Self {
        Self {
            chat_id: key.chat_id,
            message_id: key.message_id,
            host_name: host_name.into(),
            service_name,
            text: String::new(),
            created_at: Some(Utc::now()),
        }
    }

    /// Attaches the rendered message text.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Returns the key this entry is stored under.
    #[must_use]
    pub const fn key(&self) -> LedgerKey {
        LedgerKey::new(self.chat_id, self.message_id)
    }

    /// Returns the object to acknowledge.
    #[must_use]
    pub fn target(&self) -> AckTarget<'_> {
        match &self.service_name {
            Some(service) => AckTarget::Service {
                host: &self.host_name,
                service,
            },
            None => AckTarget::Host {
                host: &self.host_name,
            },
        }
    }
}
