//! Inbound path: resolve a control activation and acknowledge the problem.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use alertgram_ledger::{Ledger, LedgerEntry, LedgerKey};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, error, info, warn};

use crate::error::MonitoringError;
use crate::monitoring::{AcknowledgeRequest, MonitoringApi, ACK_COMMENT};
use crate::transport::{ActionRequest, Transport};

/// Default bound on a single monitoring API call.
pub const DEFAULT_API_TIMEOUT: Duration = Duration::from_secs(10);

/// Notice shown after a successful acknowledgement.
pub const NOTICE_ACKNOWLEDGED: &str = "Problem acknowledged.";
/// Notice shown when no pending problem is recorded for the message.
pub const NOTICE_NOT_FOUND: &str =
    "Cannot acknowledge: this alert is no longer pending. Please use Icinga Web 2 instead.";
/// Notice shown when the monitoring API call failed.
pub const NOTICE_FAILED: &str =
    "Acknowledgement failed. Try again or use Icinga Web 2 instead.";

/// Result of handling one control activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AckOutcome {
    /// The problem was acknowledged and the entry removed.
    Acknowledged(LedgerEntry),
    /// No pending entry exists for the message.
    NotFound,
    /// The entry exists but acknowledging failed; it stays pending.
    Failed(String),
}

/// Per-key async locks serializing read-acknowledge-delete sequences.
#[derive(Debug, Default)]
pub struct KeyLocks {
    locks: parking_lot::Mutex<HashMap<LedgerKey, Arc<Mutex<()>>>>,
}

impl KeyLocks {
    /// Creates an empty lock table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `key`.
    pub async fn acquire(&self, key: LedgerKey) -> KeyGuard<'_> {
        let lock = Arc::clone(self.locks.lock().entry(key).or_default());
        let guard = Arc::clone(&lock).lock_owned().await;
        KeyGuard {
            locks: self,
            key,
            lock,
            guard: Some(guard),
        }
    }

    /// Number of keys currently locked or awaited.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locks.lock().len()
    }

    /// Returns true if no key is locked or awaited.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locks.lock().is_empty()
    }
}

/// Exclusive access to one ledger key; released on drop.
#[derive(Debug)]
pub struct KeyGuard<'a> {
    locks: &'a KeyLocks,
    key: LedgerKey,
    lock: Arc<Mutex<()>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for KeyGuard<'_> {
    fn drop(&mut self) {
        self.guard.take();
        let mut locks = self.locks.locks.lock();
        // Only the table and this guard still reference the lock: nobody is waiting.
        if Arc::strong_count(&self.lock) == 2 {
            locks.remove(&self.key);
        }
    }
}

/// Acknowledges problems when users activate the acknowledge control.
#[derive(Debug)]
pub struct AckHandler<T, M, L> {
    transport: T,
    monitoring: M,
    ledger: L,
    locks: KeyLocks,
    api_timeout: Duration,
}

impl<T: Transport, M: MonitoringApi, L: Ledger> AckHandler<T, M, L> {
    /// Creates a handler with the default API timeout.
    pub fn new(transport: T, monitoring: M, ledger: L) -> Self {
        Self {
            transport,
            monitoring,
            ledger,
            locks: KeyLocks::new(),
            api_timeout: DEFAULT_API_TIMEOUT,
        }
    }

    /// Sets the bound on each monitoring API call.
    #[must_use]
    pub const fn with_api_timeout(mut self, timeout: Duration) -> Self {
        self.api_timeout = timeout;
        self
    }

    /// Returns the transport.
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the ledger.
    pub const fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Handles one control activation.
    ///
    /// Concurrent activations for the same message are serialized, so a
    /// problem is acknowledged at most once per ledger entry. The entry is
    /// removed only after the monitoring API confirmed the acknowledgement.
    pub async fn handle(&self, action: &ActionRequest) -> AckOutcome {
        let Ok(message_id) = action.payload.trim().parse::<i64>() else {
            debug!(chat_id = action.chat_id, payload = %action.payload, "unrecognized control payload");
            self.answer(action, NOTICE_NOT_FOUND).await;
            return AckOutcome::NotFound;
        };
        let key = LedgerKey::new(action.chat_id, message_id);
        debug!(key = %key, actor = action.actor.id, "acknowledge requested");

        let outcome = {
            let _guard = self.locks.acquire(key).await;
            self.acknowledge(key, action).await
        };

        let notice = match &outcome {
            AckOutcome::Acknowledged(_) => NOTICE_ACKNOWLEDGED,
            AckOutcome::NotFound => NOTICE_NOT_FOUND,
            AckOutcome::Failed(_) => NOTICE_FAILED,
        };
        self.answer(action, notice).await;
        outcome
    }

    async fn acknowledge(&self, key: LedgerKey, action: &ActionRequest) -> AckOutcome {
        let entry = match self.ledger.get(key) {
            Ok(Some(entry)) => entry,
            Ok(None) => {
                info!(key = %key, "no pending problem for message; already acknowledged or expired");
                return AckOutcome::NotFound;
            }
            Err(e) => {
                error!(key = %key, error = %e, "failed to read ledger entry");
                return AckOutcome::Failed(e.to_string());
            }
        };

        let request = AcknowledgeRequest::for_target(entry.target(), &action.actor.mention, ACK_COMMENT);
        let result = tokio::time::timeout(
            self.api_timeout,
            self.monitoring.acknowledge_problem(&request),
        )
        .await
        .unwrap_or(Err(MonitoringError::Timeout(self.api_timeout)));

        if let Err(e) = result {
            warn!(
                key = %key,
                host = %entry.host_name,
                service = ?entry.service_name,
                error = %e,
                "acknowledgement failed; keeping entry for retry"
            );
            return AckOutcome::Failed(e.to_string());
        }
        info!(
            key = %key,
            host = %entry.host_name,
            service = ?entry.service_name,
            author = %action.actor.display_name,
            "problem acknowledged"
        );

        let edited = if entry.text.is_empty() {
            self.transport.clear_controls(key.chat_id, key.message_id).await
        } else {
            self.transport
                .edit_message(key.chat_id, key.message_id, &entry.text, None)
                .await
        };
        if let Err(e) = edited {
            warn!(key = %key, error = %e, "failed to remove acknowledge control");
        }

        if let Err(e) = self.ledger.delete(key) {
            error!(key = %key, error = %e, "failed to delete acknowledged ledger entry");
        }
        AckOutcome::Acknowledged(entry)
    }

    async fn answer(&self, action: &ActionRequest, notice: &str) {
        if let Err(e) = self.transport.answer_action(&action.action_id, notice).await {
            debug!(action_id = %action.action_id, error = %e, "failed to answer control activation");
        }
    }
}
