//! The [`Ledger`] trait and its in-memory implementation.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::debug;

use crate::entry::{LedgerEntry, LedgerKey};
use crate::error::{LedgerError, Result};

/// Durable key-value store of pending acknowledgeable problems.
///
/// At most one entry exists per key: [`Ledger::put`] refuses to replace a
/// pending entry. Implementations only guarantee atomicity of single
/// operations; callers that read and then delete must serialize access to
/// the key themselves.
pub trait Ledger: Send + Sync {
    /// Stores a new entry.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::AlreadyExists` if the key is already pending.
    fn put(&self, entry: &LedgerEntry) -> Result<()>;

    /// Looks up the entry for a key.
    fn get(&self, key: LedgerKey) -> Result<Option<LedgerEntry>>;

    /// Removes the entry for a key. Returns whether an entry was removed.
    fn delete(&self, key: LedgerKey) -> Result<bool>;

    /// Returns all pending entries.
    fn list(&self) -> Result<Vec<LedgerEntry>>;

    /// Removes entries created before `cutoff`. Returns how many were removed.
    ///
    /// Entries without a creation time are kept.
    fn prune_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        let mut removed = 0;
        for entry in self.list()? {
            if entry.created_at.is_some_and(|at| at < cutoff) && self.delete(entry.key())? {
                debug!(key = %entry.key(), host = %entry.host_name, "pruned stale ledger entry");
                removed += 1;
            }
        }
        Ok(removed)
    }
}

impl<L: Ledger + ?Sized> Ledger for Arc<L> {
    fn put(&self, entry: &LedgerEntry) -> Result<()> {
        (**self).put(entry)
    }

    fn get(&self, key: LedgerKey) -> Result<Option<LedgerEntry>> {
        (**self).get(key)
    }

    fn delete(&self, key: LedgerKey) -> Result<bool> {
        (**self).delete(key)
    }

    fn list(&self) -> Result<Vec<LedgerEntry>> {
        (**self).list()
    }

    fn prune_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        (**self).prune_older_than(cutoff)
    }
}

/// Ledger held entirely in memory. Entries do not survive a restart.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    entries: RwLock<HashMap<LedgerKey, LedgerEntry>>,
}

impl MemoryLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of pending entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if no entries are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Ledger for MemoryLedger {
    fn put(&self, entry: &LedgerEntry) -> Result<()> {
        let mut entries = self.entries.write();
        let key = entry.key();
        if entries.contains_key(&key) {
            return Err(LedgerError::AlreadyExists { key });
        }
        entries.insert(key, entry.clone());
        Ok(())
    }

    fn get(&self, key: LedgerKey) -> Result<Option<LedgerEntry>> {
        Ok(self.entries.read().get(&key).cloned())
    }

    fn delete(&self, key: LedgerKey) -> Result<bool> {
        Ok(self.entries.write().remove(&key).is_some())
    }

    fn list(&self) -> Result<Vec<LedgerEntry>> {
        let mut entries: Vec<_> = self.entries.read().values().cloned().collect();
        entries.sort_by_key(LedgerEntry::key);
        Ok(entries)
    }
}
