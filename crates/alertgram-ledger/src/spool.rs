//! Spool directory backing: one JSON file per pending entry.
//!
//! Files are named `<chat_id>-<message_id>.json`. New entries are written
//! to a temporary file first and then hard-linked into place, which is
//! atomic and fails if the key already has a file. Temporary files left
//! behind by a crashed writer are swept when the spool is opened.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::entry::{LedgerEntry, LedgerKey};
use crate::error::{LedgerError, Result};
use crate::store::Ledger;

const TMP_PREFIX: &str = ".tmp-";

/// Temporary files younger than this may still belong to a running writer.
const STALE_TMP_AGE: Duration = Duration::from_secs(60);

/// File-per-entry ledger under a dedicated spool directory.
#[derive(Debug, Clone)]
pub struct SpoolLedger {
    dir: PathBuf,
}

impl SpoolLedger {
    /// Opens the spool directory, creating it if absent, and removes stale
    /// temporary files.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Io` if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        let ledger = Self { dir };
        let swept = ledger.sweep_temp_files(STALE_TMP_AGE);
        debug!(dir = %ledger.dir.display(), swept, "opened spool directory");
        Ok(ledger)
    }

    /// Removes temporary files older than `min_age`. Failures are logged
    /// and skipped. Returns the number of files removed.
    fn sweep_temp_files(&self, min_age: Duration) -> usize {
        let dirents = match fs::read_dir(&self.dir) {
            Ok(dirents) => dirents,
            Err(e) => {
                warn!(dir = %self.dir.display(), error = %e, "failed to scan spool for temporary files");
                return 0;
            }
        };
        let now = SystemTime::now();
        let mut removed = 0;
        for dirent in dirents.flatten() {
            if !dirent.file_name().to_string_lossy().starts_with(TMP_PREFIX) {
                continue;
            }
            let stale = dirent
                .metadata()
                .and_then(|m| m.modified())
                .is_ok_and(|t| now.duration_since(t).is_ok_and(|age| age >= min_age));
            if !stale {
                continue;
            }
            let path = dirent.path();
            match fs::remove_file(&path) {
                Ok(()) => {
                    debug!(path = %path.display(), "removed stale temporary spool file");
                    removed += 1;
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => warn!(path = %path.display(), error = %e, "failed to remove temporary spool file"),
            }
        }
        removed
    }

    /// Returns the spool directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the file path for a key.
    #[must_use]
    pub fn path_for(&self, key: LedgerKey) -> PathBuf {
        self.dir.join(key.file_name())
    }

    fn read_entry(path: &Path) -> Result<Option<LedgerEntry>> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let mut entry: LedgerEntry =
            serde_json::from_str(&content).map_err(|e| LedgerError::Corrupt {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        if entry.created_at.is_none() {
            entry.created_at = modified_at(path);
        }
        Ok(Some(entry))
    }
}

impl Ledger for SpoolLedger {
    fn put(&self, entry: &LedgerEntry) -> Result<()> {
        let key = entry.key();
        let path = self.path_for(key);
        let tmp = self
            .dir
            .join(format!("{TMP_PREFIX}{}-{}", std::process::id(), key.file_name()));

        let content = serde_json::to_vec_pretty(entry)?;
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(&content)?;
            file.sync_all()?;
        }

        let linked = fs::hard_link(&tmp, &path);
        if let Err(e) = fs::remove_file(&tmp) {
            warn!(path = %tmp.display(), error = %e, "failed to remove temporary spool file");
        }
        match linked {
            Ok(()) => {
                debug!(key = %key, path = %path.display(), "stored ledger entry");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                Err(LedgerError::AlreadyExists { key })
            }
            Err(e) => Err(e.into()),
        }
    }

    fn get(&self, key: LedgerKey) -> Result<Option<LedgerEntry>> {
        let path = self.path_for(key);
        debug!(key = %key, path = %path.display(), "reading ledger entry");
        Self::read_entry(&path)
    }

    fn delete(&self, key: LedgerKey) -> Result<bool> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(key = %key, path = %path.display(), "removed ledger entry");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn list(&self) -> Result<Vec<LedgerEntry>> {
        let mut entries = Vec::new();
        for dirent in fs::read_dir(&self.dir)? {
            let path = dirent?.path();
            let is_entry = path.extension().is_some_and(|ext| ext == "json")
                && !path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(TMP_PREFIX));
            if !is_entry {
                continue;
            }
            match Self::read_entry(&path) {
                Ok(Some(entry)) => entries.push(entry),
                Ok(None) => {}
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable spool file"),
            }
        }
        entries.sort_by_key(LedgerEntry::key);
        Ok(entries)
    }
}

fn modified_at(path: &Path) -> Option<DateTime<Utc>> {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .map(DateTime::<Utc>::from)
}
