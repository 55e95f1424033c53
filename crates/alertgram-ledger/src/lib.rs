//! Acknowledgement ledger for alertgram.
//!
//! When a problem notification is sent with an acknowledge control, the
//! message identity `(chat_id, message_id)` is recorded together with the
//! Icinga2 object it represents. When a user later taps the control, the
//! entry is looked up, the problem acknowledged and the entry deleted.
//!
//! - [`Ledger`]: the key-value contract (put, get, delete, list)
//! - [`MemoryLedger`]: in-process map, used by tests
//! - [`SpoolLedger`]: one JSON file per entry under a spool directory

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod entry;
pub mod error;
pub mod spool;
pub mod store;

pub use entry::{AckTarget, LedgerEntry, LedgerKey};
pub use error::{LedgerError, Result};
pub use spool::SpoolLedger;
pub use store::{Ledger, MemoryLedger};
