//! # alertgram-cli
//!
//! The `alertgram` binary.
//!
//! - `alertgram notification` is run by an Icinga2 `NotificationCommand`
//!   for every notification. It renders the event, sends it to a Telegram
//!   chat and, for problems, records it in the spool so it can be
//!   acknowledged later.
//! - `alertgram daemon` long-polls the Bot API, answers `/start` and
//!   `/whoami`, and turns Acknowledge button taps into Icinga2
//!   `acknowledge-problem` calls.
//!
//! ```text
//! Icinga2 ──exec──► alertgram notification ──► Telegram
//!                          │                      │
//!                          ▼ spool                ▼ button tap
//!                   /var/spool/alertgram ◄── alertgram daemon ──► Icinga2 API
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;

pub use cli::{Cli, Commands, DaemonArgs, LogFormat, NotificationArgs};
pub use config::DaemonConfig;
pub use error::CliError;
