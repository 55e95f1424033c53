//! CLI error types.

use std::path::PathBuf;

use alertgram_event::EventError;
use alertgram_icinga::IcingaError;
use alertgram_ledger::LedgerError;
use alertgram_relay::RelayError;
use alertgram_telegram::TelegramError;
use thiserror::Error;

/// Errors surfaced by the `alertgram` binary.
#[derive(Debug, Error)]
pub enum CliError {
    /// The notification arguments do not describe a valid event.
    #[error("invalid notification: {0}")]
    Event(#[from] EventError),

    /// An argument combination is not allowed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Required configuration is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The configuration file could not be loaded.
    #[error("failed to load config file {}: {reason}", path.display())]
    ConfigFile {
        /// Path of the file.
        path: PathBuf,
        /// Why loading failed.
        reason: String,
    },

    /// The acknowledgement ledger failed.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Dispatching a notification failed.
    #[error("dispatch failed: {0}")]
    Relay(#[from] RelayError),

    /// The Icinga2 client could not be set up.
    #[error("Icinga2 client error: {0}")]
    Icinga(#[from] IcingaError),

    /// The Telegram Bot API failed.
    #[error("Telegram error: {0}")]
    Telegram(#[from] TelegramError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
