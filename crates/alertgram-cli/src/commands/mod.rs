//! Subcommand implementations.
//!
//! - [`notification`] - Send one Icinga2 notification
//! - [`daemon`] - Answer bot commands and acknowledge problems

pub mod daemon;
pub mod notification;

pub use daemon::DaemonCommand;
pub use notification::NotificationCommand;
