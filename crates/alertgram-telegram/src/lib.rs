//! Telegram Bot API transport for alertgram.
//!
//! [`TelegramApi`] implements the relay's
//! [`Transport`](alertgram_relay::Transport); [`poll_loop`] turns
//! `getUpdates` into a stream of [`InboundEvent`](alertgram_relay::InboundEvent)s
//! for the daemon router.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod error;
pub mod inbound;
pub mod poller;
pub mod transport;
pub mod types;

pub use api::{TelegramApi, DEFAULT_API_BASE};
pub use error::{Result, TelegramError};
pub use inbound::{classify, Classified};
pub use poller::{poll_loop, DEFAULT_POLL_TIMEOUT_SECS};
pub use transport::keyboard;
pub use types::{CallbackQuery, Chat, InlineKeyboardButton, InlineKeyboardMarkup, Message, Update, User};
