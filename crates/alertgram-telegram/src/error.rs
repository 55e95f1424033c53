//! Error types for the Telegram transport.

use alertgram_relay::TransportError;
use thiserror::Error;

/// Errors returned by the Telegram Bot API client.
#[derive(Debug, Error)]
pub enum TelegramError {
    /// The HTTP request failed. The URL, which embeds the bot token, is stripped.
    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),

    /// The Bot API answered with `ok: false`.
    #[error("Telegram API error: {description}")]
    Api {
        /// Description returned by the Bot API.
        description: String,
    },

    /// The response could not be understood.
    #[error("invalid Telegram response: {0}")]
    InvalidResponse(String),

    /// A request body could not be encoded.
    #[error("failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for TelegramError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::InvalidResponse(err.without_url().to_string());
        }
        Self::Http(err.without_url())
    }
}

impl From<TelegramError> for TransportError {
    fn from(err: TelegramError) -> Self {
        match err {
            TelegramError::Http(e) => Self::Network(e.to_string()),
            TelegramError::Api { description } => Self::Api { description },
            TelegramError::InvalidResponse(reason) => Self::InvalidResponse(reason),
            TelegramError::Encode(e) => Self::InvalidResponse(e.to_string()),
        }
    }
}

/// Result type for Telegram operations.
pub type Result<T> = std::result::Result<T, TelegramError>;
