//! Raw HTTP calls to the Telegram Bot API.
//!
//! Wraps reqwest for `getMe`, `sendMessage`, `editMessageText`,
//! `editMessageReplyMarkup`, `answerCallbackQuery` and `getUpdates`.

use std::fmt;
use std::time::Duration;

use alertgram_relay::ChatTarget;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::error::{Result, TelegramError};
use crate::types::{ApiResponse, InlineKeyboardMarkup, Message, Update, User};

/// Public Bot API endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Bound on regular (non-polling) requests.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Extra time granted to a long poll beyond its server-side timeout.
const POLL_GRACE: Duration = Duration::from_secs(10);

/// Markup dialect of outgoing messages.
const PARSE_MODE: &str = "Markdown";

/// Low-level Telegram Bot API client.
#[derive(Clone)]
pub struct TelegramApi {
    client: Client,
    base_url: String,
}

impl fmt::Debug for TelegramApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The base URL embeds the bot token.
        f.debug_struct("TelegramApi").finish_non_exhaustive()
    }
}

impl TelegramApi {
    /// Creates a client for the public Bot API.
    #[must_use]
    pub fn new(bot_token: &str) -> Self {
        Self::with_base_url(bot_token, DEFAULT_API_BASE)
    }

    /// Creates a client for a self-hosted Bot API server.
    #[must_use]
    pub fn with_base_url(bot_token: &str, base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: format!("{}/bot{}", base_url.trim_end_matches('/'), bot_token),
        }
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, body: &Value, timeout: Duration) -> Result<T> {
        let resp = self
            .client
            .post(format!("{}/{method}", self.base_url))
            .timeout(timeout)
            .json(body)
            .send()
            .await?;

        let api_resp: ApiResponse<T> = resp.json().await?;
        if !api_resp.ok {
            let description = api_resp.description.unwrap_or_default();
            return Err(TelegramError::Api { description });
        }
        api_resp
            .result
            .ok_or_else(|| TelegramError::InvalidResponse(format!("{method}: missing result")))
    }

    /// Returns the bot's own user. Useful to verify the token.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the token is rejected.
    pub async fn get_me(&self) -> Result<User> {
        self.call("getMe", &json!({}), REQUEST_TIMEOUT).await
    }

    /// Sends a Markdown text message with link previews disabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the Bot API refuses it.
    pub async fn send_message(
        &self,
        chat: &ChatTarget,
        text: &str,
        reply_markup: Option<&InlineKeyboardMarkup>,
    ) -> Result<Message> {
        let chat_id = match chat {
            ChatTarget::Id(id) => json!(id),
            ChatTarget::Username(name) => json!(name),
        };
        let mut body = json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": PARSE_MODE,
            "disable_web_page_preview": true,
        });
        if let Some(markup) = reply_markup {
            body["reply_markup"] = serde_json::to_value(markup)?;
        }

        debug!(chat = %chat, "sendMessage");
        self.call("sendMessage", &body, REQUEST_TIMEOUT).await.inspect_err(|e| {
            warn!(chat = %chat, error = %e, "sendMessage failed");
        })
    }

    /// Replaces the text and keyboard of a message.
    ///
    /// An empty keyboard removes the buttons.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the Bot API refuses it.
    pub async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        reply_markup: &InlineKeyboardMarkup,
    ) -> Result<()> {
        let body = json!({
            "chat_id": chat_id,
            "message_id": message_id,
            "text": text,
            "parse_mode": PARSE_MODE,
            "disable_web_page_preview": true,
            "reply_markup": serde_json::to_value(reply_markup)?,
        });

        debug!(chat_id, message_id, "editMessageText");
        let result: Result<Value> = self.call("editMessageText", &body, REQUEST_TIMEOUT).await;
        ignore_not_modified(result)
    }

    /// Replaces only the keyboard of a message.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the Bot API refuses it.
    pub async fn edit_message_reply_markup(
        &self,
        chat_id: i64,
        message_id: i64,
        reply_markup: &InlineKeyboardMarkup,
    ) -> Result<()> {
        let body = json!({
            "chat_id": chat_id,
            "message_id": message_id,
            "reply_markup": serde_json::to_value(reply_markup)?,
        });

        debug!(chat_id, message_id, "editMessageReplyMarkup");
        let result: Result<Value> = self.call("editMessageReplyMarkup", &body, REQUEST_TIMEOUT).await;
        ignore_not_modified(result)
    }

    /// Answers a callback query, dismissing the client's loading indicator.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the query expired.
    pub async fn answer_callback_query(&self, callback_query_id: &str, text: Option<&str>) -> Result<()> {
        let mut body = json!({ "callback_query_id": callback_query_id });
        if let Some(text) = text {
            body["text"] = json!(text);
        }

        let _: bool = self.call("answerCallbackQuery", &body, REQUEST_TIMEOUT).await?;
        Ok(())
    }

    /// Long-polls for updates.
    ///
    /// `offset` should be `last_update_id + 1` to confirm earlier updates.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the Bot API refuses it.
    pub async fn get_updates(&self, offset: Option<i64>, timeout_secs: u64) -> Result<Vec<Update>> {
        let mut body = json!({
            "timeout": timeout_secs,
            "allowed_updates": ["message", "callback_query"],
        });
        if let Some(offset) = offset {
            body["offset"] = json!(offset);
        }

        let timeout = Duration::from_secs(timeout_secs) + POLL_GRACE;
        self.call("getUpdates", &body, timeout).await
    }
}

/// Treats "message is not modified" as success: the message already shows
/// the requested content.
fn ignore_not_modified(result: Result<Value>) -> Result<()> {
    match result {
        Ok(_) => Ok(()),
        Err(TelegramError::Api { description }) if description.contains("message is not modified") => {
            debug!("message already up to date");
            Ok(())
        }
        Err(e) => Err(e),
    }
}
