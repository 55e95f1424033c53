//! Serde types for the Telegram Bot API.
//!
//! Only the fields alertgram needs are modelled; unknown fields are ignored.

use serde::{Deserialize, Serialize};

/// Generic Bot API response wrapper.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the call succeeded.
    pub ok: bool,
    /// Human-readable error description when `ok` is false.
    pub description: Option<String>,
    /// Call result when `ok` is true.
    pub result: Option<T>,
}

/// An update delivered by `getUpdates`.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    /// Monotonic update identifier.
    pub update_id: i64,
    /// New incoming message.
    pub message: Option<Message>,
    /// Inline keyboard button press.
    pub callback_query: Option<CallbackQuery>,
}

/// A chat message.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    /// Message identifier, unique within its chat.
    pub message_id: i64,
    /// Chat the message belongs to.
    pub chat: Chat,
    /// Text of a text message.
    pub text: Option<String>,
}

/// A Telegram user or bot.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    /// User identifier.
    pub id: i64,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: Option<String>,
    /// Username without the leading `@`.
    pub username: Option<String>,
}

impl User {
    /// First and last name joined by a space.
    #[must_use]
    pub fn full_name(&self) -> String {
        match &self.last_name {
            Some(last) => format!("{} {last}", self.first_name),
            None => self.first_name.clone(),
        }
    }

    /// Inline Markdown mention linking to the user, e.g.
    /// `[Alice Smith](tg://user?id=42)`.
    #[must_use]
    pub fn mention_markdown(&self) -> String {
        let name = self.full_name().replace([']', '['], "");
        format!("[{name}](tg://user?id={})", self.id)
    }
}

/// A chat.
#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    /// Chat identifier; negative for groups and channels.
    pub id: i64,
}

/// A press of an inline keyboard button.
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    /// Query identifier, used to answer it.
    pub id: String,
    /// Who pressed the button.
    pub from: User,
    /// The message carrying the button, if still accessible.
    pub message: Option<Message>,
    /// Callback data of the button.
    pub data: Option<String>,
}

/// Inline keyboard attached to a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineKeyboardMarkup {
    /// Rows of buttons.
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

impl InlineKeyboardMarkup {
    /// A keyboard with no buttons. Sending it removes an existing keyboard.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            inline_keyboard: Vec::new(),
        }
    }

    /// A keyboard with a single button.
    #[must_use]
    pub fn single(text: impl Into<String>, callback_data: impl Into<String>) -> Self {
        Self {
            inline_keyboard: vec![vec![InlineKeyboardButton {
                text: text.into(),
                callback_data: callback_data.into(),
            }]],
        }
    }
}

/// A single inline keyboard button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineKeyboardButton {
    /// Button label.
    pub text: String,
    /// Data sent back in the callback query.
    pub callback_data: String,
}
