//! [`Transport`] implementation backed by the Bot API.

use alertgram_relay::{ActionControl, ChatTarget, SentMessage, Transport, TransportError};

use crate::api::TelegramApi;
use crate::types::InlineKeyboardMarkup;

/// Converts an optional control into an inline keyboard; `None` yields an
/// empty keyboard, which removes existing buttons.
#[must_use]
pub fn keyboard(control: Option<&ActionControl>) -> InlineKeyboardMarkup {
    control.map_or_else(InlineKeyboardMarkup::empty, |c| {
        InlineKeyboardMarkup::single(&c.label, &c.payload)
    })
}

impl Transport for TelegramApi {
    async fn send_message(&self, chat: &ChatTarget, text: &str) -> Result<SentMessage, TransportError> {
        let message = Self::send_message(self, chat, text, None).await?;
        Ok(SentMessage {
            chat_id: message.chat.id,
            message_id: message.message_id,
        })
    }

    async fn edit_message(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        control: Option<&ActionControl>,
    ) -> Result<(), TransportError> {
        self.edit_message_text(chat_id, message_id, text, &keyboard(control))
            .await
            .map_err(Into::into)
    }

    async fn clear_controls(&self, chat_id: i64, message_id: i64) -> Result<(), TransportError> {
        self.edit_message_reply_markup(chat_id, message_id, &InlineKeyboardMarkup::empty())
            .await
            .map_err(Into::into)
    }

    async fn answer_action(&self, action_id: &str, notice: &str) -> Result<(), TransportError> {
        self.answer_callback_query(action_id, Some(notice))
            .await
            .map_err(Into::into)
    }
}
