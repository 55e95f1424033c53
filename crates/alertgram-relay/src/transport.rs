//! The messaging transport seam and the inbound events it delivers.

use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::TransportError;

/// Where to send a notification: a numeric chat id or a public `@channel`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChatTarget {
    /// Numeric chat identifier.
    Id(i64),
    /// Public channel or group username, including the leading `@`.
    Username(String),
}

impl fmt::Display for ChatTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Username(name) => f.write_str(name),
        }
    }
}

impl FromStr for ChatTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(id) = s.parse::<i64>() {
            return Ok(Self::Id(id));
        }
        if s.len() > 1 && s.starts_with('@') {
            return Ok(Self::Username(s.to_string()));
        }
        Err(format!(
            "invalid chat '{s}': expected a numeric chat id or an @username"
        ))
    }
}

/// Identity of a message after the transport accepted it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentMessage {
    /// Numeric id of the chat the message landed in.
    pub chat_id: i64,
    /// Transport-assigned message id.
    pub message_id: i64,
}

/// An interactive button attached to a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionControl {
    /// Button label.
    pub label: String,
    /// Opaque payload echoed back when the button is tapped.
    pub payload: String,
}

impl ActionControl {
    /// The acknowledge button for a message; its payload is the message id.
    #[must_use]
    pub fn acknowledge(message_id: i64) -> Self {
        Self {
            label: "Acknowledge".to_string(),
            payload: message_id.to_string(),
        }
    }
}

/// Outbound messaging primitives.
///
/// Messages are sent and edited with Markdown parsing enabled and link
/// previews suppressed.
pub trait Transport: Send + Sync {
    /// Sends a new message and returns its identity.
    fn send_message(
        &self,
        chat: &ChatTarget,
        text: &str,
    ) -> impl Future<Output = Result<SentMessage, TransportError>> + Send;

    /// Replaces the text and controls of a sent message.
    ///
    /// `control: None` removes any controls.
    fn edit_message(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        control: Option<&ActionControl>,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Removes the controls of a sent message, leaving its text untouched.
    fn clear_controls(
        &self,
        chat_id: i64,
        message_id: i64,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Shows a short notice to the user who activated a control.
    fn answer_action(
        &self,
        action_id: &str,
        notice: &str,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn send_message(
        &self,
        chat: &ChatTarget,
        text: &str,
    ) -> impl Future<Output = Result<SentMessage, TransportError>> + Send {
        (**self).send_message(chat, text)
    }

    fn edit_message(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        control: Option<&ActionControl>,
    ) -> impl Future<Output = Result<(), TransportError>> + Send {
        (**self).edit_message(chat_id, message_id, text, control)
    }

    fn clear_controls(
        &self,
        chat_id: i64,
        message_id: i64,
    ) -> impl Future<Output = Result<(), TransportError>> + Send {
        (**self).clear_controls(chat_id, message_id)
    }

    fn answer_action(
        &self,
        action_id: &str,
        notice: &str,
    ) -> impl Future<Output = Result<(), TransportError>> + Send {
        (**self).answer_action(action_id, notice)
    }
}

/// The user who activated a control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// Transport user id.
    pub id: i64,
    /// Human-readable name.
    pub display_name: String,
    /// Markup mention of the user, used as acknowledgement author.
    pub mention: String,
}

/// A control activation delivered by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    /// Transport id of the activation, used to answer it.
    pub action_id: String,
    /// Chat containing the message.
    pub chat_id: i64,
    /// Payload of the activated control.
    pub payload: String,
    /// Who activated it.
    pub actor: Actor,
}

/// Bot commands understood by the daemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotCommand {
    /// `/start`
    Start,
    /// `/whoami`
    WhoAmI,
}

impl BotCommand {
    /// Parses a message text into a command.
    ///
    /// Accepts the `/command@botname` form used in group chats and ignores
    /// trailing arguments.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let word = text.split_whitespace().next()?;
        let command = word.strip_prefix('/')?;
        let command = command.split('@').next().unwrap_or(command);
        match command.to_ascii_lowercase().as_str() {
            "start" => Some(Self::Start),
            "whoami" => Some(Self::WhoAmI),
            _ => None,
        }
    }
}

/// Something the transport received that the daemon must react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// A bot command sent in a chat.
    Command {
        /// Chat the command was sent in.
        chat_id: i64,
        /// The command.
        command: BotCommand,
    },
    /// A control activation.
    Action(ActionRequest),
}
