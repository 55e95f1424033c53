//! Classification of Bot API updates into relay events.

use alertgram_relay::{ActionRequest, Actor, BotCommand, InboundEvent};

use crate::types::Update;

/// What the poller should do with an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classified {
    /// Forward to the router.
    Event(InboundEvent),
    /// A callback query that cannot be handled; answer it so the client
    /// stops waiting.
    Unusable {
        /// Callback query id.
        callback_query_id: String,
    },
    /// Nothing to do.
    Ignored,
}

/// Classifies one update.
///
/// Text messages become commands when they parse as one; button presses
/// become actions when they carry data and their message is accessible.
#[must_use]
pub fn classify(update: Update) -> Classified {
    if let Some(query) = update.callback_query {
        let (Some(message), Some(data)) = (query.message, query.data) else {
            return Classified::Unusable {
                callback_query_id: query.id,
            };
        };
        let actor = Actor {
            id: query.from.id,
            display_name: query.from.full_name(),
            mention: query.from.mention_markdown(),
        };
        return Classified::Event(InboundEvent::Action(ActionRequest {
            action_id: query.id,
            chat_id: message.chat.id,
            payload: data,
            actor,
        }));
    }

    update
        .message
        .and_then(|message| {
            let command = BotCommand::parse(message.text.as_deref()?)?;
            Some(Classified::Event(InboundEvent::Command {
                chat_id: message.chat.id,
                command,
            }))
        })
        .unwrap_or(Classified::Ignored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn update(json: &str) -> Update {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn button_press_becomes_action() {
        let classified = classify(update(
            r#"{
                "update_id": 1,
                "callback_query": {
                    "id": "cb-9",
                    "from": {"id": 42, "first_name": "Alice", "last_name": "Smith"},
                    "message": {"message_id": 456, "chat": {"id": -1001}},
                    "data": "456"
                }
            }"#,
        ));
        assert_eq!(
            classified,
            Classified::Event(InboundEvent::Action(ActionRequest {
                action_id: "cb-9".into(),
                chat_id: -1001,
                payload: "456".into(),
                actor: Actor {
                    id: 42,
                    display_name: "Alice Smith".into(),
                    mention: "[Alice Smith](tg://user?id=42)".into(),
                },
            }))
        );
    }

    #[test_case(r#"{"id": "cb-1", "from": {"id": 1, "first_name": "A"}, "data": "5"}"# ; "inline message")]
    #[test_case(r#"{"id": "cb-1", "from": {"id": 1, "first_name": "A"}, "message": {"message_id": 5, "chat": {"id": 2}}}"# ; "no data")]
    fn unusable_button_press_is_answered(query: &str) {
        let classified = classify(update(&format!(r#"{{"update_id": 2, "callback_query": {query}}}"#)));
        assert_eq!(
            classified,
            Classified::Unusable {
                callback_query_id: "cb-1".into()
            }
        );
    }

    #[test_case("/whoami", Some(BotCommand::WhoAmI) ; "whoami")]
    #[test_case("/start@alertgram_bot", Some(BotCommand::Start) ; "start in group")]
    #[test_case("hello", None ; "chatter")]
    fn text_messages(text: &str, expected: Option<BotCommand>) {
        let json = format!(
            r#"{{"update_id": 3, "message": {{"message_id": 1, "chat": {{"id": 77}}, "text": "{text}"}}}}"#
        );
        let expected = expected.map_or(Classified::Ignored, |command| {
            Classified::Event(InboundEvent::Command { chat_id: 77, command })
        });
        assert_eq!(classify(update(&json)), expected);
    }

    #[test]
    fn message_without_text_is_ignored() {
        let classified = classify(update(
            r#"{"update_id": 4, "message": {"message_id": 1, "chat": {"id": 77}}}"#,
        ));
        assert_eq!(classified, Classified::Ignored);
    }
}
