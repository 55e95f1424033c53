//! Outbound path: render, send, attach the acknowledge control, record.

use alertgram_event::{render, Event, Indicator};
use alertgram_ledger::{Ledger, LedgerEntry, LedgerKey};
use tracing::{error, info, warn};

use crate::error::Result;
use crate::transport::{ActionControl, ChatTarget, Transport};

/// What a successful dispatch produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatched {
    /// Identity of the sent message.
    pub key: LedgerKey,
    /// Indicator shown in the headline, if any.
    pub indicator: Option<Indicator>,
    /// Whether the message carries an acknowledge control backed by a ledger entry.
    pub acknowledgeable: bool,
}

/// Sends notifications and records acknowledgeable problems in the ledger.
#[derive(Debug)]
pub struct Dispatcher<T, L> {
    transport: T,
    ledger: L,
}

impl<T: Transport, L: Ledger> Dispatcher<T, L> {
    /// Creates a dispatcher.
    pub const fn new(transport: T, ledger: L) -> Self {
        Self { transport, ledger }
    }

    /// Returns the ledger.
    pub const fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Sends `event` to `chat`.
    ///
    /// A failed send aborts without touching the ledger. For problems with
    /// acknowledgement enabled the sent message is edited to carry an
    /// acknowledge control and a ledger entry is written; if attaching the
    /// control fails the notification stays plain and nothing is recorded.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::Transport` if the message could not be sent and
    /// `RelayError::Ledger` if the entry for an acknowledgeable message
    /// could not be written.
    pub async fn dispatch(&self, event: &Event, chat: &ChatTarget) -> Result<Dispatched> {
        let rendered = render(event);

        let sent = self.transport.send_message(chat, &rendered.text).await?;
        let key = LedgerKey::new(sent.chat_id, sent.message_id);
        info!(
            chat = %chat,
            key = %key,
            notification_type = %event.notification_type,
            host = %event.host.name,
            "sent notification"
        );

        let mut dispatched = Dispatched {
            key,
            indicator: rendered.indicator,
            acknowledgeable: false,
        };
        if !event.offers_acknowledgement() {
            return Ok(dispatched);
        }

        let control = ActionControl::acknowledge(sent.message_id);
        if let Err(e) = self
            .transport
            .edit_message(sent.chat_id, sent.message_id, &rendered.text, Some(&control))
            .await
        {
            warn!(key = %key, error = %e, "failed to attach acknowledge control; not recording problem");
            return Ok(dispatched);
        }

        let entry = LedgerEntry::new(
            key,
            event.host.name.clone(),
            event.service.as_ref().map(|s| s.name.clone()),
        )
        .with_text(rendered.text);

        if let Err(e) = self.ledger.put(&entry) {
            error!(key = %key, error = %e, "failed to record acknowledgeable problem");
            if let Err(clear_err) = self.transport.clear_controls(sent.chat_id, sent.message_id).await {
                warn!(key = %key, error = %clear_err, "failed to remove orphaned acknowledge control");
            }
            return Err(e.into());
        }

        info!(key = %key, host = %entry.host_name, service = ?entry.service_name, "recorded acknowledgeable problem");
        dispatched.acknowledgeable = true;
        Ok(dispatched)
    }
}
