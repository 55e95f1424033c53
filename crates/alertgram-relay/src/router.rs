//! Daemon loop routing inbound transport events to their handlers.

use std::sync::Arc;

use alertgram_ledger::Ledger;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::ack::{AckHandler, AckOutcome};
use crate::monitoring::MonitoringApi;
use crate::transport::{BotCommand, ChatTarget, InboundEvent, Transport};

/// Routes commands and control activations until the event stream ends.
///
/// Commands are answered inline. Control activations run as separate
/// tasks so a slow monitoring API does not hold up other chats; the
/// handler serializes activations that target the same message.
#[derive(Debug)]
pub struct Router<T, M, L> {
    handler: Arc<AckHandler<T, M, L>>,
}

impl<T, M, L> Router<T, M, L>
where
    T: Transport + 'static,
    M: MonitoringApi + 'static,
    L: Ledger + 'static,
{
    /// Creates a router around an acknowledgement handler.
    pub fn new(handler: AckHandler<T, M, L>) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }

    /// Returns the shared handler.
    pub fn handler(&self) -> &Arc<AckHandler<T, M, L>> {
        &self.handler
    }

    /// Consumes events until the sender side is dropped, then waits for
    /// in-flight acknowledgements to finish.
    pub async fn run(&self, mut events: mpsc::Receiver<InboundEvent>) {
        let mut in_flight: JoinSet<AckOutcome> = JoinSet::new();
        info!("router started");

        while let Some(event) = events.recv().await {
            match event {
                InboundEvent::Command { chat_id, command } => {
                    self.handle_command(chat_id, command).await;
                }
                InboundEvent::Action(action) => {
                    let handler = Arc::clone(&self.handler);
                    in_flight.spawn(async move { handler.handle(&action).await });
                }
            }
            while let Some(done) = in_flight.try_join_next() {
                log_join(done);
            }
        }

        debug!(pending = in_flight.len(), "event stream closed, draining acknowledgements");
        while let Some(done) = in_flight.join_next().await {
            log_join(done);
        }
        info!("router stopped");
    }

    async fn handle_command(&self, chat_id: i64, command: BotCommand) {
        debug!(chat_id, ?command, "bot command");
        let reply = format!("Your chat ID is: {chat_id}");
        if let Err(e) = self
            .handler
            .transport()
            .send_message(&ChatTarget::Id(chat_id), &reply)
            .await
        {
            warn!(chat_id, error = %e, "failed to answer bot command");
        }
    }
}

fn log_join(done: Result<AckOutcome, tokio::task::JoinError>) {
    match done {
        Ok(outcome) => debug!(?outcome, "acknowledgement finished"),
        Err(e) => warn!(error = %e, "acknowledgement task failed"),
    }
}
