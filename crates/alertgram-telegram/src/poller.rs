//! Long-polling loop for `getUpdates`.

use std::sync::Arc;
use std::time::Duration;

use alertgram_relay::InboundEvent;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::api::TelegramApi;
use crate::inbound::{classify, Classified};

/// Default server-side long-poll timeout in seconds.
pub const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;

const MAX_BACKOFF_SECS: u64 = 60;

/// Polls for updates and forwards them as [`InboundEvent`]s until `cancel`
/// turns true or the receiving side of `events` is dropped.
///
/// Failed polls back off exponentially from one second up to a minute.
/// Dropping `events` on return lets the router drain and stop.
pub async fn poll_loop(
    api: Arc<TelegramApi>,
    poll_timeout_secs: u64,
    events: mpsc::Sender<InboundEvent>,
    mut cancel: watch::Receiver<bool>,
) {
    let mut offset: Option<i64> = None;
    let mut backoff_secs = 1u64;

    info!(poll_timeout_secs, "Telegram poller started");

    loop {
        if *cancel.borrow() {
            break;
        }

        let updates = tokio::select! {
            result = api.get_updates(offset, poll_timeout_secs) => result,
            _ = cancel.changed() => break,
        };

        let updates = match updates {
            Ok(updates) => {
                backoff_secs = 1;
                updates
            }
            Err(e) => {
                warn!(error = %e, backoff_secs, "getUpdates failed, backing off");
                tokio::select! {
                    () = tokio::time::sleep(Duration::from_secs(backoff_secs)) => {}
                    _ = cancel.changed() => break,
                }
                backoff_secs = (backoff_secs * 2).min(MAX_BACKOFF_SECS);
                continue;
            }
        };

        for update in updates {
            offset = Some(update.update_id + 1);
            match classify(update) {
                Classified::Event(event) => {
                    if events.send(event).await.is_err() {
                        warn!("event channel closed, stopping poller");
                        return;
                    }
                }
                Classified::Unusable { callback_query_id } => {
                    debug!(callback_query_id, "unusable callback query");
                    if let Err(e) = api.answer_callback_query(&callback_query_id, None).await {
                        debug!(error = %e, "failed to answer callback query");
                    }
                }
                Classified::Ignored => {}
            }
        }
    }

    info!("Telegram poller stopped");
}
