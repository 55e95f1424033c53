//! `alertgram notification`: send one event to Telegram.

use std::sync::Arc;

use alertgram_event::{local_time, Event, Host, Service, TimeFormat};
use alertgram_ledger::{Ledger, MemoryLedger, SpoolLedger};
use alertgram_relay::{Dispatched, Dispatcher};
use alertgram_telegram::TelegramApi;
use tracing::{debug, info};

use crate::cli::{NotificationArgs, TelegramArgs};
use crate::error::CliError;

/// Builds the event described by the notification arguments.
///
/// # Errors
///
/// Returns an error if a required value is empty, the time format or
/// console URL is invalid, or a service name comes without a state.
pub fn build_event(args: &NotificationArgs) -> Result<Event, CliError> {
    let host = Host::new(&args.hostname, args.hoststate, &args.address)
        .with_display_name(args.hostdisplayname.clone())
        .with_output(args.hostoutput.clone())
        .with_address6(args.address6.clone());

    let mut builder = Event::builder(args.notification_type, host)
        .occurred_at(local_time(args.time)?)
        .time_format(TimeFormat::parse(&args.timeformat)?)
        .author(args.notification_author.clone())
        .comment(args.notification_comment.clone())
        .console_url(&args.icingaweb2url)
        .use_indicator(args.use_emoji())
        .ack_enabled(args.use_ack());

    match (&args.servicename, args.servicestate) {
        (Some(name), Some(state)) => {
            let service = Service::new(name, state)
                .with_display_name(args.servicedisplayname.clone())
                .with_output(args.serviceoutput.clone());
            builder = builder.service(service);
        }
        (Some(_), None) => {
            return Err(CliError::InvalidArgument(
                "--servicename requires --servicestate".into(),
            ));
        }
        (None, Some(_)) => debug!("ignoring --servicestate without --servicename"),
        (None, None) => {}
    }

    Ok(builder.build()?)
}

pub(crate) fn telegram_api(args: &TelegramArgs) -> Result<TelegramApi, CliError> {
    let token = args
        .token
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| CliError::Config("missing Telegram bot token (--token)".into()))?;
    Ok(match &args.telegram_api_url {
        Some(base) => TelegramApi::with_base_url(token, base),
        None => TelegramApi::new(token),
    })
}

/// Sends the notification and records it for acknowledgement.
pub struct NotificationCommand {
    args: NotificationArgs,
}

impl NotificationCommand {
    /// Create a new notification command.
    #[must_use]
    pub const fn new(args: NotificationArgs) -> Self {
        Self { args }
    }

    /// Execute the command.
    ///
    /// The spool directory is only touched when the message is acknowledgeable.
    pub async fn execute(&self) -> Result<Dispatched, CliError> {
        let event = build_event(&self.args)?;
        let api = telegram_api(&self.args.telegram)?;

        let ledger: Arc<dyn Ledger> = if event.offers_acknowledgement() {
            Arc::new(SpoolLedger::open(&self.args.spool_dir)?)
        } else {
            Arc::new(MemoryLedger::new())
        };

        let dispatched = Dispatcher::new(api, ledger)
            .dispatch(&event, &self.args.chat)
            .await?;
        info!(
            chat_id = dispatched.key.chat_id,
            message_id = dispatched.key.message_id,
            acknowledgeable = dispatched.acknowledgeable,
            "notification delivered"
        );
        Ok(dispatched)
    }
}
