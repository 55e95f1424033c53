//! `alertgram daemon`: answer bot commands and acknowledge problems.

use std::sync::Arc;

use alertgram_icinga::IcingaClient;
use alertgram_ledger::{Ledger, SpoolLedger};
use alertgram_relay::{AckHandler, Router};
use alertgram_telegram::{poll_loop, TelegramApi};
use chrono::Utc;
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

use crate::cli::DaemonArgs;
use crate::config::DaemonConfig;
use crate::error::CliError;

const EVENT_QUEUE_DEPTH: usize = 64;

/// Long-running acknowledgement daemon.
pub struct DaemonCommand {
    args: DaemonArgs,
}

impl DaemonCommand {
    /// Create a new daemon command.
    #[must_use]
    pub const fn new(args: DaemonArgs) -> Self {
        Self { args }
    }

    /// Execute the command until SIGINT or SIGTERM.
    ///
    /// In-flight acknowledgements are finished before returning.
    pub async fn execute(&self) -> Result<(), CliError> {
        let config = DaemonConfig::resolve(&self.args)?;
        info!(?config, "starting daemon");

        let spool = Arc::new(SpoolLedger::open(&config.spool_dir)?);
        prune_spool(spool.as_ref(), &config)?;

        let api = Arc::new(match &config.telegram_api_url {
            Some(base) => TelegramApi::with_base_url(&config.token, base),
            None => TelegramApi::new(&config.token),
        });
        let me = api.get_me().await?;
        info!(bot_id = me.id, username = ?me.username, "connected to Telegram");

        let icinga = IcingaClient::new(config.icinga.clone())?;
        info!(endpoint = icinga.endpoint(), "Icinga2 API configured");

        let handler = AckHandler::new(Arc::clone(&api), icinga, spool)
            .with_api_timeout(config.icinga.timeout);
        let router = Router::new(handler);

        let (events_tx, events_rx) = mpsc::channel(EVENT_QUEUE_DEPTH);
        let (cancel_tx, cancel_rx) = watch::channel(false);

        let poller = tokio::spawn(poll_loop(
            Arc::clone(&api),
            config.poll_timeout_secs,
            events_tx,
            cancel_rx,
        ));
        tokio::spawn(async move {
            shutdown_signal().await;
            info!("shutdown requested");
            let _ = cancel_tx.send(true);
        });

        router.run(events_rx).await;
        if let Err(e) = poller.await {
            warn!(error = %e, "poller task failed");
        }
        info!("daemon stopped");
        Ok(())
    }
}

/// Removes pending acknowledgements older than the configured maximum age.
///
/// # Errors
///
/// Returns an error if the spool cannot be listed.
pub fn prune_spool(ledger: &impl Ledger, config: &DaemonConfig) -> Result<usize, CliError> {
    let Some(max_age) = config.spool_max_age() else {
        return Ok(0);
    };
    let Some(cutoff) = Utc::now().checked_sub_signed(max_age) else {
        return Ok(0);
    };
    let removed = ledger.prune_older_than(cutoff)?;
    if removed > 0 {
        info!(removed, max_age_days = config.spool_max_age_days, "pruned stale acknowledgements");
    }
    Ok(removed)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
