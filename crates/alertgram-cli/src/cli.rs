//! Command-line argument parsing with clap.

use std::path::PathBuf;

use alertgram_event::{HostState, NotificationType, ServiceState, DEFAULT_TIME_FORMAT};
use alertgram_relay::ChatTarget;
use clap::{Args, Parser, Subcommand, ValueEnum};

/// Default spool directory for the acknowledgement ledger.
pub const DEFAULT_SPOOL_DIR: &str = "/var/spool/alertgram";

/// Send Icinga2 notifications to Telegram and acknowledge problems from chat.
#[derive(Parser, Debug, Clone)]
#[command(name = "alertgram")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log output format (filter with `RUST_LOG`).
    #[arg(long, global = true, value_enum, env = "ALERTGRAM_LOG_FORMAT", default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Log output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Send one notification; meant to be run by an Icinga2 NotificationCommand.
    Notification(NotificationArgs),

    /// Answer bot commands and acknowledge problems from chat.
    Daemon(DaemonArgs),
}

/// Telegram settings shared by both subcommands.
#[derive(Args, Debug, Clone, Default)]
pub struct TelegramArgs {
    /// API token of the Telegram bot.
    #[arg(long, env = "ALERTGRAM_TELEGRAM_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Bot API base URL, for self-hosted Bot API servers.
    #[arg(long, env = "ALERTGRAM_TELEGRAM_API_URL")]
    pub telegram_api_url: Option<String>,
}

/// Arguments of the `notification` subcommand.
#[derive(Args, Debug, Clone)]
pub struct NotificationArgs {
    /// Telegram settings.
    #[command(flatten)]
    pub telegram: TelegramArgs,

    /// Chat to notify: a numeric chat id or an @channel name.
    #[arg(long, env = "ALERTGRAM_CHAT", allow_hyphen_values = true)]
    pub chat: ChatTarget,

    /// Directory holding pending acknowledgements.
    #[arg(long, env = "ALERTGRAM_SPOOL_DIR", default_value = DEFAULT_SPOOL_DIR)]
    pub spool_dir: PathBuf,

    /// Time of the event as a UNIX timestamp.
    #[arg(long, env = "ALERTGRAM_TIME", allow_hyphen_values = true)]
    pub time: i64,

    /// strftime format of the event time.
    #[arg(long, env = "ALERTGRAM_TIMEFORMAT", default_value = DEFAULT_TIME_FORMAT)]
    pub timeformat: String,

    /// Prefix the message with a status emoji (default).
    #[arg(long, overrides_with = "no_emoji")]
    pub emoji: bool,

    /// Do not prefix the message with a status emoji.
    #[arg(long, overrides_with = "emoji")]
    pub no_emoji: bool,

    /// Offer an Acknowledge button on problems (default).
    #[arg(long, overrides_with = "no_ack")]
    pub ack: bool,

    /// Never offer an Acknowledge button.
    #[arg(long, overrides_with = "ack")]
    pub no_ack: bool,

    /// Host name.
    #[arg(long, env = "ALERTGRAM_HOSTNAME")]
    pub hostname: String,

    /// Host display name (defaults to the host name).
    #[arg(long, env = "ALERTGRAM_HOSTDISPLAYNAME")]
    pub hostdisplayname: Option<String>,

    /// Host check output.
    #[arg(long, env = "ALERTGRAM_HOSTOUTPUT", allow_hyphen_values = true)]
    pub hostoutput: Option<String>,

    /// Host state: UP or DOWN (or 0/1).
    #[arg(long, env = "ALERTGRAM_HOSTSTATE")]
    pub hoststate: HostState,

    /// IPv4 address of the host.
    #[arg(long, env = "ALERTGRAM_ADDRESS")]
    pub address: String,

    /// IPv6 address of the host.
    #[arg(long, env = "ALERTGRAM_ADDRESS6")]
    pub address6: Option<String>,

    /// Service name, for service notifications.
    #[arg(long, env = "ALERTGRAM_SERVICENAME")]
    pub servicename: Option<String>,

    /// Service display name (defaults to the service name).
    #[arg(long, env = "ALERTGRAM_SERVICEDISPLAYNAME")]
    pub servicedisplayname: Option<String>,

    /// Service check output.
    #[arg(long, env = "ALERTGRAM_SERVICEOUTPUT", allow_hyphen_values = true)]
    pub serviceoutput: Option<String>,

    /// Service state: OK, WARNING, CRITICAL or UNKNOWN (or 0..3).
    #[arg(long, env = "ALERTGRAM_SERVICESTATE")]
    pub servicestate: Option<ServiceState>,

    /// Notification type, e.g. PROBLEM or Recovery.
    #[arg(long, env = "ALERTGRAM_NOTIFICATION_TYPE")]
    pub notification_type: NotificationType,

    /// Author of an acknowledgement, downtime or custom notification.
    #[arg(long, env = "ALERTGRAM_NOTIFICATION_AUTHOR")]
    pub notification_author: Option<String>,

    /// Comment of an acknowledgement, downtime or custom notification.
    #[arg(long, env = "ALERTGRAM_NOTIFICATION_COMMENT", allow_hyphen_values = true)]
    pub notification_comment: Option<String>,

    /// Base URL of Icinga Web 2, e.g. https://icinga.example.com/icingaweb2.
    #[arg(long, env = "ALERTGRAM_ICINGAWEB2URL")]
    pub icingaweb2url: String,
}

impl NotificationArgs {
    /// Whether the status emoji is shown.
    #[must_use]
    pub const fn use_emoji(&self) -> bool {
        !self.no_emoji
    }

    /// Whether problems get an Acknowledge button.
    #[must_use]
    pub const fn use_ack(&self) -> bool {
        !self.no_ack
    }
}

/// Arguments of the `daemon` subcommand.
///
/// Every setting may also come from the `--config` file; flags and
/// environment variables take precedence.
#[derive(Args, Debug, Clone, Default)]
pub struct DaemonArgs {
    /// JSON configuration file.
    #[arg(long, env = "ALERTGRAM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Telegram settings.
    #[command(flatten)]
    pub telegram: TelegramArgs,

    /// Seconds a getUpdates long poll may wait [default: 30].
    #[arg(long, env = "ALERTGRAM_POLL_TIMEOUT_SECS")]
    pub poll_timeout_secs: Option<u64>,

    /// Icinga2 API URL, e.g. https://icinga.example.com:5665.
    #[arg(long, env = "ALERTGRAM_ICINGA_URL")]
    pub icinga_url: Option<String>,

    /// Icinga2 API user.
    #[arg(long, env = "ALERTGRAM_ICINGA_USER")]
    pub icinga_user: Option<String>,

    /// Icinga2 API password.
    #[arg(long, env = "ALERTGRAM_ICINGA_PASSWORD", hide_env_values = true)]
    pub icinga_password: Option<String>,

    /// PEM CA certificate of the Icinga2 API.
    #[arg(long, env = "ALERTGRAM_ICINGA_CACERT")]
    pub icinga_cacert: Option<PathBuf>,

    /// Icinga2 API request timeout in seconds [default: 10].
    #[arg(long, env = "ALERTGRAM_ICINGA_TIMEOUT_SECS")]
    pub icinga_timeout_secs: Option<u64>,

    /// Directory holding pending acknowledgements [default: /var/spool/alertgram].
    #[arg(long, env = "ALERTGRAM_SPOOL_DIR")]
    pub spool_dir: Option<PathBuf>,

    /// Remove pending acknowledgements older than this many days at
    /// startup; 0 keeps them forever [default: 30].
    #[arg(long, env = "ALERTGRAM_SPOOL_MAX_AGE_DAYS")]
    pub spool_max_age_days: Option<u64>,
}
