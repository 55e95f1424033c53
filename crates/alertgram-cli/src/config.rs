//! Daemon configuration: JSON file merged with flags and environment.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use alertgram_icinga::IcingaConfig;
use alertgram_telegram::DEFAULT_POLL_TIMEOUT_SECS;
use serde::Deserialize;
use tracing::debug;

use crate::cli::{DaemonArgs, DEFAULT_SPOOL_DIR};
use crate::error::CliError;

/// Default age after which pending acknowledgements are dropped.
pub const DEFAULT_SPOOL_MAX_AGE_DAYS: u64 = 30;

/// Default Icinga2 API timeout in seconds.
pub const DEFAULT_ICINGA_TIMEOUT_SECS: u64 = 10;

/// Contents of the `--config` JSON file. All keys are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Telegram bot token.
    pub token: Option<String>,
    /// Bot API base URL.
    pub telegram_api_url: Option<String>,
    /// Long-poll timeout in seconds.
    pub poll_timeout_secs: Option<u64>,
    /// Icinga2 API URL.
    pub icinga_url: Option<String>,
    /// Icinga2 API user.
    pub icinga_user: Option<String>,
    /// Icinga2 API password.
    pub icinga_password: Option<String>,
    /// Icinga2 CA certificate path.
    pub icinga_cacert: Option<PathBuf>,
    /// Icinga2 API timeout in seconds.
    pub icinga_timeout_secs: Option<u64>,
    /// Spool directory.
    pub spool_dir: Option<PathBuf>,
    /// Maximum age of pending acknowledgements in days.
    pub spool_max_age_days: Option<u64>,
}

impl ConfigFile {
    /// Reads and parses a config file.
    ///
    /// # Errors
    ///
    /// Returns `CliError::ConfigFile` if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let failed = |reason: String| CliError::ConfigFile {
            path: path.to_path_buf(),
            reason,
        };
        let raw = std::fs::read_to_string(path).map_err(|e| failed(e.to_string()))?;
        let file = serde_json::from_str(&raw).map_err(|e| failed(e.to_string()))?;
        debug!(path = %path.display(), "loaded config file");
        Ok(file)
    }
}

/// Fully resolved daemon settings.
#[derive(Clone)]
pub struct DaemonConfig {
    /// Telegram bot token.
    pub token: String,
    /// Bot API base URL override.
    pub telegram_api_url: Option<String>,
    /// Long-poll timeout in seconds.
    pub poll_timeout_secs: u64,
    /// Icinga2 API settings.
    pub icinga: IcingaConfig,
    /// Spool directory.
    pub spool_dir: PathBuf,
    /// Maximum age of pending acknowledgements in days; 0 disables pruning.
    pub spool_max_age_days: u64,
}

impl fmt::Debug for DaemonConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DaemonConfig")
            .field("token", &"<redacted>")
            .field("telegram_api_url", &self.telegram_api_url)
            .field("poll_timeout_secs", &self.poll_timeout_secs)
            .field("icinga", &self.icinga)
            .field("spool_dir", &self.spool_dir)
            .field("spool_max_age_days", &self.spool_max_age_days)
            .finish()
    }
}

fn required(value: Option<String>, what: &str, flag: &str) -> Result<String, CliError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| CliError::Config(format!("missing {what} (--{flag})")))
}

impl DaemonConfig {
    /// Resolves settings from `args`, reading `--config` if given.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file is unreadable, a required
    /// setting is missing or a value is invalid.
    pub fn resolve(args: &DaemonArgs) -> Result<Self, CliError> {
        let file = match &args.config {
            Some(path) => ConfigFile::load(path)?,
            None => ConfigFile::default(),
        };
        Self::merge(args, file)
    }

    /// Merges flags over file values, applies defaults and validates.
    ///
    /// # Errors
    ///
    /// Returns an error if a required setting is missing or invalid.
    pub fn merge(args: &DaemonArgs, file: ConfigFile) -> Result<Self, CliError> {
        let args = args.clone();
        let token = required(args.telegram.token.or(file.token), "Telegram bot token", "token")?;
        let url = required(args.icinga_url.or(file.icinga_url), "Icinga2 API URL", "icinga-url")?;
        let user = required(args.icinga_user.or(file.icinga_user), "Icinga2 API user", "icinga-user")?;
        let password = required(
            args.icinga_password.or(file.icinga_password),
            "Icinga2 API password",
            "icinga-password",
        )?;
        let timeout_secs = args
            .icinga_timeout_secs
            .or(file.icinga_timeout_secs)
            .unwrap_or(DEFAULT_ICINGA_TIMEOUT_SECS);

        let icinga = IcingaConfig::new(&url, user, password)?
            .with_ca_cert(args.icinga_cacert.or(file.icinga_cacert))
            .with_timeout(Duration::from_secs(timeout_secs));

        let config = Self {
            token,
            telegram_api_url: args.telegram.telegram_api_url.or(file.telegram_api_url),
            poll_timeout_secs: args
                .poll_timeout_secs
                .or(file.poll_timeout_secs)
                .unwrap_or(DEFAULT_POLL_TIMEOUT_SECS),
            icinga,
            spool_dir: args
                .spool_dir
                .or(file.spool_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SPOOL_DIR)),
            spool_max_age_days: args
                .spool_max_age_days
                .or(file.spool_max_age_days)
                .unwrap_or(DEFAULT_SPOOL_MAX_AGE_DAYS),
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Config` describing the first invalid value.
    pub fn validate(&self) -> Result<(), CliError> {
        if self.token.chars().any(char::is_whitespace) {
            return Err(CliError::Config("Telegram bot token contains whitespace".into()));
        }
        if self.icinga.timeout.is_zero() {
            return Err(CliError::Config("Icinga2 API timeout must be at least 1 second".into()));
        }
        if self.poll_timeout_secs == 0 {
            return Err(CliError::Config("poll timeout must be at least 1 second".into()));
        }
        if let Some(cert) = &self.icinga.ca_cert {
            if !cert.is_file() {
                return Err(CliError::Config(format!(
                    "Icinga2 CA certificate {} is not a file",
                    cert.display()
                )));
            }
        }
        Ok(())
    }

    /// Age after which pending acknowledgements are pruned, if pruning is on.
    #[must_use]
    pub fn spool_max_age(&self) -> Option<chrono::TimeDelta> {
        if self.spool_max_age_days == 0 {
            return None;
        }
        chrono::TimeDelta::try_days(i64::try_from(self.spool_max_age_days).ok()?)
    }
}
