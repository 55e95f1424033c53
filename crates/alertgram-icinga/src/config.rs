//! Connection settings for the Icinga2 API.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::{IcingaError, Result};

/// Default bound on a single API request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Icinga2 API endpoint and credentials.
#[derive(Clone)]
pub struct IcingaConfig {
    /// API base URL, e.g. `https://icinga.example.com:5665`.
    pub url: Url,
    /// API user.
    pub user: String,
    /// API password.
    pub password: String,
    /// PEM CA certificate used to verify the API's TLS certificate.
    pub ca_cert: Option<PathBuf>,
    /// Request timeout.
    pub timeout: Duration,
}

impl fmt::Debug for IcingaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IcingaConfig")
            .field("url", &self.url.as_str())
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("ca_cert", &self.ca_cert)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl IcingaConfig {
    /// Creates a configuration with the default timeout and system roots.
    ///
    /// # Errors
    ///
    /// Returns `IcingaError::InvalidUrl` if `url` does not parse or is not
    /// an http(s) URL.
    pub fn new(url: &str, user: impl Into<String>, password: impl Into<String>) -> Result<Self> {
        let invalid = |reason: String| IcingaError::InvalidUrl {
            url: url.to_string(),
            reason,
        };
        let parsed = Url::parse(url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid("scheme must be http or https".to_string()));
        }
        Ok(Self {
            url: parsed,
            user: user.into(),
            password: password.into(),
            ca_cert: None,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Verifies the API against this CA certificate.
    #[must_use]
    pub fn with_ca_cert(mut self, path: Option<PathBuf>) -> Self {
        self.ca_cert = path;
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// URL of an action endpoint, e.g. `acknowledge-problem`.
    ///
    /// Accepts base URLs with or without a trailing `/v1`.
    #[must_use]
    pub fn action_url(&self, action: &str) -> String {
        let base = self.url.as_str().trim_end_matches('/');
        let base = base.strip_suffix("/v1").unwrap_or(base);
        format!("{base}/v1/actions/{action}")
    }
}
