//! HTTP client for the Icinga2 actions API.

use alertgram_relay::{AcknowledgeRequest, MonitoringApi, MonitoringError};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Certificate, Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::config::IcingaConfig;
use crate::error::{IcingaError, Result};

/// Body of an Icinga2 actions API response.
#[derive(Debug, Default, Deserialize)]
struct ActionResponse {
    #[serde(default)]
    results: Vec<ActionResult>,
    #[serde(default)]
    status: Option<String>,
}

/// Outcome for a single matched object.
#[derive(Debug, Deserialize)]
struct ActionResult {
    code: f64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    status: String,
}

/// Client for `POST /v1/actions/acknowledge-problem`.
#[derive(Debug, Clone)]
pub struct IcingaClient {
    client: Client,
    config: IcingaConfig,
    endpoint: String,
}

impl IcingaClient {
    /// Builds a client from its configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the CA certificate cannot be loaded or the HTTP
    /// client cannot be built.
    pub fn new(config: IcingaConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout);

        if let Some(path) = &config.ca_cert {
            let pem = std::fs::read(path).map_err(|source| IcingaError::CertificateIo {
                path: path.clone(),
                source,
            })?;
            let cert = Certificate::from_pem(&pem).map_err(|e| IcingaError::InvalidCertificate {
                path: path.clone(),
                reason: e.to_string(),
            })?;
            builder = builder.add_root_certificate(cert);
        }

        let endpoint = config.action_url("acknowledge-problem");
        Ok(Self {
            client: builder.build()?,
            config,
            endpoint,
        })
    }

    /// The acknowledge-problem endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// JSON body for an acknowledge-problem request.
#[must_use]
pub fn request_body(request: &AcknowledgeRequest) -> Value {
    json!({
        "type": request.object_type.to_string(),
        "filter": request.filter,
        "filter_vars": request.filter_vars,
        "author": request.author,
        "comment": request.comment,
        "sticky": request.sticky,
        "notify": request.notify,
    })
}

/// Interprets an acknowledge-problem response.
///
/// # Errors
///
/// Maps authentication failures, empty matches and per-object error codes
/// to the corresponding [`MonitoringError`].
pub fn interpret_response(status: u16, body: &str, filter: &str) -> std::result::Result<(), MonitoringError> {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(MonitoringError::Unauthorized);
    }

    let parsed: ActionResponse = serde_json::from_str(body).unwrap_or_default();
    if status == StatusCode::NOT_FOUND || (status.is_success() && parsed.results.is_empty()) {
        return Err(MonitoringError::NoMatchingObject {
            filter: filter.to_string(),
        });
    }
    if !status.is_success() {
        let reason = parsed
            .status
            .or_else(|| status.canonical_reason().map(str::to_string))
            .unwrap_or_default();
        return Err(MonitoringError::Rejected {
            status: status.as_u16(),
            reason,
        });
    }

    if let Some(failed) = parsed.results.iter().find(|r| !(200.0..300.0).contains(&r.code)) {
        let code = failed.code as u16;
        return Err(MonitoringError::Rejected {
            status: code,
            reason: failed.status.clone(),
        });
    }
    for result in &parsed.results {
        debug!(object = ?result.name, status = %result.status, "acknowledge result");
    }
    Ok(())
}

impl MonitoringApi for IcingaClient {
    async fn acknowledge_problem(&self, request: &AcknowledgeRequest) -> std::result::Result<(), MonitoringError> {
        debug!(
            object_type = %request.object_type,
            host = ?request.host_name(),
            service = ?request.service_name(),
            "acknowledge-problem"
        );

        let resp = self
            .client
            .post(&self.endpoint)
            .basic_auth(&self.config.user, Some(&self.config.password))
            .json(&request_body(request))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MonitoringError::Timeout(self.config.timeout)
                } else {
                    MonitoringError::Network(e.without_url().to_string())
                }
            })?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| MonitoringError::Network(e.without_url().to_string()))?;

        match interpret_response(status, &body, &request.filter) {
            Ok(()) => {
                info!(object_type = %request.object_type, host = ?request.host_name(), "Icinga2 acknowledged problem");
                Ok(())
            }
            Err(e) => {
                warn!(status, error = %e, "Icinga2 refused acknowledgement");
                Err(e)
            }
        }
    }
}
