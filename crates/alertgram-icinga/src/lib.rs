//! Icinga2 REST API client for alertgram.
//!
//! [`IcingaClient`] implements [`MonitoringApi`](alertgram_relay::MonitoringApi)
//! over `POST /v1/actions/acknowledge-problem`, authenticating with HTTP
//! basic auth and optionally pinning a CA certificate.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod config;
pub mod error;

pub use client::{interpret_response, request_body, IcingaClient};
pub use config::{IcingaConfig, DEFAULT_TIMEOUT};
pub use error::{IcingaError, Result};
