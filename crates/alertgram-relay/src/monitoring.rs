//! The monitoring control API seam.

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;

use alertgram_ledger::AckTarget;

use crate::error::MonitoringError;

/// Comment attached to acknowledgements issued from chat.
pub const ACK_COMMENT: &str = "Acknowledged via alertgram";

/// Kind of object an acknowledgement applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    /// A host.
    Host,
    /// A service.
    Service,
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Host => f.write_str("Host"),
            Self::Service => f.write_str("Service"),
        }
    }
}

/// An `acknowledge-problem` call.
///
/// Object names travel in `filter_vars`, never inside the filter
/// expression itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcknowledgeRequest {
    /// Host or Service.
    pub object_type: ObjectType,
    /// Filter expression selecting the object.
    pub filter: String,
    /// Variables referenced by `filter`.
    pub filter_vars: BTreeMap<String, String>,
    /// Who acknowledges.
    pub author: String,
    /// Acknowledgement comment.
    pub comment: String,
    /// Whether the acknowledgement survives state changes between problem states.
    pub sticky: bool,
    /// Whether Icinga2 sends acknowledgement notifications.
    pub notify: bool,
}

impl AcknowledgeRequest {
    /// Builds a non-sticky, notifying acknowledgement for a ledger target.
    #[must_use]
    pub fn for_target(
        target: AckTarget<'_>,
        author: impl Into<String>,
        comment: impl Into<String>,
    ) -> Self {
        let mut filter_vars = BTreeMap::new();
        let (object_type, filter) = match target {
            AckTarget::Host { host } => {
                filter_vars.insert("host_name".to_string(), host.to_string());
                (ObjectType::Host, "host.name == host_name".to_string())
            }
            AckTarget::Service { host, service } => {
                filter_vars.insert("host_name".to_string(), host.to_string());
                filter_vars.insert("service_name".to_string(), service.to_string());
                (
                    ObjectType::Service,
                    "host.name == host_name && service.name == service_name".to_string(),
                )
            }
        };

        Self {
            object_type,
            filter,
            filter_vars,
            author: author.into(),
            comment: comment.into(),
            sticky: false,
            notify: true,
        }
    }

    /// Returns the targeted host name.
    #[must_use]
    pub fn host_name(&self) -> Option<&str> {
        self.filter_vars.get("host_name").map(String::as_str)
    }

    /// Returns the targeted service name, for service acknowledgements.
    #[must_use]
    pub fn service_name(&self) -> Option<&str> {
        self.filter_vars.get("service_name").map(String::as_str)
    }
}

/// Control operations of the monitoring system.
pub trait MonitoringApi: Send + Sync {
    /// Acknowledges the problem selected by the request.
    fn acknowledge_problem(
        &self,
        request: &AcknowledgeRequest,
    ) -> impl Future<Output = Result<(), MonitoringError>> + Send;
}
