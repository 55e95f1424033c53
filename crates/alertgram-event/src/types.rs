//! Core types for Icinga2 notification events.
//!
//! An [`Event`] is built once per notification invocation and never
//! mutated afterwards. The enums accept every representation the Icinga2
//! notification commands are known to pass (canonical upper-case tokens,
//! mixed-case names and the numeric state codes), so callers do not need to
//! care which variant of the notification command produced the arguments.

use std::fmt;
use std::str::FromStr;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Offset, TimeZone};
use url::Url;

use crate::error::{EventError, Result};

/// Default display format for the event timestamp.
pub const DEFAULT_TIME_FORMAT: &str = "%H:%M:%S %d.%m.%Y";

/// The kind of notification Icinga2 is sending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationType {
    /// A problem was acknowledged.
    Acknowledgement,
    /// A custom notification sent by a user.
    Custom,
    /// A scheduled downtime ended.
    DowntimeEnd,
    /// A scheduled downtime was removed.
    DowntimeRemoved,
    /// A scheduled downtime started.
    DowntimeStart,
    /// The object stopped flapping.
    FlappingEnd,
    /// The object started flapping.
    FlappingStart,
    /// The object entered a problem state.
    Problem,
    /// The object recovered.
    Recovery,
}

impl NotificationType {
    /// All notification types, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::Acknowledgement,
        Self::Custom,
        Self::DowntimeEnd,
        Self::DowntimeRemoved,
        Self::DowntimeStart,
        Self::FlappingEnd,
        Self::FlappingStart,
        Self::Problem,
        Self::Recovery,
    ];

    /// Returns the canonical Icinga2 token for this type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Acknowledgement => "ACKNOWLEDGEMENT",
            Self::Custom => "CUSTOM",
            Self::DowntimeEnd => "DOWNTIMEEND",
            Self::DowntimeRemoved => "DOWNTIMEREMOVED",
            Self::DowntimeStart => "DOWNTIMESTART",
            Self::FlappingEnd => "FLAPPINGEND",
            Self::FlappingStart => "FLAPPINGSTART",
            Self::Problem => "PROBLEM",
            Self::Recovery => "RECOVERY",
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationType {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| EventError::InvalidValue {
                kind: "notification type",
                value: s.to_string(),
            })
    }
}

/// Host check state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostState {
    /// The host is reachable.
    Up,
    /// The host is down.
    Down,
}

impl HostState {
    /// Returns the canonical Icinga2 token for this state.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
        }
    }
}

impl fmt::Display for HostState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HostState {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "UP" | "0" => Ok(Self::Up),
            "DOWN" | "1" => Ok(Self::Down),
            _ => Err(EventError::InvalidValue {
                kind: "host state",
                value: s.to_string(),
            }),
        }
    }
}

/// Service check state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceState {
    /// The service check passed.
    Ok,
    /// The service check is in warning state.
    Warning,
    /// The service check is critical.
    Critical,
    /// The service check result is unknown.
    Unknown,
}

impl ServiceState {
    /// Returns the canonical Icinga2 token for this state.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Warning => "WARNING",
            Self::Critical => "CRITICAL",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceState {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "OK" | "0" => Ok(Self::Ok),
            "WARNING" | "1" => Ok(Self::Warning),
            "CRITICAL" | "2" => Ok(Self::Critical),
            "UNKNOWN" | "3" => Ok(Self::Unknown),
            _ => Err(EventError::InvalidValue {
                kind: "service state",
                value: s.to_string(),
            }),
        }
    }
}

/// The host an event refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    /// Unique object name within Icinga2.
    pub name: String,
    /// Human-readable name; defaults to `name`.
    pub display_name: String,
    /// Plugin output of the last host check.
    pub output: Option<String>,
    /// Current host state.
    pub state: HostState,
    /// IPv4 (or primary) address.
    pub address: String,
    /// Optional IPv6 address.
    pub address6: Option<String>,
}

impl Host {
    /// Creates a host with its display name defaulting to `name`.
    #[must_use]
    pub fn new(name: impl Into<String>, state: HostState, address: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            output: None,
            state,
            address: address.into(),
            address6: None,
        }
    }

    /// Sets the display name. `None` keeps the object name.
    #[must_use]
    pub fn with_display_name(mut self, display_name: Option<String>) -> Self {
        if let Some(display_name) = display_name.filter(|d| !d.is_empty()) {
            self.display_name = display_name;
        }
        self
    }

    /// Sets the plugin output.
    #[must_use]
    pub fn with_output(mut self, output: Option<String>) -> Self {
        self.output = output;
        self
    }

    /// Sets the IPv6 address.
    #[must_use]
    pub fn with_address6(mut self, address6: Option<String>) -> Self {
        self.address6 = address6.filter(|a| !a.is_empty());
        self
    }
}

/// The service an event refers to, when the event is service-scoped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    /// Service object name (unique per host).
    pub name: String,
    /// Human-readable name; defaults to `name`.
    pub display_name: String,
    /// Plugin output of the last service check.
    pub output: Option<String>,
    /// Current service state.
    pub state: ServiceState,
}

impl Service {
    /// Creates a service with its display name defaulting to `name`.
    #[must_use]
    pub fn new(name: impl Into<String>, state: ServiceState) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            output: None,
            state,
        }
    }

    /// Sets the display name. `None` keeps the object name.
    #[must_use]
    pub fn with_display_name(mut self, display_name: Option<String>) -> Self {
        if let Some(display_name) = display_name.filter(|d| !d.is_empty()) {
            self.display_name = display_name;
        }
        self
    }

    /// Sets the plugin output.
    #[must_use]
    pub fn with_output(mut self, output: Option<String>) -> Self {
        self.output = output;
        self
    }
}

/// A validated strftime-style format string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeFormat(String);

impl TimeFormat {
    /// Parses and validates a format string.
    ///
    /// # Errors
    ///
    /// Returns `EventError::InvalidTimeFormat` if any specifier is unknown.
    pub fn parse(format: impl Into<String>) -> Result<Self> {
        let format = format.into();
        if StrftimeItems::new(&format).any(|item| matches!(item, Item::Error)) {
            return Err(EventError::InvalidTimeFormat(format));
        }
        Ok(Self(format))
    }

    /// Returns the raw format string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TimeFormat {
    fn default() -> Self {
        Self(DEFAULT_TIME_FORMAT.to_string())
    }
}

/// Converts a UNIX timestamp into the local timezone of this process.
///
/// # Errors
///
/// Returns `EventError::TimestampOutOfRange` for timestamps chrono cannot represent.
pub fn local_time(secs: i64) -> Result<DateTime<FixedOffset>> {
    let local = chrono::Local
        .timestamp_opt(secs, 0)
        .single()
        .ok_or(EventError::TimestampOutOfRange(secs))?;
    Ok(local.with_timezone(&local.offset().fix()))
}

/// One alert notification occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// What happened.
    pub notification_type: NotificationType,
    /// The affected host.
    pub host: Host,
    /// The affected service, for service-scoped events.
    pub service: Option<Service>,
    /// When the event occurred.
    pub occurred_at: DateTime<FixedOffset>,
    /// How `occurred_at` is displayed.
    pub time_format: TimeFormat,
    /// Author of the notification (acknowledgements, custom notifications).
    pub author: Option<String>,
    /// Comment attached to the notification.
    pub comment: Option<String>,
    /// Base URL of the Icinga Web 2 console.
    pub console_url: Url,
    /// Whether to prefix the message with a status indicator.
    pub use_indicator: bool,
    /// Whether a problem should offer an acknowledge control.
    pub ack_enabled: bool,
}

impl Event {
    /// Starts building an event for the given type and host.
    #[must_use]
    pub fn builder(notification_type: NotificationType, host: Host) -> EventBuilder {
        EventBuilder::new(notification_type, host)
    }

    /// Returns true if this event describes an acknowledgeable problem.
    #[must_use]
    pub fn offers_acknowledgement(&self) -> bool {
        self.notification_type == NotificationType::Problem && self.ack_enabled
    }
}

/// Builder for [`Event`]; validation happens in [`EventBuilder::build`].
#[derive(Debug, Clone)]
pub struct EventBuilder {
    notification_type: NotificationType,
    host: Host,
    service: Option<Service>,
    occurred_at: Option<DateTime<FixedOffset>>,
    time_format: TimeFormat,
    author: Option<String>,
    comment: Option<String>,
    console_url: Option<String>,
    use_indicator: bool,
    ack_enabled: bool,
}

impl EventBuilder {
    fn new(notification_type: NotificationType, host: Host) -> Self {
        Self {
            notification_type,
            host,
            service: None,
            occurred_at: None,
            time_format: TimeFormat::default(),
            author: None,
            comment: None,
            console_url: None,
            use_indicator: true,
            ack_enabled: true,
        }
    }

    /// Sets the affected service.
    #[must_use]
    pub fn service(mut self, service: Service) -> Self {
        self.service = Some(service);
        self
    }

    /// Sets the time the event occurred.
    #[must_use]
    pub fn occurred_at(mut self, at: DateTime<FixedOffset>) -> Self {
        self.occurred_at = Some(at);
        self
    }

    /// Sets the timestamp display format.
    #[must_use]
    pub fn time_format(mut self, format: TimeFormat) -> Self {
        self.time_format = format;
        self
    }

    /// Sets the notification author.
    #[must_use]
    pub fn author(mut self, author: Option<String>) -> Self {
        self.author = author.filter(|a| !a.is_empty());
        self
    }

    /// Sets the notification comment.
    #[must_use]
    pub fn comment(mut self, comment: Option<String>) -> Self {
        self.comment = comment.filter(|c| !c.is_empty());
        self
    }

    /// Sets the Icinga Web 2 base URL.
    #[must_use]
    pub fn console_url(mut self, url: impl Into<String>) -> Self {
        self.console_url = Some(url.into());
        self
    }

    /// Enables or disables the status indicator.
    #[must_use]
    pub const fn use_indicator(mut self, enabled: bool) -> Self {
        self.use_indicator = enabled;
        self
    }

    /// Enables or disables the acknowledge control for problems.
    #[must_use]
    pub const fn ack_enabled(mut self, enabled: bool) -> Self {
        self.ack_enabled = enabled;
        self
    }

    /// Validates the collected fields and builds the event.
    ///
    /// # Errors
    ///
    /// Returns `EventError::MissingField` for empty required fields and
    /// `EventError::InvalidConsoleUrl` if the console URL does not parse.
    pub fn build(self) -> Result<Event> {
        if self.host.name.trim().is_empty() {
            return Err(EventError::MissingField { field: "hostname" });
        }
        if self.host.address.trim().is_empty() {
            return Err(EventError::MissingField { field: "address" });
        }
        if let Some(service) = &self.service {
            if service.name.trim().is_empty() {
                return Err(EventError::MissingField {
                    field: "servicename",
                });
            }
        }

        let occurred_at = self
            .occurred_at
            .ok_or(EventError::MissingField { field: "time" })?;

        let raw_url = self
            .console_url
            .filter(|u| !u.trim().is_empty())
            .ok_or(EventError::MissingField {
                field: "icingaweb2url",
            })?;
        let console_url = Url::parse(raw_url.trim()).map_err(|e| EventError::InvalidConsoleUrl {
            url: raw_url.clone(),
            reason: e.to_string(),
        })?;

        Ok(Event {
            notification_type: self.notification_type,
            host: self.host,
            service: self.service,
            occurred_at,
            time_format: self.time_format,
            author: self.author,
            comment: self.comment,
            console_url,
            use_indicator: self.use_indicator,
            ack_enabled: self.ack_enabled,
        })
    }
}
