//! Rendering of events into Telegram Markdown messages.
//!
//! [`render`] is a pure function of the event: the same event always yields
//! byte-identical text. User-controlled text outside of links is escaped,
//! link labels are emitted literally, and deep links percent-encode object
//! names.

use std::fmt::Write as _;

use url::form_urlencoded;

use crate::indicator::Indicator;
use crate::markdown;
use crate::types::Event;

/// The result of rendering an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    /// The indicator prefixed to the headline, if indicators are enabled.
    pub indicator: Option<Indicator>,
    /// The Markdown message body.
    pub text: String,
}

/// Renders an event into its status indicator and Markdown text.
#[must_use]
pub fn render(event: &Event) -> RenderedMessage {
    let indicator = event.use_indicator.then(|| {
        Indicator::select(
            event.notification_type,
            event.service.as_ref().map(|s| s.state),
        )
    });

    let mut text = String::new();
    if let Some(indicator) = indicator {
        text.push_str(indicator.glyph());
        text.push(' ');
    }

    let host_link = markdown::link(&event.host.display_name, &host_url(event));

    // Headline
    match &event.service {
        Some(service) => {
            let service_link = markdown::link(&service.display_name, &service_url(event));
            let _ = write!(
                text,
                "{} - {} is {}",
                event.notification_type, service_link, service.state
            );
        }
        None => {
            let _ = write!(
                text,
                "{} - {} is {}",
                event.notification_type, host_link, event.host.state
            );
        }
    }
    text.push_str("\n\n");

    let _ = writeln!(text, "Host: {} ({})", host_link, event.host.state);
    let _ = writeln!(text, "Address: {}", markdown::escape(&event.host.address));
    if let Some(address6) = &event.host.address6 {
        let _ = writeln!(text, "Address: {}", markdown::escape(address6));
    }
    let _ = write!(text, "Date: {}", markdown::escape(&format_time(event)));

    let output = match &event.service {
        Some(service) => service.output.as_deref(),
        None => event.host.output.as_deref(),
    };
    if let Some(output) = output.filter(|o| !o.trim().is_empty()) {
        text.push_str("\n\n");
        text.push_str(&markdown::preformatted(output));
    }

    if let Some(attribution) = attribution(event) {
        text.push_str("\n\n");
        text.push_str(&attribution);
    }

    RenderedMessage { indicator, text }
}

/// Builds the Icinga Web 2 link for the event's host.
#[must_use]
pub fn host_url(event: &Event) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("host", &event.host.name)
        .finish();
    format!("{}/monitoring/host/show?{query}", console_base(event))
}

/// Builds the Icinga Web 2 link for the event's service.
///
/// Falls back to the host link for host-only events.
#[must_use]
pub fn service_url(event: &Event) -> String {
    let Some(service) = &event.service else {
        return host_url(event);
    };
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("host", &event.host.name)
        .append_pair("service", &service.name)
        .finish();
    format!("{}/monitoring/service/show?{query}", console_base(event))
}

fn console_base(event: &Event) -> &str {
    event.console_url.as_str().trim_end_matches('/')
}

fn format_time(event: &Event) -> String {
    let mut out = String::new();
    if write!(out, "{}", event.occurred_at.format(event.time_format.as_str())).is_err() {
        // Formats are validated up front; this only guards odd specifier/offset combinations.
        return event.occurred_at.to_rfc3339();
    }
    out
}

fn attribution(event: &Event) -> Option<String> {
    match (&event.author, &event.comment) {
        (Some(author), Some(comment)) => Some(format!(
            "{}: {}",
            markdown::mention_or_text(author),
            markdown::escape(comment)
        )),
        (Some(author), None) => Some(markdown::mention_or_text(author)),
        (None, Some(comment)) => Some(markdown::escape(comment)),
        (None, None) => None,
    }
}
