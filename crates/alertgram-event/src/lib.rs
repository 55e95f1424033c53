//! Icinga2 notification events and their Telegram presentation.
//!
//! `alertgram-event` owns the typed model of a single notification
//! ([`Event`]) and the pure renderer that turns it into a status
//! [`Indicator`] and a Telegram Markdown message body.
//!
//! # Example
//!
//! ```rust
//! use alertgram_event::{render, Event, Host, HostState, Indicator, NotificationType};
//! use chrono::{FixedOffset, TimeZone};
//!
//! let event = Event::builder(
//!     NotificationType::Problem,
//!     Host::new("web1", HostState::Down, "10.0.0.1"),
//! )
//! .occurred_at(FixedOffset::east_opt(0).unwrap().timestamp_opt(0, 0).unwrap())
//! .console_url("https://icinga.example.com/icingaweb2")
//! .build()
//! .unwrap();
//!
//! let rendered = render(&event);
//! assert_eq!(rendered.indicator, Some(Indicator::BrokenHeart));
//! assert!(rendered.text.contains("is DOWN"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod indicator;
pub mod markdown;
pub mod render;
pub mod types;

pub use error::{EventError, Result};
pub use indicator::Indicator;
pub use render::{render, RenderedMessage};
pub use types::{
    local_time, Event, EventBuilder, Host, HostState, NotificationType, Service, ServiceState,
    TimeFormat, DEFAULT_TIME_FORMAT,
};
