//! Notification dispatch and chat-driven acknowledgement for alertgram.
//!
//! # Architecture
//!
//! - [`dispatcher`]: renders an event, sends it, attaches the acknowledge
//!   control and records the problem in the ledger
//! - [`ack`]: resolves a control activation through the ledger and calls
//!   the monitoring API
//! - [`router`]: daemon loop feeding inbound events to the handlers
//! - [`transport`] / [`monitoring`]: the seams to the messaging service and
//!   the monitoring control API
//!
//! ```text
//! Event ──render──► Transport::send_message ──► edit (+control) ──► Ledger::put
//!
//! control tap ──► Router ──► AckHandler ──► Ledger::get ──► MonitoringApi
//!                                              └──► edit (-control) ──► Ledger::delete
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod ack;
pub mod dispatcher;
pub mod error;
pub mod monitoring;
pub mod router;
pub mod transport;

pub use ack::{AckHandler, AckOutcome, KeyLocks, DEFAULT_API_TIMEOUT};
pub use dispatcher::{Dispatched, Dispatcher};
pub use error::{MonitoringError, RelayError, Result, TransportError};
pub use monitoring::{AcknowledgeRequest, MonitoringApi, ObjectType, ACK_COMMENT};
pub use router::Router;
pub use transport::{
    ActionControl, ActionRequest, Actor, BotCommand, ChatTarget, InboundEvent, SentMessage,
    Transport,
};
