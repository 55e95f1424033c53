//! Shared fakes for relay integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use alertgram_event::{Event, Host, HostState, NotificationType, Service, ServiceState};
use alertgram_relay::{
    AcknowledgeRequest, ActionControl, ActionRequest, Actor, ChatTarget, MonitoringApi,
    MonitoringError, SentMessage, Transport, TransportError,
};
use chrono::{FixedOffset, TimeZone};
use parking_lot::Mutex;

pub const CONSOLE: &str = "https://icinga.example.com/icingaweb2";
pub const CHANNEL_CHAT_ID: i64 = -100_555;

// ==================== Transport ====================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Send {
        chat: ChatTarget,
        text: String,
    },
    Edit {
        chat_id: i64,
        message_id: i64,
        text: String,
        control: Option<ActionControl>,
    },
    Clear {
        chat_id: i64,
        message_id: i64,
    },
    Answer {
        action_id: String,
        notice: String,
    },
}

#[derive(Debug)]
struct TransportState {
    calls: Mutex<Vec<Call>>,
    next_message_id: AtomicI64,
    fail_send: AtomicBool,
    fail_edit: AtomicBool,
}

/// Records every call; message ids count up from 100.
#[derive(Debug, Clone)]
pub struct FakeTransport {
    state: Arc<TransportState>,
}

impl Default for FakeTransport {
    fn default() -> Self {
        Self {
            state: Arc::new(TransportState {
                calls: Mutex::new(Vec::new()),
                next_message_id: AtomicI64::new(100),
                fail_send: AtomicBool::new(false),
                fail_edit: AtomicBool::new(false),
            }),
        }
    }
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_send(&self) {
        self.state.fail_send.store(true, Ordering::SeqCst);
    }

    pub fn fail_edit(&self) {
        self.state.fail_edit.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.calls.lock().clone()
    }

    pub fn edits(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Edit { .. }))
            .collect()
    }

    pub fn answers(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Answer { notice, .. } => Some(notice),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.state.calls.lock().push(call);
    }
}

impl Transport for FakeTransport {
    async fn send_message(&self, chat: &ChatTarget, text: &str) -> Result<SentMessage, TransportError> {
        self.record(Call::Send {
            chat: chat.clone(),
            text: text.to_string(),
        });
        if self.state.fail_send.load(Ordering::SeqCst) {
            return Err(TransportError::Network("connection refused".into()));
        }
        let chat_id = match chat {
            ChatTarget::Id(id) => *id,
            ChatTarget::Username(_) => CHANNEL_CHAT_ID,
        };
        let message_id = self.state.next_message_id.fetch_add(1, Ordering::SeqCst);
        Ok(SentMessage {
            chat_id,
            message_id,
        })
    }

    async fn edit_message(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        control: Option<&ActionControl>,
    ) -> Result<(), TransportError> {
        self.record(Call::Edit {
            chat_id,
            message_id,
            text: text.to_string(),
            control: control.cloned(),
        });
        if self.state.fail_edit.load(Ordering::SeqCst) {
            return Err(TransportError::Api {
                description: "Bad Request: message can't be edited".into(),
            });
        }
        Ok(())
    }

    async fn clear_controls(&self, chat_id: i64, message_id: i64) -> Result<(), TransportError> {
        self.record(Call::Clear {
            chat_id,
            message_id,
        });
        Ok(())
    }

    async fn answer_action(&self, action_id: &str, notice: &str) -> Result<(), TransportError> {
        self.record(Call::Answer {
            action_id: action_id.to_string(),
            notice: notice.to_string(),
        });
        Ok(())
    }
}

// ==================== Monitoring API ====================

#[derive(Debug, Default)]
struct MonitoringState {
    requests: Mutex<Vec<AcknowledgeRequest>>,
    failure: Mutex<Option<MonitoringError>>,
    delay: Mutex<Option<Duration>>,
}

/// Records acknowledge calls; optionally slow or failing.
#[derive(Debug, Clone, Default)]
pub struct FakeMonitoring {
    state: Arc<MonitoringState>,
}

impl FakeMonitoring {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(err: MonitoringError) -> Self {
        let fake = Self::default();
        *fake.state.failure.lock() = Some(err);
        fake
    }

    pub fn slow(delay: Duration) -> Self {
        let fake = Self::default();
        *fake.state.delay.lock() = Some(delay);
        fake
    }

    pub fn recover(&self) {
        *self.state.failure.lock() = None;
    }

    pub fn requests(&self) -> Vec<AcknowledgeRequest> {
        self.state.requests.lock().clone()
    }
}

impl MonitoringApi for FakeMonitoring {
    async fn acknowledge_problem(&self, request: &AcknowledgeRequest) -> Result<(), MonitoringError> {
        self.state.requests.lock().push(request.clone());
        let delay = *self.state.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let failure = self.state.failure.lock().clone();
        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

// ==================== Events ====================

pub fn event(notification_type: NotificationType, service: Option<(&str, ServiceState)>) -> Event {
    let mut builder = Event::builder(
        notification_type,
        Host::new("web1", HostState::Down, "10.0.0.1"),
    )
    .occurred_at(FixedOffset::east_opt(0).unwrap().timestamp_opt(1_700_000_000, 0).unwrap())
    .console_url(CONSOLE);
    if let Some((name, state)) = service {
        builder = builder.service(Service::new(name, state));
    }
    builder.build().unwrap()
}

pub fn action(chat_id: i64, payload: &str, user: &str) -> ActionRequest {
    ActionRequest {
        action_id: format!("cb-{payload}"),
        chat_id,
        payload: payload.to_string(),
        actor: Actor {
            id: 7,
            display_name: user.to_string(),
            mention: user.to_string(),
        },
    }
}
