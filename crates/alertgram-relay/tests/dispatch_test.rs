//! Integration tests for the outbound notification path.

mod helpers;

use std::sync::Arc;

use alertgram_event::{render, Indicator, NotificationType, ServiceState};
use alertgram_ledger::{Ledger, LedgerEntry, LedgerKey, MemoryLedger, SpoolLedger};
use alertgram_relay::{ActionControl, ChatTarget, Dispatcher, RelayError};
use helpers::{event, Call, FakeTransport, CHANNEL_CHAT_ID};

const CHAT: ChatTarget = ChatTarget::Id(-1001);

fn dispatcher() -> (FakeTransport, Arc<MemoryLedger>, Dispatcher<FakeTransport, Arc<MemoryLedger>>) {
    let transport = FakeTransport::new();
    let ledger = Arc::new(MemoryLedger::new());
    let dispatcher = Dispatcher::new(transport.clone(), Arc::clone(&ledger));
    (transport, ledger, dispatcher)
}

// ==================== Problems ====================

#[tokio::test]
async fn host_problem_records_one_entry() {
    let (transport, ledger, dispatcher) = dispatcher();
    let event = event(NotificationType::Problem, None);

    let dispatched = dispatcher.dispatch(&event, &CHAT).await.unwrap();

    assert_eq!(dispatched.key, LedgerKey::new(-1001, 100));
    assert_eq!(dispatched.indicator, Some(Indicator::BrokenHeart));
    assert!(dispatched.acknowledgeable);

    let entries = ledger.list().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].key(), dispatched.key);
    assert_eq!(entries[0].host_name, "web1");
    assert_eq!(entries[0].service_name, None);
    assert_eq!(entries[0].text, render(&event).text);
    assert!(entries[0].created_at.is_some());
}

#[tokio::test]
async fn control_is_attached_with_message_id_payload() {
    let (transport, _ledger, dispatcher) = dispatcher();
    let event = event(NotificationType::Problem, None);

    dispatcher.dispatch(&event, &CHAT).await.unwrap();

    let text = render(&event).text;
    assert_eq!(
        transport.calls(),
        vec![
            Call::Send {
                chat: CHAT,
                text: text.clone(),
            },
            Call::Edit {
                chat_id: -1001,
                message_id: 100,
                text,
                control: Some(ActionControl::acknowledge(100)),
            },
        ]
    );
    assert_eq!(ActionControl::acknowledge(100).payload, "100");
}

#[tokio::test]
async fn service_problem_records_service_name() {
    let (_transport, ledger, dispatcher) = dispatcher();
    let event = event(NotificationType::Problem, Some(("disk", ServiceState::Warning)));

    let dispatched = dispatcher.dispatch(&event, &CHAT).await.unwrap();

    assert_eq!(dispatched.indicator, Some(Indicator::YellowHeart));
    let entry = ledger.get(dispatched.key).unwrap().unwrap();
    assert_eq!(entry.host_name, "web1");
    assert_eq!(entry.service_name.as_deref(), Some("disk"));
}

#[tokio::test]
async fn channel_username_uses_returned_chat_id() {
    let (_transport, ledger, dispatcher) = dispatcher();
    let chat: ChatTarget = "@ops_alerts".parse().unwrap();

    let dispatched = dispatcher
        .dispatch(&event(NotificationType::Problem, None), &chat)
        .await
        .unwrap();

    assert_eq!(dispatched.key.chat_id, CHANNEL_CHAT_ID);
    assert!(ledger.get(LedgerKey::new(CHANNEL_CHAT_ID, 100)).unwrap().is_some());
}

#[tokio::test]
async fn each_problem_gets_its_own_entry() {
    let (_transport, ledger, dispatcher) = dispatcher();
    let problem = event(NotificationType::Problem, None);

    dispatcher.dispatch(&problem, &CHAT).await.unwrap();
    dispatcher.dispatch(&problem, &CHAT).await.unwrap();

    let keys: Vec<_> = ledger.list().unwrap().iter().map(LedgerEntry::key).collect();
    assert_eq!(keys, vec![LedgerKey::new(-1001, 100), LedgerKey::new(-1001, 101)]);
}

// ==================== Non-acknowledgeable ====================

#[tokio::test]
async fn recovery_is_sent_without_control() {
    let (transport, ledger, dispatcher) = dispatcher();

    let dispatched = dispatcher
        .dispatch(&event(NotificationType::Recovery, None), &CHAT)
        .await
        .unwrap();

    assert!(!dispatched.acknowledgeable);
    assert_eq!(dispatched.indicator, Some(Indicator::GreenHeart));
    assert!(ledger.is_empty());
    assert!(transport.edits().is_empty());
}

#[tokio::test]
async fn problem_with_ack_disabled_is_not_recorded() {
    let (transport, ledger, dispatcher) = dispatcher();
    let mut event = event(NotificationType::Problem, None);
    event.ack_enabled = false;

    let dispatched = dispatcher.dispatch(&event, &CHAT).await.unwrap();

    assert!(!dispatched.acknowledgeable);
    assert!(ledger.is_empty());
    assert!(transport.edits().is_empty());
}

#[tokio::test]
async fn indicator_can_be_disabled() {
    let (transport, _ledger, dispatcher) = dispatcher();
    let mut event = event(NotificationType::Problem, None);
    event.use_indicator = false;

    let dispatched = dispatcher.dispatch(&event, &CHAT).await.unwrap();

    assert_eq!(dispatched.indicator, None);
    let Call::Send { text, .. } = &transport.calls()[0] else {
        panic!("expected a send first");
    };
    assert!(text.starts_with("PROBLEM - "));
}

// ==================== Failures ====================

#[tokio::test]
async fn send_failure_leaves_ledger_untouched() {
    let (transport, ledger, dispatcher) = dispatcher();
    transport.fail_send();

    let err = dispatcher
        .dispatch(&event(NotificationType::Problem, None), &CHAT)
        .await
        .unwrap_err();

    assert!(matches!(err, RelayError::Transport(_)));
    assert!(ledger.is_empty());
    assert!(transport.edits().is_empty());
}

#[tokio::test]
async fn edit_failure_keeps_notification_plain() {
    let (transport, ledger, dispatcher) = dispatcher();
    transport.fail_edit();

    let dispatched = dispatcher
        .dispatch(&event(NotificationType::Problem, None), &CHAT)
        .await
        .unwrap();

    assert!(!dispatched.acknowledgeable);
    assert!(ledger.is_empty());
}

#[tokio::test]
async fn ledger_failure_strips_control_and_errors() {
    let (transport, ledger, dispatcher) = dispatcher();
    // Occupy the key the next send will get.
    ledger
        .put(&LedgerEntry::new(LedgerKey::new(-1001, 100), "other", None))
        .unwrap();

    let err = dispatcher
        .dispatch(&event(NotificationType::Problem, None), &CHAT)
        .await
        .unwrap_err();

    assert!(matches!(err, RelayError::Ledger(_)));
    assert_eq!(
        transport.calls().last(),
        Some(&Call::Clear {
            chat_id: -1001,
            message_id: 100,
        })
    );
    assert_eq!(ledger.get(LedgerKey::new(-1001, 100)).unwrap().unwrap().host_name, "other");
}

// ==================== Spool ====================

#[tokio::test]
async fn spool_ledger_writes_entry_file() {
    let dir = tempfile::tempdir().unwrap();
    let spool = SpoolLedger::open(dir.path()).unwrap();
    let dispatcher = Dispatcher::new(FakeTransport::new(), spool);

    let dispatched = dispatcher
        .dispatch(&event(NotificationType::Problem, Some(("http", ServiceState::Critical))), &CHAT)
        .await
        .unwrap();

    let path = dir.path().join("-1001-100.json");
    assert!(path.exists());
    let raw: String = std::fs::read_to_string(path).unwrap();
    assert!(raw.contains("\"hostname\""));
    assert!(raw.contains("\"servicename\""));

    let entry = dispatcher.ledger().get(dispatched.key).unwrap().unwrap();
    assert_eq!(entry.service_name.as_deref(), Some("http"));
}
