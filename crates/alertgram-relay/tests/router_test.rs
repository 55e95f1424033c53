//! Integration tests for the daemon event router.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use alertgram_ledger::{Ledger, LedgerEntry, LedgerKey, MemoryLedger};
use alertgram_relay::{AckHandler, BotCommand, ChatTarget, InboundEvent, Router};
use helpers::{action, Call, FakeMonitoring, FakeTransport};
use tokio::sync::mpsc;

fn router(monitoring: FakeMonitoring) -> (FakeTransport, Arc<MemoryLedger>, Router<FakeTransport, FakeMonitoring, Arc<MemoryLedger>>) {
    let transport = FakeTransport::new();
    let ledger = Arc::new(MemoryLedger::new());
    let handler = AckHandler::new(transport.clone(), monitoring, Arc::clone(&ledger));
    (transport, ledger, Router::new(handler))
}

#[tokio::test]
async fn whoami_replies_with_chat_id() {
    let (transport, _ledger, router) = router(FakeMonitoring::new());
    let (tx, rx) = mpsc::channel(8);

    tx.send(InboundEvent::Command {
        chat_id: 4242,
        command: BotCommand::WhoAmI,
    })
    .await
    .unwrap();
    tx.send(InboundEvent::Command {
        chat_id: -77,
        command: BotCommand::Start,
    })
    .await
    .unwrap();
    drop(tx);
    router.run(rx).await;

    assert_eq!(
        transport.calls(),
        vec![
            Call::Send {
                chat: ChatTarget::Id(4242),
                text: "Your chat ID is: 4242".into(),
            },
            Call::Send {
                chat: ChatTarget::Id(-77),
                text: "Your chat ID is: -77".into(),
            },
        ]
    );
}

#[tokio::test]
async fn actions_finish_before_run_returns() {
    let monitoring = FakeMonitoring::slow(Duration::from_millis(30));
    let (transport, ledger, router) = router(monitoring.clone());
    for message_id in [1, 2, 3] {
        ledger
            .put(&LedgerEntry::new(LedgerKey::new(-1001, message_id), format!("web{message_id}"), None))
            .unwrap();
    }

    let (tx, rx) = mpsc::channel(8);
    for payload in ["1", "2", "3"] {
        tx.send(InboundEvent::Action(action(-1001, payload, "alice")))
            .await
            .unwrap();
    }
    drop(tx);
    router.run(rx).await;

    assert_eq!(monitoring.requests().len(), 3);
    assert!(ledger.is_empty());
    assert_eq!(transport.answers().len(), 3);
}

#[tokio::test]
async fn duplicate_actions_through_router_acknowledge_once() {
    let monitoring = FakeMonitoring::slow(Duration::from_millis(30));
    let (_transport, ledger, router) = router(monitoring.clone());
    ledger
        .put(&LedgerEntry::new(LedgerKey::new(-1001, 5), "web1", None))
        .unwrap();

    let (tx, rx) = mpsc::channel(8);
    tx.send(InboundEvent::Action(action(-1001, "5", "alice"))).await.unwrap();
    tx.send(InboundEvent::Action(action(-1001, "5", "bob"))).await.unwrap();
    drop(tx);
    router.run(rx).await;

    assert_eq!(monitoring.requests().len(), 1);
    assert!(ledger.is_empty());
}
