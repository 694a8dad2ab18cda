//! Client Sync Worker Integration Tests
//!
//! Drives the real HTTP client and sync worker against an in-process server.
//!
//! Run with: cargo test -p integration-tests --test client_tests

use std::sync::Arc;
use std::time::Duration;

use buddy_client::{
    ConnectionState, HttpPresenceClient, PresenceApi, SyncConfig, SyncEvent, SyncWorker,
};
use buddy_core::{PresenceStatus, ScreenName};
use integration_tests::TestServer;
use tokio::sync::mpsc::UnboundedReceiver;

fn name(s: &str) -> ScreenName {
    ScreenName::parse(s).unwrap()
}

fn fast_config(buddies: Vec<ScreenName>) -> SyncConfig {
    SyncConfig {
        status_interval: Duration::from_millis(200),
        typing_interval: Duration::from_millis(100),
        poll_timeout: Duration::from_millis(500),
        ..SyncConfig::with_buddies(buddies)
    }
}

/// Wait up to `limit` for an event matching `pick`
async fn next_matching<T>(
    events: &mut UnboundedReceiver<SyncEvent>,
    limit: Duration,
    mut pick: impl FnMut(SyncEvent) -> Option<T>,
) -> Option<T> {
    tokio::time::timeout(limit, async {
        while let Some(event) = events.recv().await {
            if let Some(found) = pick(event) {
                return Some(found);
            }
        }
        None
    })
    .await
    .ok()
    .flatten()
}

#[tokio::test]
async fn test_worker_connects_and_sees_buddy_online() {
    let server = TestServer::start().await.expect("Failed to start server");

    let alice = Arc::new(
        HttpPresenceClient::new(server.base_url(), server.token_for("alice").unwrap()).unwrap(),
    );
    let bob = HttpPresenceClient::new(server.base_url(), server.token_for("bob").unwrap()).unwrap();
    bob.heartbeat(true).await.unwrap();

    let (handle, mut events) = SyncWorker::spawn(alice, fast_config(vec![name("bob")]));

    let connected = next_matching(&mut events, Duration::from_secs(5), |event| match event {
        SyncEvent::ConnectionChanged(ConnectionState::Connected) => Some(()),
        _ => None,
    })
    .await;
    assert!(connected.is_some());

    let statuses = next_matching(&mut events, Duration::from_secs(5), |event| match event {
        SyncEvent::Statuses(statuses) => Some(statuses),
        _ => None,
    })
    .await
    .expect("no status event");
    assert_eq!(statuses[&name("bob")], PresenceStatus::Online);

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_worker_receives_messages() {
    let server = TestServer::start().await.expect("Failed to start server");

    let bob = Arc::new(
        HttpPresenceClient::new(server.base_url(), server.token_for("bob").unwrap()).unwrap(),
    );
    let alice =
        HttpPresenceClient::new(server.base_url(), server.token_for("alice").unwrap()).unwrap();

    let (handle, mut events) = SyncWorker::spawn(bob, fast_config(Vec::new()));

    alice.send(&name("bob"), "hello bob", None).await.unwrap();
    alice
        .send(&name("bob"), "are you there?", Some("<i>are you there?</i>"))
        .await
        .unwrap();

    let mut received = Vec::new();
    while received.len() < 2 {
        let batch = next_matching(&mut events, Duration::from_secs(5), |event| match event {
            SyncEvent::Messages(messages) => Some(messages),
            _ => None,
        })
        .await
        .expect("messages not delivered");
        received.extend(batch);
    }

    assert_eq!(received[0].content, "hello bob");
    assert_eq!(received[1].content, "are you there?");
    assert_eq!(received[1].content_html.as_deref(), Some("<i>are you there?</i>"));
    assert!(received.iter().all(|m| m.from.as_str() == "alice"));

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_worker_with_long_buddy_list() {
    let server = TestServer::start().await.expect("Failed to start server");

    let bob = Arc::new(
        HttpPresenceClient::new(server.base_url(), server.token_for("bob").unwrap()).unwrap(),
    );
    let alice =
        HttpPresenceClient::new(server.base_url(), server.token_for("alice").unwrap()).unwrap();
    alice.heartbeat(true).await.unwrap();

    // One more than a single status query accepts
    let mut buddies: Vec<ScreenName> = (0..500).map(|i| name(&format!("pal{i}"))).collect();
    buddies.push(name("alice"));

    let (handle, mut events) = SyncWorker::spawn(bob, fast_config(buddies));
    alice.send(&name("bob"), "over the limit", None).await.unwrap();

    let statuses = next_matching(&mut events, Duration::from_secs(5), |event| match event {
        SyncEvent::Statuses(statuses) => Some(statuses),
        _ => None,
    })
    .await
    .expect("no status event");
    assert_eq!(statuses.len(), 501);
    assert_eq!(statuses[&name("alice")], PresenceStatus::Online);
    assert_eq!(statuses[&name("pal0")], PresenceStatus::Offline);

    let messages = next_matching(&mut events, Duration::from_secs(5), |event| match event {
        SyncEvent::Messages(messages) => Some(messages),
        _ => None,
    })
    .await
    .expect("messages not delivered");
    assert_eq!(messages[0].content, "over the limit");

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_worker_reports_unauthorized() {
    let server = TestServer::start().await.expect("Failed to start server");

    let api = Arc::new(HttpPresenceClient::new(server.base_url(), "bogus-token").unwrap());
    let (handle, mut events) = SyncWorker::spawn(api, fast_config(Vec::new()));

    let state = next_matching(&mut events, Duration::from_secs(5), |event| match event {
        SyncEvent::ConnectionChanged(ConnectionState::Unauthorized) => Some(()),
        _ => None,
    })
    .await;
    assert!(state.is_some());

    // Still running; stop is honoured during the unauthorized pause
    assert!(!handle.is_finished());
    tokio::time::timeout(Duration::from_secs(1), handle.shutdown())
        .await
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn test_worker_reconnects_when_server_unreachable() {
    // Bind then drop a listener to get a port nothing listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = Arc::new(HttpPresenceClient::new(format!("http://{addr}"), "token").unwrap());
    let (handle, mut events) = SyncWorker::spawn(api, fast_config(Vec::new()));

    let state = next_matching(&mut events, Duration::from_secs(5), |event| match event {
        SyncEvent::ConnectionChanged(ConnectionState::Reconnecting) => Some(()),
        _ => None,
    })
    .await;
    assert!(state.is_some());

    tokio::time::timeout(Duration::from_secs(1), handle.shutdown())
        .await
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn test_worker_typing_round_trip() {
    let server = TestServer::start().await.expect("Failed to start server");

    let alice = Arc::new(
        HttpPresenceClient::new(server.base_url(), server.token_for("alice").unwrap()).unwrap(),
    );
    let bob = HttpPresenceClient::new(server.base_url(), server.token_for("bob").unwrap()).unwrap();

    let (handle, _events) = SyncWorker::spawn(alice, fast_config(Vec::new()));
    handle.notify_typing();

    let mut seen = Vec::new();
    for _ in 0..20 {
        seen = bob.typing(false).await.unwrap();
        if !seen.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert_eq!(seen, vec![name("alice")]);

    handle.shutdown().await.unwrap();
}
