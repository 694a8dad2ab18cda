//! API Integration Tests
//!
//! Each test starts its own in-process server on an ephemeral port; no
//! external services are needed.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use std::time::{Duration, Instant};

use integration_tests::{assert_json, assert_status, fixtures::*, TestServer};
use reqwest::StatusCode;

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get("/health").await.expect("Request failed");
    let health: HealthResponse = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(health.status, "ok");
    assert_eq!(health.presences, 0);
    assert_eq!(health.pending_messages, 0);
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_endpoints_require_auth() {
    let server = TestServer::start().await.expect("Failed to start server");

    for path in [
        "/presence/status?names=alice",
        "/messages/poll?timeout=0",
        "/messages/typing",
    ] {
        let response = server.get(path).await.unwrap();
        let error: ErrorResponse = assert_json(response, StatusCode::UNAUTHORIZED)
            .await
            .unwrap();
        assert!(!error.ok);
        assert_eq!(error.error.code, "UNAUTHORIZED", "path {path}");
    }

    let response = server
        .post("/messages/send", &SendRequest::text("bob", "hi"))
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_invalid_token_rejected() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server
        .get_auth("/messages/typing", "not-a-real-token")
        .await
        .unwrap();
    let error: ErrorResponse = assert_json(response, StatusCode::UNAUTHORIZED)
        .await
        .unwrap();
    assert_eq!(error.error.code, "INVALID_TOKEN");
}

// ============================================================================
// Presence Tests
// ============================================================================

#[tokio::test]
async fn test_heartbeat_then_status() {
    let server = TestServer::start().await.expect("Failed to start server");
    let alice = unique_name("alice");
    let token = server.token_for(&alice).unwrap();

    let response = server
        .post_auth(
            "/presence/heartbeat",
            &token,
            &HeartbeatRequest { active: true },
        )
        .await
        .unwrap();
    let ack: AckResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(ack.ok);

    let path = format!("/presence/status?names={alice},nobody");
    let response = server.get_auth(&path, &token).await.unwrap();
    let body: StatusResponse = assert_json(response, StatusCode::OK).await.unwrap();

    assert!(body.ok);
    assert_eq!(body.statuses[&alice], "online");
    assert_eq!(body.statuses["nobody"], "offline");
}

#[tokio::test]
async fn test_heartbeat_accepts_empty_body() {
    let server = TestServer::start().await.expect("Failed to start server");
    let token = server.token_for(&unique_name("carol")).unwrap();

    let response = server
        .post_empty_auth("/presence/heartbeat", &token)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_status_without_names_is_empty() {
    let server = TestServer::start().await.expect("Failed to start server");
    let token = server.token_for("dave").unwrap();

    let response = server.get_auth("/presence/status", &token).await.unwrap();
    let body: StatusResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(body.statuses.is_empty());
}

// ============================================================================
// Message Tests
// ============================================================================

#[tokio::test]
async fn test_send_then_poll_in_order() {
    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.token_for("alice").unwrap();
    let bob = server.token_for("bob").unwrap();

    for content in ["first", "second", "third"] {
        let response = server
            .post_auth("/messages/send", &alice, &SendRequest::text("bob", content))
            .await
            .unwrap();
        assert_status(response, StatusCode::OK).await.unwrap();
    }

    let response = server
        .get_auth("/messages/poll?timeout=1", &bob)
        .await
        .unwrap();
    let body: PollResponse = assert_json(response, StatusCode::OK).await.unwrap();

    let contents: Vec<_> = body.messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, ["first", "second", "third"]);
    assert!(body.messages.iter().all(|m| m.from == "alice" && m.to == "bob"));

    // Drained: the next poll finds nothing
    let response = server
        .get_auth("/messages/poll?timeout=0", &bob)
        .await
        .unwrap();
    let body: PollResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(body.messages.is_empty());
}

#[tokio::test]
async fn test_send_preserves_html() {
    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.token_for("alice").unwrap();
    let bob = server.token_for("bob").unwrap();

    let request = SendRequest {
        to: "bob".to_string(),
        content: "bold".to_string(),
        content_html: Some("<b>bold</b>".to_string()),
    };
    server
        .post_auth("/messages/send", &alice, &request)
        .await
        .unwrap();

    let response = server
        .get_auth("/messages/poll?timeout=0", &bob)
        .await
        .unwrap();
    let body: PollResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body.messages[0].content_html.as_deref(), Some("<b>bold</b>"));
}

#[tokio::test]
async fn test_send_validation() {
    let server = TestServer::start().await.expect("Failed to start server");
    let token = server.token_for("alice").unwrap();

    let cases = [
        serde_json::json!({"to": "bob"}),
        serde_json::json!({"content": "hi"}),
        serde_json::json!({"to": "", "content": "hi"}),
        serde_json::json!({"to": "bob", "content": "   "}),
    ];
    for body in cases {
        let response = server
            .post_auth("/messages/send", &token, &body)
            .await
            .unwrap();
        let error: ErrorResponse = assert_json(response, StatusCode::BAD_REQUEST)
            .await
            .unwrap();
        assert!(!error.ok, "body {body}");
    }

    assert_eq!(server.state.service_context().mailbox().total_pending(), 0);
}

#[tokio::test]
async fn test_poll_times_out_empty() {
    let server = TestServer::start().await.expect("Failed to start server");
    let token = server.token_for(&unique_name("lonely")).unwrap();

    let started = Instant::now();
    let response = server
        .get_auth("/messages/poll?timeout=1", &token)
        .await
        .unwrap();
    let elapsed = started.elapsed();

    let body: PollResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(body.messages.is_empty());
    assert!(elapsed >= Duration::from_secs(1));
    assert!(elapsed < Duration::from_millis(1_500));
}

#[tokio::test]
async fn test_poll_wakes_on_send() {
    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.token_for("alice").unwrap();
    let bob = server.token_for("bob").unwrap();

    let poll = {
        let client = server.client.clone();
        let url = format!("{}/messages/poll?timeout=10", server.base_url());
        let bob = bob.clone();
        tokio::spawn(async move {
            let started = Instant::now();
            let response = client.get(url).bearer_auth(bob).send().await.unwrap();
            let body: PollResponse = response.json().await.unwrap();
            (body, started.elapsed())
        })
    };

    tokio::time::sleep(Duration::from_millis(300)).await;
    server
        .post_auth("/messages/send", &alice, &SendRequest::text("bob", "wake up"))
        .await
        .unwrap();

    let (body, elapsed) = poll.await.unwrap();
    assert_eq!(body.messages.len(), 1);
    assert_eq!(body.messages[0].content, "wake up");
    assert!(elapsed < Duration::from_secs(5));
}

#[tokio::test]
async fn test_concurrent_polls_deliver_once() {
    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.token_for("alice").unwrap();
    let bob = server.token_for("bob").unwrap();

    let polls: Vec<_> = (0..3)
        .map(|_| {
            let client = server.client.clone();
            let url = format!("{}/messages/poll?timeout=2", server.base_url());
            let bob = bob.clone();
            tokio::spawn(async move {
                let response = client.get(url).bearer_auth(bob).send().await.unwrap();
                response.json::<PollResponse>().await.unwrap().messages.len()
            })
        })
        .collect();

    tokio::time::sleep(Duration::from_millis(200)).await;
    server
        .post_auth("/messages/send", &alice, &SendRequest::text("bob", "once"))
        .await
        .unwrap();

    let mut delivered = 0;
    for poll in polls {
        delivered += poll.await.unwrap();
    }
    assert_eq!(delivered, 1);
}

#[tokio::test]
async fn test_poll_rejects_bad_timeout() {
    let server = TestServer::start().await.expect("Failed to start server");
    let token = server.token_for("bob").unwrap();

    for query in ["timeout=-5", "timeout=soon"] {
        let response = server
            .get_auth(&format!("/messages/poll?{query}"), &token)
            .await
            .unwrap();
        assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
    }
}

// ============================================================================
// Typing Tests
// ============================================================================

#[tokio::test]
async fn test_typing_visible_to_others() {
    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.token_for("alice").unwrap();
    let bob = server.token_for("bob").unwrap();

    let response = server
        .post_empty_auth("/messages/typing", &alice)
        .await
        .unwrap();
    let own: TypingResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(own.ok);
    assert!(own.typing.is_empty());

    let response = server.get_auth("/messages/typing", &bob).await.unwrap();
    let theirs: TypingResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(theirs.typing, ["alice"]);

    // Sending stops the sender's typing marker
    server
        .post_auth("/messages/send", &alice, &SendRequest::text("bob", "done"))
        .await
        .unwrap();
    let response = server.get_auth("/messages/typing", &bob).await.unwrap();
    let after: TypingResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(after.typing.is_empty());
}

#[tokio::test]
async fn test_typing_get_does_not_mark() {
    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.token_for("alice").unwrap();
    let bob = server.token_for("bob").unwrap();

    server.get_auth("/messages/typing", &alice).await.unwrap();

    let response = server.get_auth("/messages/typing", &bob).await.unwrap();
    let body: TypingResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(body.typing.is_empty());
}
