//! Route definitions
//!
//! Presence and messaging routes plus the unauthenticated health probe.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{health, messages, presence};
use crate::state::AppState;

/// Create the API router with all presence and messaging routes
pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(presence_routes())
        .merge(message_routes())
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health::health_check))
}

/// Presence routes
fn presence_routes() -> Router<AppState> {
    Router::new()
        .route("/presence/heartbeat", post(presence::heartbeat))
        .route("/presence/status", get(presence::get_statuses))
}

/// Message routes
fn message_routes() -> Router<AppState> {
    Router::new()
        .route("/messages/send", post(messages::send_message))
        .route("/messages/poll", get(messages::poll_messages))
        .route(
            "/messages/typing",
            get(messages::get_typing).post(messages::mark_typing),
        )
}
