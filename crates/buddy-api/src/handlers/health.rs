//! Health check handler

use axum::{extract::State, Json};
use buddy_service::HealthResponse;

use crate::state::AppState;

/// Liveness probe with store gauges
///
/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let ctx = state.service_context();

    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        presences: ctx.presence_store().len(),
        mailboxes: ctx.mailbox().recipients(),
        pending_messages: ctx.mailbox().total_pending(),
        typing_markers: ctx.typing_store().len(),
    })
}
