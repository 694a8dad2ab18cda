//! Presence handlers
//!
//! Endpoints for heartbeats and buddy status queries.

use axum::{extract::State, Json};
use buddy_service::{AckResponse, HeartbeatRequest, PresenceService, StatusQuery, StatusResponse};

use crate::extractors::{ApiQuery, AuthUser, OptionalValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// Record a heartbeat for the caller
///
/// POST /presence/heartbeat
pub async fn heartbeat(
    State(state): State<AppState>,
    auth: AuthUser,
    OptionalValidatedJson(request): OptionalValidatedJson<HeartbeatRequest>,
) -> ApiResult<Json<AckResponse>> {
    let service = PresenceService::new(state.service_context());
    service.heartbeat(&auth.screen_name, &request.unwrap_or_default());
    Ok(Json(AckResponse::ok()))
}

/// Statuses for a comma-separated list of names
///
/// GET /presence/status?names=a,b,c
pub async fn get_statuses(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiQuery(query): ApiQuery<StatusQuery>,
) -> ApiResult<Json<StatusResponse>> {
    let service = PresenceService::new(state.service_context());
    let statuses = service.statuses(query.names.as_deref())?;
    Ok(Json(StatusResponse::new(statuses)))
}
