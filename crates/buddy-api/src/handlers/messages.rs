//! Message handlers
//!
//! Endpoints for sending, long-polling, and typing signals.

use axum::{extract::State, Json};
use buddy_service::{
    AckResponse, MessageService, PollQuery, PollResponse, SendMessageRequest, TypingResponse,
    TypingService,
};

use crate::extractors::{ApiQuery, AuthUser, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// Send a message
///
/// POST /messages/send
pub async fn send_message(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<SendMessageRequest>,
) -> ApiResult<Json<AckResponse>> {
    let service = MessageService::new(state.service_context());
    service.send(&auth.screen_name, request)?;
    Ok(Json(AckResponse::ok()))
}

/// Long-poll the caller's mailbox
///
/// GET /messages/poll?timeout=N
pub async fn poll_messages(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(query): ApiQuery<PollQuery>,
) -> ApiResult<Json<PollResponse>> {
    let service = MessageService::new(state.service_context());
    let messages = service.poll(&auth.screen_name, query.timeout).await?;
    Ok(Json(PollResponse::new(messages)))
}

/// List who else is typing
///
/// GET /messages/typing
pub async fn get_typing(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<TypingResponse>> {
    let service = TypingService::new(state.service_context());
    Ok(Json(TypingResponse::new(service.list(&auth.screen_name))))
}

/// Mark the caller as typing and list who else is
///
/// POST /messages/typing
pub async fn mark_typing(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<TypingResponse>> {
    let service = TypingService::new(state.service_context());
    Ok(Json(TypingResponse::new(
        service.mark_and_list(&auth.screen_name),
    )))
}
