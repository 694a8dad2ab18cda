//! Authentication extractor
//!
//! Resolves the caller's screen name from the session token in the
//! Authorization header. Every presence and messaging endpoint fails closed
//! without one.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use buddy_core::ScreenName;

use crate::response::ApiError;
use crate::state::AppState;

/// Authenticated caller extracted from the session token
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Screen name carried by the token's subject
    pub screen_name: ScreenName,
}

impl AuthUser {
    /// Create a new AuthUser
    pub fn new(screen_name: ScreenName) -> Self {
        Self { screen_name }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Extract the Authorization header
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::MissingAuth)?;

        let app_state = AppState::from_ref(state);

        let screen_name = app_state
            .session_tokens()
            .authenticate(bearer.token())
            .map_err(|e| {
                tracing::debug!(error = %e, "Session token rejected");
                ApiError::App(e)
            })?;

        Ok(AuthUser::new(screen_name))
    }
}
