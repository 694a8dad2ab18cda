//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use buddy_common::{AppConfig, AppError};
use buddy_service::ServiceContext;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::middleware::{apply_middleware, apply_rate_limit};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the application with all routes and the common middleware
///
/// No rate limit is applied; [`run`] adds it for the served process.
pub fn create_app(state: AppState) -> Router {
    let router = create_router().merge(health_routes());
    let config = state.config();
    let router = apply_middleware(
        router,
        &config.http,
        &config.cors,
        config.app.env.is_production(),
    );
    router.with_state(state)
}

/// Build the application with the per-session rate limit on the API routes
///
/// The health probe stays outside the limit.
pub fn create_rate_limited_app(state: AppState) -> Result<Router, AppError> {
    let config = state.config();
    let tokens = state.session_tokens().clone();
    let router =
        apply_rate_limit(create_router(), &config.rate_limit, tokens)?.merge(health_routes());
    let router = apply_middleware(
        router,
        &config.http,
        &config.cors,
        config.app.env.is_production(),
    );
    Ok(router.with_state(state))
}

/// Create fresh in-memory stores and wrap them in AppState
pub fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    config
        .validate()
        .map_err(|e| AppError::Config(e.to_string()))?;

    let service_context = ServiceContext::from_config(&config)
        .map_err(|e| AppError::Config(e.to_string()))?;
    Ok(AppState::new(service_context, config))
}

/// Periodically drop expired typing markers
///
/// Reads already ignore expired markers; this only bounds memory for names
/// that stop typing and never come back.
pub fn spawn_typing_sweeper(state: &AppState) -> JoinHandle<()> {
    let state = state.clone();
    let period = Duration::from_secs(state.config().presence.typing_ttl_secs.max(1));

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let purged = state.service_context().typing_store().purge_expired();
            if purged > 0 {
                debug!(purged, "Expired typing markers swept");
            }
        }
    })
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid listen address: {e}")))?;

    let state = create_app_state(config)?;
    let sweeper = spawn_typing_sweeper(&state);
    let app = create_rate_limited_app(state)?;

    let result = run_server(app, addr).await;
    sweeper.abort();
    result
}
