//! Buddy API server entry point
//!
//! Run with:
//! ```bash
//! SESSION_SECRET=change-me cargo run -p buddy-api
//! ```
//!
//! Configuration is loaded from environment variables (and `.env` if present).

use anyhow::Context;
use buddy_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!(error = %e, "Server failed to start");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    // Load configuration
    let config = AppConfig::from_env().context("failed to load configuration")?;

    // Initialize tracing
    let tracing_config = TracingConfig::for_environment(config.app.env);
    if let Err(e) = try_init_tracing_with_config(&tracing_config) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        address = %config.api.address(),
        max_poll_secs = config.messaging.max_poll_timeout_secs,
        "Starting Buddy API Server..."
    );

    buddy_api::run(config).await?;

    Ok(())
}
