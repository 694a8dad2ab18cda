//! Headless buddy client
//!
//! Runs the sync worker against a server and logs every event. Lines typed
//! on stdin as `<name> <text>` are sent as messages.
//!
//! ```bash
//! BUDDY_TOKEN=... BUDDY_BUDDIES=alice,bob cargo run -p buddy-client
//! ```

use std::sync::Arc;

use anyhow::Context;
use buddy_client::{
    ClientEnv, HttpPresenceClient, PresenceApi, SyncConfig, SyncEvent, SyncWorker,
};
use buddy_common::try_init_tracing;
use buddy_core::ScreenName;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    if let Err(e) = try_init_tracing() {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    if let Err(e) = run().await {
        error!(error = %e, "Client failed");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let env = ClientEnv::from_env().context("failed to load client configuration")?;
    info!(
        server = %env.server_url,
        buddies = env.buddies.len(),
        "Starting buddy client"
    );

    let api = Arc::new(HttpPresenceClient::new(&env.server_url, &env.token)?);
    let (handle, mut events) =
        SyncWorker::spawn(Arc::clone(&api), SyncConfig::with_buddies(env.buddies));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(event) => log_event(&event),
                None => break,
            },
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) => {
                    handle.touch();
                    send_line(api.as_ref(), &line).await;
                }
                // Keep syncing until interrupted
                Ok(None) => stdin_open = false,
                Err(e) => {
                    warn!(error = %e, "Failed to read stdin");
                    stdin_open = false;
                }
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    info!("Shutting down");
    handle.shutdown().await?;
    Ok(())
}

fn log_event(event: &SyncEvent) {
    match event {
        SyncEvent::ConnectionChanged(state) => info!(%state, "Connection"),
        SyncEvent::Statuses(statuses) => {
            for (name, status) in statuses {
                info!(buddy = %name, %status, "Status");
            }
        }
        SyncEvent::Typing(typers) if !typers.is_empty() => {
            let names: Vec<&str> = typers.iter().map(ScreenName::as_str).collect();
            info!(typing = %names.join(", "), "Typing");
        }
        SyncEvent::Typing(_) => {}
        SyncEvent::Messages(messages) => {
            for message in messages {
                info!(
                    from = %message.from,
                    at = %message.timestamp,
                    "{}",
                    message.content
                );
            }
        }
    }
}

async fn send_line(api: &dyn PresenceApi, line: &str) {
    let Some((to, content)) = line.trim().split_once(char::is_whitespace) else {
        warn!("Expected `<name> <message>`");
        return;
    };

    let to = match ScreenName::parse(to) {
        Ok(to) => to,
        Err(e) => {
            warn!(error = %e, "Invalid recipient");
            return;
        }
    };

    if let Err(e) = api.send(&to, content.trim(), None).await {
        warn!(error = %e, to = %to, "Send failed");
    }
}
