//! Client sync worker
//!
//! One background task per signed-in session. Each iteration:
//!
//! 1. heartbeat (active if the UI saw input within the activity window)
//! 2. buddy statuses, at most every `status_interval`
//! 3. typing list, at most every `typing_interval`
//! 4. a short long-poll for messages
//!
//! A transient failure reports `Reconnecting`, waits out the backoff, and
//! restarts the iteration. The backoff only resets once a full iteration,
//! poll included, succeeds. A status or typing request the server rejects as
//! invalid is logged and skipped so the poll still runs. A rejected session
//! reports `Unauthorized`, pauses, and keeps looping so a re-authenticated
//! token can recover it. Every network call and sleep is raced against the
//! stop signal.

mod events;

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use buddy_core::ScreenName;
use parking_lot::RwLock;
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinError, JoinHandle};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::activity::ActivityTracker;
use crate::api::PresenceApi;
use crate::backoff::Backoff;
use crate::config::SyncConfig;
use crate::error::ClientError;

pub use events::{ConnectionState, SyncEvent};

/// State the UI side shares with the running worker
#[derive(Debug)]
struct Shared {
    buddies: RwLock<Vec<ScreenName>>,
    activity: ActivityTracker,
    typing_pending: AtomicBool,
}

/// Control handle for a spawned worker
///
/// Dropping the handle stops the worker as well.
#[derive(Debug)]
pub struct SyncHandle {
    shared: Arc<Shared>,
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SyncHandle {
    /// Replace the set of names whose status is refreshed
    pub fn set_buddies(&self, buddies: Vec<ScreenName>) {
        *self.shared.buddies.write() = buddies;
    }

    /// Record local user input
    pub fn touch(&self) {
        self.shared.activity.touch();
    }

    /// The user is composing; the next typing step marks them as typing
    pub fn notify_typing(&self) {
        self.shared.activity.touch();
        self.shared.typing_pending.store(true, Ordering::Release);
    }

    /// Ask the worker to exit; in-flight requests are abandoned
    pub fn stop(&self) {
        self.stop_tx.send_replace(true);
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the worker task to exit
    pub async fn join(self) -> Result<(), JoinError> {
        let Self { stop_tx, task, .. } = self;
        let result = task.await;
        drop(stop_tx);
        result
    }

    /// Stop the worker and wait for it
    pub async fn shutdown(self) -> Result<(), JoinError> {
        self.stop();
        self.join().await
    }
}

enum Flow {
    Continue,
    Stop,
}

/// Background loop driving one session against a [`PresenceApi`]
pub struct SyncWorker<A: PresenceApi + ?Sized> {
    api: Arc<A>,
    config: SyncConfig,
    shared: Arc<Shared>,
    events: mpsc::UnboundedSender<SyncEvent>,
    stop_rx: watch::Receiver<bool>,
    backoff: Backoff,
    state: ConnectionState,
    last_status: Option<Instant>,
    last_typing: Option<Instant>,
    /// A step after the heartbeat failed and no poll has succeeded since
    degraded: bool,
    /// Buddy list the server last refused; not resent until it changes
    rejected_buddies: Option<Vec<ScreenName>>,
}

impl<A: PresenceApi + ?Sized + 'static> SyncWorker<A> {
    /// Start the worker on the current runtime
    ///
    /// Events arrive on the returned receiver; sending never blocks the
    /// worker, and dropping the receiver stops it.
    pub fn spawn(
        api: Arc<A>,
        config: SyncConfig,
    ) -> (SyncHandle, mpsc::UnboundedReceiver<SyncEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (stop_tx, stop_rx) = watch::channel(false);

        let shared = Arc::new(Shared {
            buddies: RwLock::new(config.buddies.clone()),
            activity: ActivityTracker::new(),
            typing_pending: AtomicBool::new(false),
        });

        let worker = Self {
            api,
            backoff: Backoff::new(config.backoff_initial, config.backoff_max),
            config,
            shared: Arc::clone(&shared),
            events: events_tx,
            stop_rx,
            state: ConnectionState::Connecting,
            last_status: None,
            last_typing: None,
            degraded: false,
            rejected_buddies: None,
        };

        let task = tokio::spawn(worker.run());

        (
            SyncHandle {
                shared,
                stop_tx,
                task,
            },
            events_rx,
        )
    }

    async fn run(mut self) {
        info!("Sync worker started");
        self.emit(SyncEvent::ConnectionChanged(self.state));

        while !self.stop_requested() {
            if let Flow::Stop = self.iteration().await {
                break;
            }
        }

        info!(state = %self.state, "Sync worker stopped");
    }

    fn stop_requested(&self) -> bool {
        *self.stop_rx.borrow() || self.stop_rx.has_changed().is_err() || self.events.is_closed()
    }

    async fn iteration(&mut self) -> Flow {
        let api = Arc::clone(&self.api);

        // 1. Heartbeat
        let active = self.shared.activity.is_active(self.config.activity_window);
        match self.cancellable(api.heartbeat(active)).await {
            None => return Flow::Stop,
            Some(Err(err)) => return self.on_failure("heartbeat", err).await,
            Some(Ok(())) => {
                if !self.degraded {
                    self.backoff.reset();
                    self.set_state(ConnectionState::Connected);
                }
            }
        }

        // 2. Buddy statuses
        if is_due(self.last_status, self.config.status_interval) {
            let buddies = self.shared.buddies.read().clone();
            if buddies.is_empty() || self.rejected_buddies.as_ref() == Some(&buddies) {
                self.last_status = Some(Instant::now());
            } else {
                match self.cancellable(api.statuses(&buddies)).await {
                    None => return Flow::Stop,
                    Some(Err(err)) if err.is_rejected() => {
                        warn!(error = %err, count = buddies.len(), "Status query rejected");
                        self.last_status = Some(Instant::now());
                        self.rejected_buddies = Some(buddies);
                    }
                    Some(Err(err)) => return self.step_failed("status", err).await,
                    Some(Ok(statuses)) => {
                        self.last_status = Some(Instant::now());
                        self.rejected_buddies = None;
                        self.emit(SyncEvent::Statuses(statuses));
                    }
                }
            }
        }

        // 3. Typing
        if is_due(self.last_typing, self.config.typing_interval) {
            let mark = self.shared.typing_pending.swap(false, Ordering::AcqRel);
            match self.cancellable(api.typing(mark)).await {
                None => return Flow::Stop,
                Some(Err(err)) if err.is_rejected() => {
                    warn!(error = %err, mark, "Typing request rejected");
                    self.last_typing = Some(Instant::now());
                }
                Some(Err(err)) => {
                    if mark {
                        self.shared.typing_pending.store(true, Ordering::Release);
                    }
                    return self.step_failed("typing", err).await;
                }
                Some(Ok(typers)) => {
                    self.last_typing = Some(Instant::now());
                    self.emit(SyncEvent::Typing(typers));
                }
            }
        }

        // 4. Messages
        let poll_timeout = self.config.poll_timeout;
        match self.cancellable(api.poll(poll_timeout)).await {
            None => Flow::Stop,
            Some(Err(err)) => self.step_failed("poll", err).await,
            Some(Ok(messages)) => {
                self.degraded = false;
                self.backoff.reset();
                self.set_state(ConnectionState::Connected);
                if !messages.is_empty() {
                    debug!(count = messages.len(), "Messages received");
                    self.emit(SyncEvent::Messages(messages));
                }
                Flow::Continue
            }
        }
    }

    /// Failure after the heartbeat went through; heartbeats alone no longer
    /// count as recovery until a poll succeeds
    async fn step_failed(&mut self, step: &'static str, err: ClientError) -> Flow {
        if !err.is_unauthorized() {
            self.degraded = true;
        }
        self.on_failure(step, err).await
    }

    async fn on_failure(&mut self, step: &'static str, err: ClientError) -> Flow {
        if err.is_unauthorized() {
            warn!(step, error = %err, "Session rejected");
            self.set_state(ConnectionState::Unauthorized);
            let pause = self.config.unauthorized_pause;
            return self.pause(pause).await;
        }

        let delay = self.backoff.next_delay();
        warn!(
            step,
            error = %err,
            delay_ms = delay.as_millis() as u64,
            "Sync step failed, backing off"
        );
        self.set_state(ConnectionState::Reconnecting);
        self.pause(delay).await
    }

    async fn pause(&mut self, duration: Duration) -> Flow {
        match self.cancellable(tokio::time::sleep(duration)).await {
            Some(()) => Flow::Continue,
            None => Flow::Stop,
        }
    }

    /// Run `fut` unless the stop signal arrives first
    async fn cancellable<F: Future>(&mut self, fut: F) -> Option<F::Output> {
        tokio::select! {
            biased;
            () = stopped(&mut self.stop_rx) => None,
            output = fut => Some(output),
        }
    }

    fn set_state(&mut self, state: ConnectionState) {
        if self.state == state {
            return;
        }
        info!(from = %self.state, to = %state, "Connection state changed");
        self.state = state;
        self.emit(SyncEvent::ConnectionChanged(state));
    }

    fn emit(&self, event: SyncEvent) {
        if self.events.send(event).is_err() {
            debug!("Event receiver dropped");
        }
    }
}

/// Resolves once stop is requested or the handle is gone
async fn stopped(stop: &mut watch::Receiver<bool>) {
    let _ = stop.wait_for(|stopped| *stopped).await;
}

fn is_due(last: Option<Instant>, interval: Duration) -> bool {
    match last {
        Some(at) => at.elapsed() >= interval,
        None => true,
    }
}
