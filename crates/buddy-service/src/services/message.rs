//! Message service
//!
//! Handles sending messages into recipient mailboxes and long-polling the
//! caller's own mailbox.

use std::time::Duration;

use buddy_core::{DomainError, Message, ScreenName};
use tracing::{debug, info, instrument};

use crate::dto::SendMessageRequest;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::long_poll::{self, PollOutcome};

/// Message service
pub struct MessageService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MessageService<'a> {
    /// Create a new MessageService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Queue a message for its recipient
    ///
    /// The recipient need not have ever been seen. Sending also clears the
    /// sender's typing marker.
    #[instrument(skip(self, request), fields(from = %from))]
    pub fn send(&self, from: &ScreenName, request: SendMessageRequest) -> ServiceResult<Message> {
        let to = ScreenName::parse(&request.to)?;

        if request.content.trim().is_empty() {
            return Err(DomainError::EmptyContent.into());
        }
        let max = self.ctx.messaging().max_content_length;
        if request.content.chars().count() > max {
            return Err(DomainError::ContentTooLong { max }.into());
        }

        let content_html = request.content_html.filter(|html| !html.trim().is_empty());
        let message = Message::new(
            from.clone(),
            to,
            request.content,
            content_html,
            self.ctx.clock().now(),
        );

        let pending = self.ctx.mailbox().enqueue(message.clone());
        self.ctx.typing_store().clear(from.as_str());

        info!(
            message_id = %message.id,
            to = %message.to,
            pending,
            "Message queued"
        );

        Ok(message)
    }

    /// Turn the client's `timeout` parameter into a bounded wait
    ///
    /// Absent means the configured default; values above the cap are
    /// clamped; negative or non-finite values are rejected.
    pub fn resolve_timeout(&self, requested: Option<f64>) -> ServiceResult<Duration> {
        let messaging = self.ctx.messaging();
        let Some(secs) = requested else {
            return Ok(messaging.default_poll_timeout().min(messaging.max_poll_timeout()));
        };

        if !secs.is_finite() || secs < 0.0 {
            return Err(ServiceError::validation(
                "timeout must be a non-negative number of seconds",
            ));
        }

        let cap = messaging.max_poll_timeout();
        Ok(Duration::from_secs_f64(secs.min(cap.as_secs_f64())))
    }

    /// Long-poll the caller's mailbox
    ///
    /// Returns every message pending at wake-up, oldest first, or an empty
    /// list once the timeout elapses.
    #[instrument(skip(self), fields(screen_name = %name))]
    pub async fn poll(&self, name: &ScreenName, timeout: Option<f64>) -> ServiceResult<Vec<Message>> {
        let timeout = self.resolve_timeout(timeout)?;
        let waiter = self.ctx.mailbox().waiter(name);

        let outcome =
            long_poll::wait_for_messages(&waiter, timeout, self.ctx.messaging().poll_interval())
                .await;

        match outcome {
            PollOutcome::HasData(messages) => {
                debug!(count = messages.len(), "Poll delivered messages");
                Ok(messages)
            }
            PollOutcome::TimedOut => {
                debug!(timeout_ms = timeout.as_millis(), "Poll timed out");
                Ok(Vec::new())
            }
        }
    }
}
