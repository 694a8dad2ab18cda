//! Presence protocol client
//!
//! [`PresenceApi`] is the seam the sync worker talks through; the HTTP
//! implementation lives in [`http`].

mod http;

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use buddy_core::{Message, PresenceStatus, ScreenName};

use crate::error::ClientResult;

pub use http::HttpPresenceClient;

/// Operations of the presence and messaging wire protocol
#[async_trait]
pub trait PresenceApi: Send + Sync {
    /// POST /presence/heartbeat
    async fn heartbeat(&self, active: bool) -> ClientResult<()>;

    /// GET /presence/status
    async fn statuses(
        &self,
        names: &[ScreenName],
    ) -> ClientResult<BTreeMap<ScreenName, PresenceStatus>>;

    /// POST /messages/typing when `mark` is set, GET otherwise
    async fn typing(&self, mark: bool) -> ClientResult<Vec<ScreenName>>;

    /// GET /messages/poll, held open for up to `timeout`
    async fn poll(&self, timeout: Duration) -> ClientResult<Vec<Message>>;

    /// POST /messages/send
    async fn send(
        &self,
        to: &ScreenName,
        content: &str,
        content_html: Option<&str>,
    ) -> ClientResult<()>;
}
