//! reqwest implementation of [`PresenceApi`]

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use buddy_core::{Message, PresenceStatus, ScreenName};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::PresenceApi;
use crate::error::{ClientError, ClientResult};

/// Slack on top of the long-poll timeout before the request itself times out
const POLL_GRACE: Duration = Duration::from_secs(10);

/// Timeout for every non-polling request
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Server cap on names in one status query; longer lists are split
const MAX_NAMES_PER_QUERY: usize = 500;

#[derive(Debug, Deserialize)]
struct StatusBody {
    statuses: BTreeMap<ScreenName, PresenceStatus>,
}

#[derive(Debug, Deserialize)]
struct TypingBody {
    typing: Vec<ScreenName>,
}

#[derive(Debug, Deserialize)]
struct PollBody {
    messages: Vec<Message>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

#[derive(Debug, Serialize)]
struct HeartbeatBody {
    active: bool,
}

#[derive(Debug, Serialize)]
struct SendBody<'a> {
    to: &'a str,
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    content_html: Option<&'a str>,
}

/// HTTP client for one signed-in screen name
#[derive(Debug, Clone)]
pub struct HttpPresenceClient {
    http: Client,
    base_url: String,
    token: String,
}

impl HttpPresenceClient {
    /// Create a client for `base_url` authenticating with `token`
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> ClientResult<Self> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| ClientError::Protocol(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.http
            .get(self.url(path))
            .bearer_auth(&self.token)
            .timeout(REQUEST_TIMEOUT)
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.http
            .post(self.url(path))
            .bearer_auth(&self.token)
            .timeout(REQUEST_TIMEOUT)
    }

    /// Send the request and decode a success body, classifying failures
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = request.send().await?;
        let response = check_status(response).await?;
        Ok(response.json::<T>().await?)
    }
}

fn join_names(names: &[ScreenName]) -> String {
    names
        .iter()
        .map(ScreenName::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

/// Turn a non-success response into a classified error
async fn check_status(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = match response.json::<ErrorEnvelope>().await {
        Ok(envelope) => format!("{}: {}", envelope.error.code, envelope.error.message),
        Err(_) => status.to_string(),
    };
    debug!(status = status.as_u16(), %message, "Request failed");

    Err(ClientError::from_status(status.as_u16(), message))
}

#[async_trait]
impl PresenceApi for HttpPresenceClient {
    #[instrument(skip(self))]
    async fn heartbeat(&self, active: bool) -> ClientResult<()> {
        let request = self
            .post("/presence/heartbeat")
            .json(&HeartbeatBody { active });
        self.execute::<serde_json::Value>(request).await?;
        Ok(())
    }

    #[instrument(skip(self, names), fields(count = names.len()))]
    async fn statuses(
        &self,
        names: &[ScreenName],
    ) -> ClientResult<BTreeMap<ScreenName, PresenceStatus>> {
        let mut statuses = BTreeMap::new();
        for chunk in names.chunks(MAX_NAMES_PER_QUERY) {
            let request = self
                .get("/presence/status")
                .query(&[("names", join_names(chunk))]);
            let body: StatusBody = self.execute(request).await?;
            statuses.extend(body.statuses);
        }
        Ok(statuses)
    }

    #[instrument(skip(self))]
    async fn typing(&self, mark: bool) -> ClientResult<Vec<ScreenName>> {
        let request = if mark {
            self.post("/messages/typing")
        } else {
            self.get("/messages/typing")
        };
        let body: TypingBody = self.execute(request).await?;
        Ok(body.typing)
    }

    #[instrument(skip(self))]
    async fn poll(&self, timeout: Duration) -> ClientResult<Vec<Message>> {
        let request = self
            .get("/messages/poll")
            .query(&[("timeout", timeout.as_secs_f64())])
            .timeout(timeout + POLL_GRACE);
        let body: PollBody = self.execute(request).await?;
        Ok(body.messages)
    }

    #[instrument(skip(self, content, content_html), fields(to = %to))]
    async fn send(
        &self,
        to: &ScreenName,
        content: &str,
        content_html: Option<&str>,
    ) -> ClientResult<()> {
        let request = self.post("/messages/send").json(&SendBody {
            to: to.as_str(),
            content,
            content_html,
        });
        self.execute::<serde_json::Value>(request).await?;
        Ok(())
    }
}
