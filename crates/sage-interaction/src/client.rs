//! HTTP client for the dialogue runtime.
//!
//! One POST per conversational turn; the reply body is returned raw and
//! decoded separately (see [`crate::decode`]). Transport failures map to
//! [`SageError::Transport`] with the status code and the runtime's own
//! error message when it sent one. The client never retries.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use sage_core::{ConversationSession, Result, SageError};
use serde::{Deserialize, Serialize};

use crate::config::DialogueConfig;

/// Public dialogue runtime endpoint.
pub const DEFAULT_BASE_URL: &str = "https://general-runtime.voiceflow.com";

/// Seam between the conversation use case and the transport.
///
/// The HTTP client and the offline mock both implement this, so the rest of
/// the system never knows which one it is talking to.
#[async_trait]
pub trait DialogueAgent: Send + Sync {
    /// Initializes server-side conversation state for the session and
    /// returns the raw reply body (usually a greeting).
    async fn launch(&self, session: &ConversationSession) -> Result<String>;

    /// Sends one user utterance and returns the raw reply body.
    async fn interact(&self, session: &ConversationSession, text: &str) -> Result<String>;
}

/// Agent implementation that talks to the dialogue runtime over HTTP.
#[derive(Clone)]
pub struct DialogueClient {
    client: Client,
    api_key: String,
    version_id: Option<String>,
    base_url: String,
}

impl DialogueClient {
    /// Creates a new client with the provided API key and default endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            version_id: None,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Creates a client from resolved configuration.
    pub fn from_config(config: DialogueConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: config.api_key,
            version_id: config.version_id,
            base_url: config.base_url,
        }
    }

    /// Pins a specific flow version via the `versionID` header.
    pub fn with_version_id(mut self, version_id: impl Into<String>) -> Self {
        self.version_id = Some(version_id.into());
        self
    }

    /// Overrides the runtime endpoint (tests, self-hosted runtimes).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn send_request(
        &self,
        session: &ConversationSession,
        request: RequestData,
    ) -> Result<String> {
        let url = format!("{}/state/user/{}/interact", self.base_url, session.user_id);
        let body = InteractRequest {
            request,
            config: RequestConfig::default(),
        };
        tracing::debug!(target: "dialogue", user_id = %session.user_id, "sending interact request");

        let mut builder = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("Authorization", &self.api_key)
            .json(&body);
        if let Some(version_id) = &self.version_id {
            builder = builder.header("versionID", version_id);
        }

        let response = builder.send().await.map_err(|err| {
            SageError::transport(None, format!("dialogue request failed: {err}"))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        response.text().await.map_err(|err| {
            SageError::transport(None, format!("failed to read reply body: {err}"))
        })
    }
}

#[async_trait]
impl DialogueAgent for DialogueClient {
    async fn launch(&self, session: &ConversationSession) -> Result<String> {
        self.send_request(session, RequestData::launch()).await
    }

    async fn interact(&self, session: &ConversationSession, text: &str) -> Result<String> {
        self.send_request(session, RequestData::text(text)).await
    }
}

#[derive(Serialize)]
struct InteractRequest {
    request: RequestData,
    config: RequestConfig,
}

#[derive(Serialize)]
struct RequestData {
    #[serde(rename = "type")]
    kind: String,
    payload: String,
}

impl RequestData {
    fn launch() -> Self {
        Self {
            kind: "launch".to_string(),
            payload: String::new(),
        }
    }

    fn text(payload: &str) -> Self {
        Self {
            kind: "text".to_string(),
            payload: payload.to_string(),
        }
    }
}

#[derive(Serialize)]
struct RequestConfig {
    tts: bool,
    #[serde(rename = "stripSSML")]
    strip_ssml: bool,
    #[serde(rename = "stopTypes")]
    stop_types: bool,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            tts: false,
            strip_ssml: true,
            stop_types: true,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn map_http_error(status: StatusCode, body: String) -> SageError {
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|wrapper| wrapper.message)
        .unwrap_or(body);
    SageError::transport(Some(status.as_u16()), message)
}
