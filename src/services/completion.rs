// src/services/completion.rs
use async_trait::async_trait;
use axum::http::StatusCode;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::Config;
use crate::message::ChatMessage;

/// Body of an upstream chat-completion call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
}

#[derive(Debug, Error)]
pub enum CompletionError {
    /// Non-success status, with the raw response text.
    #[error("completion service returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("completion request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("malformed completion payload: {0}")]
    Decode(String),
}

/// Seam over the completion provider.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Issues one call and returns the first choice's text, if any.
    async fn complete(&self, request: &CompletionRequest) -> Result<Option<String>, CompletionError>;
}

/// Pulls `choices[0].message.content` out of a completion payload. Any
/// missing or null level is no text; content that is present but not a
/// string is a malformed payload.
fn first_content(payload: &Value) -> Result<Option<String>, CompletionError> {
    let content = payload
        .get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"));

    match content {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(other) => Err(CompletionError::Decode(format!(
            "expected string content, got {other}"
        ))),
    }
}

/// OpenAI-compatible `/chat/completions` client.
#[derive(Clone)]
pub struct OpenAiClient {
    http: Client,
    url: String,
    api_key: String,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient").field("url", &self.url).finish()
    }
}

impl OpenAiClient {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, CompletionError> {
        let http = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(CompletionError::Transport)?;
        Ok(Self { http, url: url.into(), api_key: api_key.into() })
    }

    pub fn from_config(config: &Config) -> Result<Self, CompletionError> {
        Self::new(config.completions_url(), config.api_key.clone())
    }
}

#[async_trait]
impl CompletionService for OpenAiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<Option<String>, CompletionError> {
        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(CompletionError::Transport)?;

        let status = response.status();
        let body = response.text().await.map_err(CompletionError::Transport)?;

        if !status.is_success() {
            return Err(CompletionError::Status { status, body });
        }

        let payload: Value =
            serde_json::from_str(&body).map_err(|e| CompletionError::Decode(e.to_string()))?;
        first_content(&payload)
    }
}
