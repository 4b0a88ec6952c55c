// src/message.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;

pub const MESSAGE_REQUIRED: &str = "message is required";

/// Role of a prior conversation turn supplied by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Turn {
    pub role: TurnRole,
    pub content: String,
}

/// Role of an entry in the transcript sent upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: ChatRole::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: ChatRole::User, content: content.into() }
    }
}

impl From<Turn> for ChatMessage {
    fn from(turn: Turn) -> Self {
        let role = match turn.role {
            TurnRole::User => ChatRole::User,
            TurnRole::Assistant => ChatRole::Assistant,
        };
        Self { role, content: turn.content }
    }
}

/// A validated inbound chat request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub message: String,
    pub history: Vec<Turn>,
    pub system_prompt: Option<String>,
}

// Every field is kept as raw JSON so that shape problems surface as
// validation outcomes rather than deserialization failures.
#[derive(Debug, Default, Deserialize)]
struct RawChatRequest {
    #[serde(default)]
    message: Value,
    #[serde(default)]
    history: Value,
    #[serde(default, rename = "systemPrompt")]
    system_prompt: Value,
}

impl ChatRequest {
    /// Parses a request body. Anything that is not a JSON object is read as
    /// an empty one, so it fails on the missing message.
    pub fn from_body(body: &[u8]) -> Result<Self, AppError> {
        Self::from_value(serde_json::from_slice(body).unwrap_or(Value::Null))
    }

    pub fn from_value(value: Value) -> Result<Self, AppError> {
        let raw = match value {
            Value::Object(_) => serde_json::from_value(value).unwrap_or_default(),
            _ => RawChatRequest::default(),
        };
        Self::validate(raw)
    }

    fn validate(raw: RawChatRequest) -> Result<Self, AppError> {
        let message = match raw.message {
            Value::String(s) if !s.is_empty() => s,
            _ => return Err(AppError::BadRequest(MESSAGE_REQUIRED.to_string())),
        };

        Ok(Self {
            message,
            history: parse_history(raw.history),
            system_prompt: match raw.system_prompt {
                Value::String(s) if !s.is_empty() => Some(s),
                _ => None,
            },
        })
    }
}

/// Decodes each element into a [`Turn`], skipping the ones that don't fit.
/// A non-array history is empty.
fn parse_history(history: Value) -> Vec<Turn> {
    match history {
        Value::Array(items) => items
            .into_iter()
            // serde would also accept `["user", "hi"]` as a struct
            .filter(Value::is_object)
            .filter_map(|item| serde_json::from_value::<Turn>(item).ok())
            .collect(),
        _ => Vec::new(),
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into(), detail: None }
    }

    pub fn with_detail(error: impl Into<String>, detail: impl Into<String>) -> Self {
        Self { error: error.into(), detail: Some(detail.into()) }
    }
}
