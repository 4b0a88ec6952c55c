// src/services/relay.rs
use tracing::{debug, warn};

use super::completion::{CompletionError, CompletionRequest, CompletionService};
use crate::error::AppError;
use crate::message::{ChatMessage, ChatRequest};

pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a concise recovery directory assistant. Be direct. No medical advice.";
pub const NO_RESPONSE_REPLY: &str = "No response generated.";
pub const TEMPERATURE: f64 = 0.3;

/// System entry, then the valid history in order, then the current message.
pub fn build_transcript(request: &ChatRequest) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(request.history.len() + 2);
    messages.push(ChatMessage::system(
        request
            .system_prompt
            .as_deref()
            .unwrap_or(DEFAULT_SYSTEM_PROMPT),
    ));
    messages.extend(request.history.iter().cloned().map(ChatMessage::from));
    messages.push(ChatMessage::user(request.message.as_str()));
    messages
}

/// Runs one relay round trip and returns the reply text.
pub async fn generate_reply(
    completions: &dyn CompletionService,
    model: &str,
    request: &ChatRequest,
) -> Result<String, AppError> {
    let upstream = CompletionRequest {
        model: model.to_string(),
        messages: build_transcript(request),
        temperature: TEMPERATURE,
    };
    debug!(model, messages = upstream.messages.len(), "calling completion service");

    let content = completions.complete(&upstream).await.map_err(|e| {
        if let CompletionError::Status { status, .. } = &e {
            warn!(%status, "completion service rejected request");
        }
        AppError::from(e)
    })?;

    Ok(content
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| NO_RESPONSE_REPLY.to_string()))
}
