use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, header},
};

use crate::{
    error::AppError,
    message::{ChatRequest, ChatResponse},
    services::relay::generate_reply,
    state::SharedState,
};

pub async fn chat_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ChatResponse>, AppError> {
    // Bodies of any other type are read as empty.
    let body: &[u8] = if is_json(&headers) { &body } else { &[] };
    let request = ChatRequest::from_body(body)?;

    let reply = generate_reply(state.completions.as_ref(), &state.config.model, &request).await?;

    Ok(Json(ChatResponse { reply }))
}

/// `application/json`, with or without parameters such as `charset`.
fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
}
