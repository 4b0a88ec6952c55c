// src/error.rs
use std::time::Duration;

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::message::ErrorBody;
use crate::services::completion::CompletionError;
use crate::services::rate_limiter::ceil_secs;

pub const UPSTREAM_ERROR_CODE: &str = "openai_error";
pub const SERVER_ERROR_CODE: &str = "server_error";
pub const RATE_LIMITED_MESSAGE: &str = "Too many requests, please try again later.";

/// Every failure a request can end in. Converted to a JSON response at the
/// handler boundary; nothing here is fatal to the process.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The completion service answered with a non-success status.
    #[error("upstream returned {status}")]
    Upstream { status: StatusCode, detail: String },

    #[error("rate limit exceeded")]
    RateLimited { retry_after: Duration },

    /// Detail is logged, never sent to the caller.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(ErrorBody::new(message))).into_response()
            }
            AppError::Upstream { status, detail } => (
                status,
                Json(ErrorBody::with_detail(UPSTREAM_ERROR_CODE, detail)),
            )
                .into_response(),
            AppError::RateLimited { retry_after } => {
                let mut response = (
                    StatusCode::TOO_MANY_REQUESTS,
                    Json(ErrorBody::new(RATE_LIMITED_MESSAGE)),
                )
                    .into_response();
                response.headers_mut().insert(
                    header::RETRY_AFTER,
                    HeaderValue::from(ceil_secs(retry_after)),
                );
                response
            }
            AppError::Internal(message) => {
                error!(message = %message, "chat relay failed");
                server_error_response()
            }
        }
    }
}

/// The generic 500 body, also used for caught panics.
pub fn server_error_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody::new(SERVER_ERROR_CODE)),
    )
        .into_response()
}

impl From<CompletionError> for AppError {
    fn from(e: CompletionError) -> Self {
        match e {
            CompletionError::Status { status, body } => AppError::Upstream {
                status,
                detail: body,
            },
            other => AppError::Internal(other.to_string()),
        }
    }
}
