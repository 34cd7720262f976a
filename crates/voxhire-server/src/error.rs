//! Unified error handling for the API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use voxhire_core::ProviderError;

/// API error response body
#[derive(Serialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

/// Application error types
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    /// The provider throttled us and the retry budget is spent.
    RateLimited,
    /// No LLM backend is configured.
    Unavailable(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            AppError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "AI_RATE_LIMIT_EXCEEDED",
                "The AI provider is rate limiting requests. Please retry shortly.".to_string(),
            ),
            AppError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, "UNAVAILABLE", msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
        };

        (
            status,
            Json(ApiError {
                error: message,
                code: code.to_string(),
            }),
        )
            .into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        // Log full error chain for debugging, return sanitized message to client
        tracing::error!("Internal error: {:?}", err);
        AppError::Internal(err.to_string())
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::RateLimited => AppError::RateLimited,
            other => {
                tracing::error!("LLM call failed: {:?}", other);
                AppError::Internal(other.to_string())
            }
        }
    }
}
