use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// The report carries no feedback section, so there is nothing to show.
    #[error("No analysis result available")]
    NoResult,

    #[error("Capacity exceeded: {0}")]
    Capacity(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::NoResult => (
                StatusCode::NOT_FOUND,
                "NO_RESULT",
                "No analysis result is available for this report".to_string(),
            ),
            AppError::Capacity(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "CAPACITY_EXCEEDED",
                msg.clone(),
            ),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
