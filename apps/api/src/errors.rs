use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::background::RemovalError;

/// Fixed public message for every background-removal failure.
pub const REMOVAL_FAILED_MESSAGE: &str =
    "Failed to remove background. Ensure the image is valid and check server logs for details.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every variant renders as `{ "message": ... }`; background-removal failures
/// additionally carry the stringified cause under `error`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// An LLM-backed endpoint failed. `message` is what the client sees,
    /// `detail` only reaches the logs.
    #[error("LLM error: {detail}")]
    Llm {
        message: &'static str,
        detail: String,
    },

    #[error("Background removal error: {0}")]
    BackgroundRemoval(#[from] RemovalError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, json!({ "message": msg })),
            AppError::Llm { message, detail } => {
                tracing::error!("{message} {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": message }),
                )
            }
            AppError::BackgroundRemoval(e) => {
                tracing::error!(error = ?e, "Background removal error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "message": REMOVAL_FAILED_MESSAGE,
                        "error": e.to_string(),
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
