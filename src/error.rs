//! Error types for the API surface.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Request-scoped failures, mapped to HTTP responses.
///
/// Everything that goes wrong after a batch upload passes the filename
/// check — CSV parsing, feature derivation, scoring — lands in
/// `Prediction`, which carries the underlying error text.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("invalid upload: {0}")]
    InvalidUpload(String),

    #[error("prediction error: {0}")]
    Prediction(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidUpload(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Prediction(msg) => {
                tracing::error!(detail = %msg, "prediction failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Prediction error: {msg}"),
                )
            }
        };

        let body = Json(json!({
            "error": true,
            "message": message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
