use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::analysis::extract::ExtractError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("Payload too large: limit is {0} bytes")]
    PayloadTooLarge(usize),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ExtractError> for AppError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::UnsupportedFormat(ref filename) => {
                tracing::debug!("Rejected unsupported file {filename}");
                AppError::UnsupportedFormat(err.to_string())
            }
            ExtractError::ExtractionFailed { format, ref reason } => {
                tracing::warn!("{} extraction failed: {reason}", format.extension());
                AppError::ExtractionFailed(err.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnsupportedFormat(msg) => {
                (StatusCode::BAD_REQUEST, "UNSUPPORTED_FORMAT", msg.clone())
            }
            AppError::ExtractionFailed(msg) => {
                (StatusCode::BAD_REQUEST, "EXTRACTION_FAILED", msg.clone())
            }
            AppError::PayloadTooLarge(limit) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                format!(
                    "File exceeds the {:.0} MB upload limit.",
                    *limit as f64 / (1024.0 * 1024.0)
                ),
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred during analysis. Check server logs."
                        .to_string(),
                )
            }
        };

        // `detail` is what the uploader front-end reads.
        let body = Json(json!({
            "detail": message,
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
