use anyhow::Context;
use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::BytesRejection,
        Multipart, State,
    },
    http::{HeaderMap, StatusCode},
    Json,
};
use bytes::Bytes;
use tracing::info;

use crate::analysis::analyze_document;
use crate::analysis::extract::DocumentFormat;
use crate::analysis::scorer::AnalysisResult;
use crate::errors::AppError;
use crate::state::AppState;

/// Header carrying the original filename for raw-body uploads.
pub const FILENAME_HEADER: &str = "x-file-name";
const DEFAULT_FILENAME: &str = "uploaded_file";

/// POST /api/analyze
///
/// The request body is the document itself; the format comes from `X-File-Name`.
pub async fn handle_analyze(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<AnalysisResult>, AppError> {
    let filename = headers
        .get(FILENAME_HEADER)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).trim().to_string())
        .unwrap_or_else(|| DEFAULT_FILENAME.to_string());

    check_filename(&filename, "Filename header missing from request.")?;
    let bytes = body.map_err(|rejection| {
        body_error(
            rejection.status(),
            rejection.body_text(),
            state.config.max_upload_bytes,
        )
    })?;

    run_pipeline(filename, bytes).await.map(Json)
}

/// POST /api/analyze/upload
///
/// Multipart variant: scores the first field that carries a filename.
pub async fn handle_analyze_upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalysisResult>, AppError> {
    let limit = state.config.max_upload_bytes;
    let mut multipart = multipart.map_err(|rejection| AppError::Validation(rejection.body_text()))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        let Some(filename) = field.file_name().map(|f| f.trim().to_string()) else {
            continue;
        };

        check_filename(&filename, "Uploaded file has no filename.")?;
        let bytes = field.bytes().await.map_err(|e| multipart_error(e, limit))?;
        return run_pipeline(filename, bytes).await.map(Json);
    }

    Err(AppError::Validation(
        "No file field found in upload.".to_string(),
    ))
}

fn check_filename(filename: &str, missing: &str) -> Result<(), AppError> {
    if filename.is_empty() {
        return Err(AppError::Validation(missing.to_string()));
    }
    if DocumentFormat::from_filename(filename).is_none() {
        return Err(AppError::UnsupportedFormat(
            "Only PDF and DOCX files are supported.".to_string(),
        ));
    }
    Ok(())
}

fn body_error(status: StatusCode, text: String, limit: usize) -> AppError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(limit)
    } else {
        AppError::Validation(text)
    }
}

fn multipart_error(err: MultipartError, limit: usize) -> AppError {
    body_error(err.status(), err.body_text(), limit)
}

/// Extraction and scoring are CPU-bound, so they run on the blocking pool.
async fn run_pipeline(filename: String, bytes: Bytes) -> Result<AnalysisResult, AppError> {
    if bytes.is_empty() {
        return Err(AppError::Validation("File content is empty.".to_string()));
    }

    info!(
        "Processing file: {filename}, size: {:.2} MB",
        bytes.len() as f64 / (1024.0 * 1024.0)
    );

    let result = tokio::task::spawn_blocking(move || analyze_document(&bytes, &filename))
        .await
        .context("analysis task panicked or was cancelled")??;

    Ok(result)
}
