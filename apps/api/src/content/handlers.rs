//! Axum route handlers for resume text extraction and optimization.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::content::extract::{extract_text, ExtractError, UploadKind};
use crate::content::validate_optimize_input;
use crate::errors::AppError;
use crate::models::resume::ResumeDraft;
use crate::state::AppState;

/// Multipart field carrying the resume file.
const UPLOAD_FIELD: &str = "file";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ParseResponse {
    pub text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeRequest {
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct OptimizeResponse {
    pub data: ResumeDraft,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes/parse
///
/// Accepts a PDF, Word (.docx) or plain-text upload in the `file` field and
/// returns its text.
pub async fn handle_parse(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ParseResponse>, AppError> {
    let limit = state.config.max_upload_bytes;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        let kind = UploadKind::from_content_type(&content_type)?;
        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, limit))?;

        info!("Parsing upload: type={content_type}, bytes={}", data.len());
        let text = extract_text(kind, data, limit).await?;
        return Ok(Json(ParseResponse { text }));
    }

    Err(AppError::Validation(format!(
        "No file uploaded; expected multipart field '{UPLOAD_FIELD}'"
    )))
}

/// Body-limit rejections surface as the same error as an oversized file.
fn multipart_error(err: MultipartError, limit: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ExtractError::TooLarge { limit }.into()
    } else {
        AppError::Validation(err.body_text())
    }
}

/// POST /api/v1/resumes/optimize
///
/// Tailors the resume text to a job description and returns the structured draft.
pub async fn handle_optimize(
    State(state): State<AppState>,
    Json(request): Json<OptimizeRequest>,
) -> Result<Json<OptimizeResponse>, AppError> {
    validate_optimize_input(&request.resume_text, &request.job_description)
        .map_err(AppError::Validation)?;

    let source = state
        .content_source
        .as_ref()
        .ok_or(AppError::ContentSourceUnavailable)?;

    let data = source
        .optimize(&request.resume_text, &request.job_description)
        .await?;

    Ok(Json(OptimizeResponse { data }))
}
