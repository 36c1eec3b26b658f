use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::compiler::CompileError;
use crate::content::extract::ExtractError;
use crate::content::ContentSourceError;
use crate::render::RenderError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Compile error: {0}")]
    Compile(#[from] CompileError),

    #[error("Content source error: {0}")]
    ContentSource(#[from] ContentSourceError),

    #[error("Content source is not configured")]
    ContentSourceUnavailable,

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Extract(ExtractError::TooLarge { .. }) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                self.to_string(),
            ),
            AppError::Extract(e) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string()),
            AppError::Render(e @ RenderError::UnknownTemplate(_)) => {
                (StatusCode::NOT_FOUND, "UNKNOWN_TEMPLATE", e.to_string())
            }
            AppError::Render(e @ RenderError::MalformedDocument { .. }) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "MALFORMED_DOCUMENT",
                e.to_string(),
            ),
            AppError::Render(e @ RenderError::TemplateConsistency { .. }) => {
                tracing::error!("Template consistency error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "TEMPLATE_CONSISTENCY_ERROR",
                    "The selected template is misconfigured".to_string(),
                )
            }
            AppError::Compile(e) => {
                match e {
                    CompileError::Failed { status, log_tail } => {
                        tracing::error!("Compiler exited with {status}; log tail:\n{log_tail}")
                    }
                    other => tracing::error!("Compile error: {other}"),
                }
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "COMPILE_ERROR",
                    "Failed to compile the resume PDF".to_string(),
                )
            }
            AppError::ContentSource(e) => {
                tracing::error!("Content source error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "CONTENT_SOURCE_ERROR",
                    "The content provider returned an unusable response".to_string(),
                )
            }
            AppError::ContentSourceUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "CONTENT_SOURCE_UNAVAILABLE",
                "Resume optimization is not configured on this server".to_string(),
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn status_and_code(err: AppError) -> (StatusCode, String) {
        let response = err.into_response();
        let status = response.status();
        let body = body_json(response);
        (status, body["error"]["code"].as_str().unwrap_or_default().to_string())
    }

    fn body_json(response: Response) -> serde_json::Value {
        let rt = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let bytes = rt
            .block_on(axum::body::to_bytes(response.into_body(), usize::MAX))
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_render_errors_map_to_distinct_statuses() {
        assert_eq!(
            status_and_code(RenderError::UnknownTemplate("nope".into()).into()),
            (StatusCode::NOT_FOUND, "UNKNOWN_TEMPLATE".to_string())
        );
        assert_eq!(
            status_and_code(
                RenderError::MalformedDocument {
                    field: "personalInfo.name".into()
                }
                .into()
            ),
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                "MALFORMED_DOCUMENT".to_string()
            )
        );
        assert_eq!(
            status_and_code(
                RenderError::TemplateConsistency {
                    template: "professional".into(),
                    unresolved: vec!["NAME".into()],
                    unused: vec![],
                }
                .into()
            ),
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "TEMPLATE_CONSISTENCY_ERROR".to_string()
            )
        );
    }

    #[test]
    fn test_compile_failure_hides_log_tail() {
        let err: AppError = CompileError::Failed {
            status: "exit status: 1".into(),
            log_tail: "! Undefined control sequence.".into(),
        }
        .into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response);
        assert_eq!(body["error"]["code"], "COMPILE_ERROR");
        assert!(!body.to_string().contains("Undefined control sequence"));
    }

    #[test]
    fn test_timeout_is_compile_error() {
        let err: AppError = CompileError::Timeout(Duration::from_secs(60)).into();
        assert_eq!(
            status_and_code(err),
            (StatusCode::INTERNAL_SERVER_ERROR, "COMPILE_ERROR".to_string())
        );
    }

    #[test]
    fn test_upload_errors() {
        assert_eq!(
            status_and_code(ExtractError::TooLarge { limit: 10 }.into()),
            (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE".to_string())
        );
        assert_eq!(
            status_and_code(ExtractError::UnsupportedType("image/png".into()).into()),
            (StatusCode::BAD_REQUEST, "VALIDATION_ERROR".to_string())
        );
        assert_eq!(
            status_and_code(ExtractError::Docx("invalid Zip archive".into()).into()),
            (StatusCode::BAD_REQUEST, "VALIDATION_ERROR".to_string())
        );
    }

    #[test]
    fn test_missing_content_source_is_unavailable() {
        assert_eq!(
            status_and_code(AppError::ContentSourceUnavailable),
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "CONTENT_SOURCE_UNAVAILABLE".to_string()
            )
        );
    }
}
