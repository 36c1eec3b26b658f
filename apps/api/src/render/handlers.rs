//! Axum route handlers for the template catalogue, LaTeX rendering and PDF export.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::compiler::CompileJob;
use crate::errors::AppError;
use crate::models::resume::{CandidateDocument, ResumeDraft};
use crate::render::{render_resume, RenderedDocument, StructuralClass, DEFAULT_TEMPLATE};
use crate::state::AppState;

/// RFC 5987 `attr-char` minus alphanumerics; everything else is percent-encoded.
const ATTR_CHAR: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    pub resume_data: ResumeDraft,
    pub template_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub structural_class: StructuralClass,
    pub assets: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TemplatesResponse {
    pub templates: Vec<TemplateSummary>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/templates
pub async fn handle_list_templates(State(state): State<AppState>) -> Json<TemplatesResponse> {
    let templates = state
        .registry
        .profiles()
        .map(|p| TemplateSummary {
            id: p.id.clone(),
            name: p.display_name.clone(),
            description: p.description.clone(),
            structural_class: p.structural_class,
            assets: p.asset_names(),
        })
        .collect();

    Json(TemplatesResponse { templates })
}

/// POST /api/v1/resumes/latex
///
/// Returns the substituted LaTeX source without compiling it.
pub async fn handle_render_latex(
    State(state): State<AppState>,
    Json(request): Json<RenderRequest>,
) -> Result<Json<RenderedDocument>, AppError> {
    let (_, rendered) = render_request(&state, request)?;
    Ok(Json(rendered))
}

/// POST /api/v1/resumes/pdf
///
/// Renders and compiles in one request. The compiler runs exactly once and
/// only after rendering succeeded.
pub async fn handle_render_pdf(
    State(state): State<AppState>,
    Json(request): Json<RenderRequest>,
) -> Result<Response, AppError> {
    let (doc, rendered) = render_request(&state, request)?;
    let template_id = rendered.template_id.clone();

    let pdf = state.compiler.compile(&CompileJob::from(rendered)).await?;
    info!("PDF ready: template={template_id}, bytes={}", pdf.len());

    let disposition = content_disposition(&doc.identity.name);
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        pdf,
    )
        .into_response())
}

fn render_request(
    state: &AppState,
    request: RenderRequest,
) -> Result<(CandidateDocument, RenderedDocument), AppError> {
    let template_id = request
        .template_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_TEMPLATE.to_string());

    let doc = CandidateDocument::try_from(request.resume_data)?;
    let rendered = render_resume(&state.registry, &doc, &template_id)?;

    info!(
        "Rendered resume: template={}, class={:?}, latex_bytes={}",
        rendered.template_id,
        rendered.structural_class,
        rendered.latex.len()
    );
    Ok((doc, rendered))
}

/// `Jane Q. Doe` becomes `Jane_Q_Doe_Resume.pdf`. Anything outside
/// `[A-Za-z0-9_-]` is dropped so the header value stays a plain token.
pub fn attachment_filename(name: &str) -> String {
    let stem: Vec<String> = name
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect();

    if stem.is_empty() {
        "Resume.pdf".to_string()
    } else {
        format!("{}_Resume.pdf", stem.join("_"))
    }
}

/// `attachment` header with an ASCII `filename` for old clients and a
/// UTF-8 `filename*` that keeps the name as written.
pub fn content_disposition(name: &str) -> String {
    let words: Vec<&str> = name.split_whitespace().collect();
    let utf8_name = if words.is_empty() {
        "Resume.pdf".to_string()
    } else {
        format!("{}_Resume.pdf", words.join("_"))
    };
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        attachment_filename(name),
        utf8_percent_encode(&utf8_name, ATTR_CHAR)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attachment_filename_joins_words() {
        assert_eq!(attachment_filename("Jane Doe"), "Jane_Doe_Resume.pdf");
        assert_eq!(attachment_filename("  Jane   Q.  Doe "), "Jane_Q_Doe_Resume.pdf");
    }

    #[test]
    fn test_attachment_filename_drops_header_unsafe_characters() {
        assert_eq!(attachment_filename("O\"Brien; x"), "OBrien_x_Resume.pdf");
        assert_eq!(attachment_filename("José Núñez"), "Jos_Nez_Resume.pdf");
    }

    #[test]
    fn test_attachment_filename_falls_back_when_nothing_survives() {
        assert_eq!(attachment_filename("李雷"), "Resume.pdf");
    }

    #[test]
    fn test_content_disposition_keeps_non_ascii_name() {
        assert_eq!(
            content_disposition("José Núñez"),
            "attachment; filename=\"Jos_Nez_Resume.pdf\"; filename*=UTF-8''Jos%C3%A9_N%C3%BA%C3%B1ez_Resume.pdf"
        );
    }

    #[test]
    fn test_content_disposition_ascii_name() {
        assert_eq!(
            content_disposition("Jane Q. Doe"),
            "attachment; filename=\"Jane_Q_Doe_Resume.pdf\"; filename*=UTF-8''Jane_Q._Doe_Resume.pdf"
        );
    }

    #[test]
    fn test_content_disposition_encodes_quotes_and_separators() {
        let header = content_disposition("O\"Brien; x/y");
        assert!(header.ends_with("filename*=UTF-8''O%22Brien%3B_x%2Fy_Resume.pdf"), "{header}");
        assert!(axum::http::HeaderValue::from_str(&header).is_ok());
    }
}
