pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::content::handlers as content;
use crate::render::handlers as render;
use crate::state::AppState;

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/templates", get(render::handle_list_templates))
        // Content API
        .route(
            "/api/v1/resumes/parse",
            post(content::handle_parse).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/v1/resumes/optimize", post(content::handle_optimize))
        // Render API
        .route("/api/v1/resumes/latex", post(render::handle_render_latex))
        .route("/api/v1/resumes/pdf", post(render::handle_render_pdf))
        .with_state(state)
}
