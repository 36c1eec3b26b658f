use std::sync::Arc;

use crate::compiler::DocumentCompiler;
use crate::config::Config;
use crate::content::ContentSource;
use crate::render::DialectRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Loaded and consistency-checked once at startup; read-only afterwards.
    pub registry: Arc<DialectRegistry>,
    pub compiler: Arc<dyn DocumentCompiler>,
    /// `None` when no provider key is configured.
    pub content_source: Option<Arc<dyn ContentSource>>,
}
