mod compiler;
mod config;
mod content;
mod errors;
mod llm_client;
mod models;
mod render;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::compiler::PdfLatexCompiler;
use crate::config::Config;
use crate::content::{ContentSource, LlmContentSource};
use crate::llm_client::LlmClient;
use crate::render::DialectRegistry;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Vitae API v{}", env!("CARGO_PKG_VERSION"));

    // Skeletons are checked against their placeholder sets here, so a broken
    // template stops startup instead of failing individual renders.
    let registry = DialectRegistry::load(config.templates_dir.as_deref())?;
    for profile in registry.profiles() {
        info!(
            "Template registered: {} ({:?}, assets: {:?})",
            profile.id,
            profile.structural_class,
            profile.asset_names()
        );
    }

    let compiler = PdfLatexCompiler::new(
        config.pdflatex_path.clone(),
        Duration::from_secs(config.compiler_timeout_secs),
        config.compiler_max_output_bytes,
    )
    .shared();
    info!("Document compiler: {}", config.pdflatex_path.display());

    let content_source: Option<Arc<dyn ContentSource>> = match &config.anthropic_api_key {
        Some(key) => {
            let llm = LlmClient::new(key.clone())?;
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            let source: Arc<dyn ContentSource> = Arc::new(LlmContentSource::new(llm));
            Some(source)
        }
        None => {
            warn!("ANTHROPIC_API_KEY not set; resume optimization is disabled");
            None
        }
    };

    let state = AppState {
        config: config.clone(),
        registry: Arc::new(registry),
        compiler,
        content_source,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
