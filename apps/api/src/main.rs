mod config;
mod errors;
mod llm_client;
mod prospect;
mod routes;
mod search;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::prospect::jobs::JobStore;
use crate::prospect::pipeline::ProspectPipeline;
use crate::prospect::prompts::PromptTemplate;
use crate::routes::build_router;
use crate::search::TavilyClient;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Prospect Research API v{}", env!("CARGO_PKG_VERSION"));

    let search = TavilyClient::new(config.tavily_api_key.clone())?;
    info!("Search client initialized (Tavily)");

    let llm = LlmClient::new(config.anthropic_api_key.clone(), config.llm_model.clone())?;
    info!("LLM client initialized (model: {})", llm.model());

    let template = PromptTemplate::load(config.prompt_path.as_deref())?;
    match &config.prompt_path {
        Some(path) => info!("Ranking prompt loaded from {}", path.display()),
        None => info!("Using built-in ranking prompt"),
    }

    if let Some(dir) = &config.results_dir {
        info!("Archiving results under {}", dir.display());
    }

    let state = AppState {
        pipeline: ProspectPipeline::new(Arc::new(search), Arc::new(llm), template),
        jobs: JobStore::default(),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
