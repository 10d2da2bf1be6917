mod analysis;
mod config;
mod editor;
mod errors;
mod llm_client;
mod models;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::analyzer::{AnalyzerConfig, HeuristicAnalyzer};
use crate::config::Config;
use crate::editor::persistence::FileStorage;
use crate::editor::registry::SessionRegistry;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting AltoCV API v{}", env!("CARGO_PKG_VERSION"));

    // Editor state snapshots
    let storage = FileStorage::new(&config.editor_state_dir)?;
    info!("Editor state directory: {}", storage.dir().display());
    let editor = Arc::new(SessionRegistry::new(Arc::new(storage)));
    editor.spawn_sweeper(config.editor_session_ttl);
    info!(
        "Idle editor sessions leave memory after {}s",
        config.editor_session_ttl.as_secs()
    );

    // Analyzer (HeuristicAnalyzer by default)
    let analyzer_config = AnalyzerConfig {
        keyword_policy: config.keyword_policy,
        ..AnalyzerConfig::default()
    };
    let analyzer = Arc::new(HeuristicAnalyzer::new(analyzer_config));
    info!("Keyword policy: {:?}", config.keyword_policy);

    // LLM client, only when a key is configured
    let llm = match &config.anthropic_api_key {
        Some(key) => {
            let client = LlmClient::new(key.clone())?;
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Some(client)
        }
        None => {
            warn!("ANTHROPIC_API_KEY not set; coaching endpoint disabled");
            None
        }
    };

    let state = AppState {
        analyzer,
        editor,
        llm,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the web client's domain

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
