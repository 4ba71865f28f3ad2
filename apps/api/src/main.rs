mod ats;
mod chatbot;
mod config;
mod documents;
mod errors;
mod llm_client;
mod models;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::ats::scorer::{AtsScorer, HeuristicAtsScorer, RemoteAtsScorer};
use crate::config::Config;
use crate::llm_client::{build_backends, build_http_client, LlmGateway};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting StudyBuddy API v{}", env!("CARGO_PKG_VERSION"));

    // One outbound client, shared by every backend
    let http = build_http_client(Duration::from_secs(config.http_timeout_secs))?;

    // Initialize generation backends in preference order
    let gateway = LlmGateway::new(build_backends(&config, &http));
    if gateway.is_configured() {
        for d in gateway.descriptors() {
            info!("LLM backend enabled: {} (model: {})", d.provider, d.model);
        }
    } else {
        warn!("No AI service configured (set OLLAMA_API_URL or GROQ_API_KEY); chat will return 503");
    }

    // Initialize ATS scorer (HeuristicAtsScorer by default; APILAYER_KEY adds remote skill parsing)
    let ats_scorer: Arc<dyn AtsScorer> = match &config.apilayer_key {
        Some(key) => Arc::new(RemoteAtsScorer::new(http.clone(), key.clone())),
        None => Arc::new(HeuristicAtsScorer),
    };
    info!("ATS scorer initialized ({})", ats_scorer.backend());

    // Build app state
    let state = AppState {
        gateway,
        ats_scorer,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
