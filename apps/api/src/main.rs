mod admin;
mod ai;
mod applications;
mod auth;
mod billing;
mod config;
mod db;
mod errors;
mod jobs;
mod llm_client;
mod matching;
mod models;
mod profiles;
mod rate_limit;
mod routes;
mod state;
mod users;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::matching::scorer::WeightedMatchScorer;
use crate::rate_limit::UserRateLimiter;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing env vars or bad match weights)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Jobtrack API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url, config.db_max_connections).await?;

    // Initialize LLM client
    let llm = LlmClient::new(config.openai_api_key.clone()).context("Failed to build LLM client")?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // One scorer for every endpoint
    let weights = config.match_weights;
    let match_scorer = Arc::new(WeightedMatchScorer::new(weights));
    info!(
        skills = weights.skills,
        role = weights.role,
        location = weights.location,
        remote = weights.remote,
        "Match scorer configured"
    );

    let ai_rate_limiter = UserRateLimiter::per_minute(config.ai_rate_limit_per_minute)?;
    let pruner = ai_rate_limiter.spawn_pruner();
    info!(
        per_minute = config.ai_rate_limit_per_minute,
        "AI rate limiter initialized"
    );

    let state = AppState {
        db: db.clone(),
        llm,
        config: config.clone(),
        match_scorer,
        ai_rate_limiter,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the front-end domain is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pruner.abort();
    db.close().await;
    info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
            let _ = sigterm.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
