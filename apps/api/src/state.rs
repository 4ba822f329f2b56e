use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::matching::scorer::MatchScorer;
use crate::rate_limit::UserRateLimiter;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub llm: LlmClient,
    pub config: Config,
    /// One scorer for listing, detail and recommendations, built from `config.match_weights`.
    pub match_scorer: Arc<dyn MatchScorer>,
    /// Per-user limiter for the AI routes.
    pub ai_rate_limiter: UserRateLimiter,
}
