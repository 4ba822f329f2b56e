use anyhow::{Context, Result};

use crate::matching::weights::MatchWeights;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or match weights are invalid.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub jwt_secret: String,
    pub openai_api_key: String,
    pub stripe_webhook_secret: String,
    pub port: u16,
    pub rust_log: String,
    /// Requests per minute per user on the AI endpoints.
    pub ai_rate_limit_per_minute: u32,
    pub match_weights: MatchWeights,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let match_weights = MatchWeights::from_lookup(|key| std::env::var(key).ok())
            .context("Invalid MATCH_WEIGHT_* configuration")?;

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            db_max_connections: parse_env("DB_MAX_CONNECTIONS", 10)?,
            jwt_secret: require_env("JWT_SECRET")?,
            openai_api_key: require_env("OPENAI_API_KEY")?,
            stripe_webhook_secret: require_env("STRIPE_WEBHOOK_SECRET")?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            ai_rate_limit_per_minute: parse_env("AI_RATE_LIMIT_PER_MINUTE", 10)?,
            match_weights,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}
