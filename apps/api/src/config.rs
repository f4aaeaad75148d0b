use anyhow::{anyhow, Context, Result};

use crate::matching::ScorerKind;

const DEFAULT_MAX_RESUME_BYTES: usize = 5 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
    /// Internal automation credential. Requests presenting it are tagged as scheduled runs.
    pub bot_token: Option<String>,
    pub match_scorer: ScorerKind,
    pub max_resume_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            bot_token: std::env::var("BOT_TOKEN")
                .ok()
                .filter(|token| !token.trim().is_empty()),
            match_scorer: match std::env::var("MATCH_SCORER") {
                Ok(value) => value.parse::<ScorerKind>().map_err(|e| anyhow!(e))?,
                Err(_) => ScorerKind::default(),
            },
            max_resume_bytes: match std::env::var("MAX_RESUME_BYTES") {
                Ok(value) => value
                    .parse::<usize>()
                    .context("MAX_RESUME_BYTES must be a byte count")?,
                Err(_) => DEFAULT_MAX_RESUME_BYTES,
            },
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
