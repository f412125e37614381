use std::str::FromStr;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub llm_timeout_secs: u64,
    pub port: u16,
    pub rust_log: String,
    /// Upper bound on an uploaded document, enforced on the request body.
    pub max_upload_bytes: usize,
    /// Minimum trimmed text length before a document is worth sending to the model.
    pub min_resume_chars: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            db_max_connections: env_or("DB_MAX_CONNECTIONS", 10)?,
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            gemini_model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-1.5-flash".to_string()),
            llm_timeout_secs: env_or("LLM_TIMEOUT_SECS", 120)?,
            port: env_or("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            min_resume_chars: env_or("MIN_RESUME_CHARS", 200)?,
        })
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Config {
            database_url: "postgres://localhost/resume_review_test".to_string(),
            db_max_connections: 1,
            gemini_api_key: "test-key".to_string(),
            gemini_model: "gemini-1.5-flash".to_string(),
            llm_timeout_secs: 5,
            port: 0,
            rust_log: "debug".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
            min_resume_chars: 200,
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => parse_setting(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_setting<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("{key} has an invalid value: '{raw}'"))
}
