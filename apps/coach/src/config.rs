use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_keys: ApiKeys,
    /// Where the job board is persisted. `None` keeps jobs in memory only.
    pub jobs_file: Option<PathBuf>,
    pub llm_timeout: Duration,
    pub llm_max_retries: u32,
    pub port: u16,
    pub rust_log: String,
}

/// Provider credentials. Only Anthropic is mandatory; the others unlock
/// per-role provider diversity in the hiring committee.
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    pub anthropic: String,
    pub openai: Option<String>,
    pub gemini: Option<String>,
    pub xai: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            api_keys: ApiKeys {
                anthropic: require_env("ANTHROPIC_API_KEY")?,
                openai: optional_env("OPENAI_API_KEY"),
                gemini: optional_env("GEMINI_API_KEY"),
                xai: optional_env("XAI_API_KEY"),
            },
            jobs_file: optional_env("JOBS_FILE").map(PathBuf::from),
            llm_timeout: Duration::from_secs(
                parse_env("LLM_TIMEOUT_SECS", 60).context("LLM_TIMEOUT_SECS must be a number")?,
            ),
            llm_max_retries: parse_env("LLM_MAX_RETRIES", 3)
                .context("LLM_MAX_RETRIES must be a number")?,
            port: parse_env("PORT", 8080).context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Unset and blank values are both treated as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => Ok(raw.trim().parse::<T>()?),
        Err(_) => Ok(default),
    }
}
