use anyhow::{Context, Result};

const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Application configuration loaded from environment variables.
/// Startup fails if the API key is missing; nothing talks to Gemini before that check.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub gemini_api_base: String,
    pub port: u16,
    pub rust_log: String,
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Config {
            api_key: require_var(&lookup, "API_KEY")?,
            gemini_api_base: lookup("GEMINI_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string()),
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            request_timeout_secs: lookup("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|| "120".to_string())
                .parse::<u64>()
                .context("REQUEST_TIMEOUT_SECS must be a whole number of seconds")?,
        })
    }
}

fn require_var<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|value| !value.trim().is_empty())
        .with_context(|| format!("Required environment variable '{key}' is not set"))
}
