use std::time::Duration;

use anyhow::{Context, Result};

use crate::analysis::keywords::KeywordPolicy;

/// Application configuration loaded from environment variables.
/// Every variable has a default; startup fails only on malformed values.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Directory holding one JSON snapshot per editor session.
    pub editor_state_dir: String,
    /// Resident sessions idle this long are dropped from memory; their
    /// snapshot stays on disk and is rehydrated on next access.
    pub editor_session_ttl: Duration,
    /// Enables the coaching endpoint when set.
    pub anthropic_api_key: Option<String>,
    pub keyword_policy: KeywordPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let keyword_policy = match optional_env("KEYWORD_POLICY") {
            Some(raw) => KeywordPolicy::parse(&raw).with_context(|| {
                format!("KEYWORD_POLICY must be 'generic_first' or 'role_first', got '{raw}'")
            })?,
            None => KeywordPolicy::default(),
        };

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            editor_state_dir: optional_env("EDITOR_STATE_DIR")
                .unwrap_or_else(|| ".altocv/editor-state".to_string()),
            editor_session_ttl: Duration::from_secs(
                optional_env("EDITOR_SESSION_TTL_SECS")
                    .unwrap_or_else(|| "1800".to_string())
                    .parse::<u64>()
                    .context("EDITOR_SESSION_TTL_SECS must be a whole number of seconds")?,
            ),
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            keyword_policy,
        })
    }
}

/// Reads a variable, treating an empty value as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
