//! Configuration loading from environment variables.

use std::env;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },

    #[error("Bankroll must be positive, got {0}")]
    InvalidBankroll(rust_decimal::Decimal),

    #[error("Invalid time window: {0}")]
    InvalidWindow(String),
}

/// Application configuration loaded from environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// The Odds API key
    pub odds_api_key: String,

    /// The Odds API base URL
    pub odds_api_url: String,

    /// How long a fetched feed snapshot stays cached, in seconds
    pub cache_ttl_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required variables:
    /// - ODDS_API_KEY: The Odds API key
    ///
    /// Optional variables (with defaults):
    /// - ODDS_API_URL: API base URL
    /// - ODDS_CACHE_TTL_SECS: Feed cache lifetime (default: 3600)
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present
        dotenvy::dotenv().ok();
        Self::from_env_only()
    }

    /// Load configuration from environment variables only (no .env file).
    /// Useful for testing.
    pub fn from_env_only() -> Result<Self, ConfigError> {
        let odds_api_key = env::var("ODDS_API_KEY")
            .map_err(|_| ConfigError::MissingVar("ODDS_API_KEY".to_string()))?;

        let odds_api_url = env::var("ODDS_API_URL")
            .unwrap_or_else(|_| "https://api.the-odds-api.com/v4".to_string());

        let cache_ttl_secs = match env::var("ODDS_CACHE_TTL_SECS") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                name: "ODDS_CACHE_TTL_SECS".to_string(),
                value: raw,
            })?,
            Err(_) => 3600,
        };

        Ok(Self {
            odds_api_key,
            odds_api_url,
            cache_ttl_secs,
        })
    }
}
