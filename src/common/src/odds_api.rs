//! The Odds API client for fetching bookmaker odds.
//!
//! Uses the `/sports/{sport}/odds` endpoint, one request per
//! sport/market/region selection.
//! See: https://the-odds-api.com/liveapi/guides/v4/

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, info};

use crate::feed::RawEvent;
use crate::Config;

#[derive(Debug, Error)]
pub enum OddsApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API error: {0}")]
    ApiError(String),
}

/// Feed selection forwarded to the provider. Opaque to the pipeline apart
/// from the market key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OddsRequest {
    /// Sport key, e.g. "americanfootball_nfl"
    pub sport: String,
    /// Market key, e.g. "h2h"
    pub market: String,
    /// Bookmaker region, e.g. "us"
    pub region: String,
}

impl Default for OddsRequest {
    fn default() -> Self {
        Self {
            sport: "americanfootball_nfl".to_string(),
            market: "h2h".to_string(),
            region: "us".to_string(),
        }
    }
}

/// Source of raw odds feed snapshots.
/// Mockable for testing via mockall.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OddsSource: Send + Sync {
    /// Fetch the current feed snapshot for a selection.
    async fn fetch_odds(&self, request: &OddsRequest) -> Result<Vec<RawEvent>, OddsApiError>;
}

/// The Odds API client.
pub struct OddsApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OddsApiClient {
    /// Create a new client.
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            base_url: config.odds_api_url.trim_end_matches('/').to_string(),
            api_key: config.odds_api_key.clone(),
        }
    }

    fn odds_url(&self, sport: &str) -> String {
        format!("{}/sports/{}/odds", self.base_url, sport)
    }
}

#[async_trait]
impl OddsSource for OddsApiClient {
    async fn fetch_odds(&self, request: &OddsRequest) -> Result<Vec<RawEvent>, OddsApiError> {
        let url = self.odds_url(&request.sport);

        debug!(
            "Fetching odds for sport={} market={} region={}",
            request.sport, request.market, request.region
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("apiKey", self.api_key.as_str()),
                ("regions", request.region.as_str()),
                ("markets", request.market.as_str()),
                ("oddsFormat", "decimal"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(OddsApiError::ApiError(format!(
                "API returned status {}: {}",
                status, text
            )));
        }

        let header = |name: &str| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("?")
                .to_string()
        };
        debug!(
            "Quota: {} requests used, {} remaining",
            header("x-requests-used"),
            header("x-requests-remaining")
        );

        let events: Vec<RawEvent> = response.json().await?;
        info!("Fetched {} {} events with odds", events.len(), request.sport);
        Ok(events)
    }
}
