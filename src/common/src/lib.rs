//! Common library for the odds arbitrage scanner.
//!
//! Provides shared functionality:
//! - Configuration loading from .env
//! - The Odds API client with a cache-aside wrapper
//! - Feed normalization, best-price resolution and bankroll allocation

pub mod allocator;
pub mod cache;
pub mod config;
pub mod feed;
pub mod models;
pub mod normalizer;
pub mod odds;
pub mod odds_api;
pub mod pipeline;
pub mod resolver;

pub use allocator::allocate;
pub use cache::CachedOddsSource;
pub use config::{Config, ConfigError};
pub use feed::{RawBookmaker, RawEvent, RawMarket, RawOutcome};
pub use models::{AllocatedMatchup, BestPrice, Matchup, PriceQuote};
pub use normalizer::{normalize, NormalizeError, NormalizeOptions, Normalized, H2H_MARKET};
pub use odds_api::{OddsApiClient, OddsApiError, OddsRequest, OddsSource};
pub use pipeline::{run, sort_by_arb_margin, ScanReport, ScanRow, ScanSettings};
pub use resolver::{resolve, TimeWindow};
