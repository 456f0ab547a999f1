//! Records produced by the odds pipeline.
//!
//! Flow: `PriceQuote` (normalizer) -> `BestPrice` -> `Matchup` (resolver)
//! -> `AllocatedMatchup` (allocator).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One bookmaker's moneyline price for one outcome of one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub event_id: String,
    pub event_start: DateTime<Utc>,
    pub home_team: String,
    pub away_team: String,
    /// Outcome name as quoted (normally the home or away team)
    pub selection: String,
    pub book: String,
    /// Decimal odds, always >= 1.0
    pub price_decimal: Decimal,
}

/// Best available price for one (event, selection) pair across books.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestPrice {
    pub event_id: String,
    pub event_start: DateTime<Utc>,
    pub home_team: String,
    pub away_team: String,
    pub selection: String,
    pub best_book: String,
    pub best_decimal: Decimal,
    /// `None` only for even-money (1.0) prices
    pub best_american: Option<i64>,
    pub implied_prob: Decimal,
    /// Runner-up price; absent when a single book quoted the selection
    pub next_best_decimal: Option<Decimal>,
    /// Premium of best over runner-up in percent; absent with no runner-up
    pub gap_percent: Option<Decimal>,
    /// Number of quotes the best price was selected from
    pub quote_count: usize,
}

/// Two-sided event built from the home and away best prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matchup {
    pub event_id: String,
    pub event_start: DateTime<Utc>,
    pub home_team: String,
    pub away_team: String,
    pub home: BestPrice,
    pub away: BestPrice,
    /// `(1 - (1/home + 1/away)) * 100`; positive means arbitrage
    pub arb_margin_pct: Decimal,
    /// Larger of the two side gaps, used for display ranking only
    pub max_gap_pct: Option<Decimal>,
}

impl Matchup {
    /// Check if backing both sides at the best prices locks in a profit.
    pub fn is_arbitrage(&self) -> bool {
        self.arb_margin_pct > Decimal::ZERO
    }

    /// Short human-readable description.
    pub fn summary(&self) -> String {
        format!(
            "{} @ {} | {} {} ({}) / {} {} ({})",
            self.away_team,
            self.home_team,
            self.home_team,
            self.home.best_decimal,
            self.home.best_book,
            self.away_team,
            self.away.best_decimal,
            self.away.best_book
        )
    }
}

/// Matchup with a bankroll split that pays the same whichever side wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocatedMatchup {
    pub matchup: Matchup,
    pub bankroll: Decimal,
    pub stake_home: Decimal,
    pub stake_away: Decimal,
    pub equal_payout: Decimal,
    pub profit_abs: Decimal,
    pub profit_pct: Decimal,
}
