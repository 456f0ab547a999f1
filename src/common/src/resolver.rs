//! Matchup resolver.
//!
//! Picks the best and runner-up price per (event, selection), pairs the home
//! and away sides of each event and computes the arbitrage margin.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use crate::config::ConfigError;
use crate::models::{BestPrice, Matchup, PriceQuote};
use crate::odds::{arbitrage_margin_pct, decimal_to_american, gap_percent, implied_probability};

/// Start-time window around `now` for events to consider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    lookback: Duration,
    lookahead: Duration,
}

impl TimeWindow {
    /// Create a window. Lookahead must be positive, lookback non-negative.
    pub fn new(lookback: Duration, lookahead: Duration) -> Result<Self, ConfigError> {
        if lookahead <= Duration::zero() {
            return Err(ConfigError::InvalidWindow(format!(
                "lookahead must be positive, got {}h",
                lookahead.num_hours()
            )));
        }
        if lookback < Duration::zero() {
            return Err(ConfigError::InvalidWindow(format!(
                "lookback must not be negative, got {}h",
                lookback.num_hours()
            )));
        }
        Ok(Self {
            lookback,
            lookahead,
        })
    }

    /// Create a window from whole hours.
    pub fn from_hours(lookback_hours: i64, lookahead_hours: i64) -> Result<Self, ConfigError> {
        Self::new(Duration::hours(lookback_hours), Duration::hours(lookahead_hours))
    }

    /// Check if a start time falls inside `[now - lookback, now + lookahead]`.
    pub fn contains(&self, start: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        start >= now - self.lookback && start <= now + self.lookahead
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self {
            lookback: Duration::hours(6),
            lookahead: Duration::hours(24),
        }
    }
}

/// Resolve quotes into two-sided matchups, ordered by `max_gap_pct`
/// descending (matchups without any gap last).
///
/// Events with fewer than two resolved sides, or missing the home or away
/// side, are dropped without error.
pub fn resolve(quotes: &[PriceQuote], now: DateTime<Utc>, window: &TimeWindow) -> Vec<Matchup> {
    let in_window: Vec<&PriceQuote> = quotes
        .iter()
        .filter(|q| window.contains(q.event_start, now))
        .collect();

    if in_window.is_empty() {
        debug!("No quotes inside the time window");
        return Vec::new();
    }

    let best_prices = best_prices(&in_window);

    let mut by_event: BTreeMap<&str, Vec<&BestPrice>> = BTreeMap::new();
    for best in &best_prices {
        by_event.entry(best.event_id.as_str()).or_default().push(best);
    }

    let mut matchups: Vec<Matchup> = by_event
        .into_values()
        .filter_map(|sides| pair_sides(&sides))
        .collect();

    // Stable: equal gaps keep event id order
    matchups.sort_by(|a, b| b.max_gap_pct.cmp(&a.max_gap_pct));

    info!(
        "Resolved {} quotes into {} best prices and {} matchups",
        in_window.len(),
        best_prices.len(),
        matchups.len()
    );
    matchups
}

/// Select the best price per (event, selection).
///
/// Equal top prices resolve to the quote seen first. A group whose gap
/// cannot be represented is dropped.
pub fn best_prices(quotes: &[&PriceQuote]) -> Vec<BestPrice> {
    let mut groups: BTreeMap<(&str, &str), Vec<&PriceQuote>> = BTreeMap::new();
    for quote in quotes {
        groups
            .entry((quote.event_id.as_str(), quote.selection.as_str()))
            .or_default()
            .push(quote);
    }

    groups
        .into_values()
        .filter_map(|mut group| {
            group.sort_by(|a, b| b.price_decimal.cmp(&a.price_decimal));
            let best = group[0];
            let best_decimal = best.price_decimal;
            let next_best_decimal = group.get(1).map(|q| q.price_decimal);

            let gap = match next_best_decimal {
                Some(next) => match gap_percent(best_decimal, next) {
                    Some(gap) => Some(gap),
                    None => {
                        warn!(
                            "Dropping {} for event {}: gap {} over {} out of range",
                            best.selection, best.event_id, best_decimal, next
                        );
                        return None;
                    }
                },
                None => None,
            };

            Some(BestPrice {
                event_id: best.event_id.clone(),
                event_start: best.event_start,
                home_team: best.home_team.clone(),
                away_team: best.away_team.clone(),
                selection: best.selection.clone(),
                best_book: best.book.clone(),
                best_decimal,
                best_american: decimal_to_american(best_decimal),
                implied_prob: implied_probability(best_decimal),
                next_best_decimal,
                gap_percent: gap,
                quote_count: group.len(),
            })
        })
        .collect()
}

/// Pair the home and away best prices of one event.
fn pair_sides(sides: &[&BestPrice]) -> Option<Matchup> {
    if sides.len() < 2 {
        return None;
    }

    let first = sides[0];
    let home = sides.iter().find(|b| b.selection == first.home_team);
    let away = sides.iter().find(|b| b.selection == first.away_team);
    let (Some(home), Some(away)) = (home, away) else {
        debug!(
            "Dropping event {}: no two-sided price for {} vs {}",
            first.event_id, first.home_team, first.away_team
        );
        return None;
    };

    let max_gap_pct = match (home.gap_percent, away.gap_percent) {
        (Some(h), Some(a)) => Some(h.max(a)),
        (h, a) => h.or(a),
    };

    Some(Matchup {
        event_id: first.event_id.clone(),
        event_start: first.event_start,
        home_team: first.home_team.clone(),
        away_team: first.away_team.clone(),
        home: (*home).clone(),
        away: (*away).clone(),
        arb_margin_pct: arbitrage_margin_pct(home.best_decimal, away.best_decimal),
        max_gap_pct,
    })
}
