//! End-to-end scan: normalize -> resolve -> filter -> allocate.
//!
//! Settings are validated before any record is touched; everything after
//! that is infallible and an empty result is a normal report.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use crate::allocator::allocate;
use crate::config::ConfigError;
use crate::feed::RawEvent;
use crate::models::{AllocatedMatchup, Matchup};
use crate::normalizer::{normalize, NormalizeOptions};
use crate::resolver::{resolve, TimeWindow};

/// Settings for one scan.
#[derive(Debug, Clone, Default)]
pub struct ScanSettings {
    pub normalize: NormalizeOptions,
    pub window: TimeWindow,
    /// Split this bankroll across each matchup when set
    pub bankroll: Option<Decimal>,
    /// Keep only matchups with at least this arbitrage margin (percent)
    pub min_arb_margin_pct: Option<Decimal>,
}

impl ScanSettings {
    /// Check settings that would otherwise fail mid-scan.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.bankroll {
            Some(b) if b <= Decimal::ZERO => Err(ConfigError::InvalidBankroll(b)),
            _ => Ok(()),
        }
    }
}

/// One output row: a bare matchup, or one with a bankroll split.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ScanRow {
    Matchup(Matchup),
    Allocated(AllocatedMatchup),
}

impl ScanRow {
    pub fn matchup(&self) -> &Matchup {
        match self {
            ScanRow::Matchup(m) => m,
            ScanRow::Allocated(a) => &a.matchup,
        }
    }
}

/// Result of a scan.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    /// Events in the feed snapshot
    pub events: usize,
    /// Quotes produced by the normalizer
    pub quotes: usize,
    /// Malformed records dropped by the normalizer
    pub skipped: usize,
    pub rows: Vec<ScanRow>,
}

impl ScanReport {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows with a positive arbitrage margin.
    pub fn arbitrage_count(&self) -> usize {
        self.rows.iter().filter(|r| r.matchup().is_arbitrage()).count()
    }
}

/// Run the full pipeline over one feed snapshot.
pub fn run(
    feed: &[RawEvent],
    settings: &ScanSettings,
    now: DateTime<Utc>,
) -> Result<ScanReport, ConfigError> {
    settings.validate()?;

    let normalized = normalize(feed, &settings.normalize);
    let mut matchups = resolve(&normalized.quotes, now, &settings.window);

    if let Some(min) = settings.min_arb_margin_pct {
        let before = matchups.len();
        matchups.retain(|m| m.arb_margin_pct >= min);
        info!(
            "Min margin {}% kept {} of {} matchups",
            min,
            matchups.len(),
            before
        );
    }

    let rows = match settings.bankroll {
        Some(bankroll) => allocate(matchups, bankroll)?
            .into_iter()
            .map(ScanRow::Allocated)
            .collect(),
        None => matchups.into_iter().map(ScanRow::Matchup).collect(),
    };

    Ok(ScanReport {
        events: feed.len(),
        quotes: normalized.quotes.len(),
        skipped: normalized.skipped,
        rows,
    })
}

/// Re-sort rows by arbitrage margin, most profitable first.
pub fn sort_by_arb_margin(rows: &mut [ScanRow]) {
    rows.sort_by(|a, b| b.matchup().arb_margin_pct.cmp(&a.matchup().arb_margin_pct));
}
