//! Scan output: per-matchup lines and the cycle summary.

use chrono::{DateTime, Utc};
use common::{ScanReport, ScanRow};
use rust_decimal::Decimal;
use tracing::info;

/// Summary of a scan run.
#[derive(Debug, Clone)]
pub struct ScanSummary {
    /// Events in the fetched feed
    pub events: usize,
    /// Price quotes after normalization
    pub quotes: usize,
    /// Malformed records dropped
    pub skipped: usize,
    /// Two-sided matchups reported
    pub matchups: usize,
    /// Matchups with a positive arbitrage margin
    pub arbitrages: usize,
    /// Best arbitrage margin percentage
    pub best_margin_pct: Option<Decimal>,
    /// Scan timestamp
    pub scanned_at: DateTime<Utc>,
}

impl ScanSummary {
    pub fn new(report: &ScanReport) -> Self {
        let best_margin_pct = report
            .rows
            .iter()
            .map(|r| r.matchup().arb_margin_pct)
            .max();

        Self {
            events: report.events,
            quotes: report.quotes,
            skipped: report.skipped,
            matchups: report.rows.len(),
            arbitrages: report.arbitrage_count(),
            best_margin_pct,
            scanned_at: Utc::now(),
        }
    }

    pub fn log(&self) {
        info!(
            "Scan at {} complete: {} events, {} quotes ({} skipped), {} matchups, {} arbitrages",
            self.scanned_at.format("%H:%M:%S UTC"),
            self.events,
            self.quotes,
            self.skipped,
            self.matchups,
            self.arbitrages
        );
        if let Some(best) = self.best_margin_pct {
            info!("Best margin: {:.2}%", best.round_dp(2));
        }
    }
}

/// Render one row as a single log line. Figures are rounded to cents.
pub fn format_row(index: usize, row: &ScanRow) -> String {
    let m = row.matchup();
    let gap = m
        .max_gap_pct
        .map(|g| format!("{:.2}%", g.round_dp(2)))
        .unwrap_or_else(|| "-".to_string());
    let american = |a: Option<i64>| match a {
        Some(a) if a > 0 => format!("+{}", a),
        Some(a) => a.to_string(),
        None => "-".to_string(),
    };

    let mut line = format!(
        "#{} {} | {} vs {} | {} {} ({}) @ {} | {} {} ({}) @ {} | margin {:.2}% | max gap {}",
        index + 1,
        m.event_start.format("%a %b %d %H:%M UTC"),
        m.home_team,
        m.away_team,
        m.home_team,
        m.home.best_decimal,
        american(m.home.best_american),
        m.home.best_book,
        m.away_team,
        m.away.best_decimal,
        american(m.away.best_american),
        m.away.best_book,
        m.arb_margin_pct.round_dp(2),
        gap
    );

    if let ScanRow::Allocated(a) = row {
        line.push_str(&format!(
            " | stake ${:.2} / ${:.2} -> ${:.2} ({:+.2}%)",
            a.stake_home.round_dp(2),
            a.stake_away.round_dp(2),
            a.equal_payout.round_dp(2),
            a.profit_pct.round_dp(2)
        ));
    }
    line
}
