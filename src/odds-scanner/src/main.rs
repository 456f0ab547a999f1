//! Odds Arbitrage Scanner
//!
//! Pulls moneyline odds for one sport from The Odds API, finds the best price
//! per team across bookmakers and reports two-sided arbitrage margins, with
//! an optional bankroll split that pays out equally either way.
//! Detection only: nothing is ever placed.
//!
//! Pipeline:
//! - Fetch: The Odds API behind a TTL cache (cache-aside)
//! - Normalize: nested feed -> one quote per book/outcome
//! - Resolve: best/next-best price per team, pair home/away, margin
//! - Allocate: equal-payout stake split per matchup

mod report;

use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use common::{
    run, sort_by_arb_margin, CachedOddsSource, Config, ConfigError, NormalizeOptions,
    OddsApiClient, OddsRequest, OddsSource, ScanSettings, TimeWindow, H2H_MARKET,
};
use rust_decimal::Decimal;
use tokio::time::sleep;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use report::{format_row, ScanSummary};

/// Odds Arbitrage Scanner
#[derive(Parser, Debug)]
#[command(name = "odds-scanner")]
#[command(about = "Finds best moneyline prices and arbitrage across bookmakers")]
struct Args {
    /// Run once and exit (instead of continuous scanning)
    #[arg(long)]
    once: bool,

    /// Scan interval in seconds
    #[arg(long, default_value = "300")]
    interval: u64,

    /// Sport key
    #[arg(long, default_value = "americanfootball_nfl")]
    sport: String,

    /// Market key; only head-to-head (h2h) is supported
    #[arg(long, default_value = "h2h")]
    market: String,

    /// Bookmaker region
    #[arg(long, default_value = "us")]
    region: String,

    /// Bankroll to split across both sides of each matchup
    #[arg(long)]
    bankroll: Option<f64>,

    /// Only report matchups with at least this arbitrage margin (percent)
    #[arg(long)]
    min_margin: Option<f64>,

    /// Hours ahead of now to include events
    #[arg(long, default_value = "24")]
    lookahead_hours: i64,

    /// Hours before now to include events (in-play)
    #[arg(long, default_value = "6")]
    lookback_hours: i64,

    /// Only use the first N bookmakers of each event
    #[arg(long)]
    max_books: Option<usize>,

    /// Order by arbitrage margin instead of largest price gap
    #[arg(long)]
    sort_by_margin: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Verbose logging
    #[arg(long, short)]
    verbose: bool,
}

impl Args {
    /// Build and validate scan settings before anything is fetched.
    fn scan_settings(&self) -> Result<ScanSettings> {
        if self.market != H2H_MARKET {
            return Err(ConfigError::InvalidValue {
                name: "--market".to_string(),
                value: format!("{} (only {} is supported)", self.market, H2H_MARKET),
            }
            .into());
        }

        let settings = ScanSettings {
            normalize: NormalizeOptions {
                max_books: self.max_books,
            },
            window: TimeWindow::from_hours(self.lookback_hours, self.lookahead_hours)?,
            bankroll: self.bankroll.map(Decimal::try_from).transpose()?,
            min_arb_margin_pct: self.min_margin.map(Decimal::try_from).transpose()?,
        };
        settings.validate()?;
        Ok(settings)
    }

    fn odds_request(&self) -> OddsRequest {
        OddsRequest {
            sport: self.sport.clone(),
            market: self.market.clone(),
            region: self.region.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging with RUST_LOG env filter
    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    info!("Odds Arbitrage Scanner starting...");
    info!(
        "Mode: {}",
        if args.once { "single run" } else { "continuous" }
    );
    info!(
        "Sport: {} | market: {} | region: {}",
        args.sport, args.market, args.region
    );

    let settings = args.scan_settings()?;
    if let Some(bankroll) = settings.bankroll {
        info!("Bankroll: ${}", bankroll);
    }

    // Load configuration
    let config = Config::from_env()?;

    let source = CachedOddsSource::new(
        OddsApiClient::new(&config),
        Duration::from_secs(config.cache_ttl_secs),
    );
    info!(
        "Odds API client initialized (cache TTL {}s)",
        config.cache_ttl_secs
    );

    let request = args.odds_request();

    // Main loop
    loop {
        match scan_cycle(&source, &request, &settings, &args).await {
            Ok(summary) => {
                summary.log();
            }
            Err(e) => {
                error!("Scan cycle failed: {}", e);
            }
        }

        if args.once {
            info!("Single run mode - exiting");
            break;
        }

        info!("Sleeping for {}s...", args.interval);
        sleep(Duration::from_secs(args.interval)).await;
    }

    Ok(())
}

/// Perform a single scan cycle.
async fn scan_cycle(
    source: &impl OddsSource,
    request: &OddsRequest,
    settings: &ScanSettings,
    args: &Args,
) -> Result<ScanSummary> {
    info!("Starting scan cycle...");

    let feed = source.fetch_odds(request).await?;
    let mut report = run(&feed, settings, Utc::now())?;

    if args.sort_by_margin {
        sort_by_arb_margin(&mut report.rows);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if report.is_empty() {
        info!("No two-sided matchups in the next {}h", args.lookahead_hours);
    } else {
        for (i, row) in report.rows.iter().enumerate() {
            info!("{}", format_row(i, row));
        }
    }

    Ok(ScanSummary::new(&report))
}
