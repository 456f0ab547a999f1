//! Feed normalizer.
//!
//! Flattens the nested feed (events -> bookmakers -> markets -> outcomes)
//! into one `PriceQuote` per priced outcome of the head-to-head market.
//! Every other market is ignored.
//! Malformed records are logged and skipped; the rest of the feed is kept.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::feed::{RawBookmaker, RawEvent, RawOutcome};
use crate::models::PriceQuote;

/// Head-to-head (moneyline) market key.
pub const H2H_MARKET: &str = "h2h";

#[derive(Debug, Error, PartialEq)]
pub enum NormalizeError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid event start time: {0}")]
    InvalidStartTime(String),

    #[error("Missing price")]
    MissingPrice,

    #[error("Non-numeric price: {0}")]
    NonNumericPrice(String),

    #[error("Price below even money: {0}")]
    PriceBelowEven(Decimal),
}

/// Options for feed normalization.
#[derive(Debug, Clone, Default)]
pub struct NormalizeOptions {
    /// Keep only the first N bookmakers listed for each event
    pub max_books: Option<usize>,
}

/// Normalizer output.
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub quotes: Vec<PriceQuote>,
    /// Events, bookmakers or outcomes dropped as malformed
    pub skipped: usize,
}

/// Event-level fields shared by every quote of the event.
struct EventHeader<'a> {
    id: &'a str,
    start: DateTime<Utc>,
    home: &'a str,
    away: &'a str,
}

/// Flatten a raw feed into price quotes.
///
/// Duplicate quotes (same book listing an outcome twice) are kept.
pub fn normalize(feed: &[RawEvent], options: &NormalizeOptions) -> Normalized {
    let mut out = Normalized::default();

    for event in feed {
        let header = match parse_header(event) {
            Ok(h) => h,
            Err(e) => {
                warn!("Skipping event {:?}: {}", event.id, e);
                out.skipped += 1;
                continue;
            }
        };

        let books = match options.max_books {
            Some(n) => &event.bookmakers[..n.min(event.bookmakers.len())],
            None => &event.bookmakers[..],
        };

        for bookmaker in books {
            normalize_bookmaker(&header, bookmaker, &mut out);
        }
    }

    debug!(
        "Normalized {} events into {} quotes ({} records skipped)",
        feed.len(),
        out.quotes.len(),
        out.skipped
    );
    out
}

fn normalize_bookmaker(
    header: &EventHeader<'_>,
    bookmaker: &RawBookmaker,
    out: &mut Normalized,
) {
    let mut markets = bookmaker
        .markets
        .iter()
        .filter(|m| m.key.as_deref() == Some(H2H_MARKET))
        .peekable();

    if markets.peek().is_none() {
        return;
    }
    let Some(book) = bookmaker.name() else {
        warn!("Skipping bookmaker without a name for event {}", header.id);
        out.skipped += 1;
        return;
    };

    for market in markets {
        for outcome in &market.outcomes {
            match parse_outcome(outcome) {
                Ok((selection, price_decimal)) => out.quotes.push(PriceQuote {
                    event_id: header.id.to_string(),
                    event_start: header.start,
                    home_team: header.home.to_string(),
                    away_team: header.away.to_string(),
                    selection: selection.to_string(),
                    book: book.to_string(),
                    price_decimal,
                }),
                Err(e) => {
                    warn!(
                        "Skipping outcome {:?} from {} for event {}: {}",
                        outcome.name, book, header.id, e
                    );
                    out.skipped += 1;
                }
            }
        }
    }
}

fn parse_header(event: &RawEvent) -> Result<EventHeader<'_>, NormalizeError> {
    let id = event.id.as_deref().ok_or(NormalizeError::MissingField("id"))?;
    let home = event
        .home_team
        .as_deref()
        .ok_or(NormalizeError::MissingField("home_team"))?;
    let away = event
        .away_team
        .as_deref()
        .ok_or(NormalizeError::MissingField("away_team"))?;
    let raw_start = event
        .commence_time
        .as_deref()
        .ok_or(NormalizeError::MissingField("commence_time"))?;
    let start = DateTime::parse_from_rfc3339(raw_start)
        .map_err(|_| NormalizeError::InvalidStartTime(raw_start.to_string()))?
        .with_timezone(&Utc);

    Ok(EventHeader {
        id,
        start,
        home,
        away,
    })
}

fn parse_outcome(outcome: &RawOutcome) -> Result<(&str, Decimal), NormalizeError> {
    let name = outcome
        .name
        .as_deref()
        .ok_or(NormalizeError::MissingField("outcome name"))?;
    let price = outcome.price.as_ref().ok_or(NormalizeError::MissingPrice)?;
    let price = parse_price(price)?;

    if price < Decimal::ONE {
        return Err(NormalizeError::PriceBelowEven(price));
    }
    Ok((name, price))
}

/// Convert a JSON price (number or numeric string) to a decimal.
pub fn parse_price(value: &Value) -> Result<Decimal, NormalizeError> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        Value::Null => return Err(NormalizeError::MissingPrice),
        other => return Err(NormalizeError::NonNumericPrice(other.to_string())),
    };

    text.parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| NormalizeError::NonNumericPrice(text))
}
