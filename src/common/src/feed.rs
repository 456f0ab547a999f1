//! Raw odds feed shape as returned by The Odds API `/sports/{sport}/odds`.
//!
//! Every scalar is optional so a single malformed record never fails the
//! deserialization of the whole snapshot. The normalizer decides which
//! missing fields drop a record.

use serde::{Deserialize, Serialize};

/// One sporting event with prices from every bookmaker in the region.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawEvent {
    pub id: Option<String>,
    pub sport_key: Option<String>,
    pub sport_title: Option<String>,
    /// RFC 3339 start time, e.g. "2026-10-18T17:00:00Z"
    pub commence_time: Option<String>,
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    #[serde(default)]
    pub bookmakers: Vec<RawBookmaker>,
}

/// A bookmaker's markets for one event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawBookmaker {
    pub key: Option<String>,
    pub title: Option<String>,
    pub last_update: Option<String>,
    #[serde(default)]
    pub markets: Vec<RawMarket>,
}

impl RawBookmaker {
    /// Display name, falling back to the bookmaker key.
    pub fn name(&self) -> Option<&str> {
        self.title.as_deref().or(self.key.as_deref())
    }
}

/// A market (h2h, spreads, totals) offered by one bookmaker.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawMarket {
    pub key: Option<String>,
    #[serde(default)]
    pub outcomes: Vec<RawOutcome>,
}

/// One priced outcome. `price` stays untyped until normalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawOutcome {
    pub name: Option<String>,
    pub price: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_feed_with_missing_fields() {
        let json = r#"[{
            "id": "evt1",
            "sport_key": "americanfootball_nfl",
            "commence_time": "2026-10-18T17:00:00Z",
            "home_team": "Chicago Bears",
            "away_team": "Detroit Lions",
            "bookmakers": [{
                "key": "draftkings",
                "title": "DraftKings",
                "markets": [{
                    "key": "h2h",
                    "outcomes": [
                        {"name": "Chicago Bears", "price": 2.4},
                        {"name": "Detroit Lions", "price": "1.62"},
                        {"name": "Detroit Lions"}
                    ]
                }]
            }]
        }, {"id": "evt2"}]"#;

        let events: Vec<RawEvent> = serde_json::from_str(json).unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].bookmakers[0].markets[0].outcomes.len(), 3);
        assert!(events[0].bookmakers[0].markets[0].outcomes[2].price.is_none());
        assert!(events[1].bookmakers.is_empty());
        assert!(events[1].home_team.is_none());
    }

    #[test]
    fn test_bookmaker_name_fallback() {
        let titled = RawBookmaker {
            key: Some("fanduel".to_string()),
            title: Some("FanDuel".to_string()),
            ..Default::default()
        };
        let untitled = RawBookmaker {
            key: Some("fanduel".to_string()),
            ..Default::default()
        };

        assert_eq!(titled.name(), Some("FanDuel"));
        assert_eq!(untitled.name(), Some("fanduel"));
        assert_eq!(RawBookmaker::default().name(), None);
    }
}
