//! Cache-aside wrapper for odds sources.
//!
//! Feed snapshots are kept per `OddsRequest` for a fixed TTL so repeated
//! scans do not burn API quota.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::feed::RawEvent;
use crate::odds_api::{OddsApiError, OddsRequest, OddsSource};

struct CacheEntry {
    fetched_at: Instant,
    events: Vec<RawEvent>,
}

/// Odds source that serves cached snapshots until they expire.
///
/// The cache lock is held while a miss is fetched, so fetches run one at a
/// time even for different requests. Concurrent callers asking for the same
/// request wait for the first fetch instead of spending quota twice.
pub struct CachedOddsSource<S> {
    inner: S,
    ttl: Duration,
    entries: Mutex<HashMap<OddsRequest, CacheEntry>>,
}

impl<S: OddsSource> CachedOddsSource<S> {
    /// Wrap a source with a cache of the given lifetime.
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Drop every cached snapshot.
    pub async fn invalidate(&self) {
        self.entries.lock().await.clear();
    }
}

#[async_trait]
impl<S: OddsSource> OddsSource for CachedOddsSource<S> {
    async fn fetch_odds(&self, request: &OddsRequest) -> Result<Vec<RawEvent>, OddsApiError> {
        let mut entries = self.entries.lock().await;

        if let Some(entry) = entries.get(request) {
            let age = entry.fetched_at.elapsed();
            if age < self.ttl {
                debug!("Cache hit for {} ({}s old)", request.sport, age.as_secs());
                return Ok(entry.events.clone());
            }
        }

        debug!("Cache miss for {}", request.sport);
        let events = self.inner.fetch_odds(request).await?;
        entries.insert(
            request.clone(),
            CacheEntry {
                fetched_at: Instant::now(),
                events: events.clone(),
            },
        );
        Ok(events)
    }
}
