use std::sync::Arc;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

use crate::models::{ChainId, RawTvlPoint};

/// Source of "now" for cache expiry.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Last successful upstream payload for a chain
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub payload: Vec<RawTvlPoint>,
    pub fetched_at: DateTime<Utc>,
}

/// Thread-safe per-chain cache of raw upstream series.
///
/// Entries are never evicted; a refresh overwrites the previous one.
/// Staleness is checked on read against the injected clock.
#[derive(Clone)]
pub struct TvlCache {
    entries: Arc<DashMap<ChainId, CacheEntry>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl TvlCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl,
            clock,
        }
    }

    /// Cached payload for `chain` if it was fetched less than `ttl` ago.
    pub fn get_fresh(&self, chain: ChainId) -> Option<Vec<RawTvlPoint>> {
        let entry = self.entries.get(&chain)?;
        let age = self.clock.now() - entry.fetched_at;

        if age < self.ttl {
            Some(entry.payload.clone())
        } else {
            None
        }
    }

    /// Record a successful fetch, replacing whatever was there.
    pub fn store(&self, chain: ChainId, payload: Vec<RawTvlPoint>) {
        let entry = CacheEntry {
            payload,
            fetched_at: self.clock.now(),
        };
        self.entries.insert(chain, entry);
    }

    /// Number of chains with an entry, fresh or stale.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
