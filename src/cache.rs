// =============================================================================
// Response cache, keyed by ticker and period
// =============================================================================
//
// An explicit TTL-bounded cache of computed analyses, owned by the HTTP
// adapter.  The engine stays cache-free: handlers consult the cache and on
// a miss fetch, compute, and insert.  Entries expire `ttl` after insertion
// and are evicted by the read that finds them expired; `invalidate` and
// `clear` drop entries eagerly.  Failures are never cached.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use crate::engine::StockAnalysis;
use crate::types::Period;

/// Identifies one cached analysis: normalized ticker plus requested period.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct CacheKey {
    pub ticker: String,
    pub period: Period,
}

impl CacheKey {
    pub fn new(ticker: impl Into<String>, period: Period) -> Self {
        Self {
            ticker: ticker.into(),
            period,
        }
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.ticker, self.period)
    }
}

struct CacheEntry {
    analysis: Arc<StockAnalysis>,
    inserted_at: Instant,
}

/// TTL cache of computed analyses behind a read-write lock.
pub struct ResponseCache {
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
    ttl: Duration,
}

impl ResponseCache {
    /// Create a cache whose entries stay fresh for `ttl` after insertion.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Look up a fresh entry.  An expired entry is removed and reported as
    /// a miss.
    pub fn get(&self, key: &CacheKey) -> Option<Arc<StockAnalysis>> {
        {
            let entries = self.entries.read();
            match entries.get(key) {
                Some(entry) if entry.inserted_at.elapsed() < self.ttl => {
                    return Some(entry.analysis.clone());
                }
                Some(_) => {} // expired: fall through to the write path
                None => return None,
            }
        }

        self.evict_expired(key)
    }

    /// Eviction path for a reader that saw an expired entry.  The read lock
    /// was released before the write lock is taken, so another request may
    /// have inserted a fresh replacement in between; freshness is re-checked
    /// here and a fresh entry is served instead of removed.
    fn evict_expired(&self, key: &CacheKey) -> Option<Arc<StockAnalysis>> {
        let mut entries = self.entries.write();
        match entries.get(key) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => {
                Some(entry.analysis.clone())
            }
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Insert (or replace) the analysis for `key`, returning the shared
    /// handle that was stored.
    pub fn insert(&self, key: CacheKey, analysis: StockAnalysis) -> Arc<StockAnalysis> {
        let shared = Arc::new(analysis);
        self.entries.write().insert(
            key,
            CacheEntry {
                analysis: shared.clone(),
                inserted_at: Instant::now(),
            },
        );
        shared
    }

    /// Drop the entry for `key`.  Returns `true` when something was removed.
    pub fn invalidate(&self, key: &CacheKey) -> bool {
        self.entries.write().remove(key).is_some()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Number of stored entries.  Expired entries still count until a read
    /// touches them.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }
}
