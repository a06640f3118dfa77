//! Thread-safe result cache.

use crate::{Fingerprint, LruStore};
use derive_getters::Getters;
use parking_lot::Mutex;
use quarry_core::ResultSet;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Capacity used when none is configured.
pub const DEFAULT_CAPACITY: usize = 10;

/// Counters describing cache activity since construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Getters)]
pub struct CacheStats {
    /// Lookups that found an entry
    hits: u64,
    /// Lookups that found nothing
    misses: u64,
    /// Entries inserted or replaced
    insertions: u64,
    /// Entries dropped to make room
    evictions: u64,
    /// Entries currently resident
    entries: usize,
}

impl CacheStats {
    /// Fraction of lookups that were hits (0.0 when nothing was looked up).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Debug)]
struct CacheState {
    store: LruStore<Fingerprint, Arc<ResultSet>>,
    stats: CacheStats,
}

/// Bounded LRU cache of fetched result sets, keyed by [`Fingerprint`].
///
/// Every operation takes one lock, so recency updates and eviction are atomic
/// with respect to concurrent callers. The cache guarantees one entry per
/// fingerprint; it does not deduplicate concurrent fetches.
#[derive(Debug)]
pub struct ResultCache {
    state: Mutex<CacheState>,
}

impl ResultCache {
    /// Create a cache holding at most `capacity` results (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Mutex::new(CacheState {
                store: LruStore::new(capacity),
                stats: CacheStats::default(),
            }),
        }
    }

    /// Maximum number of resident results.
    pub fn capacity(&self) -> usize {
        self.state.lock().store.capacity()
    }

    /// Look up a result, marking it most recently used on a hit.
    #[instrument(skip(self), fields(fingerprint = %key))]
    pub fn get(&self, key: &Fingerprint) -> Option<Arc<ResultSet>> {
        let mut state = self.state.lock();
        match state.store.get(key).cloned() {
            Some(result) => {
                state.stats.hits += 1;
                debug!(rows = result.row_count(), "Cache hit");
                Some(result)
            }
            None => {
                state.stats.misses += 1;
                debug!("Cache miss");
                None
            }
        }
    }

    /// Whether a result is resident. Does not touch recency or counters.
    pub fn contains(&self, key: &Fingerprint) -> bool {
        self.state.lock().store.contains(key)
    }

    /// Insert or replace a result; evicts the least recently used entry when
    /// a new key exceeds capacity.
    #[instrument(skip(self, result), fields(fingerprint = %key))]
    pub fn put(&self, key: Fingerprint, result: impl Into<Arc<ResultSet>>) {
        let mut state = self.state.lock();
        state.stats.insertions += 1;
        if let Some((evicted, _)) = state.store.put(key, result.into()) {
            state.stats.evictions += 1;
            debug!(evicted = %evicted, "Evicted least recently used result");
        }
    }

    /// Drop every entry. Counters are kept.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        debug!(entries = state.store.len(), "Clearing result cache");
        state.store.clear();
    }

    /// Number of resident results.
    pub fn len(&self) -> usize {
        self.state.lock().store.len()
    }

    /// Whether no result is resident.
    pub fn is_empty(&self) -> bool {
        self.state.lock().store.is_empty()
    }

    /// Snapshot of the counters.
    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        CacheStats {
            entries: state.store.len(),
            ..state.stats
        }
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
