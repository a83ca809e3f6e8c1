use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Lookup counters shared by every clone of a [`crate::QueryCache`].
#[derive(Debug, Default)]
pub(crate) struct CacheCounters {
    exact_hits: AtomicU64,
    semantic_hits: AtomicU64,
    misses: AtomicU64,
    errors: AtomicU64,
}

impl CacheCounters {
    pub fn exact_hit(&self) {
        self.exact_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn semantic_hit(&self) {
        self.semantic_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self, exact_entries: u64, semantic_entries: u64) -> CacheStats {
        CacheStats {
            exact_hits: self.exact_hits.load(Ordering::Relaxed),
            semantic_hits: self.semantic_hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            exact_entries,
            semantic_entries,
        }
    }

    pub fn reset(&self) {
        for counter in [&self.exact_hits, &self.semantic_hits, &self.misses, &self.errors] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

/// Point-in-time cache statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CacheStats {
    pub exact_hits: u64,
    pub semantic_hits: u64,
    pub misses: u64,
    /// Lookups degraded to a miss because the embedder failed.
    pub errors: u64,
    /// Approximate until pending maintenance has run.
    pub exact_entries: u64,
    pub semantic_entries: u64,
}

impl CacheStats {
    pub fn lookups(&self) -> u64 {
        self.exact_hits + self.semantic_hits + self.misses
    }

    pub fn hit_rate(&self) -> f64 {
        match self.lookups() {
            0 => 0.0,
            n => (self.exact_hits + self.semantic_hits) as f64 / n as f64,
        }
    }
}
