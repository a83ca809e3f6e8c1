use std::sync::atomic::{AtomicU64, Ordering};

use braid_core::models::{FusedItem, SearchMetadata};
use chrono::{DateTime, Utc};

/// One cached result set. Shared by both tiers through `Arc`; replaced whole,
/// never patched. Only `hit_count` mutates after insertion.
#[derive(Debug)]
pub struct CacheEntry {
    pub normalized_query: String,
    /// [`crate::CacheScope::key`] the entry was written under.
    pub scope_key: String,
    pub results: Vec<FusedItem>,
    pub metadata: SearchMetadata,
    pub created_at: DateTime<Utc>,
    hit_count: AtomicU64,
}

impl CacheEntry {
    pub fn new(
        normalized_query: String,
        scope_key: String,
        results: Vec<FusedItem>,
        metadata: SearchMetadata,
    ) -> Self {
        Self {
            normalized_query,
            scope_key,
            results,
            metadata,
            created_at: Utc::now(),
            hit_count: AtomicU64::new(0),
        }
    }

    /// Whether this entry can answer a request for `top_k` results: it holds
    /// that many, or it holds every candidate its run produced.
    pub fn covers(&self, top_k: usize) -> bool {
        self.results.len() >= top_k || self.results.len() >= self.metadata.total_candidates
    }

    pub fn hit_count(&self) -> u64 {
        self.hit_count.load(Ordering::Relaxed)
    }

    pub(crate) fn record_hit(&self) -> u64 {
        self.hit_count.fetch_add(1, Ordering::Relaxed) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use braid_core::models::{Channel, RankedItem};

    fn entry(ids: &[&str], total_candidates: usize) -> CacheEntry {
        let results = ids
            .iter()
            .map(|id| FusedItem::from_ranked(&RankedItem::new(*id, Channel::GraphLocal)))
            .collect();
        let metadata = SearchMetadata {
            total_candidates,
            ..SearchMetadata::default()
        };
        CacheEntry::new("q".into(), "acme".into(), results, metadata)
    }

    #[test]
    fn truncated_entry_does_not_cover_a_deeper_request() {
        let short = entry(&["c1"], 6);
        assert!(short.covers(1));
        assert!(!short.covers(5));
    }

    #[test]
    fn exhaustive_entry_covers_any_depth() {
        let all = entry(&["c1", "c2"], 2);
        assert!(all.covers(50));
        assert!(entry(&[], 0).covers(10));
    }
}
