//! Exact tier: normalized query + namespace set → entry.

use std::sync::Arc;
use std::time::Duration;

use moka::policy::EvictionPolicy;
use moka::sync::Cache;

use crate::entry::CacheEntry;

/// Bounded, TTL-expiring map keyed by [`crate::keys::exact_key`].
#[derive(Clone)]
pub struct ExactTier {
    cache: Cache<String, Arc<CacheEntry>>,
}

impl ExactTier {
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl)
            .eviction_policy(EvictionPolicy::lru())
            .build();
        Self { cache }
    }

    pub fn get(&self, key: &str) -> Option<Arc<CacheEntry>> {
        self.cache.get(key)
    }

    pub fn insert(&self, key: String, entry: Arc<CacheEntry>) {
        self.cache.insert(key, entry);
    }

    pub fn len(&self) -> u64 {
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.cache.invalidate_all();
    }

    pub fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use braid_core::models::SearchMetadata;

    fn entry(query: &str) -> Arc<CacheEntry> {
        Arc::new(CacheEntry::new(
            query.to_string(),
            "a".to_string(),
            Vec::new(),
            SearchMetadata::default(),
        ))
    }

    #[test]
    fn insert_and_get() {
        let tier = ExactTier::new(10, Duration::from_secs(60));
        tier.insert("k".into(), entry("q"));
        assert_eq!(tier.get("k").map(|e| e.normalized_query.clone()), Some("q".into()));
        assert!(tier.get("missing").is_none());
    }

    #[test]
    fn capacity_bounds_entry_count() {
        let tier = ExactTier::new(2, Duration::from_secs(60));
        for i in 0..10 {
            tier.insert(format!("k{i}"), entry("q"));
        }
        tier.run_pending_tasks();
        assert!(tier.len() <= 2);
    }

    #[test]
    fn clear_empties_tier() {
        let tier = ExactTier::new(10, Duration::from_secs(60));
        tier.insert("k".into(), entry("q"));
        tier.clear();
        assert!(tier.get("k").is_none());
    }
}
