//! Semantic tier: cached query embeddings compared by cosine similarity,
//! restricted to entries with the same scope key.

use std::sync::Arc;
use std::time::{Duration, Instant};

use braid_core::models::cosine_similarity;
use moka::policy::EvictionPolicy;
use moka::sync::Cache;

use crate::entry::CacheEntry;

/// A cached query embedding and the entry it answers. Evicted together.
#[derive(Debug)]
pub struct SemanticSlot {
    pub scope_key: String,
    pub embedding: Vec<f32>,
    pub entry: Arc<CacheEntry>,
    inserted_at: Instant,
}

/// Best match found by [`SemanticTier::find`].
#[derive(Debug, Clone)]
pub struct SemanticMatch {
    pub entry: Arc<CacheEntry>,
    pub similarity: f32,
}

#[derive(Clone)]
pub struct SemanticTier {
    cache: Cache<String, Arc<SemanticSlot>>,
    ttl: Duration,
    threshold: f32,
}

impl SemanticTier {
    pub fn new(capacity: u64, ttl: Duration, threshold: f32) -> Self {
        let cache = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl)
            .eviction_policy(EvictionPolicy::lru())
            .build();
        Self {
            cache,
            ttl,
            threshold,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Highest-similarity live slot in `scope_key` at or above the threshold.
    pub fn find(&self, scope_key: &str, embedding: &[f32]) -> Option<SemanticMatch> {
        let mut best: Option<(Arc<String>, f32)> = None;
        for (key, slot) in self.cache.iter() {
            if slot.scope_key != scope_key || slot.inserted_at.elapsed() >= self.ttl {
                continue;
            }
            let similarity = cosine_similarity(embedding, &slot.embedding);
            if similarity < self.threshold {
                continue;
            }
            if best.as_ref().map_or(true, |(_, s)| similarity > *s) {
                best = Some((key, similarity));
            }
        }

        // Go through `get` so the hit counts toward LRU recency.
        let (key, similarity) = best?;
        let slot = self.cache.get(key.as_str())?;
        Some(SemanticMatch {
            entry: Arc::clone(&slot.entry),
            similarity,
        })
    }

    pub fn insert(&self, key: String, embedding: Vec<f32>, entry: Arc<CacheEntry>) {
        if embedding.is_empty() {
            return;
        }
        let slot = SemanticSlot {
            scope_key: entry.scope_key.clone(),
            embedding,
            entry,
            inserted_at: Instant::now(),
        };
        self.cache.insert(key, Arc::new(slot));
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

    fn entry(query: &str, ns: &str) -> Arc<CacheEntry> {
        Arc::new(CacheEntry::new(
            query.to_string(),
            ns.to_string(),
            Vec::new(),
            SearchMetadata::default(),
        ))
    }

    fn tier() -> SemanticTier {
        SemanticTier::new(10, Duration::from_secs(60), 0.95)
    }

    #[test]
    fn best_match_above_threshold_wins() {
        let tier = tier();
        tier.insert("near".into(), vec![0.97, 0.2431], entry("near", "a"));
        tier.insert("exact".into(), vec![1.0, 0.0], entry("exact", "a"));
        tier.insert("far".into(), vec![0.0, 1.0], entry("far", "a"));

        let hit = tier.find("a", &[1.0, 0.0]).unwrap();
        assert_eq!(hit.entry.normalized_query, "exact");
        assert!((hit.similarity - 1.0).abs() < 1e-6);
    }

    #[test]
    fn below_threshold_is_a_miss() {
        let tier = tier();
        tier.insert("k".into(), vec![0.8, 0.6], entry("q", "a"));
        assert!(tier.find("a", &[1.0, 0.0]).is_none());
    }

    #[test]
    fn other_namespace_is_invisible() {
        let tier = tier();
        tier.insert("k".into(), vec![1.0, 0.0], entry("q", "a"));
        assert!(tier.find("b", &[1.0, 0.0]).is_none());
        assert!(tier.find("a", &[1.0, 0.0]).is_some());
    }

    #[test]
    fn empty_embedding_is_not_stored() {
        let tier = tier();
        tier.insert("k".into(), Vec::new(), entry("q", "a"));
        tier.run_pending_tasks();
        assert!(tier.is_empty());
    }
}
