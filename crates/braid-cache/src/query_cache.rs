//! Coordinator over the exact and semantic tiers.

use std::sync::Arc;
use std::time::Duration;

use braid_core::config::CacheConfig;
use braid_core::errors::CacheError;
use braid_core::models::{CacheHitKind, FusedItem, SearchMetadata};
use braid_core::traits::IEmbeddingProvider;
use braid_observability::events;

use crate::entry::CacheEntry;
use crate::exact::ExactTier;
use crate::keys::{exact_key, CacheScope};
use crate::normalize::normalize_query;
use crate::semantic::SemanticTier;
use crate::stats::{CacheCounters, CacheStats};

/// Result of [`QueryCache::get`].
#[derive(Debug, Clone)]
pub struct CacheLookup {
    pub kind: CacheHitKind,
    pub entry: Option<Arc<CacheEntry>>,
    /// Cosine similarity of a semantic hit.
    pub similarity: Option<f32>,
    /// Query embedding computed during the lookup, reusable by a later `set`.
    pub embedding: Option<Vec<f32>>,
}

impl CacheLookup {
    fn miss(embedding: Option<Vec<f32>>) -> Self {
        Self {
            kind: CacheHitKind::Miss,
            entry: None,
            similarity: None,
            embedding,
        }
    }

    pub fn is_hit(&self) -> bool {
        self.kind.is_hit()
    }
}

/// Two-tier query cache. Cheap to clone; clones share both tiers and counters.
#[derive(Clone)]
pub struct QueryCache {
    exact: ExactTier,
    semantic: Option<SemanticTier>,
    embedder: Option<Arc<dyn IEmbeddingProvider>>,
    counters: Arc<CacheCounters>,
}

impl QueryCache {
    /// The semantic tier is active only when enabled in config and an embedder is given.
    pub fn new(config: &CacheConfig, embedder: Option<Arc<dyn IEmbeddingProvider>>) -> Self {
        let ttl = Duration::from_secs(config.ttl_secs);
        let semantic = match (&embedder, config.semantic_enabled) {
            (Some(_), true) => Some(SemanticTier::new(
                config.semantic_capacity,
                ttl,
                config.semantic_threshold,
            )),
            _ => None,
        };
        Self {
            exact: ExactTier::new(config.exact_capacity, ttl),
            semantic,
            embedder,
            counters: Arc::new(CacheCounters::default()),
        }
    }

    pub fn has_semantic_tier(&self) -> bool {
        self.semantic.is_some()
    }

    /// Exact tier first, then semantic. Embedding failures degrade to a miss.
    pub async fn get<'a>(&self, query: &str, scope: impl Into<CacheScope<'a>>) -> CacheLookup {
        let normalized = normalize_query(query);
        let ns_key = scope.into().key();

        if let Some(entry) = self.exact.get(&exact_key(&normalized, &ns_key)) {
            entry.record_hit();
            self.counters.exact_hit();
            return CacheLookup {
                kind: CacheHitKind::Exact,
                entry: Some(entry),
                similarity: None,
                embedding: None,
            };
        }

        let Some(semantic) = &self.semantic else {
            self.counters.miss();
            return CacheLookup::miss(None);
        };

        let embedding = match self.embed(query).await {
            Ok(embedding) => embedding,
            Err(err) => {
                self.counters.error();
                self.counters.miss();
                tracing::warn!(error = %err, "semantic cache lookup skipped");
                return CacheLookup::miss(None);
            }
        };

        match semantic.find(&ns_key, &embedding) {
            Some(found) => {
                found.entry.record_hit();
                self.counters.semantic_hit();
                CacheLookup {
                    kind: CacheHitKind::Semantic,
                    entry: Some(found.entry),
                    similarity: Some(found.similarity),
                    embedding: Some(embedding),
                }
            }
            None => {
                self.counters.miss();
                CacheLookup::miss(Some(embedding))
            }
        }
    }

    /// Write to the exact tier, then embed and write to the semantic tier.
    pub async fn set<'a>(
        &self,
        query: &str,
        results: Vec<FusedItem>,
        metadata: SearchMetadata,
        scope: impl Into<CacheScope<'a>>,
    ) -> Result<(), CacheError> {
        let entry = self.put_exact(query, results, metadata, scope);
        self.put_semantic(query, entry, None).await
    }

    /// Synchronous exact-tier write. Returns the stored entry for a follow-up
    /// [`QueryCache::put_semantic`].
    pub fn put_exact<'a>(
        &self,
        query: &str,
        results: Vec<FusedItem>,
        metadata: SearchMetadata,
        scope: impl Into<CacheScope<'a>>,
    ) -> Arc<CacheEntry> {
        let normalized = normalize_query(query);
        let ns_key = scope.into().key();
        let key = exact_key(&normalized, &ns_key);
        let result_count = results.len();
        let entry = Arc::new(CacheEntry::new(normalized, ns_key, results, metadata));
        self.exact.insert(key, Arc::clone(&entry));
        events::cache_populated(&entry.scope_key, result_count);
        entry
    }

    /// Semantic-tier write for an entry already stored by [`QueryCache::put_exact`].
    ///
    /// `embedding` may carry the vector computed during the lookup; otherwise
    /// the query is embedded here.
    pub async fn put_semantic(
        &self,
        query: &str,
        entry: Arc<CacheEntry>,
        embedding: Option<Vec<f32>>,
    ) -> Result<(), CacheError> {
        let Some(semantic) = &self.semantic else {
            return Ok(());
        };
        let embedding = match embedding {
            Some(embedding) if !embedding.is_empty() => embedding,
            _ => self.embed(query).await?,
        };
        let key = exact_key(&entry.normalized_query, &entry.scope_key);
        semantic.insert(key, embedding, entry);
        Ok(())
    }

    pub fn stats(&self) -> CacheStats {
        let semantic_entries = self.semantic.as_ref().map_or(0, SemanticTier::len);
        self.counters.snapshot(self.exact.len(), semantic_entries)
    }

    /// Drop every entry in both tiers and reset counters.
    pub fn clear(&self) {
        self.exact.clear();
        if let Some(semantic) = &self.semantic {
            semantic.clear();
        }
        self.counters.reset();
    }

    /// Flush pending eviction and expiry work so entry counts are exact.
    pub fn run_pending_tasks(&self) {
        self.exact.run_pending_tasks();
        if let Some(semantic) = &self.semantic {
            semantic.run_pending_tasks();
        }
    }

    async fn embed(&self, query: &str) -> Result<Vec<f32>, CacheError> {
        let embedder = self
            .embedder
            .as_ref()
            .ok_or_else(|| CacheError::EmbeddingUnavailable {
                reason: "no embedding provider configured".to_string(),
            })?;
        embedder
            .embed_dense(query)
            .await
            .map_err(|e| CacheError::EmbeddingUnavailable {
                reason: e.to_string(),
            })
    }
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("semantic", &self.semantic.is_some())
            .field("stats", &self.stats())
            .finish()
    }
}
