use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use braid_core::errors::{BraidResult, VectorStoreError};
use braid_core::models::{cosine_similarity, VectorHit, VectorQuery};
use braid_core::traits::IVectorStore;

use crate::corpus::GoldenCorpus;
use crate::embedder::hash_embedding;

#[derive(Debug, Clone)]
struct StoredChunk {
    hit: VectorHit,
    vector: Vec<f32>,
}

/// Brute-force cosine search over an in-memory chunk list.
///
/// Hybrid queries add a small bonus per sparse term found in the chunk text.
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    chunks: Vec<StoredChunk>,
    hybrid: bool,
    fail_hybrid: bool,
    fail_all: bool,
    ignore_namespace_filter: bool,
    delay: Option<Duration>,
    queries: Mutex<Vec<VectorQuery>>,
    calls: AtomicUsize,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self {
            hybrid: true,
            ..Self::default()
        }
    }

    /// Every corpus chunk, embedded with [`hash_embedding`].
    pub fn from_corpus(corpus: &GoldenCorpus) -> Self {
        let mut store = Self::new();
        for chunk in &corpus.chunks {
            store = store.with_chunk(
                VectorHit {
                    id: chunk.id.clone(),
                    text: chunk.text.clone(),
                    document_id: chunk.document_id.clone(),
                    namespace_id: chunk.namespace_id.clone(),
                    score: 0.0,
                },
                hash_embedding(&chunk.text),
            );
        }
        store
    }

    pub fn with_chunk(mut self, hit: VectorHit, vector: Vec<f32>) -> Self {
        self.chunks.push(StoredChunk { hit, vector });
        self
    }

    /// Report no server-side hybrid support.
    pub fn dense_only(mut self) -> Self {
        self.hybrid = false;
        self
    }

    /// Fail any query that carries a sparse vector.
    pub fn failing_hybrid(mut self) -> Self {
        self.fail_hybrid = true;
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail_all = true;
        self
    }

    /// Return hits from every namespace, as a misconfigured store would.
    pub fn ignoring_namespace_filter(mut self) -> Self {
        self.ignore_namespace_filter = true;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<VectorQuery> {
        self.queries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl IVectorStore for InMemoryVectorStore {
    async fn search(&self, query: &VectorQuery) -> BraidResult<Vec<VectorHit>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(query.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_all {
            return Err(VectorStoreError::Unavailable {
                reason: "store offline".to_string(),
            }
            .into());
        }
        if self.fail_hybrid && query.is_hybrid() {
            return Err(VectorStoreError::HybridUnsupported {
                reason: "sparse index missing".to_string(),
            }
            .into());
        }
        let Some(dense) = &query.dense else {
            return Err(VectorStoreError::SearchFailed {
                reason: "query has no dense vector".to_string(),
            }
            .into());
        };

        let mut hits: Vec<VectorHit> = self
            .chunks
            .iter()
            .filter(|c| {
                self.ignore_namespace_filter
                    || query.namespaces.is_empty()
                    || query.namespaces.contains(&c.hit.namespace_id)
            })
            .map(|c| {
                let mut score = cosine_similarity(dense, &c.vector) as f64;
                if let Some(sparse) = query.sparse.as_ref().filter(|_| self.hybrid) {
                    let text = c.hit.text.to_lowercase();
                    score += sparse
                        .iter()
                        .filter(|(term, _)| text.contains(term.as_str()))
                        .map(|(_, w)| *w as f64 * 0.01)
                        .sum::<f64>();
                }
                VectorHit {
                    score,
                    ..c.hit.clone()
                }
            })
            .collect();

        hits.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.id.cmp(&b.id)));
        hits.truncate(query.top_k);
        Ok(hits)
    }

    fn supports_hybrid(&self) -> bool {
        self.hybrid
    }

    fn name(&self) -> &str {
        "in-memory-vector"
    }
}
