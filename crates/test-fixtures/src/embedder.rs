use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use braid_core::errors::{BraidResult, EmbeddingError};
use braid_core::models::{Embedding, SparseVector};
use braid_core::traits::IEmbeddingProvider;

/// Dimensionality of [`hash_embedding`] vectors.
pub const HASH_DIMS: usize = 64;

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

/// Deterministic bag-of-words embedding: each token adds 1.0 to a blake3-chosen
/// bucket, then the vector is L2-normalized. Texts sharing words are similar.
pub fn hash_embedding(text: &str) -> Vec<f32> {
    let mut vector = vec![0.0f32; HASH_DIMS];
    for token in tokens(text) {
        let hash = blake3::hash(token.as_bytes());
        let bytes = hash.as_bytes();
        let bucket = u16::from_le_bytes([bytes[0], bytes[1]]) as usize % HASH_DIMS;
        vector[bucket] += 1.0;
    }
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in &mut vector {
            *x /= norm;
        }
    }
    vector
}

/// Term-frequency sparse vector.
pub fn term_weights(text: &str) -> SparseVector {
    let mut sparse = SparseVector::new();
    for token in tokens(text) {
        *sparse.entry(token).or_insert(0.0) += 1.0;
    }
    sparse
}

/// Embedder with pinned vectors for chosen texts and [`hash_embedding`] for the rest.
#[derive(Debug, Default)]
pub struct StaticEmbedder {
    pinned: HashMap<String, Vec<f32>>,
    sparse: bool,
    calls: AtomicUsize,
}

impl StaticEmbedder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also emit a term-frequency sparse vector.
    pub fn with_sparse(mut self) -> Self {
        self.sparse = true;
        self
    }

    /// Return `vector` whenever exactly `text` is embedded.
    pub fn pin(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.pinned.insert(text.to_string(), vector);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IEmbeddingProvider for StaticEmbedder {
    async fn embed(&self, text: &str) -> BraidResult<Embedding> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let dense = self
            .pinned
            .get(text)
            .cloned()
            .unwrap_or_else(|| hash_embedding(text));
        let sparse = self.sparse.then(|| term_weights(text));
        Ok(Embedding {
            dense: Some(dense),
            sparse,
        })
    }

    fn name(&self) -> &str {
        "static"
    }
}

/// Embedder that always fails.
#[derive(Debug, Default)]
pub struct FailingEmbedder {
    calls: AtomicUsize,
}

impl FailingEmbedder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IEmbeddingProvider for FailingEmbedder {
    async fn embed(&self, _text: &str) -> BraidResult<Embedding> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(EmbeddingError::ProviderUnavailable {
            provider: "failing".to_string(),
        }
        .into())
    }

    fn name(&self) -> &str {
        "failing"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use braid_core::models::cosine_similarity;

    #[test]
    fn shared_words_are_similar() {
        let a = hash_embedding("etcd raft consensus");
        let b = hash_embedding("Raft consensus in etcd");
        let c = hash_embedding("grafana dashboards");
        assert!(cosine_similarity(&a, &b) > cosine_similarity(&a, &c));
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn pinned_vectors_win() {
        let embedder = StaticEmbedder::new().pin("q", vec![1.0, 0.0]);
        assert_eq!(embedder.embed_dense("q").await.unwrap(), vec![1.0, 0.0]);
        assert_eq!(embedder.embed_dense("other").await.unwrap().len(), HASH_DIMS);
        assert_eq!(embedder.calls(), 2);
    }

    #[tokio::test]
    async fn sparse_is_opt_in() {
        let plain = StaticEmbedder::new().embed("a b a").await.unwrap();
        assert!(plain.sparse.is_none());
        let sparse = StaticEmbedder::new().with_sparse().embed("a b a").await.unwrap();
        assert_eq!(sparse.sparse.unwrap()["a"], 2.0);
    }
}
