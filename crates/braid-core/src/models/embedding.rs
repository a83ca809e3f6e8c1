use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Sparse term-weight map (e.g. SPLADE/BM25 style).
pub type SparseVector = HashMap<String, f32>;

/// Output of the embedding collaborator. Either side may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
    pub dense: Option<Vec<f32>>,
    pub sparse: Option<SparseVector>,
}

impl Embedding {
    pub fn dense(vector: Vec<f32>) -> Self {
        Self {
            dense: Some(vector),
            sparse: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.dense.as_ref().map_or(true, |d| d.is_empty())
            && self.sparse.as_ref().map_or(true, |s| s.is_empty())
    }
}

/// Cosine similarity of two dense vectors.
///
/// Returns 0.0 for mismatched lengths or zero-magnitude inputs.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_vectors_are_fully_similar() {
        let v = vec![0.3, 0.4, 0.5];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn orthogonal_vectors_score_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn mismatched_or_zero_vectors_score_zero() {
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    #[test]
    fn empty_embedding_detection() {
        assert!(Embedding::default().is_empty());
        assert!(!Embedding::dense(vec![1.0]).is_empty());
    }
}
