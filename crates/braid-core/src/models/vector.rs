use serde::{Deserialize, Serialize};

use super::SparseVector;

/// A combined dense/sparse similarity request to the vector store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VectorQuery {
    pub dense: Option<Vec<f32>>,
    pub sparse: Option<SparseVector>,
    pub top_k: usize,
    /// Namespace filter. Empty means unscoped.
    pub namespaces: Vec<String>,
}

impl VectorQuery {
    pub fn is_hybrid(&self) -> bool {
        self.dense.is_some() && self.sparse.as_ref().is_some_and(|s| !s.is_empty())
    }
}

/// A vector store hit, in store order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorHit {
    pub id: String,
    pub text: String,
    pub document_id: String,
    pub namespace_id: String,
    pub score: f64,
}
