use serde::{Deserialize, Serialize};

/// One reranker score, addressing a document by its index in the request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RerankScore {
    pub index: usize,
    pub score: f64,
}
