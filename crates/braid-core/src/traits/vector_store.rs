use async_trait::async_trait;

use crate::errors::BraidResult;
use crate::models::{VectorHit, VectorQuery};

/// Read-only similarity search.
///
/// Implementations should filter by `query.namespaces` server-side; callers
/// post-filter regardless.
#[async_trait]
pub trait IVectorStore: Send + Sync {
    /// Hits in store order, best first.
    async fn search(&self, query: &VectorQuery) -> BraidResult<Vec<VectorHit>>;

    /// Whether the store fuses dense and sparse server-side.
    fn supports_hybrid(&self) -> bool {
        true
    }

    fn name(&self) -> &str;
}
