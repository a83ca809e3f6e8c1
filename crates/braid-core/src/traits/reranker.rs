use async_trait::async_trait;

use crate::errors::BraidResult;
use crate::models::RerankScore;

/// Cross-encoder scoring of query/document pairs.
#[async_trait]
pub trait IReranker: Send + Sync {
    /// Scores sorted descending. `index` refers to a position in `documents`.
    async fn score(&self, query: &str, documents: &[String]) -> BraidResult<Vec<RerankScore>>;

    fn name(&self) -> &str;
}
