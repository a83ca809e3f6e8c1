use async_trait::async_trait;

use crate::errors::BraidResult;
use crate::models::{GraphParams, GraphQuery, GraphRecord};

/// Parameterized read-only traversal.
///
/// Every query carries a `namespaces` parameter. Stores must refuse one that
/// does not, unless the params were built from an unscoped scope.
#[async_trait]
pub trait IGraphStore: Send + Sync {
    async fn execute_read(
        &self,
        query: &GraphQuery,
        params: &GraphParams,
    ) -> BraidResult<Vec<GraphRecord>>;

    fn name(&self) -> &str;
}
