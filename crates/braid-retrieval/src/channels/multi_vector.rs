use std::collections::HashSet;
use std::sync::Arc;

use braid_core::constants::{
    META_RETRIEVAL_PATH, PATH_DENSE, PATH_DENSE_LEGACY, PATH_HYBRID, PATH_SPARSE,
};
use braid_core::errors::{BraidResult, ChannelError, EmbeddingError};
use braid_core::models::{assign_ranks, Channel, RankedItem, VectorHit, VectorQuery};
use braid_core::traits::{IEmbeddingProvider, IVectorStore};

use super::{backend_error, ChannelQuery};

/// Dense and/or sparse similarity search.
///
/// The primary path sends one combined query (server-side dense+sparse fusion
/// when the store supports it). If embedding or search fails, a dense-only
/// query is tried before the channel gives up.
pub struct MultiVectorChannel {
    embedder: Arc<dyn IEmbeddingProvider>,
    store: Arc<dyn IVectorStore>,
}

impl MultiVectorChannel {
    pub fn new(embedder: Arc<dyn IEmbeddingProvider>, store: Arc<dyn IVectorStore>) -> Self {
        Self { embedder, store }
    }

    pub async fn search(&self, query: &ChannelQuery<'_>) -> Result<Vec<RankedItem>, ChannelError> {
        let namespaces = query.scope.namespaces().to_vec();

        let (hits, path) = match self.primary(query, &namespaces).await {
            Ok(found) => found,
            Err(err) => {
                tracing::warn!(
                    channel = %Channel::MultiVector,
                    error = %err,
                    "combined vector search failed, trying dense-only path"
                );
                let hits = self
                    .dense_legacy(query, namespaces)
                    .await
                    .map_err(|e| backend_error(Channel::MultiVector, e))?;
                (hits, PATH_DENSE_LEGACY)
            }
        };

        // The store is trusted for order, not for tenant isolation.
        let mut seen = HashSet::new();
        let mut items: Vec<RankedItem> = hits
            .into_iter()
            .filter(|hit| query.scope.admits(&hit.namespace_id))
            .filter(|hit| seen.insert(hit.id.clone()))
            .take(query.top_k)
            .map(|hit| {
                RankedItem::new(hit.id, Channel::MultiVector)
                    .with_text(hit.text)
                    .with_document(hit.document_id)
                    .with_namespace(hit.namespace_id)
                    .with_score(hit.score)
                    .with_metadata(META_RETRIEVAL_PATH, path)
            })
            .collect();
        assign_ranks(&mut items);
        Ok(items)
    }

    async fn primary(
        &self,
        query: &ChannelQuery<'_>,
        namespaces: &[String],
    ) -> BraidResult<(Vec<VectorHit>, &'static str)> {
        let embedding = self.embedder.embed(query.text).await?;
        if embedding.is_empty() {
            return Err(EmbeddingError::InferenceFailed {
                reason: format!("{} returned an empty embedding", self.embedder.name()),
            }
            .into());
        }
        let sparse = embedding
            .sparse
            .filter(|s| !s.is_empty() && self.store.supports_hybrid());
        let request = VectorQuery {
            dense: embedding.dense.filter(|d| !d.is_empty()),
            sparse,
            top_k: query.top_k,
            namespaces: namespaces.to_vec(),
        };
        let path = if request.is_hybrid() {
            PATH_HYBRID
        } else if request.dense.is_some() {
            PATH_DENSE
        } else {
            PATH_SPARSE
        };
        Ok((self.store.search(&request).await?, path))
    }

    async fn dense_legacy(
        &self,
        query: &ChannelQuery<'_>,
        namespaces: Vec<String>,
    ) -> BraidResult<Vec<VectorHit>> {
        let dense = self.embedder.embed_dense(query.text).await?;
        let request = VectorQuery {
            dense: Some(dense),
            sparse: None,
            top_k: query.top_k,
            namespaces,
        };
        self.store.search(&request).await
    }
}
