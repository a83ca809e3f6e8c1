use async_trait::async_trait;

use crate::errors::{BraidResult, EmbeddingError};
use crate::models::Embedding;

/// Embedding generation service.
#[async_trait]
pub trait IEmbeddingProvider: Send + Sync {
    /// Embed a text into a dense vector, a sparse term map, or both.
    async fn embed(&self, text: &str) -> BraidResult<Embedding>;

    /// Embed and keep only the dense side. Used by the semantic cache tier.
    async fn embed_dense(&self, text: &str) -> BraidResult<Vec<f32>> {
        let embedding = self.embed(text).await?;
        match embedding.dense {
            Some(dense) if !dense.is_empty() => Ok(dense),
            _ => Err(EmbeddingError::MissingDense {
                provider: self.name().to_string(),
            }
            .into()),
        }
    }

    /// Human-readable provider name.
    fn name(&self) -> &str;
}
