//! Error taxonomy. One enum per subsystem, wrapped by [`BraidError`].
//!
//! Recoverable kinds (channel, cache, rerank, classifier) are handled inside the
//! orchestrator; only cancellation, invalid requests, and missing collaborators
//! reach the caller.

mod cache_error;
mod channel_error;
mod classifier_error;
mod config_error;
mod embedding_error;
mod fusion_error;
mod graph_error;
mod rerank_error;
mod vector_store_error;

pub use cache_error::CacheError;
pub use channel_error::ChannelError;
pub use classifier_error::ClassifierError;
pub use config_error::ConfigError;
pub use embedding_error::EmbeddingError;
pub use fusion_error::FusionError;
pub use graph_error::GraphError;
pub use rerank_error::RerankError;
pub use vector_store_error::VectorStoreError;

/// Top-level error for the retrieval core.
#[derive(Debug, thiserror::Error)]
pub enum BraidError {
    #[error("channel error: {0}")]
    ChannelError(#[from] ChannelError),

    #[error("fusion error: {0}")]
    FusionError(#[from] FusionError),

    #[error("cache error: {0}")]
    CacheError(#[from] CacheError),

    #[error("embedding error: {0}")]
    EmbeddingError(#[from] EmbeddingError),

    #[error("graph store error: {0}")]
    GraphError(#[from] GraphError),

    #[error("vector store error: {0}")]
    VectorStoreError(#[from] VectorStoreError),

    #[error("rerank error: {0}")]
    RerankError(#[from] RerankError),

    #[error("intent classifier error: {0}")]
    ClassifierError(#[from] ClassifierError),

    #[error("config error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("request cancelled during {stage}")]
    Cancelled { stage: String },

    #[error("deadline exceeded during {stage} after {elapsed_ms} ms")]
    DeadlineExceeded { stage: String, elapsed_ms: u64 },

    #[error("no retrieval collaborators configured: need a vector store with an embedder, or a graph store")]
    NoCollaborators,

    #[error("invalid request: {reason}")]
    InvalidRequest { reason: String },
}

impl BraidError {
    /// Whether this error reports caller cancellation or an expired deadline,
    /// as opposed to a failure or an empty outcome.
    pub fn is_cancellation(&self) -> bool {
        matches!(
            self,
            BraidError::Cancelled { .. } | BraidError::DeadlineExceeded { .. }
        )
    }

    pub fn invalid_request(reason: impl Into<String>) -> Self {
        BraidError::InvalidRequest {
            reason: reason.into(),
        }
    }
}

/// Convenience alias used throughout the workspace.
pub type BraidResult<T> = Result<T, BraidError>;
