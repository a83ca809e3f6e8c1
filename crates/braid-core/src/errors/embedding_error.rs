/// Embedding collaborator errors.
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("embedding service unavailable: {provider}")]
    ProviderUnavailable { provider: String },

    #[error("inference failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("provider {provider} returned no dense vector")]
    MissingDense { provider: String },

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}
