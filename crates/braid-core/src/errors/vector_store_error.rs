/// Vector store errors.
#[derive(Debug, thiserror::Error)]
pub enum VectorStoreError {
    #[error("vector store unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("hybrid dense+sparse search unsupported: {reason}")]
    HybridUnsupported { reason: String },

    #[error("vector search failed: {reason}")]
    SearchFailed { reason: String },
}
