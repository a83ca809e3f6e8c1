/// Reranker collaborator errors. The fused order is kept when reranking fails.
#[derive(Debug, thiserror::Error)]
pub enum RerankError {
    #[error("reranker unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("reranker returned index {index} for {document_count} documents")]
    IndexOutOfRange { index: usize, document_count: usize },
}
