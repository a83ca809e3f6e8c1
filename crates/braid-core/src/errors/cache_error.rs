/// Query cache errors. Logged and treated as a miss.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("query embedding unavailable for semantic lookup: {reason}")]
    EmbeddingUnavailable { reason: String },

    #[error("cache backend unavailable: {reason}")]
    Unavailable { reason: String },
}
