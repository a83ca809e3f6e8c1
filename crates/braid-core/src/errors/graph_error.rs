/// Graph store errors.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("graph store unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("graph query {query} failed: {reason}")]
    QueryFailed { query: String, reason: String },

    #[error("graph query {query} issued without a namespace scope")]
    UnscopedQuery { query: String },
}
