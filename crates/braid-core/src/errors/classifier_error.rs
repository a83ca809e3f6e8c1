/// Intent classifier errors. The orchestrator falls back to the default intent profile.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("classifier unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("classification failed: {reason}")]
    Failed { reason: String },
}
