/// Fusion could not produce a ranking. Surfaced as an empty result, never as a failure.
#[derive(Debug, thiserror::Error)]
pub enum FusionError {
    #[error("all fusion weights resolved to zero")]
    AllWeightsZero,

    #[error("all {attempted} launched channels failed")]
    AllChannelsFailed { attempted: usize },

    #[error("no channel was eligible to run")]
    NoChannelsExecuted,
}
