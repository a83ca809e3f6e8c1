use crate::models::Channel;

/// A single retrieval channel failed. Recoverable: the channel contributes an empty list.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("{channel} backend unavailable: {reason}")]
    BackendUnavailable { channel: Channel, reason: String },

    #[error("{channel} returned a malformed record: {reason}")]
    MalformedResponse { channel: Channel, reason: String },

    #[error("{channel} requires anchors but none were supplied")]
    MissingAnchors { channel: Channel },
}
