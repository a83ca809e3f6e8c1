//! Span definitions per pipeline stage: retrieval, channel, cache, fusion.

/// Create a span for one search request.
#[macro_export]
macro_rules! retrieval_span {
    ($request_id:expr, $query_prefix:expr) => {
        tracing::info_span!(
            "braid.retrieval",
            request_id = %$request_id,
            query = %$query_prefix
        )
    };
}

/// Create a span for one channel call.
#[macro_export]
macro_rules! channel_span {
    ($channel:expr, $top_k:expr) => {
        tracing::info_span!("braid.channel", channel = %$channel, top_k = $top_k)
    };
}

/// Create a cache span.
#[macro_export]
macro_rules! cache_span {
    ($operation:expr) => {
        tracing::debug_span!("braid.cache", operation = %$operation)
    };
}

/// Create a fusion span.
#[macro_export]
macro_rules! fusion_span {
    ($ranking_count:expr) => {
        tracing::debug_span!("braid.fusion", rankings = $ranking_count)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const RETRIEVAL: &str = "braid.retrieval";
    pub const CHANNEL: &str = "braid.channel";
    pub const CACHE: &str = "braid.cache";
    pub const FUSION: &str = "braid.fusion";
}
