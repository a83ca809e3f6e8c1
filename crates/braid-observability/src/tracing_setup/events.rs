//! Structured log events for each orchestrator transition.
//!
//! Each function emits a `tracing` event with structured fields.

use braid_core::models::{CacheHitKind, Channel};

/// A channel failed and contributes an empty list.
pub fn channel_failed(channel: Channel, query_prefix: &str, error: &str) {
    tracing::warn!(
        event = "channel_failed",
        channel = %channel,
        query = %query_prefix,
        error = %error,
        "channel failed, continuing without it"
    );
}

/// A channel returned.
pub fn channel_completed(channel: Channel, result_count: usize, latency_ms: u64) {
    tracing::debug!(
        event = "channel_completed",
        channel = %channel,
        result_count = result_count,
        latency_ms = latency_ms,
        "channel completed"
    );
}

/// Outcome of a cache lookup.
pub fn cache_lookup(kind: CacheHitKind, similarity: Option<f32>, latency_ms: u64) {
    tracing::info!(
        event = "cache_lookup",
        hit_kind = kind.as_str(),
        similarity = ?similarity,
        latency_ms = latency_ms,
        "cache lookup"
    );
}

/// A result set was written to the cache.
pub fn cache_populated(namespace_key: &str, result_count: usize) {
    tracing::debug!(
        event = "cache_populated",
        namespace_key = %namespace_key,
        result_count = result_count,
        "cache populated"
    );
}

/// A pipeline stage finished.
pub fn stage_completed(stage: &str, latency_ms: u64) {
    tracing::debug!(
        event = "stage_completed",
        stage = %stage,
        latency_ms = latency_ms,
        "stage completed"
    );
}

/// A search request finished.
pub fn request_completed(
    request_id: &str,
    intent: &str,
    channels: &[Channel],
    result_count: usize,
    cache_hit: CacheHitKind,
    latency_ms: u64,
) {
    let channels: Vec<&str> = channels.iter().map(Channel::as_str).collect();
    tracing::info!(
        event = "request_completed",
        request_id = %request_id,
        intent = %intent,
        channels = ?channels,
        result_count = result_count,
        cache_hit = cache_hit.as_str(),
        latency_ms = latency_ms,
        "request completed"
    );
}
