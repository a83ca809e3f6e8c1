use serde::{Deserialize, Serialize};

use super::defaults;

/// Two-tier query cache settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    /// Max entries in the exact tier before LRU eviction.
    pub exact_capacity: u64,
    /// Max entries in the semantic tier before LRU eviction.
    pub semantic_capacity: u64,
    /// Time-to-live for both tiers (seconds).
    pub ttl_secs: u64,
    /// Minimum cosine similarity for a semantic hit, in `(0, 1]`.
    pub semantic_threshold: f32,
    /// Disable to run the exact tier alone.
    pub semantic_enabled: bool,
    /// Skip the cache write when any channel failed, so a transient outage
    /// does not pin a partial answer for the TTL.
    pub skip_degraded: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            exact_capacity: defaults::DEFAULT_EXACT_CAPACITY,
            semantic_capacity: defaults::DEFAULT_SEMANTIC_CAPACITY,
            ttl_secs: defaults::DEFAULT_CACHE_TTL_SECS,
            semantic_threshold: defaults::DEFAULT_SEMANTIC_THRESHOLD,
            semantic_enabled: true,
            skip_degraded: false,
        }
    }
}
