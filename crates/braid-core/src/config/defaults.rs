//! Default values for every configuration field.

use std::collections::BTreeMap;

use crate::models::FusionWeights;

// Retrieval
pub const DEFAULT_RRF_K: u32 = 60;
pub const DEFAULT_TOP_K: usize = 10;
pub const DEFAULT_CHANNEL_OVER_FETCH: usize = 2;
pub const DEFAULT_RERANK_CANDIDATE_MULTIPLIER: usize = 2;

// Cache
pub const DEFAULT_EXACT_CAPACITY: u64 = 1_000;
pub const DEFAULT_SEMANTIC_CAPACITY: u64 = 500;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3_600;
pub const DEFAULT_SEMANTIC_THRESHOLD: f32 = 0.95;

// Cross-modal boost
pub const DEFAULT_BOOST_ALPHA: f64 = 0.3;
pub const DEFAULT_BOOST_K: f64 = 60.0;

// Channels
pub const DEFAULT_MAX_CONCURRENT_CHANNELS: usize = 4;
pub const DEFAULT_ENTITY_EXPANSION_ANCHORS: usize = 10;
pub const DEFAULT_ENTITY_EXPANSION_WEIGHT_FACTOR: f64 = 0.5;
pub const DEFAULT_GRAPH_GLOBAL_MAX_COMMUNITIES: usize = 3;

// Intent
pub const DEFAULT_INTENT: &str = "exploratory";

// Observability
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Built-in intent profiles, as (multi_vector, graph_local, graph_global).
pub fn default_intent_profiles() -> BTreeMap<String, FusionWeights> {
    [
        ("factual", FusionWeights::new(0.7, 0.3, 0.0)),
        ("relational", FusionWeights::new(0.4, 0.5, 0.1)),
        ("thematic", FusionWeights::new(0.3, 0.2, 0.5)),
        ("exploratory", FusionWeights::new(0.4, 0.3, 0.3)),
        ("comparative", FusionWeights::new(0.5, 0.4, 0.1)),
    ]
    .into_iter()
    .map(|(name, weights)| (name.to_string(), weights))
    .collect()
}
