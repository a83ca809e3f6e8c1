use serde::{Deserialize, Serialize};

use super::defaults;

/// Fusion and result-size settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// RRF smoothing constant. Lower values favour top ranks.
    pub rrf_k: u32,
    pub default_top_k: usize,
    /// Each channel is asked for `top_k * channel_over_fetch` items.
    pub channel_over_fetch: usize,
    /// The reranker sees the top `top_k * rerank_candidate_multiplier` fused items.
    pub rerank_candidate_multiplier: usize,
    /// Used when a request names no namespaces.
    pub default_namespaces: Vec<String>,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            rrf_k: defaults::DEFAULT_RRF_K,
            default_top_k: defaults::DEFAULT_TOP_K,
            channel_over_fetch: defaults::DEFAULT_CHANNEL_OVER_FETCH,
            rerank_candidate_multiplier: defaults::DEFAULT_RERANK_CANDIDATE_MULTIPLIER,
            default_namespaces: Vec::new(),
        }
    }
}
