use serde::{Deserialize, Serialize};

use super::defaults;

/// Channel fan-out settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelsConfig {
    /// Upper bound on channel calls in flight for one request.
    pub max_concurrent: usize,
    /// How many MultiVector results seed EntityExpansion.
    pub entity_expansion_anchor_count: usize,
    /// EntityExpansion fusion weight as a fraction of the GraphLocal weight.
    pub entity_expansion_weight_factor: f64,
    /// Communities GraphGlobal expands.
    pub graph_global_max_communities: usize,
    /// Permit graph queries with no namespace filter (single-tenant deployments).
    pub allow_unscoped_graph: bool,
}

impl Default for ChannelsConfig {
    fn default() -> Self {
        Self {
            max_concurrent: defaults::DEFAULT_MAX_CONCURRENT_CHANNELS,
            entity_expansion_anchor_count: defaults::DEFAULT_ENTITY_EXPANSION_ANCHORS,
            entity_expansion_weight_factor: defaults::DEFAULT_ENTITY_EXPANSION_WEIGHT_FACTOR,
            graph_global_max_communities: defaults::DEFAULT_GRAPH_GLOBAL_MAX_COMMUNITIES,
            allow_unscoped_graph: false,
        }
    }
}
