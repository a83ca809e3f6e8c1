use serde::{Deserialize, Serialize};

use super::defaults;

/// Cross-modal entity boost settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoostConfig {
    pub enabled: bool,
    /// Multiplier on the entity boost when added to the fused score.
    pub alpha: f64,
    /// Smoothing constant for entity importance `1 / (k + rank)`.
    pub k: f64,
}

impl Default for BoostConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            alpha: defaults::DEFAULT_BOOST_ALPHA,
            k: defaults::DEFAULT_BOOST_K,
        }
    }
}
