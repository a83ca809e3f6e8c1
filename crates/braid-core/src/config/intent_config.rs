use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::models::FusionWeights;

/// Intent profile table and fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntentConfig {
    /// Profile used when classification fails or finds nothing.
    pub default_intent: String,
    /// Overrides and additions, layered on top of the built-in profiles.
    pub profiles: BTreeMap<String, FusionWeights>,
}

impl IntentConfig {
    /// Built-in profiles with configured entries layered on top.
    pub fn resolved_profiles(&self) -> BTreeMap<String, FusionWeights> {
        let mut profiles = defaults::default_intent_profiles();
        for (name, weights) in &self.profiles {
            profiles.insert(name.clone(), *weights);
        }
        profiles
    }
}

impl Default for IntentConfig {
    fn default() -> Self {
        Self {
            default_intent: defaults::DEFAULT_INTENT.to_string(),
            profiles: BTreeMap::new(),
        }
    }
}
