use std::collections::BTreeMap;

use braid_core::config::IntentConfig;
use braid_core::models::FusionWeights;

/// Immutable `intent name → weights` table, built once per engine.
#[derive(Debug, Clone, PartialEq)]
pub struct IntentProfiles {
    profiles: BTreeMap<String, FusionWeights>,
    default_intent: String,
}

impl IntentProfiles {
    /// Built-in profiles with the configured ones layered on top.
    pub fn from_config(config: &IntentConfig) -> Self {
        Self {
            profiles: config.resolved_profiles(),
            default_intent: config.default_intent.clone(),
        }
    }

    pub fn get(&self, intent: &str) -> Option<FusionWeights> {
        self.profiles.get(intent).copied()
    }

    pub fn contains(&self, intent: &str) -> bool {
        self.profiles.contains_key(intent)
    }

    pub fn default_intent(&self) -> &str {
        &self.default_intent
    }

    /// Weights of the default intent. Config validation guarantees it exists;
    /// all-ones is returned if it somehow does not.
    pub fn default_weights(&self) -> FusionWeights {
        self.get(&self.default_intent).unwrap_or_default()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }
}

impl Default for IntentProfiles {
    fn default() -> Self {
        Self::from_config(&IntentConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_profiles_override_builtins() {
        let mut config = IntentConfig::default();
        config
            .profiles
            .insert("factual".into(), FusionWeights::new(1.0, 0.0, 0.0));
        config
            .profiles
            .insert("code".into(), FusionWeights::new(0.9, 0.1, 0.0));
        let profiles = IntentProfiles::from_config(&config);

        assert_eq!(profiles.get("factual"), Some(FusionWeights::new(1.0, 0.0, 0.0)));
        assert!(profiles.contains("code"));
        assert!(profiles.contains("thematic"));
        assert_eq!(profiles.default_intent(), "exploratory");
        assert_eq!(profiles.default_weights(), FusionWeights::new(0.4, 0.3, 0.3));
    }
}
