//! Configuration. Every section is `#[serde(default)]`, so a partial TOML file
//! (or none) yields a working config; all defaults come from [`defaults`].

mod boost_config;
mod cache_config;
mod channels_config;
pub mod defaults;
mod intent_config;
mod observability_config;
mod retrieval_config;

use std::path::Path;

pub use boost_config::BoostConfig;
pub use cache_config::CacheConfig;
pub use channels_config::ChannelsConfig;
pub use intent_config::IntentConfig;
pub use observability_config::ObservabilityConfig;
pub use retrieval_config::RetrievalConfig;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Top-level configuration aggregating all subsystem configs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BraidConfig {
    pub retrieval: RetrievalConfig,
    pub cache: CacheConfig,
    pub boost: BoostConfig,
    pub channels: ChannelsConfig,
    pub intent: IntentConfig,
    pub observability: ObservabilityConfig,
}

impl BraidConfig {
    /// Parse from a TOML string. Missing fields take their defaults.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })
    }

    /// Read and parse a TOML file, then validate it.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let config = Self::from_toml(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retrieval.default_top_k == 0 {
            return Err(ConfigError::invalid("retrieval.default_top_k", "must be > 0"));
        }
        if self.retrieval.channel_over_fetch == 0 {
            return Err(ConfigError::invalid(
                "retrieval.channel_over_fetch",
                "must be > 0",
            ));
        }
        if self.retrieval.rerank_candidate_multiplier == 0 {
            return Err(ConfigError::invalid(
                "retrieval.rerank_candidate_multiplier",
                "must be > 0",
            ));
        }

        if self.cache.exact_capacity == 0 {
            return Err(ConfigError::invalid("cache.exact_capacity", "must be > 0"));
        }
        if self.cache.semantic_capacity == 0 {
            return Err(ConfigError::invalid("cache.semantic_capacity", "must be > 0"));
        }
        let threshold = self.cache.semantic_threshold;
        if !threshold.is_finite() || threshold <= 0.0 || threshold > 1.0 {
            return Err(ConfigError::invalid(
                "cache.semantic_threshold",
                format!("{threshold} outside (0, 1]"),
            ));
        }

        if !self.boost.alpha.is_finite() || self.boost.alpha < 0.0 {
            return Err(ConfigError::invalid(
                "boost.alpha",
                format!("{} must be a finite value >= 0", self.boost.alpha),
            ));
        }
        if !self.boost.k.is_finite() || self.boost.k < 0.0 {
            return Err(ConfigError::invalid(
                "boost.k",
                format!("{} must be a finite value >= 0", self.boost.k),
            ));
        }

        if self.channels.max_concurrent == 0 {
            return Err(ConfigError::invalid("channels.max_concurrent", "must be > 0"));
        }
        let factor = self.channels.entity_expansion_weight_factor;
        if !factor.is_finite() || !(0.0..=1.0).contains(&factor) {
            return Err(ConfigError::invalid(
                "channels.entity_expansion_weight_factor",
                format!("{factor} outside [0, 1]"),
            ));
        }

        let profiles = self.intent.resolved_profiles();
        for (name, weights) in &profiles {
            weights
                .validate()
                .map_err(|reason| ConfigError::invalid(format!("intent.profiles.{name}"), reason))?;
        }
        if !profiles.contains_key(&self.intent.default_intent) {
            return Err(ConfigError::invalid(
                "intent.default_intent",
                format!("unknown profile '{}'", self.intent.default_intent),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = BraidConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.retrieval.rrf_k, 60);
        assert_eq!(config.cache.exact_capacity, 1000);
        assert_eq!(config.cache.semantic_capacity, 500);
        assert_eq!(config.channels.max_concurrent, 4);
        assert!(!config.channels.allow_unscoped_graph);
    }

    #[test]
    fn empty_toml_yields_defaults() {
        let config = BraidConfig::from_toml("").unwrap();
        assert_eq!(config, BraidConfig::default());
    }
}
