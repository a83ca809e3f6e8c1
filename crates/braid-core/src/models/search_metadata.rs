use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Channel, FusionWeights};

/// Which cache tier answered, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheHitKind {
    Exact,
    Semantic,
    #[default]
    Miss,
}

impl CacheHitKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheHitKind::Exact => "exact",
            CacheHitKind::Semantic => "semantic",
            CacheHitKind::Miss => "miss",
        }
    }

    pub fn is_hit(&self) -> bool {
        !matches!(self, CacheHitKind::Miss)
    }
}

/// A channel that was launched and failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelFailure {
    pub channel: Channel,
    pub error: String,
}

/// Why a channel was not launched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    ZeroWeight,
    /// Turned off for this request.
    Disabled,
    /// The backend it needs is not configured.
    NoBackend,
    /// EntityExpansion had nothing to anchor on.
    NoAnchors,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedChannel {
    pub channel: Channel,
    pub reason: SkipReason,
}

/// Overlap statistics over the top-K of several rankings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DiversityStats {
    pub ranking_count: usize,
    pub top_k: usize,
    /// Distinct ids across all top-K lists.
    pub total_unique: usize,
    /// Ids present in every top-K list.
    pub common_to_all: usize,
    /// Mean over pairs of `|A ∩ B| / min(|A|, |B|) * 100`.
    pub avg_pairwise_overlap_pct: f64,
}

/// Provenance for one search call.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchMetadata {
    pub request_id: String,
    pub query_prefix: String,
    pub intent: String,
    pub intent_confidence: f64,
    pub intent_method: String,
    pub weights: FusionWeights,
    /// Channels that ran to completion, in canonical order.
    pub channels_executed: Vec<Channel>,
    pub channel_counts: BTreeMap<Channel, usize>,
    pub channel_failures: Vec<ChannelFailure>,
    pub skipped_channels: Vec<SkippedChannel>,
    pub cache_hit: CacheHitKind,
    pub cache_similarity: Option<f32>,
    pub boost_applied: bool,
    pub boost_entities: Vec<String>,
    pub reranked: bool,
    /// Unique ids fused before truncation to `top_k`.
    pub total_candidates: usize,
    pub diversity: Option<DiversityStats>,
    /// Milliseconds per stage, plus one entry per channel.
    pub latencies: BTreeMap<String, u64>,
}

impl SearchMetadata {
    pub fn record_latency(&mut self, stage: impl Into<String>, ms: u64) {
        self.latencies.insert(stage.into(), ms);
    }

    pub fn skip(&mut self, channel: Channel, reason: SkipReason) {
        self.skipped_channels.push(SkippedChannel { channel, reason });
    }

    pub fn was_skipped(&self, channel: Channel) -> bool {
        self.skipped_channels.iter().any(|s| s.channel == channel)
    }

    pub fn failed(&self, channel: Channel) -> bool {
        self.channel_failures.iter().any(|f| f.channel == channel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_hit_kind_serializes_lowercase() {
        let json = serde_json::to_string(&CacheHitKind::Semantic).unwrap();
        assert_eq!(json, "\"semantic\"");
        assert!(!CacheHitKind::default().is_hit());
    }

    #[test]
    fn metadata_round_trips_through_json() {
        let mut meta = SearchMetadata {
            intent: "factual".into(),
            ..Default::default()
        };
        meta.channel_counts.insert(Channel::GraphLocal, 3);
        meta.skip(Channel::GraphGlobal, SkipReason::ZeroWeight);
        meta.record_latency("total", 12);

        let json = serde_json::to_value(&meta).unwrap();
        let back: SearchMetadata = serde_json::from_value(json).unwrap();
        assert_eq!(back, meta);
        assert!(back.was_skipped(Channel::GraphGlobal));
    }
}
