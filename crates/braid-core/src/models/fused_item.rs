use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::{Channel, ChannelMetadata, RankedItem};

/// One channel's contribution to a fused item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelContribution {
    pub channel: Channel,
    /// Rank within that channel.
    pub rank: usize,
    /// Channel-native score.
    pub score: f64,
    /// Normalized weight the channel carried in fusion.
    pub weight: f64,
}

/// Output of fusion, carried through boosting and reranking to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusedItem {
    pub id: String,
    pub text: String,
    pub document_id: String,
    pub namespace_id: String,
    /// First channel (in channel-execution order) that produced this id.
    pub primary_channel: Channel,
    /// The primary channel's metadata.
    pub metadata: ChannelMetadata,
    /// Every contributing channel, in channel-execution order.
    pub contributions: Vec<ChannelContribution>,
    pub weighted_rrf_score: f64,
    pub entity_boost: f64,
    /// Set only when the reranker scored this item.
    pub rerank_score: Option<f64>,
    /// `weighted_rrf_score + alpha * entity_boost`, or the rerank score once reranked.
    pub final_score: f64,
    /// 1-indexed, assigned after the last sort.
    pub final_rank: usize,
}

impl FusedItem {
    /// Start a fused item from the first ranked item seen for its id.
    pub fn from_ranked(item: &RankedItem) -> Self {
        Self {
            id: item.id.clone(),
            text: item.text.clone(),
            document_id: item.document_id.clone(),
            namespace_id: item.namespace_id.clone(),
            primary_channel: item.source_channel,
            metadata: item.channel_metadata.clone(),
            contributions: Vec::new(),
            weighted_rrf_score: 0.0,
            entity_boost: 0.0,
            rerank_score: None,
            final_score: 0.0,
            final_rank: 0,
        }
    }

    /// Channels that contributed to this item.
    pub fn channels(&self) -> impl Iterator<Item = Channel> + '_ {
        self.contributions.iter().map(|c| c.channel)
    }

    pub fn appears_in(&self, channel: Channel) -> bool {
        self.channels().any(|c| c == channel)
    }
}

/// Ordering used by every ranking stage: `final_score` descending, then `id` ascending.
pub fn compare_by_final_score(a: &FusedItem, b: &FusedItem) -> Ordering {
    b.final_score
        .total_cmp(&a.final_score)
        .then_with(|| a.id.cmp(&b.id))
}

/// Sort by `final_score` (ties broken by id) and reassign 1-indexed `final_rank`.
pub fn rank_by_final_score(items: &mut [FusedItem]) {
    items.sort_by(compare_by_final_score);
    for (i, item) in items.iter_mut().enumerate() {
        item.final_rank = i + 1;
    }
}
