use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Channel;

/// Channel-specific metadata, opaque to fusion.
pub type ChannelMetadata = serde_json::Map<String, Value>;

/// One retrieved unit as produced by a channel adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedItem {
    /// Stable identifier, unique within a namespace. Fusion deduplicates on it.
    pub id: String,
    pub text: String,
    pub document_id: String,
    pub namespace_id: String,
    /// Channel-native score. Not comparable across channels.
    pub score: f64,
    /// 1-indexed position within the producing channel's ranking.
    pub rank: usize,
    pub source_channel: Channel,
    #[serde(default)]
    pub channel_metadata: ChannelMetadata,
}

impl RankedItem {
    pub fn new(id: impl Into<String>, source_channel: Channel) -> Self {
        Self {
            id: id.into(),
            text: String::new(),
            document_id: String::new(),
            namespace_id: String::new(),
            score: 0.0,
            rank: 0,
            source_channel,
            channel_metadata: ChannelMetadata::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_document(mut self, document_id: impl Into<String>) -> Self {
        self.document_id = document_id.into();
        self
    }

    pub fn with_namespace(mut self, namespace_id: impl Into<String>) -> Self {
        self.namespace_id = namespace_id.into();
        self
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }

    pub fn with_rank(mut self, rank: usize) -> Self {
        self.rank = rank;
        self
    }

    pub fn with_metadata(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.channel_metadata.insert(key.to_string(), value.into());
        self
    }

    /// Read a metadata entry as a list of strings. Non-string members are skipped.
    pub fn metadata_strings(&self, key: &str) -> Vec<String> {
        self.channel_metadata
            .get(key)
            .and_then(Value::as_array)
            .map(|values| {
                values
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Assign contiguous 1-indexed ranks in the current order.
pub fn assign_ranks(items: &mut [RankedItem]) {
    for (i, item) in items.iter_mut().enumerate() {
        item.rank = i + 1;
    }
}

/// Whether ranks are exactly `1..=n` in order, with no gaps or repeats.
pub fn ranks_are_contiguous(items: &[RankedItem]) -> bool {
    items.iter().enumerate().all(|(i, item)| item.rank == i + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assign_ranks_is_one_indexed() {
        let mut items = vec![
            RankedItem::new("a", Channel::GraphLocal),
            RankedItem::new("b", Channel::GraphLocal),
        ];
        assign_ranks(&mut items);
        assert_eq!(items[0].rank, 1);
        assert_eq!(items[1].rank, 2);
        assert!(ranks_are_contiguous(&items));
    }

    #[test]
    fn gaps_are_detected() {
        let items = vec![
            RankedItem::new("a", Channel::MultiVector).with_rank(1),
            RankedItem::new("b", Channel::MultiVector).with_rank(3),
        ];
        assert!(!ranks_are_contiguous(&items));
    }

    #[test]
    fn metadata_strings_skips_non_strings() {
        let item = RankedItem::new("a", Channel::GraphLocal).with_metadata(
            "matched_entities",
            serde_json::json!(["Etcd", 3, "Raft"]),
        );
        assert_eq!(item.metadata_strings("matched_entities"), vec!["Etcd", "Raft"]);
        assert!(item.metadata_strings("missing").is_empty());
    }
}
