//! Parsing and tallying of entity→chunk mention rows.

use std::collections::HashMap;

use braid_core::errors::ChannelError;
use braid_core::models::{Channel, GraphRecord, GraphScope, RankedItem};
use serde_json::Value;

/// One `entity MENTIONED_IN chunk` row.
#[derive(Debug, Clone)]
pub(crate) struct MentionRow {
    pub entity: String,
    pub chunk_id: String,
    pub text: String,
    pub document_id: String,
    pub namespace_id: String,
    pub community_id: Option<String>,
}

impl MentionRow {
    /// `entity` and `chunk_id` are required; the rest default to empty.
    pub fn parse(channel: Channel, record: &GraphRecord) -> Result<Self, ChannelError> {
        Ok(Self {
            entity: required(channel, record, "entity")?,
            chunk_id: required(channel, record, "chunk_id")?,
            text: optional(record, "text").unwrap_or_default(),
            document_id: optional(record, "document_id").unwrap_or_default(),
            namespace_id: optional(record, "namespace_id").unwrap_or_default(),
            community_id: optional(record, "community_id"),
        })
    }

    pub fn parse_all(channel: Channel, records: &[GraphRecord]) -> Result<Vec<Self>, ChannelError> {
        records.iter().map(|r| Self::parse(channel, r)).collect()
    }
}

pub(crate) fn required(
    channel: Channel,
    record: &GraphRecord,
    field: &str,
) -> Result<String, ChannelError> {
    optional(record, field).ok_or_else(|| ChannelError::MalformedResponse {
        channel,
        reason: format!("missing string field '{field}'"),
    })
}

pub(crate) fn optional(record: &GraphRecord, field: &str) -> Option<String> {
    record.get(field).and_then(Value::as_str).map(str::to_string)
}

/// Mentions of one chunk, grouped.
#[derive(Debug, Clone)]
pub(crate) struct ChunkTally {
    pub chunk_id: String,
    pub text: String,
    pub document_id: String,
    pub namespace_id: String,
    /// Distinct entity names, sorted.
    pub entities: Vec<String>,
    /// Community → distinct entities from it, for GraphGlobal rows.
    pub community_hits: HashMap<String, usize>,
}

/// Group rows by chunk and rank by distinct entity count (desc), then chunk id (asc).
///
/// Rows outside `scope` are dropped before counting.
pub(crate) fn tally_by_chunk(rows: Vec<MentionRow>, scope: &GraphScope) -> Vec<ChunkTally> {
    let mut order: Vec<String> = Vec::new();
    let mut tallies: HashMap<String, ChunkTally> = HashMap::new();

    for row in rows {
        if !scope.admits(&row.namespace_id) {
            continue;
        }
        let tally = tallies.entry(row.chunk_id.clone()).or_insert_with(|| {
            order.push(row.chunk_id.clone());
            ChunkTally {
                chunk_id: row.chunk_id.clone(),
                text: row.text.clone(),
                document_id: row.document_id.clone(),
                namespace_id: row.namespace_id.clone(),
                entities: Vec::new(),
                community_hits: HashMap::new(),
            }
        });
        if tally.entities.contains(&row.entity) {
            continue;
        }
        tally.entities.push(row.entity);
        if let Some(community) = row.community_id {
            *tally.community_hits.entry(community).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<ChunkTally> = order
        .into_iter()
        .filter_map(|id| tallies.remove(&id))
        .collect();
    // Graph rows carry no order; names give every channel a stable baseline.
    for tally in &mut ranked {
        tally.entities.sort();
    }
    ranked.sort_by(|a, b| {
        b.entities
            .len()
            .cmp(&a.entities.len())
            .then_with(|| a.chunk_id.cmp(&b.chunk_id))
    });
    ranked
}

impl ChunkTally {
    pub fn into_item(self, channel: Channel) -> RankedItem {
        let score = self.entities.len() as f64;
        RankedItem::new(self.chunk_id, channel)
            .with_text(self.text)
            .with_document(self.document_id)
            .with_namespace(self.namespace_id)
            .with_score(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(entity: &str, chunk: &str, ns: &str) -> MentionRow {
        MentionRow {
            entity: entity.into(),
            chunk_id: chunk.into(),
            text: format!("text of {chunk}"),
            document_id: "d".into(),
            namespace_id: ns.into(),
            community_id: None,
        }
    }

    #[test]
    fn ranks_by_distinct_entities_then_id() {
        let scope = GraphScope::Namespaces(vec!["a".into()]);
        let tallies = tally_by_chunk(
            vec![
                row("Raft", "c4", "a"),
                row("Etcd", "c3", "a"),
                row("Raft", "c3", "a"),
                row("Raft", "c3", "a"),
                row("Etcd", "c2", "a"),
                row("Etcd", "x9", "b"),
            ],
            &scope,
        );
        let ids: Vec<&str> = tallies.iter().map(|t| t.chunk_id.as_str()).collect();
        assert_eq!(ids, vec!["c3", "c2", "c4"]);
        assert_eq!(tallies[0].entities, vec!["Etcd", "Raft"]);
    }

    #[test]
    fn missing_required_field_is_malformed() {
        let record = json!({ "entity": "Etcd" }).as_object().cloned().unwrap();
        let err = MentionRow::parse(Channel::GraphLocal, &record).unwrap_err();
        assert!(matches!(err, ChannelError::MalformedResponse { .. }));
    }
}
