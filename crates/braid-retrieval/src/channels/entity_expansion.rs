use std::collections::HashMap;
use std::sync::Arc;

use braid_core::constants::{META_ANCHOR_COUNT, META_SHARED_ENTITIES};
use braid_core::errors::ChannelError;
use braid_core::models::{assign_ranks, Channel, GraphParams, RankedItem};
use braid_core::traits::IGraphStore;

use super::queries::{ENTITIES_IN_CHUNKS, MENTIONS_BY_ENTITIES};
use super::records::{required, tally_by_chunk, MentionRow};
use super::{backend_error, ChannelQuery};

/// Entities of the top MultiVector chunks, then other chunks that mention them.
///
/// Anchors never appear in the output. Chunks are ranked by how many anchor
/// entities they share.
pub struct EntityExpansionChannel {
    graph: Arc<dyn IGraphStore>,
    anchor_count: usize,
}

impl EntityExpansionChannel {
    pub fn new(graph: Arc<dyn IGraphStore>, anchor_count: usize) -> Self {
        Self {
            graph,
            anchor_count: anchor_count.max(1),
        }
    }

    pub async fn search(&self, query: &ChannelQuery<'_>) -> Result<Vec<RankedItem>, ChannelError> {
        let anchors: Vec<String> = query
            .anchors
            .iter()
            .take(self.anchor_count)
            .cloned()
            .collect();
        if anchors.is_empty() {
            return Err(ChannelError::MissingAnchors {
                channel: Channel::EntityExpansion,
            });
        }
        if query.top_k == 0 {
            return Ok(Vec::new());
        }

        let params = GraphParams::scoped(query.scope).with("chunk_ids", anchors.clone());
        let records = self
            .graph
            .execute_read(&ENTITIES_IN_CHUNKS, &params)
            .await
            .map_err(|e| backend_error(Channel::EntityExpansion, e))?;

        // Entities shared by more anchors go first.
        let mut frequency: HashMap<String, usize> = HashMap::new();
        for record in &records {
            let entity = required(Channel::EntityExpansion, record, "entity")?;
            *frequency.entry(entity).or_insert(0) += 1;
        }
        if frequency.is_empty() {
            return Ok(Vec::new());
        }
        let mut entities: Vec<(String, usize)> = frequency.into_iter().collect();
        entities.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        let entities: Vec<String> = entities.into_iter().map(|(name, _)| name).collect();

        let params = GraphParams::scoped(query.scope)
            .with("entities", entities)
            .with("exclude_ids", anchors.clone());
        let records = self
            .graph
            .execute_read(&MENTIONS_BY_ENTITIES, &params)
            .await
            .map_err(|e| backend_error(Channel::EntityExpansion, e))?;
        let rows: Vec<MentionRow> = MentionRow::parse_all(Channel::EntityExpansion, &records)?
            .into_iter()
            .filter(|row| !anchors.contains(&row.chunk_id))
            .collect();

        let anchor_count = anchors.len() as u64;
        let mut items: Vec<RankedItem> = tally_by_chunk(rows, query.scope)
            .into_iter()
            .take(query.top_k)
            .map(|tally| {
                let shared = tally.entities.clone();
                tally
                    .into_item(Channel::EntityExpansion)
                    .with_metadata(META_SHARED_ENTITIES, shared)
                    .with_metadata(META_ANCHOR_COUNT, anchor_count)
            })
            .collect();
        assign_ranks(&mut items);
        Ok(items)
    }
}
