use std::sync::Arc;

use braid_core::constants::META_MATCHED_ENTITIES;
use braid_core::errors::ChannelError;
use braid_core::models::{assign_ranks, Channel, GraphParams, RankedItem};
use braid_core::traits::IGraphStore;

use super::queries::ENTITY_MENTIONS_BY_TERMS;
use super::records::{tally_by_chunk, MentionRow};
use super::{backend_error, ChannelQuery};
use crate::terms::extract_terms;

/// Entity term match, then the chunks those entities are mentioned in.
///
/// Chunks are ranked by how many distinct matched entities mention them.
/// Within a chunk, `matched_entities` follows query term order so the booster
/// ranks the entity the caller named first highest; names break ties.
pub struct GraphLocalChannel {
    graph: Arc<dyn IGraphStore>,
}

impl GraphLocalChannel {
    pub fn new(graph: Arc<dyn IGraphStore>) -> Self {
        Self { graph }
    }

    pub async fn search(&self, query: &ChannelQuery<'_>) -> Result<Vec<RankedItem>, ChannelError> {
        let terms = extract_terms(query.text);
        if terms.is_empty() || query.top_k == 0 {
            return Ok(Vec::new());
        }

        let params = GraphParams::scoped(query.scope).with("terms", terms.clone());
        let records = self
            .graph
            .execute_read(&ENTITY_MENTIONS_BY_TERMS, &params)
            .await
            .map_err(|e| backend_error(Channel::GraphLocal, e))?;
        let rows = MentionRow::parse_all(Channel::GraphLocal, &records)?;

        let mut items: Vec<RankedItem> = tally_by_chunk(rows, query.scope)
            .into_iter()
            .take(query.top_k)
            .map(|tally| {
                let mut matched = tally.entities.clone();
                matched.sort_by_key(|name| term_position(name, &terms));
                tally
                    .into_item(Channel::GraphLocal)
                    .with_metadata(META_MATCHED_ENTITIES, matched)
            })
            .collect();
        assign_ranks(&mut items);
        Ok(items)
    }
}

/// Index of the first query term the entity name contains.
fn term_position(name: &str, terms: &[String]) -> usize {
    let lower = name.to_lowercase();
    terms
        .iter()
        .position(|t| lower.contains(t.as_str()))
        .unwrap_or(terms.len())
}
