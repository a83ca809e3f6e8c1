use std::sync::Arc;

use braid_core::constants::{META_COMMUNITY_ID, META_CONTRIBUTING_ENTITIES};
use braid_core::errors::ChannelError;
use braid_core::models::{assign_ranks, Channel, GraphParams, RankedItem};
use braid_core::traits::IGraphStore;

use super::queries::{COMMUNITIES_BY_TERMS, COMMUNITY_MENTIONS};
use super::records::{required, tally_by_chunk, MentionRow};
use super::{backend_error, ChannelQuery};
use crate::terms::extract_terms;

/// Community match, then chunks mentioned by the communities' member entities.
///
/// Two round-trips: pick the best `max_communities` communities for the query
/// terms, then expand them to chunks. Each chunk is attributed to the chosen
/// community that contributed most of its entities.
pub struct GraphGlobalChannel {
    graph: Arc<dyn IGraphStore>,
    max_communities: usize,
}

impl GraphGlobalChannel {
    pub fn new(graph: Arc<dyn IGraphStore>, max_communities: usize) -> Self {
        Self {
            graph,
            max_communities: max_communities.max(1),
        }
    }

    pub async fn search(&self, query: &ChannelQuery<'_>) -> Result<Vec<RankedItem>, ChannelError> {
        let terms = extract_terms(query.text);
        if terms.is_empty() || query.top_k == 0 {
            return Ok(Vec::new());
        }

        let params = GraphParams::scoped(query.scope)
            .with("terms", terms)
            .with("limit", self.max_communities as u64);
        let records = self
            .graph
            .execute_read(&COMMUNITIES_BY_TERMS, &params)
            .await
            .map_err(|e| backend_error(Channel::GraphGlobal, e))?;

        let mut communities: Vec<String> = Vec::new();
        for record in &records {
            let id = required(Channel::GraphGlobal, record, "community_id")?;
            if !communities.contains(&id) {
                communities.push(id);
            }
        }
        communities.truncate(self.max_communities);
        if communities.is_empty() {
            return Ok(Vec::new());
        }

        let params = GraphParams::scoped(query.scope).with("community_ids", communities.clone());
        let records = self
            .graph
            .execute_read(&COMMUNITY_MENTIONS, &params)
            .await
            .map_err(|e| backend_error(Channel::GraphGlobal, e))?;
        let rows = MentionRow::parse_all(Channel::GraphGlobal, &records)?;

        let mut items: Vec<RankedItem> = tally_by_chunk(rows, query.scope)
            .into_iter()
            .take(query.top_k)
            .map(|tally| {
                // Ties go to the community the first query ranked higher.
                let community = communities
                    .iter()
                    .filter_map(|c| tally.community_hits.get(c).map(|hits| (c, *hits)))
                    .fold(None::<(&String, usize)>, |best, (c, hits)| match best {
                        Some((_, top)) if top >= hits => best,
                        _ => Some((c, hits)),
                    })
                    .map(|(c, _)| c.clone());
                let contributing = tally.entities.clone();
                let mut item = tally
                    .into_item(Channel::GraphGlobal)
                    .with_metadata(META_CONTRIBUTING_ENTITIES, contributing);
                if let Some(community) = community {
                    item = item.with_metadata(META_COMMUNITY_ID, community);
                }
                item
            })
            .collect();
        assign_ranks(&mut items);
        Ok(items)
    }
}
