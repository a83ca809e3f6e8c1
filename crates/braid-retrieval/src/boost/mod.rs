//! Cross-modal entity boost.
//!
//! Adds `alpha * Σ 1/(k + rank(e))` to each fused chunk, summed over the ranked
//! entities `e` that the graph says are mentioned in that chunk. Items are
//! never added or removed. When the boost cannot run the input comes back
//! untouched, order included.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use braid_core::errors::BraidResult;
use braid_core::models::{rank_by_final_score, FusedItem, GraphParams, GraphScope};
use braid_core::traits::IGraphStore;
use serde_json::Value;

use crate::channels::queries::MENTIONS_BY_ENTITIES;
use crate::channels::records::optional;

/// Result of one boost pass.
#[derive(Debug, Clone, PartialEq)]
pub struct BoostOutcome {
    pub items: Vec<FusedItem>,
    /// False when the pass was a no-op (no entities, or the graph query failed).
    pub applied: bool,
}

impl BoostOutcome {
    fn unchanged(items: Vec<FusedItem>) -> Self {
        Self {
            items,
            applied: false,
        }
    }
}

/// Graph-backed booster. Holds only the shared graph client.
pub struct CrossModalBooster {
    graph: Arc<dyn IGraphStore>,
}

impl CrossModalBooster {
    pub fn new(graph: Arc<dyn IGraphStore>) -> Self {
        Self { graph }
    }

    /// Boost `chunks` by the entities in `entity_names`, best entity first.
    ///
    /// Issues a single batched graph query. A failed query is logged and the
    /// input is returned as-is.
    pub async fn boost(
        &self,
        chunks: Vec<FusedItem>,
        entity_names: &[String],
        alpha: f64,
        k: f64,
        scope: &GraphScope,
    ) -> BoostOutcome {
        if entity_names.is_empty() || chunks.is_empty() {
            return BoostOutcome::unchanged(chunks);
        }

        let entity_scores = entity_scores(entity_names, k);
        let mentions = match self.mentions(entity_names, scope).await {
            Ok(mentions) => mentions,
            Err(err) => {
                tracing::warn!(
                    stage = "boost",
                    entities = entity_names.len(),
                    error = %err,
                    "entity mention lookup failed, boost skipped"
                );
                return BoostOutcome::unchanged(chunks);
            }
        };

        let boosts = chunk_boosts(&mentions, &entity_scores);
        let mut items = chunks;
        apply_entity_boost(&mut items, &boosts, alpha);
        BoostOutcome {
            items,
            applied: true,
        }
    }

    async fn mentions(
        &self,
        entity_names: &[String],
        scope: &GraphScope,
    ) -> BraidResult<Vec<(String, String)>> {
        let params = GraphParams::scoped(scope)
            .with("entities", entity_names.to_vec())
            .with("exclude_ids", Value::Array(Vec::new()));
        let records = self
            .graph
            .execute_read(&MENTIONS_BY_ENTITIES, &params)
            .await?;

        let mut pairs = Vec::with_capacity(records.len());
        for record in &records {
            if let Some(ns) = optional(record, "namespace_id") {
                if !scope.admits(&ns) {
                    continue;
                }
            }
            // Malformed rows only cost their own boost.
            if let (Some(chunk_id), Some(entity)) =
                (optional(record, "chunk_id"), optional(record, "entity"))
            {
                pairs.push((chunk_id, entity));
            }
        }
        Ok(pairs)
    }
}

/// Importance of each entity by position: `1 / (k + rank)`, 1-indexed.
/// A name listed twice keeps its first position.
pub fn entity_scores(entity_names: &[String], k: f64) -> HashMap<String, f64> {
    let mut scores = HashMap::with_capacity(entity_names.len());
    for (i, name) in entity_names.iter().enumerate() {
        scores
            .entry(name.clone())
            .or_insert_with(|| 1.0 / (k + (i + 1) as f64));
    }
    scores
}

/// Sum entity scores per chunk. Each (chunk, entity) pair counts once.
fn chunk_boosts(
    mentions: &[(String, String)],
    entity_scores: &HashMap<String, f64>,
) -> HashMap<String, f64> {
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    let mut boosts: HashMap<String, f64> = HashMap::new();
    for (chunk_id, entity) in mentions {
        let Some(score) = entity_scores.get(entity) else {
            continue;
        };
        if seen.insert((chunk_id.as_str(), entity.as_str())) {
            *boosts.entry(chunk_id.clone()).or_insert(0.0) += score;
        }
    }
    boosts
}

/// Set `entity_boost` from `boosts` (0 when absent), recompute `final_score`
/// and re-rank.
pub fn apply_entity_boost(items: &mut [FusedItem], boosts: &HashMap<String, f64>, alpha: f64) {
    for item in items.iter_mut() {
        item.entity_boost = boosts.get(&item.id).copied().unwrap_or(0.0);
        item.final_score = item.weighted_rrf_score + alpha * item.entity_boost;
    }
    rank_by_final_score(items);
}
