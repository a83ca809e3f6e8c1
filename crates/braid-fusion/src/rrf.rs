//! Reciprocal Rank Fusion over channel rankings.
//!
//! Rankings are visited in the order given. The first ranking to produce an id
//! supplies the fused item's display fields, so callers pass rankings in
//! canonical channel order.

use std::collections::{HashMap, HashSet};

use braid_core::models::{rank_by_final_score, ChannelContribution, FusedItem, RankedItem};

/// `1 / (k + rank)` for a 1-indexed rank.
pub fn rrf_term(k: u32, rank: usize) -> f64 {
    1.0 / (k as f64 + rank as f64)
}

/// Unweighted fusion: every ranking contributes `1/(k + rank)` at full weight.
///
/// Output is sorted by score descending, ties broken by id ascending.
pub fn rrf<R: AsRef<[RankedItem]>>(rankings: &[R], k: u32) -> Vec<FusedItem> {
    let weights = vec![1.0; rankings.len()];
    fuse(rankings, &weights, k)
}

/// Weighted fusion. Weights are normalized to sum to 1 before use.
///
/// Rankings whose weight is 0 contribute nothing and their items do not
/// appear in the output unless another ranking also produced them. All-zero
/// weights yield an empty list.
///
/// # Panics
///
/// If `rankings` and `weights` differ in length, or any weight is negative or
/// non-finite. The orchestrator rejects such input before calling in.
pub fn weighted_rrf<R: AsRef<[RankedItem]>>(
    rankings: &[R],
    weights: &[f64],
    k: u32,
) -> Vec<FusedItem> {
    assert_eq!(
        rankings.len(),
        weights.len(),
        "one weight per ranking is required"
    );
    assert!(
        weights.iter().all(|w| w.is_finite() && *w >= 0.0),
        "weights must be finite and non-negative: {weights:?}"
    );

    let total: f64 = weights.iter().sum();
    if total == 0.0 {
        return Vec::new();
    }
    let normalized: Vec<f64> = weights.iter().map(|w| w / total).collect();
    fuse(rankings, &normalized, k)
}

fn fuse<R: AsRef<[RankedItem]>>(rankings: &[R], weights: &[f64], k: u32) -> Vec<FusedItem> {
    let mut fused: Vec<FusedItem> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (ranking, &weight) in rankings.iter().zip(weights) {
        if weight == 0.0 {
            continue;
        }
        let mut seen: HashSet<&str> = HashSet::new();
        for item in ranking.as_ref() {
            // A channel lists each id once; ignore repeats if a backend misbehaves.
            if !seen.insert(item.id.as_str()) {
                continue;
            }
            debug_assert!(item.rank >= 1, "ranks are 1-indexed");

            let slot = match index.get(&item.id) {
                Some(&slot) => slot,
                None => {
                    fused.push(FusedItem::from_ranked(item));
                    index.insert(item.id.clone(), fused.len() - 1);
                    fused.len() - 1
                }
            };
            let entry = &mut fused[slot];
            entry.weighted_rrf_score += weight * rrf_term(k, item.rank);
            entry.contributions.push(ChannelContribution {
                channel: item.source_channel,
                rank: item.rank,
                score: item.score,
                weight,
            });
        }
    }

    for item in &mut fused {
        item.final_score = item.weighted_rrf_score;
    }
    rank_by_final_score(&mut fused);
    fused
}

#[cfg(test)]
mod tests {
    use super::*;
    use braid_core::models::{assign_ranks, Channel};

    fn ranking(channel: Channel, ids: &[&str]) -> Vec<RankedItem> {
        let mut items: Vec<RankedItem> = ids
            .iter()
            .map(|id| RankedItem::new(*id, channel).with_text(format!("{id} via {channel}")))
            .collect();
        assign_ranks(&mut items);
        items
    }

    fn ids(items: &[FusedItem]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn weighted_scenario_ranks_shared_item_first() {
        let v = ranking(Channel::MultiVector, &["c1", "c2"]);
        let g = ranking(Channel::GraphLocal, &["c2", "c3"]);
        let fused = weighted_rrf(&[v, g], &[0.7, 0.3], 60);

        assert_eq!(ids(&fused), vec!["c2", "c1", "c3"]);
        let c2 = 0.7 / 62.0 + 0.3 / 61.0;
        assert!((fused[0].weighted_rrf_score - c2).abs() < 1e-12);
        assert!((fused[1].weighted_rrf_score - 0.7 / 61.0).abs() < 1e-12);
        assert!((fused[2].weighted_rrf_score - 0.3 / 62.0).abs() < 1e-12);
        assert_eq!(fused[0].final_rank, 1);
        assert_eq!(fused[2].final_rank, 3);
    }

    #[test]
    fn first_ranking_supplies_display_fields() {
        let v = ranking(Channel::MultiVector, &["c2"]);
        let g = ranking(Channel::GraphLocal, &["c2"]);
        let fused = weighted_rrf(&[v, g], &[0.5, 0.5], 60);

        assert_eq!(fused.len(), 1);
        assert_eq!(fused[0].text, "c2 via multi_vector");
        assert_eq!(fused[0].primary_channel, Channel::MultiVector);
        let channels: Vec<Channel> = fused[0].channels().collect();
        assert_eq!(channels, vec![Channel::MultiVector, Channel::GraphLocal]);
    }

    #[test]
    fn all_zero_weights_yield_empty() {
        let v = ranking(Channel::MultiVector, &["c1"]);
        assert!(weighted_rrf(&[v], &[0.0], 60).is_empty());
        let none: [Vec<RankedItem>; 0] = [];
        assert!(weighted_rrf(&none, &[], 60).is_empty());
    }

    #[test]
    fn zero_weight_ranking_contributes_nothing() {
        let v = ranking(Channel::MultiVector, &["c1"]);
        let g = ranking(Channel::GraphGlobal, &["only-global"]);
        let fused = weighted_rrf(&[v, g], &[1.0, 0.0], 60);
        assert_eq!(ids(&fused), vec!["c1"]);
    }

    #[test]
    fn ties_break_by_id() {
        let a = ranking(Channel::MultiVector, &["zeta"]);
        let b = ranking(Channel::GraphLocal, &["alpha"]);
        let fused = rrf(&[a, b], 60);
        assert_eq!(ids(&fused), vec!["alpha", "zeta"]);
    }

    #[test]
    fn unweighted_scores_sum_terms() {
        let a = ranking(Channel::MultiVector, &["x", "y"]);
        let b = ranking(Channel::GraphLocal, &["y"]);
        let fused = rrf(&[a, b], 60);
        assert_eq!(ids(&fused), vec!["y", "x"]);
        assert!((fused[0].weighted_rrf_score - (1.0 / 62.0 + 1.0 / 61.0)).abs() < 1e-12);
    }

    #[test]
    fn repeated_id_in_one_ranking_counts_once() {
        let mut v = ranking(Channel::MultiVector, &["c1", "c1"]);
        v[1].rank = 2;
        let fused = rrf(&[v], 60);
        assert_eq!(fused.len(), 1);
        assert_eq!(fused[0].contributions.len(), 1);
    }

    #[test]
    #[should_panic(expected = "one weight per ranking")]
    fn mismatched_lengths_panic() {
        let v = ranking(Channel::MultiVector, &["c1"]);
        weighted_rrf(&[v], &[0.5, 0.5], 60);
    }

    #[test]
    #[should_panic(expected = "non-negative")]
    fn negative_weight_panics() {
        let v = ranking(Channel::MultiVector, &["c1"]);
        weighted_rrf(&[v], &[-1.0], 60);
    }
}
