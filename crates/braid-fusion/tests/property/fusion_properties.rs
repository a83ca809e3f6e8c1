use braid_core::models::{assign_ranks, Channel, RankedItem};
use braid_fusion::{rrf, rrf_term, weighted_rrf};
use proptest::prelude::*;

const CHANNELS: [Channel; 3] = [Channel::MultiVector, Channel::GraphLocal, Channel::GraphGlobal];

/// A ranking of distinct ids drawn from a small pool so that rankings overlap.
fn ranking_strategy(channel: Channel) -> impl Strategy<Value = Vec<RankedItem>> {
    proptest::sample::subsequence((0..30).collect::<Vec<u32>>(), 0..15)
        .prop_shuffle()
        .prop_map(move |ids| {
            let mut items: Vec<RankedItem> = ids
                .into_iter()
                .map(|id| RankedItem::new(format!("d{id:02}"), channel))
                .collect();
            assign_ranks(&mut items);
            items
        })
}

fn rankings_strategy() -> impl Strategy<Value = Vec<Vec<RankedItem>>> {
    (
        ranking_strategy(CHANNELS[0]),
        ranking_strategy(CHANNELS[1]),
        ranking_strategy(CHANNELS[2]),
    )
        .prop_map(|(a, b, c)| vec![a, b, c])
}

fn scores(items: &[braid_core::FusedItem]) -> Vec<(String, f64)> {
    items
        .iter()
        .map(|i| (i.id.clone(), i.weighted_rrf_score))
        .collect()
}

proptest! {
    #[test]
    fn higher_rank_contributes_strictly_more(k in 0u32..500, r1 in 1usize..1000, gap in 1usize..1000) {
        prop_assert!(rrf_term(k, r1) > rrf_term(k, r1 + gap));
    }

    #[test]
    fn power_of_two_scale_is_exact(
        rankings in rankings_strategy(),
        weights in proptest::array::uniform3(0.0f64..1.0),
        exp in -8i32..8,
    ) {
        let scale = 2f64.powi(exp);
        let scaled: Vec<f64> = weights.iter().map(|w| w * scale).collect();
        let base = weighted_rrf(&rankings, &weights, 60);
        let other = weighted_rrf(&rankings, &scaled, 60);
        prop_assert_eq!(scores(&base), scores(&other));
    }

    #[test]
    fn any_scale_preserves_order(
        rankings in rankings_strategy(),
        weights in proptest::array::uniform3(0.01f64..1.0),
        scale in 0.01f64..100.0,
    ) {
        let scaled: Vec<f64> = weights.iter().map(|w| w * scale).collect();
        let base = weighted_rrf(&rankings, &weights, 60);
        let other = weighted_rrf(&rankings, &scaled, 60);
        prop_assert_eq!(base.len(), other.len());
        for (a, b) in base.iter().zip(&other) {
            prop_assert!((a.weighted_rrf_score - b.weighted_rrf_score).abs() < 1e-12);
        }
    }

    #[test]
    fn single_input_preserves_order(ranking in ranking_strategy(Channel::MultiVector), k in 1u32..200) {
        let fused = weighted_rrf(&[ranking.clone()], &[1.0], k);
        let expected: Vec<&str> = ranking.iter().map(|i| i.id.as_str()).collect();
        let actual: Vec<&str> = fused.iter().map(|i| i.id.as_str()).collect();
        prop_assert_eq!(expected, actual);
    }

    #[test]
    fn zero_weight_ranking_is_excluded(
        rankings in rankings_strategy(),
        w0 in 0.01f64..1.0,
        w1 in 0.01f64..1.0,
    ) {
        let with_zero = weighted_rrf(&rankings, &[w0, w1, 0.0], 60);
        let without = weighted_rrf(&rankings[..2], &[w0, w1], 60);
        prop_assert_eq!(scores(&with_zero), scores(&without));
        for item in &with_zero {
            prop_assert!(!item.appears_in(Channel::GraphGlobal));
        }
    }

    #[test]
    fn fused_ids_are_unique_and_ranks_contiguous(rankings in rankings_strategy()) {
        let fused = rrf(&rankings, 60);
        let mut ids: Vec<&str> = fused.iter().map(|i| i.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        prop_assert_eq!(ids.len(), fused.len());
        for (i, item) in fused.iter().enumerate() {
            prop_assert_eq!(item.final_rank, i + 1);
        }
    }

    #[test]
    fn output_is_sorted_descending(rankings in rankings_strategy()) {
        let fused = rrf(&rankings, 60);
        for pair in fused.windows(2) {
            prop_assert!(
                pair[0].final_score > pair[1].final_score
                    || (pair[0].final_score == pair[1].final_score && pair[0].id < pair[1].id)
            );
        }
    }
}
