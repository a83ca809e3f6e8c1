//! Ranking diversity statistics. Observability only; never feeds scoring.

use std::collections::HashSet;

use braid_core::models::{DiversityStats, RankedItem};

/// Overlap statistics over the first `top_k` ids of each ranking.
///
/// Pairwise overlap is `|A ∩ B| / min(|A|, |B|) * 100`, averaged over all
/// pairs. A pair with an empty side counts as 0% overlap.
pub fn analyze_diversity<R: AsRef<[RankedItem]>>(rankings: &[R], top_k: usize) -> DiversityStats {
    let heads: Vec<HashSet<&str>> = rankings
        .iter()
        .map(|r| r.as_ref().iter().take(top_k).map(|i| i.id.as_str()).collect())
        .collect();

    let total_unique = heads
        .iter()
        .flat_map(|h| h.iter().copied())
        .collect::<HashSet<&str>>()
        .len();

    let common_to_all = match heads.split_first() {
        Some((first, rest)) => first
            .iter()
            .filter(|id| rest.iter().all(|h| h.contains(*id)))
            .count(),
        None => 0,
    };

    let mut pair_total = 0.0;
    let mut pairs = 0usize;
    for i in 0..heads.len() {
        for j in (i + 1)..heads.len() {
            let smaller = heads[i].len().min(heads[j].len());
            if smaller > 0 {
                let shared = heads[i].intersection(&heads[j]).count();
                pair_total += shared as f64 / smaller as f64 * 100.0;
            }
            pairs += 1;
        }
    }
    let avg_pairwise_overlap_pct = if pairs == 0 {
        0.0
    } else {
        pair_total / pairs as f64
    };

    DiversityStats {
        ranking_count: rankings.len(),
        top_k,
        total_unique,
        common_to_all,
        avg_pairwise_overlap_pct,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use braid_core::models::{assign_ranks, Channel};

    fn ranking(ids: &[&str]) -> Vec<RankedItem> {
        let mut items: Vec<RankedItem> = ids
            .iter()
            .map(|id| RankedItem::new(*id, Channel::MultiVector))
            .collect();
        assign_ranks(&mut items);
        items
    }

    #[test]
    fn counts_unique_and_common() {
        let stats = analyze_diversity(
            &[ranking(&["a", "b", "c"]), ranking(&["b", "c", "d"])],
            3,
        );
        assert_eq!(stats.total_unique, 4);
        assert_eq!(stats.common_to_all, 2);
        assert!((stats.avg_pairwise_overlap_pct - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn top_k_truncates_before_comparing() {
        let stats = analyze_diversity(&[ranking(&["a", "x"]), ranking(&["b", "x"])], 1);
        assert_eq!(stats.total_unique, 2);
        assert_eq!(stats.common_to_all, 0);
        assert_eq!(stats.avg_pairwise_overlap_pct, 0.0);
    }

    #[test]
    fn overlap_uses_smaller_list() {
        let stats = analyze_diversity(&[ranking(&["a"]), ranking(&["a", "b", "c", "d"])], 10);
        assert_eq!(stats.avg_pairwise_overlap_pct, 100.0);
    }

    #[test]
    fn degenerate_inputs() {
        let none: [Vec<RankedItem>; 0] = [];
        let stats = analyze_diversity(&none, 5);
        assert_eq!(stats, DiversityStats { top_k: 5, ..Default::default() });

        let single = analyze_diversity(&[ranking(&["a", "b"])], 5);
        assert_eq!(single.common_to_all, 2);
        assert_eq!(single.avg_pairwise_overlap_pct, 0.0);

        let with_empty = analyze_diversity(&[ranking(&["a"]), Vec::new()], 5);
        assert_eq!(with_empty.common_to_all, 0);
        assert_eq!(with_empty.avg_pairwise_overlap_pct, 0.0);
    }
}
