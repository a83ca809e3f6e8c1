//! Optional cross-encoder reranking of the fused list.

use std::collections::HashSet;

use braid_core::errors::{BraidResult, RerankError};
use braid_core::models::{compare_by_final_score, FusedItem};
use braid_core::traits::IReranker;

/// Rerank the head of `items` with `reranker`.
///
/// The first `candidates` items are sent. Scored candidates take the
/// reranker's score as `final_score` and go first; candidates the reranker
/// left out follow in fused order, then every item past the candidate window.
/// `final_rank` is reassigned over the whole list. On error the caller keeps
/// its fused list.
pub async fn rerank(
    reranker: &dyn IReranker,
    query: &str,
    items: Vec<FusedItem>,
    candidates: usize,
) -> BraidResult<Vec<FusedItem>> {
    let window = candidates.min(items.len());
    if window == 0 {
        return Ok(items);
    }

    let documents: Vec<String> = items[..window].iter().map(|i| i.text.clone()).collect();
    let scores = reranker.score(query, &documents).await?;

    let mut seen = HashSet::new();
    let mut scored: Vec<(usize, f64)> = Vec::with_capacity(scores.len());
    for s in scores {
        if s.index >= window {
            return Err(RerankError::IndexOutOfRange {
                index: s.index,
                document_count: window,
            }
            .into());
        }
        if seen.insert(s.index) {
            scored.push((s.index, s.score));
        }
    }

    let mut slots: Vec<Option<FusedItem>> = items.into_iter().map(Some).collect();
    let mut head: Vec<FusedItem> = Vec::with_capacity(scored.len());
    for (index, score) in scored {
        if let Some(mut item) = slots[index].take() {
            item.rerank_score = Some(score);
            item.final_score = score;
            head.push(item);
        }
    }
    head.sort_by(compare_by_final_score);

    let mut out = head;
    out.extend(slots.into_iter().flatten());
    for (i, item) in out.iter_mut().enumerate() {
        item.final_rank = i + 1;
    }
    Ok(out)
}
