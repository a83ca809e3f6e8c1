use std::collections::HashSet;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use braid_core::models::{assign_ranks, Channel, RankedItem};
use braid_fusion::{analyze_diversity, weighted_rrf};

/// Four channels of 100 items each, drawn from a pool of 250 ids.
fn build_rankings() -> Vec<Vec<RankedItem>> {
    Channel::ALL
        .iter()
        .enumerate()
        .map(|(c, channel)| {
            let mut items: Vec<RankedItem> = (0..100)
                .map(|i| RankedItem::new(format!("chunk-{}", (i * (c + 3) + c * 17) % 250), *channel))
                .collect();
            let mut seen = HashSet::new();
            items.retain(|item| seen.insert(item.id.clone()));
            assign_ranks(&mut items);
            items
        })
        .collect()
}

fn bench_weighted_rrf(c: &mut Criterion) {
    let rankings = build_rankings();
    let weights = [0.4, 0.3, 0.3, 0.15];
    c.bench_function("weighted_rrf_4x100", |b| {
        b.iter(|| weighted_rrf(black_box(&rankings), black_box(&weights), 60))
    });
}

fn bench_diversity(c: &mut Criterion) {
    let rankings = build_rankings();
    c.bench_function("analyze_diversity_4x100_top20", |b| {
        b.iter(|| analyze_diversity(black_box(&rankings), 20))
    });
}

criterion_group!(benches, bench_weighted_rrf, bench_diversity);
criterion_main!(benches);
