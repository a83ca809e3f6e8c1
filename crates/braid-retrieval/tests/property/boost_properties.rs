//! Property tests for the cross-modal booster.

use std::collections::BTreeSet;
use std::sync::Arc;

use braid_core::models::{rank_by_final_score, Channel, FusedItem, GraphScope, RankedItem};
use braid_retrieval::boost::{BoostOutcome, CrossModalBooster};
use proptest::prelude::*;
use test_fixtures::{ns, GoldenCorpus, InMemoryGraphStore};

const CHUNKS: &[&str] = &["c1", "c2", "c3", "c4", "c5", "c6"];
const ENTITIES: &[&str] = &["Kubernetes", "kube-scheduler", "Etcd", "Raft", "Prometheus", "Grafana"];

fn fused_list(entries: &[(usize, f64)]) -> Vec<FusedItem> {
    let mut seen = BTreeSet::new();
    let mut items: Vec<FusedItem> = entries
        .iter()
        .filter(|(i, _)| seen.insert(*i))
        .map(|(i, score)| {
            let ranked = RankedItem::new(CHUNKS[*i], Channel::MultiVector).with_namespace("acme");
            let mut item = FusedItem::from_ranked(&ranked);
            item.weighted_rrf_score = *score;
            item.final_score = *score;
            item
        })
        .collect();
    rank_by_final_score(&mut items);
    items
}

fn run_boost(store: InMemoryGraphStore, items: Vec<FusedItem>, names: Vec<String>) -> BoostOutcome {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let booster = CrossModalBooster::new(Arc::new(store));
    let scope = GraphScope::Namespaces(ns(&["acme"]));
    runtime.block_on(booster.boost(items, &names, 0.3, 60.0, &scope))
}

fn entries() -> impl Strategy<Value = Vec<(usize, f64)>> {
    prop::collection::vec((0..CHUNKS.len(), 0.0f64..0.05), 1..6)
}

fn names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(prop::sample::select(ENTITIES), 0..5)
        .prop_map(|v| v.into_iter().map(str::to_string).collect())
}

proptest! {
    #[test]
    fn no_entities_is_an_exact_no_op(entries in entries()) {
        let items = fused_list(&entries);
        let outcome = run_boost(InMemoryGraphStore::new(GoldenCorpus::basic()), items.clone(), Vec::new());
        prop_assert!(!outcome.applied);
        prop_assert_eq!(outcome.items, items);
    }

    #[test]
    fn graph_failure_is_an_exact_no_op(entries in entries(), names in names()) {
        let items = fused_list(&entries);
        let store = InMemoryGraphStore::new(GoldenCorpus::basic()).failing();
        let outcome = run_boost(store, items.clone(), names);
        prop_assert!(!outcome.applied);
        prop_assert_eq!(outcome.items, items);
    }

    #[test]
    fn boost_keeps_every_item_and_only_adds(entries in entries(), names in names()) {
        let items = fused_list(&entries);
        let before: BTreeSet<String> = items.iter().map(|i| i.id.clone()).collect();
        let outcome = run_boost(InMemoryGraphStore::new(GoldenCorpus::basic()), items, names);

        let after: BTreeSet<String> = outcome.items.iter().map(|i| i.id.clone()).collect();
        prop_assert_eq!(before, after);
        for (i, item) in outcome.items.iter().enumerate() {
            prop_assert_eq!(item.final_rank, i + 1);
            prop_assert!(item.entity_boost >= 0.0);
            prop_assert!(item.final_score >= item.weighted_rrf_score);
        }
        for pair in outcome.items.windows(2) {
            prop_assert!(pair[0].final_score >= pair[1].final_score);
        }
    }
}
