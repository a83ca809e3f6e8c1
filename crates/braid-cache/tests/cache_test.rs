use std::sync::Arc;
use std::time::Duration;

use braid_cache::{CacheScope, QueryCache};
use braid_core::config::CacheConfig;
use braid_core::models::{CacheHitKind, Channel, FusedItem, RankedItem, SearchMetadata};
use braid_core::traits::IEmbeddingProvider;
use test_fixtures::{ns, FailingEmbedder, StaticEmbedder};

fn results(ids: &[&str]) -> Vec<FusedItem> {
    ids.iter()
        .enumerate()
        .map(|(i, id)| {
            let mut item = FusedItem::from_ranked(&RankedItem::new(*id, Channel::MultiVector));
            item.final_rank = i + 1;
            item
        })
        .collect()
}

fn exact_only() -> QueryCache {
    QueryCache::new(&CacheConfig::default(), None)
}

fn with_embedder(embedder: StaticEmbedder) -> QueryCache {
    let embedder: Arc<dyn IEmbeddingProvider> = Arc::new(embedder);
    QueryCache::new(&CacheConfig::default(), Some(embedder))
}

#[tokio::test]
async fn set_then_get_is_an_exact_hit() {
    let cache = exact_only();
    let stored = results(&["c1", "c2"]);
    cache
        .set("What is etcd?", stored.clone(), SearchMetadata::default(), &ns(&["a"]))
        .await
        .unwrap();

    let lookup = cache.get("what   is ETCD?", &ns(&["a"])).await;
    assert_eq!(lookup.kind, CacheHitKind::Exact);
    assert_eq!(lookup.entry.unwrap().results, stored);
}

#[tokio::test]
async fn other_namespace_set_is_a_miss() {
    let cache = exact_only();
    cache
        .set("q", results(&["c1"]), SearchMetadata::default(), &ns(&["a"]))
        .await
        .unwrap();
    assert_eq!(cache.get("q", &ns(&["b"])).await.kind, CacheHitKind::Miss);
    assert_eq!(cache.get("q", &ns(&["a", "b"])).await.kind, CacheHitKind::Miss);
}

#[tokio::test]
async fn pinned_intent_is_its_own_scope_in_both_tiers() {
    let cache = with_embedder(StaticEmbedder::new());
    let acme = ns(&["acme"]);
    let thematic = CacheScope::new(&acme).with_intent(Some("thematic"));
    cache
        .set("etcd raft", results(&["c3"]), SearchMetadata::default(), thematic)
        .await
        .unwrap();

    assert_eq!(cache.get("etcd raft", &acme).await.kind, CacheHitKind::Miss);
    let factual = CacheScope::new(&acme).with_intent(Some("factual"));
    assert_eq!(cache.get("etcd raft", factual).await.kind, CacheHitKind::Miss);
    assert_eq!(cache.get("etcd raft", thematic).await.kind, CacheHitKind::Exact);
}

#[tokio::test]
async fn namespace_order_collides() {
    let cache = exact_only();
    cache
        .set("q", results(&["c1"]), SearchMetadata::default(), &ns(&["b", "a"]))
        .await
        .unwrap();
    assert_eq!(cache.get("q", &ns(&["a", "b"])).await.kind, CacheHitKind::Exact);
}

#[tokio::test]
async fn entries_expire_after_ttl() {
    let config = CacheConfig {
        ttl_secs: 1,
        ..CacheConfig::default()
    };
    let cache = QueryCache::new(&config, None);
    cache
        .set("q", results(&["c1"]), SearchMetadata::default(), &ns(&["a"]))
        .await
        .unwrap();
    assert!(cache.get("q", &ns(&["a"])).await.is_hit());

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(cache.get("q", &ns(&["a"])).await.kind, CacheHitKind::Miss);
}

#[tokio::test]
async fn semantic_tier_matches_similar_query() {
    // cos([1, 0], [0.97, 0.2431]) ≈ 0.97
    let cache = with_embedder(
        StaticEmbedder::new()
            .pin("how does etcd replicate", vec![1.0, 0.0])
            .pin("etcd replication internals", vec![0.97, 0.2431]),
    );
    cache
        .set(
            "how does etcd replicate",
            results(&["c3"]),
            SearchMetadata::default(),
            &ns(&["acme"]),
        )
        .await
        .unwrap();

    let lookup = cache.get("etcd replication internals", &ns(&["acme"])).await;
    assert_eq!(lookup.kind, CacheHitKind::Semantic);
    assert!((lookup.similarity.unwrap() - 0.97).abs() < 1e-3);
    assert_eq!(lookup.entry.unwrap().results[0].id, "c3");
}

#[tokio::test]
async fn semantic_tier_is_namespace_scoped() {
    let cache = with_embedder(
        StaticEmbedder::new()
            .pin("q1", vec![1.0, 0.0])
            .pin("q2", vec![1.0, 0.0]),
    );
    cache
        .set("q1", results(&["c1"]), SearchMetadata::default(), &ns(&["acme"]))
        .await
        .unwrap();
    assert_eq!(cache.get("q2", &ns(&["globex"])).await.kind, CacheHitKind::Miss);
    assert_eq!(cache.get("q2", &ns(&["acme"])).await.kind, CacheHitKind::Semantic);
}

#[tokio::test]
async fn dissimilar_query_misses_and_returns_its_embedding() {
    let cache = with_embedder(
        StaticEmbedder::new()
            .pin("q1", vec![1.0, 0.0])
            .pin("q2", vec![0.8, 0.6]),
    );
    cache
        .set("q1", results(&["c1"]), SearchMetadata::default(), &ns(&["acme"]))
        .await
        .unwrap();
    let lookup = cache.get("q2", &ns(&["acme"])).await;
    assert_eq!(lookup.kind, CacheHitKind::Miss);
    assert_eq!(lookup.embedding, Some(vec![0.8, 0.6]));
}

#[tokio::test]
async fn hits_increment_hit_count_and_stats() {
    let cache = exact_only();
    cache
        .set("q", results(&["c1"]), SearchMetadata::default(), &ns(&["a"]))
        .await
        .unwrap();
    cache.get("q", &ns(&["a"])).await;
    let lookup = cache.get("q", &ns(&["a"])).await;
    assert_eq!(lookup.entry.unwrap().hit_count(), 2);

    cache.get("other", &ns(&["a"])).await;
    let stats = cache.stats();
    assert_eq!(stats.exact_hits, 2);
    assert_eq!(stats.misses, 1);
    assert!((stats.hit_rate() - 2.0 / 3.0).abs() < 1e-9);
}

#[tokio::test]
async fn failing_embedder_degrades_to_miss() {
    let embedder: Arc<dyn IEmbeddingProvider> = Arc::new(FailingEmbedder::new());
    let cache = QueryCache::new(&CacheConfig::default(), Some(embedder));
    assert!(cache.has_semantic_tier());

    let lookup = cache.get("q", &ns(&["a"])).await;
    assert_eq!(lookup.kind, CacheHitKind::Miss);
    assert_eq!(cache.stats().errors, 1);

    // The exact write still lands even though the semantic write cannot.
    let entry = cache.put_exact("q", results(&["c1"]), SearchMetadata::default(), &ns(&["a"]));
    assert!(cache.put_semantic("q", entry, None).await.is_err());
    assert_eq!(cache.get("q", &ns(&["a"])).await.kind, CacheHitKind::Exact);
}

#[tokio::test]
async fn replacement_is_whole_entry() {
    let cache = exact_only();
    cache
        .set("q", results(&["c1", "c2"]), SearchMetadata::default(), &ns(&["a"]))
        .await
        .unwrap();
    cache
        .set("q", results(&["c9"]), SearchMetadata::default(), &ns(&["a"]))
        .await
        .unwrap();
    let entry = cache.get("q", &ns(&["a"])).await.entry.unwrap();
    assert_eq!(entry.results.len(), 1);
    assert_eq!(entry.results[0].id, "c9");
    assert_eq!(entry.hit_count(), 1);
}

#[tokio::test]
async fn clear_and_capacity() {
    let config = CacheConfig {
        exact_capacity: 3,
        ..CacheConfig::default()
    };
    let cache = QueryCache::new(&config, None);
    for i in 0..20 {
        cache.put_exact(
            &format!("query {i}"),
            results(&["c1"]),
            SearchMetadata::default(),
            &ns(&["a"]),
        );
    }
    cache.run_pending_tasks();
    assert!(cache.stats().exact_entries <= 3);

    cache.clear();
    cache.run_pending_tasks();
    assert_eq!(cache.stats().exact_entries, 0);
    assert_eq!(cache.stats().lookups(), 0);
}
