use braid_core::config::ObservabilityConfig;
use braid_core::models::{CacheHitKind, Channel};
use braid_observability::spans::names;
use braid_observability::{
    channel_span, events, init_tracing, init_tracing_with_filter, retrieval_span,
};

#[test]
fn init_is_idempotent() {
    let config = ObservabilityConfig {
        log_level: "debug".into(),
        json_logs: true,
    };
    init_tracing(&config);
    assert!(!init_tracing(&config), "second install must report already-initialized");
}

#[test]
fn explicit_filter_install_is_idempotent() {
    init_tracing_with_filter("braid=trace");
    assert!(!init_tracing_with_filter("braid=trace"));
    assert!(!init_tracing(&ObservabilityConfig::default()));
}

#[test]
fn spans_and_events_emit_without_a_subscriber_panic() {
    let span = retrieval_span!("req-1", "what is etcd");
    let _guard = span.enter();
    let channel = channel_span!(Channel::GraphLocal, 20);
    let _inner = channel.enter();

    events::channel_failed(Channel::GraphLocal, "what is etcd", "timeout");
    events::channel_completed(Channel::MultiVector, 7, 3);
    events::cache_lookup(CacheHitKind::Semantic, Some(0.97), 1);
    events::request_completed(
        "req-1",
        "factual",
        &[Channel::MultiVector],
        7,
        CacheHitKind::Miss,
        12,
    );
    assert_eq!(names::CHANNEL, "braid.channel");
}
