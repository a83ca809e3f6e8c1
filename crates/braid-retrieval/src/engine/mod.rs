//! The retrieval orchestrator.
//!
//! One call walks `cache lookup → classify → fan-out → fuse → boost →
//! rerank → cache populate`. Channel, cache, classifier, booster and reranker
//! failures degrade the answer and are logged. Cancellation, an expired
//! deadline and invalid requests abort the call with no partial result.

mod builder;
mod fanout;
mod guard;

use std::sync::Arc;

use braid_cache::{CacheEntry, CacheLookup, CacheScope, QueryCache};
use braid_core::config::BraidConfig;
use braid_core::constants::{
    MAX_TOP_K, META_CONTRIBUTING_ENTITIES, META_MATCHED_ENTITIES, METHOD_FALLBACK,
    METHOD_OVERRIDE,
};
use braid_core::errors::{BraidError, BraidResult, FusionError};
use braid_core::models::{
    CacheHitKind, Channel, ChannelFailure, FusedItem, IntentClassification,
    RankedItem, RequestContext, SearchMetadata, SearchRequest, SearchResponse, SkipReason,
};
use braid_core::traits::{IIntentClassifier, IReranker};
use braid_fusion::{analyze_diversity, weighted_rrf};
use braid_observability::{
    cache_span, events, fusion_span, query_prefix, retrieval_span, StageTimer,
};
use tracing::Instrument;
use uuid::Uuid;

pub use builder::RetrievalEngineBuilder;

use crate::boost::CrossModalBooster;
use crate::channels::ChannelSet;
use crate::intent::IntentProfiles;
use crate::namespaces::{request_scope, resolve_namespaces};
use crate::rerank::rerank;
use fanout::{fan_out, FanoutPlan};
use guard::StageGuard;

/// Stage names used for latencies, cancellation errors and log events.
pub mod stages {
    pub const CACHE_LOOKUP: &str = "cache_lookup";
    pub const CLASSIFY: &str = "classify";
    pub const FANOUT: &str = "fanout";
    pub const FUSE: &str = "fuse";
    pub const BOOST: &str = "boost";
    pub const RERANK: &str = "rerank";
}

/// Query engine over the configured collaborators. Shareable across tasks;
/// the cache is the only state that outlives a call.
pub struct RetrievalEngine {
    config: BraidConfig,
    profiles: IntentProfiles,
    classifier: Arc<dyn IIntentClassifier>,
    channels: ChannelSet,
    booster: Option<CrossModalBooster>,
    reranker: Option<Arc<dyn IReranker>>,
    cache: Option<QueryCache>,
}

impl RetrievalEngine {
    pub fn builder(config: BraidConfig) -> RetrievalEngineBuilder {
        RetrievalEngineBuilder::new(config)
    }

    pub fn config(&self) -> &BraidConfig {
        &self.config
    }

    pub fn profiles(&self) -> &IntentProfiles {
        &self.profiles
    }

    pub fn cache(&self) -> Option<&QueryCache> {
        self.cache.as_ref()
    }

    /// Run one search.
    ///
    /// Returns `Ok` with an empty result list when no channel could run or
    /// every channel failed; `metadata` says which.
    pub async fn search(
        &self,
        request: SearchRequest,
        ctx: &RequestContext,
    ) -> BraidResult<SearchResponse> {
        let request_id = Uuid::new_v4().to_string();
        let prefix = query_prefix(&request.query);
        let span = retrieval_span!(request_id, prefix);
        self.run(request, ctx, request_id, prefix)
            .instrument(span)
            .await
    }

    async fn run(
        &self,
        mut request: SearchRequest,
        ctx: &RequestContext,
        request_id: String,
        prefix: String,
    ) -> BraidResult<SearchResponse> {
        let guard = StageGuard::new(ctx);
        let mut timer = StageTimer::start();
        self.validate(&mut request)?;
        guard.check(stages::CACHE_LOOKUP)?;

        let namespaces = resolve_namespaces(&request.namespaces, &self.config.retrieval);
        let scope = request_scope(&namespaces, &self.config.channels)?;

        let mut metadata = SearchMetadata {
            request_id,
            query_prefix: prefix,
            ..SearchMetadata::default()
        };

        // CACHE_LOOKUP
        let cache_scope =
            CacheScope::new(&namespaces).with_intent(request.intent_override.as_deref());
        let mut lookup: Option<CacheLookup> = None;
        if let Some(cache) = self.cache.as_ref().filter(|_| request.use_cache) {
            let found = guard
                .run(stages::CACHE_LOOKUP, cache.get(&request.query, cache_scope))
                .instrument(cache_span!("get"))
                .await?;
            let ms = timer.lap(stages::CACHE_LOOKUP, &mut metadata);
            events::cache_lookup(found.kind, found.similarity, ms);
            let usable = found
                .entry
                .as_ref()
                .filter(|entry| found.is_hit() && entry.covers(request.top_k));
            if found.is_hit() && usable.is_none() {
                tracing::debug!(
                    top_k = request.top_k,
                    "cached entry is shallower than the request, recomputing"
                );
            }
            if let Some(entry) = usable {
                return Ok(self.cached_response(
                    entry,
                    found.kind,
                    found.similarity,
                    request.top_k,
                    metadata,
                    &timer,
                ));
            }
            lookup = Some(found);
        }

        // CLASSIFY
        let classification = self.classify(&request, &guard).await?;
        timer.lap(stages::CLASSIFY, &mut metadata);
        let weights = classification.weights;
        metadata.intent = classification.intent;
        metadata.intent_confidence = classification.confidence;
        metadata.intent_method = classification.method;
        metadata.weights = weights;

        // FANOUT
        let expansion_factor = self.config.channels.entity_expansion_weight_factor;
        let plan = self.plan(&request, &mut metadata, |c| weights.weight_for(c, expansion_factor));
        if plan.is_empty() {
            let reason = if weights.is_all_zero() {
                FusionError::AllWeightsZero
            } else {
                FusionError::NoChannelsExecuted
            };
            tracing::info!(reason = %reason, "no channel eligible, returning empty result");
            return Ok(self.complete(&request, cache_scope, lookup, Vec::new(), metadata, &timer));
        }

        let channel_top_k = request
            .top_k
            .saturating_mul(self.config.retrieval.channel_over_fetch);
        let runs = guard
            .run(
                stages::FANOUT,
                fan_out(
                    &self.channels,
                    plan,
                    &request.query,
                    channel_top_k,
                    &scope,
                    self.config.channels.max_concurrent,
                ),
            )
            .await?;
        timer.lap(stages::FANOUT, &mut metadata);

        let mut rankings: Vec<Vec<RankedItem>> = Vec::with_capacity(runs.len());
        let mut channel_weights: Vec<f64> = Vec::with_capacity(runs.len());
        let mut ran_expansion = false;
        for run in runs {
            metadata.record_latency(run.channel.as_str(), run.latency_ms);
            ran_expansion |= run.channel == Channel::EntityExpansion;
            match run.result {
                Ok(items) => {
                    events::channel_completed(run.channel, items.len(), run.latency_ms);
                    metadata.channels_executed.push(run.channel);
                    metadata.channel_counts.insert(run.channel, items.len());
                    channel_weights.push(weights.weight_for(run.channel, expansion_factor));
                    rankings.push(items);
                }
                Err(err) => {
                    let error = err.to_string();
                    events::channel_failed(run.channel, &metadata.query_prefix, &error);
                    metadata.channel_failures.push(ChannelFailure {
                        channel: run.channel,
                        error,
                    });
                }
            }
        }
        if plan.includes(Channel::EntityExpansion) && !ran_expansion {
            metadata.skip(Channel::EntityExpansion, SkipReason::NoAnchors);
        }
        if rankings.is_empty() {
            let reason = FusionError::AllChannelsFailed {
                attempted: metadata.channel_failures.len(),
            };
            tracing::warn!(reason = %reason, "returning empty result");
            return Ok(self.complete(&request, cache_scope, lookup, Vec::new(), metadata, &timer));
        }

        // FUSE
        let k = self.config.retrieval.rrf_k;
        let mut fused =
            fusion_span!(rankings.len()).in_scope(|| weighted_rrf(&rankings, &channel_weights, k));
        metadata.total_candidates = fused.len();
        if rankings.len() > 1 {
            metadata.diversity = Some(analyze_diversity(&rankings, request.top_k));
        }
        timer.lap(stages::FUSE, &mut metadata);

        // BOOST
        if request.use_entity_expansion && self.config.boost.enabled {
            if let Some(booster) = &self.booster {
                let names = harvest_entities(&rankings, &metadata.channels_executed);
                if !names.is_empty() {
                    let outcome = guard
                        .run(
                            stages::BOOST,
                            booster.boost(
                                fused,
                                &names,
                                self.config.boost.alpha,
                                self.config.boost.k,
                                &scope,
                            ),
                        )
                        .await?;
                    fused = outcome.items;
                    metadata.boost_applied = outcome.applied;
                    if outcome.applied {
                        metadata.boost_entities = names;
                    }
                    timer.lap(stages::BOOST, &mut metadata);
                }
            }
        }

        // RERANK
        if request.use_reranking {
            match &self.reranker {
                Some(reranker) => {
                    let candidates = request
                        .top_k
                        .saturating_mul(self.config.retrieval.rerank_candidate_multiplier);
                    let outcome = guard
                        .run(
                            stages::RERANK,
                            rerank(reranker.as_ref(), &request.query, fused.clone(), candidates),
                        )
                        .await?;
                    match outcome {
                        Ok(reranked) => {
                            fused = reranked;
                            metadata.reranked = true;
                        }
                        Err(err) => tracing::warn!(
                            reranker = reranker.name(),
                            error = %err,
                            "rerank failed, keeping fused order"
                        ),
                    }
                    timer.lap(stages::RERANK, &mut metadata);
                }
                None => tracing::debug!("reranking requested but no reranker configured"),
            }
        }

        fused.truncate(request.top_k);
        Ok(self.complete(&request, cache_scope, lookup, fused, metadata, &timer))
    }

    /// CACHE_POPULATE, then finish. Every pipeline completion is written unless
    /// the call bypassed the cache, or it is degraded and `cache.skip_degraded` is set.
    fn complete(
        &self,
        request: &SearchRequest,
        scope: CacheScope<'_>,
        lookup: Option<CacheLookup>,
        results: Vec<FusedItem>,
        metadata: SearchMetadata,
        timer: &StageTimer,
    ) -> SearchResponse {
        if let Some(cache) = self.cache.as_ref().filter(|_| request.use_cache) {
            let degraded = !metadata.channel_failures.is_empty();
            if degraded && self.config.cache.skip_degraded {
                tracing::debug!(
                    failures = metadata.channel_failures.len(),
                    "degraded result not cached"
                );
            } else {
                populate(
                    cache,
                    &request.query,
                    scope,
                    &results,
                    &metadata,
                    lookup.and_then(|l| l.embedding),
                );
            }
        }
        self.finish(results, metadata, timer)
    }

    /// `top_k = 0` takes the configured default.
    fn validate(&self, request: &mut SearchRequest) -> BraidResult<()> {
        if request.query.trim().is_empty() {
            return Err(BraidError::invalid_request("query is empty"));
        }
        if request.top_k == 0 {
            request.top_k = self.config.retrieval.default_top_k;
        }
        if request.top_k > MAX_TOP_K {
            return Err(BraidError::invalid_request(format!(
                "top_k {} exceeds the maximum of {MAX_TOP_K}",
                request.top_k
            )));
        }
        Ok(())
    }

    async fn classify(
        &self,
        request: &SearchRequest,
        guard: &StageGuard<'_>,
    ) -> BraidResult<IntentClassification> {
        if let Some(intent) = &request.intent_override {
            let weights = self.profiles.get(intent).ok_or_else(|| {
                BraidError::invalid_request(format!("unknown intent override '{intent}'"))
            })?;
            return Ok(IntentClassification::new(
                intent.clone(),
                weights,
                1.0,
                METHOD_OVERRIDE,
            ));
        }

        let classified = guard
            .run(stages::CLASSIFY, self.classifier.classify(&request.query))
            .await?;
        let mut classification = match classified {
            Ok(classification) => classification,
            Err(err) => {
                tracing::warn!(
                    classifier = self.classifier.name(),
                    error = %err,
                    "intent classification failed, using default profile"
                );
                IntentClassification::new(
                    self.profiles.default_intent(),
                    self.profiles.default_weights(),
                    0.0,
                    METHOD_FALLBACK,
                )
            }
        };
        if let Err(reason) = classification.weights.validate() {
            tracing::warn!(
                intent = %classification.intent,
                reason = %reason,
                "clamping classifier weights"
            );
            classification.weights = classification.weights.sanitized();
        }
        Ok(classification)
    }

    /// Decide which channels launch. Everything not launched is recorded with a reason.
    fn plan(
        &self,
        request: &SearchRequest,
        metadata: &mut SearchMetadata,
        weight_of: impl Fn(Channel) -> f64,
    ) -> FanoutPlan {
        let mut plan = FanoutPlan::default();
        for channel in Channel::ALL {
            let reason = if channel == Channel::EntityExpansion && !request.use_entity_expansion {
                Some(SkipReason::Disabled)
            } else if weight_of(channel) <= 0.0 {
                Some(SkipReason::ZeroWeight)
            } else if self.channels.get(channel).is_none() {
                Some(SkipReason::NoBackend)
            } else if channel == Channel::EntityExpansion && !plan.includes(Channel::MultiVector) {
                Some(SkipReason::NoAnchors)
            } else {
                None
            };
            match reason {
                Some(reason) => metadata.skip(channel, reason),
                None => plan.enable(channel),
            }
        }
        plan
    }

    fn cached_response(
        &self,
        entry: &CacheEntry,
        kind: CacheHitKind,
        similarity: Option<f32>,
        top_k: usize,
        fresh: SearchMetadata,
        timer: &StageTimer,
    ) -> SearchResponse {
        let mut metadata = entry.metadata.clone();
        metadata.request_id = fresh.request_id;
        metadata.query_prefix = fresh.query_prefix;
        metadata.latencies = fresh.latencies;
        metadata.cache_hit = kind;
        metadata.cache_similarity = similarity;
        let results: Vec<FusedItem> = entry.results.iter().take(top_k).cloned().collect();
        self.finish(results, metadata, timer)
    }

    fn finish(
        &self,
        results: Vec<FusedItem>,
        mut metadata: SearchMetadata,
        timer: &StageTimer,
    ) -> SearchResponse {
        let total_ms = timer.finish(&mut metadata);
        events::request_completed(
            &metadata.request_id,
            &metadata.intent,
            &metadata.channels_executed,
            results.len(),
            metadata.cache_hit,
            total_ms,
        );
        SearchResponse { results, metadata }
    }
}

/// Entity names for the booster: GraphLocal matches first, then GraphGlobal
/// contributors, each in rank order, first occurrence kept.
fn harvest_entities(rankings: &[Vec<RankedItem>], executed: &[Channel]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for (channel, key) in [
        (Channel::GraphLocal, META_MATCHED_ENTITIES),
        (Channel::GraphGlobal, META_CONTRIBUTING_ENTITIES),
    ] {
        let Some(position) = executed.iter().position(|c| *c == channel) else {
            continue;
        };
        for item in &rankings[position] {
            for name in item.metadata_strings(key) {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
    }
    names
}

/// Exact tier synchronously; the semantic write runs in the background so the
/// response never waits on an embedding call.
fn populate(
    cache: &QueryCache,
    query: &str,
    scope: CacheScope<'_>,
    results: &[FusedItem],
    metadata: &SearchMetadata,
    embedding: Option<Vec<f32>>,
) {
    let entry = cache.put_exact(query, results.to_vec(), metadata.clone(), scope);
    if !cache.has_semantic_tier() {
        return;
    }
    let cache = cache.clone();
    let query = query.to_string();
    tokio::spawn(async move {
        if let Err(err) = cache.put_semantic(&query, entry, embedding).await {
            tracing::warn!(error = %err, "semantic cache write failed");
        }
    });
}
