use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use braid_core::constants::PARAM_NAMESPACES;
use braid_core::errors::{BraidResult, GraphError};
use braid_core::models::{GraphParams, GraphQuery, GraphQueryKind, GraphRecord};
use braid_core::traits::IGraphStore;
use serde_json::{json, Value};

use crate::corpus::{CorpusChunk, GoldenCorpus};

/// One recorded `execute_read` call.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphCall {
    pub kind: GraphQueryKind,
    /// `None` for an unscoped call.
    pub namespaces: Option<Vec<String>>,
}

/// Answers each [`GraphQueryKind`] from a [`GoldenCorpus`].
///
/// Refuses any call whose params lack a `namespaces` entry.
#[derive(Debug)]
pub struct InMemoryGraphStore {
    corpus: GoldenCorpus,
    fail_all: bool,
    failing_kinds: HashSet<GraphQueryKind>,
    delay: Option<Duration>,
    calls: Mutex<Vec<GraphCall>>,
    call_count: AtomicUsize,
}

impl InMemoryGraphStore {
    pub fn new(corpus: GoldenCorpus) -> Self {
        Self {
            corpus,
            fail_all: false,
            failing_kinds: HashSet::new(),
            delay: None,
            calls: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    pub fn failing(mut self) -> Self {
        self.fail_all = true;
        self
    }

    /// Fail only queries of `kind`.
    pub fn failing_on(mut self, kind: GraphQueryKind) -> Self {
        self.failing_kinds.insert(kind);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<GraphCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn calls_of(&self, kind: GraphQueryKind) -> usize {
        self.calls().iter().filter(|c| c.kind == kind).count()
    }

    fn visible_chunks<'a>(
        &'a self,
        namespaces: &'a Option<Vec<String>>,
    ) -> impl Iterator<Item = &'a CorpusChunk> + 'a {
        self.corpus
            .chunks
            .iter()
            .filter(move |c| visible(namespaces, &c.namespace_id))
    }

    fn entity_mentions_by_terms(
        &self,
        params: &GraphParams,
        namespaces: &Option<Vec<String>>,
    ) -> Vec<GraphRecord> {
        let terms = lowered(params.strings("terms"));
        let mut rows: Vec<(String, String, GraphRecord)> = Vec::new();
        for chunk in self.visible_chunks(namespaces) {
            for entity in &chunk.entities {
                if matches_any(entity, &terms) {
                    rows.push((
                        entity.clone(),
                        chunk.id.clone(),
                        mention_row(entity, chunk, None),
                    ));
                }
            }
        }
        rows.sort_by(|a, b| (&a.0, &a.1).cmp(&(&b.0, &b.1)));
        rows.into_iter().map(|(_, _, row)| row).collect()
    }

    fn communities_by_terms(
        &self,
        params: &GraphParams,
        namespaces: &Option<Vec<String>>,
    ) -> Vec<GraphRecord> {
        let terms = lowered(params.strings("terms"));
        let limit = params
            .get("limit")
            .and_then(Value::as_u64)
            .map_or(usize::MAX, |l| l as usize);

        let mut matched: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for entity in &self.corpus.entities {
            if visible(namespaces, &entity.namespace_id) && matches_any(&entity.name, &terms) {
                matched
                    .entry(entity.community_id.as_str())
                    .or_default()
                    .insert(entity.name.as_str());
            }
        }
        let mut ranked: Vec<(&str, usize)> =
            matched.into_iter().map(|(c, e)| (c, e.len())).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(limit);
        ranked
            .into_iter()
            .map(|(community, score)| record(json!({ "community_id": community, "score": score })))
            .collect()
    }

    fn community_mentions(
        &self,
        params: &GraphParams,
        namespaces: &Option<Vec<String>>,
    ) -> Vec<GraphRecord> {
        let communities = params.strings("community_ids");
        let mut rows = Vec::new();
        for chunk in self.visible_chunks(namespaces) {
            for name in &chunk.entities {
                let Some(entity) = self.corpus.entity(name, &chunk.namespace_id) else {
                    continue;
                };
                if communities.contains(&entity.community_id) {
                    rows.push(mention_row(name, chunk, Some(&entity.community_id)));
                }
            }
        }
        rows
    }

    fn entities_in_chunks(
        &self,
        params: &GraphParams,
        namespaces: &Option<Vec<String>>,
    ) -> Vec<GraphRecord> {
        let chunk_ids = params.strings("chunk_ids");
        let mut rows = Vec::new();
        for chunk in self.visible_chunks(namespaces) {
            if !chunk_ids.contains(&chunk.id) {
                continue;
            }
            for entity in &chunk.entities {
                rows.push(record(json!({ "entity": entity, "chunk_id": chunk.id })));
            }
        }
        rows
    }

    fn mentions_by_entities(
        &self,
        params: &GraphParams,
        namespaces: &Option<Vec<String>>,
    ) -> Vec<GraphRecord> {
        let entities = params.strings("entities");
        let excluded = params.strings("exclude_ids");
        let mut rows = Vec::new();
        for chunk in self.visible_chunks(namespaces) {
            if excluded.contains(&chunk.id) {
                continue;
            }
            for entity in &chunk.entities {
                if entities.contains(entity) {
                    rows.push(mention_row(entity, chunk, None));
                }
            }
        }
        rows
    }
}

#[async_trait]
impl IGraphStore for InMemoryGraphStore {
    async fn execute_read(
        &self,
        query: &GraphQuery,
        params: &GraphParams,
    ) -> BraidResult<Vec<GraphRecord>> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        let namespaces = params.namespaces();
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(GraphCall {
                kind: query.kind,
                namespaces: namespaces.clone(),
            });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if params.get(PARAM_NAMESPACES).is_none()
            || (namespaces.is_none() && !params.is_unscoped())
        {
            return Err(GraphError::UnscopedQuery {
                query: query.kind.as_str().to_string(),
            }
            .into());
        }
        if self.fail_all || self.failing_kinds.contains(&query.kind) {
            return Err(GraphError::QueryFailed {
                query: query.kind.as_str().to_string(),
                reason: "graph store offline".to_string(),
            }
            .into());
        }

        let rows = match query.kind {
            GraphQueryKind::EntityMentionsByTerms => {
                self.entity_mentions_by_terms(params, &namespaces)
            }
            GraphQueryKind::CommunitiesByTerms => self.communities_by_terms(params, &namespaces),
            GraphQueryKind::CommunityMentions => self.community_mentions(params, &namespaces),
            GraphQueryKind::EntitiesInChunks => self.entities_in_chunks(params, &namespaces),
            GraphQueryKind::MentionsByEntities => self.mentions_by_entities(params, &namespaces),
        };
        Ok(rows)
    }

    fn name(&self) -> &str {
        "in-memory-graph"
    }
}

fn visible(namespaces: &Option<Vec<String>>, namespace_id: &str) -> bool {
    match namespaces {
        Some(ns) => ns.iter().any(|n| n == namespace_id),
        None => true,
    }
}

fn lowered(values: Vec<String>) -> Vec<String> {
    values.into_iter().map(|v| v.to_lowercase()).collect()
}

/// Substring match of any (lowercased) term against the entity name.
fn matches_any(entity: &str, terms: &[String]) -> bool {
    let name = entity.to_lowercase();
    terms.iter().any(|t| !t.is_empty() && name.contains(t.as_str()))
}

fn mention_row(entity: &str, chunk: &CorpusChunk, community_id: Option<&str>) -> GraphRecord {
    let mut row = record(json!({
        "entity": entity,
        "chunk_id": chunk.id,
        "text": chunk.text,
        "document_id": chunk.document_id,
        "namespace_id": chunk.namespace_id,
    }));
    if let Some(community_id) = community_id {
        row.insert("community_id".to_string(), Value::from(community_id));
    }
    row
}

fn record(value: Value) -> GraphRecord {
    match value {
        Value::Object(map) => map,
        _ => GraphRecord::new(),
    }
}
