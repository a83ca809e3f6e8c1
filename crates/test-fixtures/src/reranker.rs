use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use braid_core::errors::{BraidResult, RerankError};
use braid_core::models::RerankScore;
use braid_core::traits::IReranker;

/// Scores each document by how many distinct query words it contains.
#[derive(Debug, Default)]
pub struct KeywordReranker {
    calls: AtomicUsize,
    last_batch: Mutex<usize>,
}

impl KeywordReranker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of documents in the most recent call.
    pub fn last_batch_size(&self) -> usize {
        *self.last_batch.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

#[async_trait]
impl IReranker for KeywordReranker {
    async fn score(&self, query: &str, documents: &[String]) -> BraidResult<Vec<RerankScore>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_batch.lock().unwrap_or_else(|e| e.into_inner()) = documents.len();

        let mut query_words = words(query);
        query_words.sort();
        query_words.dedup();
        let mut scores: Vec<RerankScore> = documents
            .iter()
            .enumerate()
            .map(|(index, doc)| {
                let doc_words = words(doc);
                let hits = query_words.iter().filter(|w| doc_words.contains(w)).count();
                RerankScore {
                    index,
                    score: hits as f64,
                }
            })
            .collect();
        scores.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.index.cmp(&b.index)));
        Ok(scores)
    }

    fn name(&self) -> &str {
        "keyword"
    }
}

/// Returns a fixed score list regardless of input.
#[derive(Debug, Clone)]
pub struct ScriptedReranker {
    scores: Vec<RerankScore>,
}

impl ScriptedReranker {
    pub fn new(scores: Vec<(usize, f64)>) -> Self {
        Self {
            scores: scores
                .into_iter()
                .map(|(index, score)| RerankScore { index, score })
                .collect(),
        }
    }
}

#[async_trait]
impl IReranker for ScriptedReranker {
    async fn score(&self, _query: &str, _documents: &[String]) -> BraidResult<Vec<RerankScore>> {
        Ok(self.scores.clone())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Always fails.
#[derive(Debug, Default)]
pub struct FailingReranker;

#[async_trait]
impl IReranker for FailingReranker {
    async fn score(&self, _query: &str, _documents: &[String]) -> BraidResult<Vec<RerankScore>> {
        Err(RerankError::Unavailable {
            reason: "reranker offline".to_string(),
        }
        .into())
    }

    fn name(&self) -> &str {
        "failing"
    }
}
