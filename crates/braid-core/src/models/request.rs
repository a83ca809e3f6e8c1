use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use super::{FusedItem, SearchMetadata};

/// A caller's search request, as received from the API layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub top_k: usize,
    /// Requested namespaces. Normalized by the orchestrator before use.
    #[serde(default)]
    pub namespaces: Vec<String>,
    pub use_cache: bool,
    pub use_reranking: bool,
    /// Controls both the EntityExpansion channel and the cross-modal booster.
    pub use_entity_expansion: bool,
    /// Fixed intent profile name. Bypasses the classifier when set.
    #[serde(default)]
    pub intent_override: Option<String>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            top_k: 10,
            namespaces: Vec::new(),
            use_cache: true,
            use_reranking: false,
            use_entity_expansion: true,
            intent_override: None,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_namespaces<I, S>(mut self, namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.namespaces = namespaces.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }

    pub fn with_reranking(mut self, use_reranking: bool) -> Self {
        self.use_reranking = use_reranking;
        self
    }

    pub fn with_entity_expansion(mut self, use_entity_expansion: bool) -> Self {
        self.use_entity_expansion = use_entity_expansion;
        self
    }

    pub fn with_intent_override(mut self, intent: impl Into<String>) -> Self {
        self.intent_override = Some(intent.into());
        self
    }
}

/// Per-call cancellation and deadline.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub cancel: CancellationToken,
    /// Budget for the whole call, measured from the moment the orchestrator starts.
    pub deadline: Option<Duration>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}

/// Final ranked list plus provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<FusedItem>,
    pub metadata: SearchMetadata,
}

impl SearchResponse {
    pub fn ids(&self) -> Vec<&str> {
        self.results.iter().map(|r| r.id.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults() {
        let req = SearchRequest::new("what is etcd");
        assert_eq!(req.top_k, 10);
        assert!(req.use_cache);
        assert!(!req.use_reranking);
        assert!(req.use_entity_expansion);
        assert!(req.intent_override.is_none());
    }

    #[test]
    fn context_carries_deadline() {
        let ctx = RequestContext::new().with_deadline(Duration::from_millis(50));
        assert_eq!(ctx.deadline, Some(Duration::from_millis(50)));
        assert!(!ctx.cancel.is_cancelled());
    }
}
