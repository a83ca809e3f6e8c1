use std::sync::Arc;

use braid_cache::QueryCache;
use braid_core::config::BraidConfig;
use braid_core::errors::{BraidError, BraidResult};
use braid_core::traits::{
    IEmbeddingProvider, IGraphStore, IIntentClassifier, IReranker, IVectorStore,
};

use super::RetrievalEngine;
use crate::boost::CrossModalBooster;
use crate::channels::ChannelSet;
use crate::intent::{IntentProfiles, KeywordIntentClassifier};

enum CacheChoice {
    FromConfig,
    Provided(QueryCache),
    Disabled,
}

/// Assembles a [`RetrievalEngine`] from injected collaborators.
///
/// Every collaborator is optional on its own, but at least one retrieval
/// path must exist: a vector store with an embedder, or a graph store.
pub struct RetrievalEngineBuilder {
    config: BraidConfig,
    embedder: Option<Arc<dyn IEmbeddingProvider>>,
    vector_store: Option<Arc<dyn IVectorStore>>,
    graph_store: Option<Arc<dyn IGraphStore>>,
    classifier: Option<Arc<dyn IIntentClassifier>>,
    reranker: Option<Arc<dyn IReranker>>,
    cache: CacheChoice,
}

impl RetrievalEngineBuilder {
    pub fn new(config: BraidConfig) -> Self {
        Self {
            config,
            embedder: None,
            vector_store: None,
            graph_store: None,
            classifier: None,
            reranker: None,
            cache: CacheChoice::FromConfig,
        }
    }

    pub fn with_embedder(mut self, embedder: Arc<dyn IEmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    pub fn with_vector_store(mut self, store: Arc<dyn IVectorStore>) -> Self {
        self.vector_store = Some(store);
        self
    }

    pub fn with_graph_store(mut self, store: Arc<dyn IGraphStore>) -> Self {
        self.graph_store = Some(store);
        self
    }

    /// Replace the built-in keyword classifier.
    pub fn with_classifier(mut self, classifier: Arc<dyn IIntentClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn with_reranker(mut self, reranker: Arc<dyn IReranker>) -> Self {
        self.reranker = Some(reranker);
        self
    }

    /// Share an existing cache, e.g. between engines over the same corpus.
    pub fn with_cache(mut self, cache: QueryCache) -> Self {
        self.cache = CacheChoice::Provided(cache);
        self
    }

    pub fn without_cache(mut self) -> Self {
        self.cache = CacheChoice::Disabled;
        self
    }

    pub fn build(self) -> BraidResult<RetrievalEngine> {
        self.config.validate()?;

        let has_vector_path = self.vector_store.is_some() && self.embedder.is_some();
        if !has_vector_path && self.graph_store.is_none() {
            return Err(BraidError::NoCollaborators);
        }

        let profiles = IntentProfiles::from_config(&self.config.intent);
        let classifier: Arc<dyn IIntentClassifier> = match self.classifier {
            Some(classifier) => classifier,
            None => Arc::new(KeywordIntentClassifier::new(profiles.clone())),
        };

        let cache = match self.cache {
            CacheChoice::Provided(cache) => Some(cache),
            CacheChoice::Disabled => None,
            CacheChoice::FromConfig if self.config.cache.enabled => Some(QueryCache::new(
                &self.config.cache,
                self.embedder.clone(),
            )),
            CacheChoice::FromConfig => None,
        };

        let channels = ChannelSet::new(
            self.embedder,
            self.vector_store,
            self.graph_store.clone(),
            &self.config.channels,
        );
        let booster = self.graph_store.map(CrossModalBooster::new);

        tracing::info!(
            vector = has_vector_path,
            graph = booster.is_some(),
            reranker = self.reranker.is_some(),
            cache = cache.is_some(),
            classifier = classifier.name(),
            "retrieval engine built"
        );

        Ok(RetrievalEngine {
            config: self.config,
            profiles,
            classifier,
            channels,
            booster,
            reranker: self.reranker,
            cache,
        })
    }
}
