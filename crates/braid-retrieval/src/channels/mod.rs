//! Retrieval channels.
//!
//! The channel set is closed: [`ChannelAdapter`] is an enum over the four
//! adapters, each normalizing its backend's rows into [`RankedItem`]s with
//! contiguous 1-indexed ranks. Adapters hold only shared read-only client
//! handles, so one [`ChannelSet`] serves concurrent requests.

mod entity_expansion;
mod graph_global;
mod graph_local;
mod multi_vector;
pub mod queries;
pub(crate) mod records;

use std::sync::Arc;

use braid_core::config::ChannelsConfig;
use braid_core::errors::{BraidError, ChannelError};
use braid_core::models::{Channel, GraphScope, RankedItem};
use braid_core::traits::{IEmbeddingProvider, IGraphStore, IVectorStore};

pub use entity_expansion::EntityExpansionChannel;
pub use graph_global::GraphGlobalChannel;
pub use graph_local::GraphLocalChannel;
pub use multi_vector::MultiVectorChannel;

/// Input shared by every adapter.
#[derive(Debug, Clone, Copy)]
pub struct ChannelQuery<'a> {
    pub text: &'a str,
    /// How many items the channel should return at most.
    pub top_k: usize,
    pub scope: &'a GraphScope,
    /// MultiVector result ids, best first. Only EntityExpansion reads these.
    pub anchors: &'a [String],
}

impl<'a> ChannelQuery<'a> {
    pub fn new(text: &'a str, top_k: usize, scope: &'a GraphScope) -> Self {
        Self {
            text,
            top_k,
            scope,
            anchors: &[],
        }
    }

    pub fn with_anchors(mut self, anchors: &'a [String]) -> Self {
        self.anchors = anchors;
        self
    }
}

/// One of the four retrieval channels.
pub enum ChannelAdapter {
    MultiVector(MultiVectorChannel),
    GraphLocal(GraphLocalChannel),
    GraphGlobal(GraphGlobalChannel),
    EntityExpansion(EntityExpansionChannel),
}

impl ChannelAdapter {
    pub fn channel(&self) -> Channel {
        match self {
            ChannelAdapter::MultiVector(_) => Channel::MultiVector,
            ChannelAdapter::GraphLocal(_) => Channel::GraphLocal,
            ChannelAdapter::GraphGlobal(_) => Channel::GraphGlobal,
            ChannelAdapter::EntityExpansion(_) => Channel::EntityExpansion,
        }
    }

    /// Run the channel. Items come back ranked `1..=n`, `n <= query.top_k`.
    pub async fn search(&self, query: &ChannelQuery<'_>) -> Result<Vec<RankedItem>, ChannelError> {
        match self {
            ChannelAdapter::MultiVector(c) => c.search(query).await,
            ChannelAdapter::GraphLocal(c) => c.search(query).await,
            ChannelAdapter::GraphGlobal(c) => c.search(query).await,
            ChannelAdapter::EntityExpansion(c) => c.search(query).await,
        }
    }
}

/// The adapters a deployment can run, given its collaborators.
pub struct ChannelSet {
    multi_vector: Option<ChannelAdapter>,
    graph_local: Option<ChannelAdapter>,
    graph_global: Option<ChannelAdapter>,
    entity_expansion: Option<ChannelAdapter>,
}

impl ChannelSet {
    /// MultiVector needs an embedder and a vector store; the graph channels need a graph store.
    pub fn new(
        embedder: Option<Arc<dyn IEmbeddingProvider>>,
        vector_store: Option<Arc<dyn IVectorStore>>,
        graph_store: Option<Arc<dyn IGraphStore>>,
        config: &ChannelsConfig,
    ) -> Self {
        let multi_vector = match (embedder, vector_store) {
            (Some(embedder), Some(store)) => Some(ChannelAdapter::MultiVector(
                MultiVectorChannel::new(embedder, store),
            )),
            _ => None,
        };
        let graph_local = graph_store
            .clone()
            .map(|g| ChannelAdapter::GraphLocal(GraphLocalChannel::new(g)));
        let graph_global = graph_store.clone().map(|g| {
            ChannelAdapter::GraphGlobal(GraphGlobalChannel::new(
                g,
                config.graph_global_max_communities,
            ))
        });
        let entity_expansion = graph_store.map(|g| {
            ChannelAdapter::EntityExpansion(EntityExpansionChannel::new(
                g,
                config.entity_expansion_anchor_count,
            ))
        });
        Self {
            multi_vector,
            graph_local,
            graph_global,
            entity_expansion,
        }
    }

    pub fn get(&self, channel: Channel) -> Option<&ChannelAdapter> {
        match channel {
            Channel::MultiVector => self.multi_vector.as_ref(),
            Channel::GraphLocal => self.graph_local.as_ref(),
            Channel::GraphGlobal => self.graph_global.as_ref(),
            Channel::EntityExpansion => self.entity_expansion.as_ref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        Channel::ALL.iter().all(|c| self.get(*c).is_none())
    }
}

/// Wrap a collaborator failure with the channel it broke.
pub(crate) fn backend_error(channel: Channel, err: BraidError) -> ChannelError {
    match err {
        BraidError::ChannelError(inner) => inner,
        other => ChannelError::BackendUnavailable {
            channel,
            reason: other.to_string(),
        },
    }
}
