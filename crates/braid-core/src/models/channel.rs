use std::fmt;

use serde::{Deserialize, Serialize};

/// The closed set of retrieval channels.
///
/// Declaration order is the canonical execution order: fusion visits rankings
/// in this order, so the first channel to produce an id supplies its display fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// Dense and/or sparse vector similarity.
    MultiVector,
    /// Entity term match → mentioned-in → chunk.
    GraphLocal,
    /// Community match → member entities → chunk.
    GraphGlobal,
    /// Entities of MultiVector anchors → other chunks mentioning them.
    EntityExpansion,
}

impl Channel {
    pub const ALL: [Channel; 4] = [
        Channel::MultiVector,
        Channel::GraphLocal,
        Channel::GraphGlobal,
        Channel::EntityExpansion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::MultiVector => "multi_vector",
            Channel::GraphLocal => "graph_local",
            Channel::GraphGlobal => "graph_global",
            Channel::EntityExpansion => "entity_expansion",
        }
    }

    /// Whether the channel reads from the graph store.
    pub fn is_graph(&self) -> bool {
        !matches!(self, Channel::MultiVector)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
