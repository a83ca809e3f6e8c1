//! Data model shared by every stage of the retrieval pipeline.

pub mod channel;
pub mod embedding;
pub mod fused_item;
pub mod fusion_weights;
pub mod graph;
pub mod intent;
pub mod ranked_item;
pub mod request;
pub mod rerank;
pub mod search_metadata;
pub mod vector;

pub use channel::Channel;
pub use embedding::{cosine_similarity, Embedding, SparseVector};
pub use fused_item::{compare_by_final_score, rank_by_final_score, ChannelContribution, FusedItem};
pub use fusion_weights::FusionWeights;
pub use graph::{GraphParams, GraphQuery, GraphQueryKind, GraphRecord, GraphScope};
pub use intent::IntentClassification;
pub use ranked_item::{assign_ranks, ranks_are_contiguous, ChannelMetadata, RankedItem};
pub use request::{RequestContext, SearchRequest, SearchResponse};
pub use rerank::RerankScore;
pub use search_metadata::{
    CacheHitKind, ChannelFailure, DiversityStats, SearchMetadata, SkipReason, SkippedChannel,
};
pub use vector::{VectorHit, VectorQuery};
