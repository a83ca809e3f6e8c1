//! # braid-core
//!
//! Foundation crate for the braid retrieval-fusion core.
//! Defines the data model, collaborator traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::BraidConfig;
pub use errors::{BraidError, BraidResult};
pub use models::{
    CacheHitKind, Channel, FusedItem, FusionWeights, IntentClassification, RankedItem,
    RequestContext, SearchMetadata, SearchRequest, SearchResponse,
};
