//! # braid-fusion
//!
//! Pure rank-fusion functions. No I/O, no state.
//!
//! - [`rrf`]: unweighted Reciprocal Rank Fusion, `score = Σ 1/(k + rank)`.
//! - [`weighted_rrf`]: per-ranking weights, normalized to sum to 1.
//! - [`analyze_diversity`]: overlap statistics over the top-K of each ranking.

pub mod diversity;
pub mod rrf;

pub use diversity::analyze_diversity;
pub use rrf::{rrf, rrf_term, weighted_rrf};
