//! # braid-cache
//!
//! Query result cache with two tiers, both scoped by the request's namespace set
//! (and its pinned intent, if any; see [`CacheScope`]):
//! - **Exact**: keyed by blake3 of the normalized query text.
//! - **Semantic**: on an exact miss, the query embedding is compared against
//!   cached query embeddings in the same namespace set; the best match at or
//!   above the similarity threshold wins.
//!
//! Both tiers are bounded (LRU) and time-expiring (TTL). Staleness is bounded
//! by TTL alone; there is no per-document invalidation.

pub mod entry;
pub mod exact;
pub mod keys;
pub mod normalize;
pub mod query_cache;
pub mod semantic;
pub mod stats;

pub use entry::CacheEntry;
pub use keys::{exact_key, namespace_key, CacheScope};
pub use normalize::normalize_query;
pub use query_cache::{CacheLookup, QueryCache};
pub use stats::CacheStats;
