//! # braid-retrieval
//!
//! The online query path:
//! `query → cache lookup → classify → channel fan-out → fuse → boost → rerank → cache populate`.
//!
//! - [`channels`]: the four retrieval channels behind one closed enum.
//! - [`boost`]: cross-modal entity boost over the fused list.
//! - [`intent`]: intent profiles and the built-in keyword classifier.
//! - [`engine`]: the [`RetrievalEngine`] orchestrator and its builder.

pub mod boost;
pub mod channels;
pub mod engine;
pub mod intent;
pub mod namespaces;
pub mod rerank;
pub mod terms;

pub use boost::{BoostOutcome, CrossModalBooster};
pub use channels::{ChannelAdapter, ChannelQuery, ChannelSet};
pub use engine::{RetrievalEngine, RetrievalEngineBuilder};
pub use intent::{IntentProfiles, KeywordIntentClassifier};
