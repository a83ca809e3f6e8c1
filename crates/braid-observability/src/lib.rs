//! # braid-observability
//!
//! Tracing subscriber setup, span macros, and structured event helpers for
//! the retrieval pipeline. Query text only ever appears as a bounded prefix.

pub mod redact;
pub mod timer;
pub mod tracing_setup;

pub use redact::query_prefix;
pub use timer::StageTimer;
pub use tracing_setup::{events, init_tracing, init_tracing_with_filter, spans};
