//! Test fixtures for braid: a golden-corpus loader and in-memory fakes of every
//! collaborator trait (embedder, vector store, graph store, classifier, reranker).
//!
//! Fakes can be told to fail or to stall, which is how the orchestrator's
//! failure isolation and cancellation paths are exercised.

pub mod classifier;
pub mod corpus;
pub mod embedder;
pub mod graph_store;
pub mod reranker;
pub mod vector_store;

use serde::de::DeserializeOwned;
use std::path::PathBuf;

pub use classifier::{FailingClassifier, FixedClassifier};
pub use corpus::{CorpusChunk, CorpusEntity, GoldenCorpus};
pub use embedder::{hash_embedding, FailingEmbedder, StaticEmbedder};
pub use graph_store::{GraphCall, InMemoryGraphStore};
pub use reranker::{FailingReranker, KeywordReranker, ScriptedReranker};
pub use vector_store::InMemoryVectorStore;

/// Root directory of the fixtures (`crates/test-fixtures`).
fn fixtures_root() -> PathBuf {
    // Works from any crate in the workspace: walk up to find test-fixtures.
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let mut path = PathBuf::from(&manifest_dir);

    if path.ends_with("test-fixtures") {
        return path;
    }
    while !path.join("test-fixtures").exists() {
        if !path.pop() {
            panic!(
                "Could not find test-fixtures directory from CARGO_MANIFEST_DIR={}",
                manifest_dir
            );
        }
    }
    path.join("test-fixtures")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Load a fixture file as raw JSON Value.
pub fn load_fixture_value(relative_path: &str) -> serde_json::Value {
    load_fixture(relative_path)
}

/// Check that a fixture file exists.
pub fn fixture_exists(relative_path: &str) -> bool {
    fixtures_root().join(relative_path).exists()
}

/// Shorthand for namespace lists in tests.
pub fn ns(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures_root_exists() {
        assert!(fixtures_root().join("golden").exists(), "golden directory not found");
    }

    #[test]
    fn golden_corpus_parses() {
        assert!(fixture_exists("golden/corpus_basic.json"));
        let value = load_fixture_value("golden/corpus_basic.json");
        assert_eq!(value["chunks"].as_array().unwrap().len(), 7);
        assert_eq!(value["entities"].as_array().unwrap().len(), 7);
    }
}
