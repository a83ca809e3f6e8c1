use serde::Deserialize;

use crate::load_fixture;

/// A chunk and the entity names it mentions.
#[derive(Debug, Clone, Deserialize)]
pub struct CorpusChunk {
    pub id: String,
    pub text: String,
    pub document_id: String,
    pub namespace_id: String,
    #[serde(default)]
    pub entities: Vec<String>,
}

/// An entity, unique by (name, namespace).
#[derive(Debug, Clone, Deserialize)]
pub struct CorpusEntity {
    pub name: String,
    pub namespace_id: String,
    pub community_id: String,
}

/// Chunks, entities, and mentioned-in edges backing the in-memory stores.
#[derive(Debug, Clone, Deserialize)]
pub struct GoldenCorpus {
    #[serde(default)]
    pub description: String,
    pub chunks: Vec<CorpusChunk>,
    pub entities: Vec<CorpusEntity>,
}

impl GoldenCorpus {
    /// The two-tenant Kubernetes corpus in `golden/corpus_basic.json`.
    pub fn basic() -> Self {
        load_fixture("golden/corpus_basic.json")
    }

    pub fn chunk(&self, id: &str) -> Option<&CorpusChunk> {
        self.chunks.iter().find(|c| c.id == id)
    }

    pub fn entity(&self, name: &str, namespace_id: &str) -> Option<&CorpusEntity> {
        self.entities
            .iter()
            .find(|e| e.name == name && e.namespace_id == namespace_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_mention_resolves_to_an_entity() {
        let corpus = GoldenCorpus::basic();
        for chunk in &corpus.chunks {
            for name in &chunk.entities {
                assert!(
                    corpus.entity(name, &chunk.namespace_id).is_some(),
                    "{} mentions unknown entity {name}",
                    chunk.id
                );
            }
        }
    }
}
