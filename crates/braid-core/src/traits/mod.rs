//! Collaborator contracts. Backends live outside this workspace and are
//! injected as `Arc<dyn Trait>` handles.

mod embedding;
mod graph_store;
mod intent_classifier;
mod reranker;
mod vector_store;

pub use embedding::IEmbeddingProvider;
pub use graph_store::IGraphStore;
pub use intent_classifier::IIntentClassifier;
pub use reranker::IReranker;
pub use vector_store::IVectorStore;
