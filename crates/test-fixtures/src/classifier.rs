use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use braid_core::errors::{BraidResult, ClassifierError};
use braid_core::models::{FusionWeights, IntentClassification};
use braid_core::traits::IIntentClassifier;

/// Returns the same classification for every query.
#[derive(Debug)]
pub struct FixedClassifier {
    classification: IntentClassification,
    calls: AtomicUsize,
}

impl FixedClassifier {
    pub fn new(classification: IntentClassification) -> Self {
        Self {
            classification,
            calls: AtomicUsize::new(0),
        }
    }

    /// Shorthand: intent "fixed", confidence 1.0, method "fixed".
    pub fn weights(multi_vector: f64, graph_local: f64, graph_global: f64) -> Self {
        Self::new(IntentClassification::new(
            "fixed",
            FusionWeights::new(multi_vector, graph_local, graph_global),
            1.0,
            "fixed",
        ))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IIntentClassifier for FixedClassifier {
    async fn classify(&self, _query: &str) -> BraidResult<IntentClassification> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.classification.clone())
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

/// Always fails.
#[derive(Debug, Default)]
pub struct FailingClassifier;

#[async_trait]
impl IIntentClassifier for FailingClassifier {
    async fn classify(&self, _query: &str) -> BraidResult<IntentClassification> {
        Err(ClassifierError::Unavailable {
            reason: "classifier offline".to_string(),
        }
        .into())
    }

    fn name(&self) -> &str {
        "failing"
    }
}
