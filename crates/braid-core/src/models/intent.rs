use serde::{Deserialize, Serialize};

use super::FusionWeights;

/// Output of the intent classifier collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentClassification {
    pub intent: String,
    pub weights: FusionWeights,
    pub confidence: f64,
    /// How the intent was chosen, e.g. "keyword", "llm", "override", "fallback".
    pub method: String,
}

impl IntentClassification {
    pub fn new(
        intent: impl Into<String>,
        weights: FusionWeights,
        confidence: f64,
        method: impl Into<String>,
    ) -> Self {
        Self {
            intent: intent.into(),
            weights,
            confidence,
            method: method.into(),
        }
    }
}
