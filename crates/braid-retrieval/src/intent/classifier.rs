use async_trait::async_trait;
use braid_core::constants::{METHOD_DEFAULT, METHOD_KEYWORD};
use braid_core::errors::BraidResult;
use braid_core::models::IntentClassification;
use braid_core::traits::IIntentClassifier;

use super::IntentProfiles;

/// Cue words per intent. Earlier entries win ties.
const KEYWORD_TABLE: &[(&str, &[&str])] = &[
    (
        "comparative",
        &["compare", "comparison", "versus", "vs", "difference", "differ", "better"],
    ),
    (
        "relational",
        &[
            "relationship", "related", "relate", "connected", "between", "depends", "link",
            "interact",
        ],
    ),
    (
        "thematic",
        &["themes", "overview", "summary", "summarize", "trends", "overall", "landscape"],
    ),
    (
        "factual",
        &["what", "who", "when", "where", "define", "definition", "which"],
    ),
    ("exploratory", &["explore", "how", "why", "ideas", "possibilities"]),
];

/// Keyword-scoring classifier used when no external classifier is configured.
///
/// Counts cue-word hits per intent. Confidence is `hits / (hits + 1)`. With no
/// hits, or when the winning intent has no profile, the default intent is used.
#[derive(Debug, Clone)]
pub struct KeywordIntentClassifier {
    profiles: IntentProfiles,
}

impl KeywordIntentClassifier {
    pub fn new(profiles: IntentProfiles) -> Self {
        Self { profiles }
    }

    /// Synchronous core of [`IIntentClassifier::classify`].
    pub fn classify_sync(&self, query: &str) -> IntentClassification {
        let lowered = query.to_lowercase();
        let words: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();

        let mut best: Option<(&str, usize)> = None;
        for &(intent, cues) in KEYWORD_TABLE {
            if !self.profiles.contains(intent) {
                continue;
            }
            let hits = words.iter().filter(|w| cues.contains(*w)).count();
            if hits > best.map_or(0, |(_, h)| h) {
                best = Some((intent, hits));
            }
        }

        match best {
            Some((intent, hits)) => {
                let weights = self
                    .profiles
                    .get(intent)
                    .unwrap_or_else(|| self.profiles.default_weights());
                IntentClassification::new(
                    intent,
                    weights,
                    hits as f64 / (hits as f64 + 1.0),
                    METHOD_KEYWORD,
                )
            }
            None => IntentClassification::new(
                self.profiles.default_intent(),
                self.profiles.default_weights(),
                0.0,
                METHOD_DEFAULT,
            ),
        }
    }
}

impl Default for KeywordIntentClassifier {
    fn default() -> Self {
        Self::new(IntentProfiles::default())
    }
}

#[async_trait]
impl IIntentClassifier for KeywordIntentClassifier {
    async fn classify(&self, query: &str) -> BraidResult<IntentClassification> {
        Ok(self.classify_sync(query))
    }

    fn name(&self) -> &str {
        "keyword"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use braid_core::models::FusionWeights;

    #[test]
    fn factual_question() {
        let c = KeywordIntentClassifier::default().classify_sync("What is etcd?");
        assert_eq!(c.intent, "factual");
        assert_eq!(c.method, "keyword");
        assert_eq!(c.weights, FusionWeights::new(0.7, 0.3, 0.0));
        assert!((c.confidence - 0.5).abs() < 1e-12);
    }

    #[test]
    fn more_hits_raise_confidence() {
        let c = KeywordIntentClassifier::default()
            .classify_sync("how is raft related to etcd and connected to the scheduler");
        assert_eq!(c.intent, "relational");
        assert!((c.confidence - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn ties_go_to_table_order() {
        // one comparative cue, one factual cue
        let c = KeywordIntentClassifier::default().classify_sync("which is better");
        assert_eq!(c.intent, "comparative");
    }

    #[test]
    fn no_hits_uses_default() {
        let c = KeywordIntentClassifier::default().classify_sync("kubernetes scheduler");
        assert_eq!(c.intent, "exploratory");
        assert_eq!(c.method, "default");
        assert_eq!(c.confidence, 0.0);
    }
}
