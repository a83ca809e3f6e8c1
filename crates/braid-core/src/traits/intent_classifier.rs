use async_trait::async_trait;

use crate::errors::BraidResult;
use crate::models::IntentClassification;

/// Maps a query to a named intent and its channel weights.
#[async_trait]
pub trait IIntentClassifier: Send + Sync {
    async fn classify(&self, query: &str) -> BraidResult<IntentClassification>;

    fn name(&self) -> &str;
}
