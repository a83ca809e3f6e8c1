//! Intent profiles and the built-in keyword classifier.

mod classifier;
mod profiles;

pub use classifier::KeywordIntentClassifier;
pub use profiles::IntentProfiles;
