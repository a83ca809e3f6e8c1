//! Query term extraction for graph matching.

/// Words that never identify an entity.
const STOP_WORDS: &[&str] = &[
    "a", "about", "all", "also", "an", "and", "any", "are", "as", "at", "be", "been", "between",
    "but", "by", "can", "could", "did", "do", "does", "for", "from", "had", "has", "have", "how",
    "i", "if", "in", "into", "is", "it", "its", "me", "more", "most", "my", "of", "on", "or",
    "our", "should", "so", "some", "tell", "than", "that", "the", "their", "them", "then",
    "there", "these", "they", "this", "to", "us", "was", "we", "were", "what", "when", "where",
    "which", "who", "whom", "why", "will", "with", "would", "you", "your",
];

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.binary_search(&word).is_ok()
}

/// Lowercased, deduplicated (first occurrence kept) terms with stop words and
/// single characters removed. Hyphens and underscores stay inside terms so
/// names like `kube-scheduler` survive.
pub fn extract_terms(query: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for raw in query.split(|c: char| !(c.is_alphanumeric() || c == '-' || c == '_')) {
        let term = raw.trim_matches(|c| c == '-' || c == '_').to_lowercase();
        if term.chars().count() < 2 || is_stop_word(&term) || terms.contains(&term) {
            continue;
        }
        terms.push(term);
    }
    terms
}
