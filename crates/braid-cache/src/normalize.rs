use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\s+").ok());
static PUNCTUATION: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"[^\w\s?]").ok());

/// Lowercase, collapse whitespace runs, strip punctuation except `?`, trim.
pub fn normalize_query(query: &str) -> String {
    let lowered = query.to_lowercase();
    let collapsed = match WHITESPACE.as_ref() {
        Some(re) => re.replace_all(&lowered, " ").into_owned(),
        None => lowered.split_whitespace().collect::<Vec<_>>().join(" "),
    };
    let stripped = match PUNCTUATION.as_ref() {
        Some(re) => re.replace_all(&collapsed, "").into_owned(),
        None => collapsed
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace() || *c == '?')
            .collect(),
    };
    stripped.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_whitespace_and_punctuation_collapse() {
        assert_eq!(
            normalize_query("  What   IS\tetcd?! "),
            normalize_query("what is etcd?")
        );
        assert_eq!(normalize_query("What is Etcd?"), "what is etcd?");
    }

    #[test]
    fn question_mark_is_kept() {
        assert_ne!(normalize_query("raft?"), normalize_query("raft"));
    }

    #[test]
    fn punctuation_only_query_is_empty() {
        assert_eq!(normalize_query(" ...!!! "), "");
    }
}
