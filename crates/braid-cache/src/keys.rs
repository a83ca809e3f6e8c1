/// Canonical namespace-set key: sorted, deduplicated, comma-joined.
///
/// `["b", "a"]` and `["a", "b", "a"]` produce the same key.
pub fn namespace_key(namespaces: &[String]) -> String {
    let mut sorted: Vec<&str> = namespaces.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    sorted.dedup();
    sorted.join(",")
}

/// The slice of the cache one request reads and writes: its namespace set,
/// plus the intent profile when the caller pinned one. Answers computed under
/// different weights never share an entry.
#[derive(Debug, Clone, Copy)]
pub struct CacheScope<'a> {
    namespaces: &'a [String],
    intent: Option<&'a str>,
}

impl<'a> CacheScope<'a> {
    pub fn new(namespaces: &'a [String]) -> Self {
        Self {
            namespaces,
            intent: None,
        }
    }

    pub fn with_intent(mut self, intent: Option<&'a str>) -> Self {
        self.intent = intent;
        self
    }

    /// [`namespace_key`], suffixed with `#intent=<name>` for a pinned intent.
    pub fn key(&self) -> String {
        let ns_key = namespace_key(self.namespaces);
        match self.intent {
            Some(intent) => format!("{ns_key}#intent={intent}"),
            None => ns_key,
        }
    }
}

impl<'a> From<&'a [String]> for CacheScope<'a> {
    fn from(namespaces: &'a [String]) -> Self {
        Self::new(namespaces)
    }
}

impl<'a> From<&'a Vec<String>> for CacheScope<'a> {
    fn from(namespaces: &'a Vec<String>) -> Self {
        Self::new(namespaces)
    }
}

/// Exact-tier key: blake3 over the scope key and the normalized query.
pub fn exact_key(normalized_query: &str, scope_key: &str) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(scope_key.as_bytes());
    hasher.update(&[0]);
    hasher.update(normalized_query.as_bytes());
    hasher.finalize().to_hex().to_string()
}
