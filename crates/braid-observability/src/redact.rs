use braid_core::constants::QUERY_LOG_PREFIX_CHARS;

/// The loggable prefix of a query: at most `QUERY_LOG_PREFIX_CHARS` characters,
/// cut on a char boundary.
pub fn query_prefix(query: &str) -> String {
    match query.char_indices().nth(QUERY_LOG_PREFIX_CHARS) {
        Some((cut, _)) => format!("{}…", &query[..cut]),
        None => query.to_string(),
    }
}
