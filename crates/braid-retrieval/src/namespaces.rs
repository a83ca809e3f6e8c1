//! Namespace resolution at the request boundary.

use braid_core::config::{ChannelsConfig, RetrievalConfig};
use braid_core::errors::{BraidError, BraidResult};
use braid_core::models::GraphScope;

/// Trim, drop empties, dedup and sort. An empty request falls back to
/// `default_namespaces`.
pub fn resolve_namespaces(requested: &[String], config: &RetrievalConfig) -> Vec<String> {
    let mut resolved = normalize(requested);
    if resolved.is_empty() {
        resolved = normalize(&config.default_namespaces);
    }
    resolved
}

/// Build the per-request graph scope. Unscoped requests are rejected unless
/// the deployment opted into single-tenant mode.
pub fn request_scope(namespaces: &[String], channels: &ChannelsConfig) -> BraidResult<GraphScope> {
    GraphScope::resolve(namespaces, channels.allow_unscoped_graph).map_err(|_| {
        BraidError::invalid_request(
            "no namespaces given and no defaults configured; unscoped search is disabled",
        )
    })
}

fn normalize(namespaces: &[String]) -> Vec<String> {
    let mut out: Vec<String> = namespaces
        .iter()
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .collect();
    out.sort_unstable();
    out.dedup();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ns(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn normalizes_requested_namespaces() {
        let config = RetrievalConfig::default();
        assert_eq!(
            resolve_namespaces(&ns(&[" b", "a", "", "b "]), &config),
            ns(&["a", "b"])
        );
    }

    #[test]
    fn falls_back_to_defaults() {
        let config = RetrievalConfig {
            default_namespaces: ns(&["acme"]),
            ..RetrievalConfig::default()
        };
        assert_eq!(resolve_namespaces(&[], &config), ns(&["acme"]));
        assert_eq!(resolve_namespaces(&ns(&["  "]), &config), ns(&["acme"]));
    }

    #[test]
    fn unscoped_requires_opt_in() {
        let strict = ChannelsConfig::default();
        assert!(matches!(
            request_scope(&[], &strict),
            Err(BraidError::InvalidRequest { .. })
        ));
        let open = ChannelsConfig {
            allow_unscoped_graph: true,
            ..ChannelsConfig::default()
        };
        assert_eq!(request_scope(&[], &open).unwrap(), GraphScope::Unscoped);
    }
}
