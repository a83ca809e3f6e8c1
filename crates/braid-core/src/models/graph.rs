//! Parameterized graph queries and the namespace scope every query must carry.

use serde_json::Value;

use crate::constants::PARAM_NAMESPACES;
use crate::errors::GraphError;

/// A row returned by the graph store.
pub type GraphRecord = serde_json::Map<String, Value>;

/// Stable identity of each traversal this subsystem issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphQueryKind {
    /// Entities whose name contains any of `$terms`, with the chunks they are mentioned in.
    EntityMentionsByTerms,
    /// Communities of entities whose name contains any of `$terms`.
    CommunitiesByTerms,
    /// Chunks mentioned by member entities of `$community_ids`.
    CommunityMentions,
    /// Entities mentioned in `$chunk_ids`.
    EntitiesInChunks,
    /// Chunks mentioning any of `$entities`, excluding `$exclude_ids`.
    MentionsByEntities,
}

impl GraphQueryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GraphQueryKind::EntityMentionsByTerms => "entity_mentions_by_terms",
            GraphQueryKind::CommunitiesByTerms => "communities_by_terms",
            GraphQueryKind::CommunityMentions => "community_mentions",
            GraphQueryKind::EntitiesInChunks => "entities_in_chunks",
            GraphQueryKind::MentionsByEntities => "mentions_by_entities",
        }
    }
}

/// A named, parameterized read query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphQuery {
    pub kind: GraphQueryKind,
    pub text: &'static str,
}

/// Tenant scope for graph traversals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphScope {
    Namespaces(Vec<String>),
    /// Single-tenant mode. Only constructible when the caller opted in.
    Unscoped,
}

impl GraphScope {
    /// Build a scope from resolved namespaces. An empty list is only accepted
    /// when `allow_unscoped` is set.
    pub fn resolve(namespaces: &[String], allow_unscoped: bool) -> Result<Self, GraphError> {
        if namespaces.is_empty() {
            if allow_unscoped {
                return Ok(GraphScope::Unscoped);
            }
            return Err(GraphError::UnscopedQuery {
                query: "scope resolution".to_string(),
            });
        }
        Ok(GraphScope::Namespaces(namespaces.to_vec()))
    }

    pub fn namespaces(&self) -> &[String] {
        match self {
            GraphScope::Namespaces(ns) => ns,
            GraphScope::Unscoped => &[],
        }
    }

    /// Whether a record from `namespace_id` is visible under this scope.
    pub fn admits(&self, namespace_id: &str) -> bool {
        match self {
            GraphScope::Namespaces(ns) => ns.iter().any(|n| n == namespace_id),
            GraphScope::Unscoped => true,
        }
    }
}

/// Query parameters. Always carries `namespaces`: a list when scoped, `null` when unscoped.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphParams {
    values: serde_json::Map<String, Value>,
    unscoped: bool,
}

impl GraphParams {
    /// The only constructor: parameters start from a scope.
    pub fn scoped(scope: &GraphScope) -> Self {
        let mut values = serde_json::Map::new();
        let unscoped = match scope {
            GraphScope::Namespaces(ns) => {
                values.insert(PARAM_NAMESPACES.to_string(), Value::from(ns.clone()));
                false
            }
            GraphScope::Unscoped => {
                values.insert(PARAM_NAMESPACES.to_string(), Value::Null);
                true
            }
        };
        Self { values, unscoped }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        if key != PARAM_NAMESPACES {
            self.values.insert(key.to_string(), value.into());
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn is_unscoped(&self) -> bool {
        self.unscoped
    }

    /// The namespace filter, or `None` in unscoped mode.
    pub fn namespaces(&self) -> Option<Vec<String>> {
        if self.unscoped {
            return None;
        }
        Some(self.strings(PARAM_NAMESPACES))
    }

    /// Read a parameter as a list of strings.
    pub fn strings(&self, key: &str) -> Vec<String> {
        self.values
            .get(key)
            .and_then(Value::as_array)
            .map(|values| {
                values
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn as_map(&self) -> &serde_json::Map<String, Value> {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_namespaces_rejected_unless_opted_in() {
        assert!(GraphScope::resolve(&[], false).is_err());
        assert_eq!(GraphScope::resolve(&[], true).unwrap(), GraphScope::Unscoped);
        let scope = GraphScope::resolve(&["acme".to_string()], false).unwrap();
        assert!(scope.admits("acme"));
        assert!(!scope.admits("globex"));
    }

    #[test]
    fn params_always_carry_namespaces() {
        let scope = GraphScope::Namespaces(vec!["a".into(), "b".into()]);
        let params = GraphParams::scoped(&scope).with("terms", vec!["etcd"]);
        assert_eq!(params.namespaces(), Some(vec!["a".to_string(), "b".to_string()]));
        assert_eq!(params.strings("terms"), vec!["etcd"]);

        let unscoped = GraphParams::scoped(&GraphScope::Unscoped);
        assert!(unscoped.is_unscoped());
        assert_eq!(unscoped.namespaces(), None);
        assert_eq!(unscoped.get(PARAM_NAMESPACES), Some(&Value::Null));
    }

    #[test]
    fn namespaces_cannot_be_overwritten() {
        let scope = GraphScope::Namespaces(vec!["a".into()]);
        let params = GraphParams::scoped(&scope).with(PARAM_NAMESPACES, Value::Null);
        assert_eq!(params.namespaces(), Some(vec!["a".to_string()]));
    }
}
