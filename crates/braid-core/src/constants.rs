// Keys and limits shared between channel adapters, the booster, and the orchestrator.

/// `channelMetadata` key: entity names a GraphLocal chunk matched, best first.
pub const META_MATCHED_ENTITIES: &str = "matched_entities";

/// `channelMetadata` key: community a GraphGlobal chunk was expanded from.
pub const META_COMMUNITY_ID: &str = "community_id";

/// `channelMetadata` key: entities of the chosen communities that mention a GraphGlobal chunk.
pub const META_CONTRIBUTING_ENTITIES: &str = "contributing_entities";

/// `channelMetadata` key: entities an EntityExpansion chunk shares with the anchors.
pub const META_SHARED_ENTITIES: &str = "shared_entities";

/// `channelMetadata` key: number of anchors an EntityExpansion run started from.
pub const META_ANCHOR_COUNT: &str = "anchor_count";

/// `channelMetadata` key: which MultiVector path produced the item.
pub const META_RETRIEVAL_PATH: &str = "retrieval_path";

/// MultiVector path values.
pub const PATH_HYBRID: &str = "hybrid";
pub const PATH_DENSE: &str = "dense";
pub const PATH_SPARSE: &str = "sparse";
pub const PATH_DENSE_LEGACY: &str = "dense_legacy";

/// Graph query parameter carrying the namespace filter.
pub const PARAM_NAMESPACES: &str = "namespaces";

/// Number of query characters that may appear in logs and metadata.
pub const QUERY_LOG_PREFIX_CHARS: usize = 64;

/// Upper bound on `top_k` accepted at the orchestration boundary.
pub const MAX_TOP_K: usize = 1_000;

/// Classification method labels.
pub const METHOD_OVERRIDE: &str = "override";
pub const METHOD_FALLBACK: &str = "fallback";
pub const METHOD_KEYWORD: &str = "keyword";
pub const METHOD_DEFAULT: &str = "default";
