//! Read queries issued against the entity graph. Every query filters on `$namespaces`;
//! a `null` list is only sent in single-tenant mode.

use braid_core::models::{GraphQuery, GraphQueryKind};

/// Entities whose name contains any of `$terms`, with the chunks that mention them.
pub const ENTITY_MENTIONS_BY_TERMS: GraphQuery = GraphQuery {
    kind: GraphQueryKind::EntityMentionsByTerms,
    text: "MATCH (e:Entity)-[:MENTIONED_IN]->(c:Chunk) \
           WHERE any(t IN $terms WHERE toLower(e.name) CONTAINS t) \
             AND ($namespaces IS NULL OR (e.namespace_id IN $namespaces AND c.namespace_id IN $namespaces)) \
           RETURN e.name AS entity, c.id AS chunk_id, c.text AS text, \
                  c.document_id AS document_id, c.namespace_id AS namespace_id",
};

/// Communities ranked by how many member entities match `$terms`, best `$limit`.
pub const COMMUNITIES_BY_TERMS: GraphQuery = GraphQuery {
    kind: GraphQueryKind::CommunitiesByTerms,
    text: "MATCH (e:Entity)-[:IN_COMMUNITY]->(m:Community) \
           WHERE any(t IN $terms WHERE toLower(e.name) CONTAINS t) \
             AND ($namespaces IS NULL OR e.namespace_id IN $namespaces) \
           WITH m, count(DISTINCT e) AS score \
           RETURN m.id AS community_id, score \
           ORDER BY score DESC, community_id ASC LIMIT $limit",
};

/// Chunks mentioned by members of `$community_ids`.
pub const COMMUNITY_MENTIONS: GraphQuery = GraphQuery {
    kind: GraphQueryKind::CommunityMentions,
    text: "MATCH (m:Community)<-[:IN_COMMUNITY]-(e:Entity)-[:MENTIONED_IN]->(c:Chunk) \
           WHERE m.id IN $community_ids \
             AND ($namespaces IS NULL OR (e.namespace_id IN $namespaces AND c.namespace_id IN $namespaces)) \
           RETURN m.id AS community_id, e.name AS entity, c.id AS chunk_id, c.text AS text, \
                  c.document_id AS document_id, c.namespace_id AS namespace_id",
};

/// Entities mentioned in `$chunk_ids`.
pub const ENTITIES_IN_CHUNKS: GraphQuery = GraphQuery {
    kind: GraphQueryKind::EntitiesInChunks,
    text: "MATCH (e:Entity)-[:MENTIONED_IN]->(c:Chunk) \
           WHERE c.id IN $chunk_ids \
             AND ($namespaces IS NULL OR c.namespace_id IN $namespaces) \
           RETURN e.name AS entity, c.id AS chunk_id",
};

/// Chunks mentioning any of `$entities`, minus `$exclude_ids`.
pub const MENTIONS_BY_ENTITIES: GraphQuery = GraphQuery {
    kind: GraphQueryKind::MentionsByEntities,
    text: "MATCH (e:Entity)-[:MENTIONED_IN]->(c:Chunk) \
           WHERE e.name IN $entities AND NOT c.id IN $exclude_ids \
             AND ($namespaces IS NULL OR (e.namespace_id IN $namespaces AND c.namespace_id IN $namespaces)) \
           RETURN e.name AS entity, c.id AS chunk_id, c.text AS text, \
                  c.document_id AS document_id, c.namespace_id AS namespace_id",
};
