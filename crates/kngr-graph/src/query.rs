//! Read-only subgraph views.

use std::collections::HashSet;

use kngr_core::{Entity, KnowledgeGraph, Relation};

/// Derives induced subgraphs from a graph without touching it.
///
/// Results carry the source graph's project type and metadata so they
/// serialize in the same shape as a full read.
#[derive(Debug, Clone, Copy)]
pub struct QueryEngine<'a> {
    graph: &'a KnowledgeGraph,
}

impl<'a> QueryEngine<'a> {
    #[must_use]
    pub const fn new(graph: &'a KnowledgeGraph) -> Self {
        Self { graph }
    }

    /// Entities whose name, type, or any observation contains `query`
    /// (case-insensitive), plus relations with at least one matching endpoint.
    #[must_use]
    pub fn search_nodes(&self, query: &str) -> KnowledgeGraph {
        let needle = query.to_lowercase();
        let entities: Vec<Entity> = self
            .graph
            .entities
            .iter()
            .filter(|entity| entity_matches(entity, &needle))
            .cloned()
            .collect();

        let names: HashSet<&str> = entities.iter().map(|e| e.name.as_str()).collect();
        let relations = self.relations_where(|relation| {
            names.contains(relation.from_entity.as_str()) || names.contains(relation.to_entity.as_str())
        });

        tracing::debug!(
            query,
            entities = entities.len(),
            relations = relations.len(),
            "searched graph"
        );
        self.subgraph(entities, relations)
    }

    /// Entities named exactly in `names`, plus relations with both endpoints
    /// in `names`. Unknown names are ignored.
    #[must_use]
    pub fn open_nodes<S: AsRef<str>>(&self, names: &[S]) -> KnowledgeGraph {
        let wanted: HashSet<&str> = names.iter().map(AsRef::as_ref).collect();
        let entities = self
            .graph
            .entities
            .iter()
            .filter(|entity| wanted.contains(entity.name.as_str()))
            .cloned()
            .collect();
        let relations = self.relations_where(|relation| {
            wanted.contains(relation.from_entity.as_str()) && wanted.contains(relation.to_entity.as_str())
        });
        self.subgraph(entities, relations)
    }

    fn relations_where(&self, keep: impl Fn(&Relation) -> bool) -> Vec<Relation> {
        self.graph
            .relations
            .iter()
            .filter(|relation| keep(relation))
            .cloned()
            .collect()
    }

    fn subgraph(&self, entities: Vec<Entity>, relations: Vec<Relation>) -> KnowledgeGraph {
        KnowledgeGraph {
            entities,
            relations,
            project_type: self.graph.project_type,
            project_metadata: self.graph.project_metadata.clone(),
        }
    }
}

fn entity_matches(entity: &Entity, needle: &str) -> bool {
    entity.name.to_lowercase().contains(needle)
        || entity.entity_type.to_lowercase().contains(needle)
        || entity
            .observations
            .iter()
            .any(|observation| observation.to_lowercase().contains(needle))
}
