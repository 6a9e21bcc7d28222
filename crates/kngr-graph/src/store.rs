//! The authoritative in-memory graph.
//!
//! [`GraphStore`] owns the [`KnowledgeGraph`] plus two lookup structures kept
//! in lockstep with it: a name -> position index over entities and the set of
//! relation triples. Every mutation validates its whole batch first, applies
//! it, then saves through the [`PersistenceManager`]. A failed save is logged
//! and kept in [`GraphStore::last_save_error`]; the in-memory state stays
//! authoritative and the mutation still returns its result.
//!
//! Mutations take `&mut self`. Callers sharing a store across threads wrap it
//! in a `Mutex`.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use kngr_config::KngrConfig;
use kngr_core::requests::{
    EntityInput, ObservationDeletion, ObservationInput, RelationInput, validate_all,
};
use kngr_core::responses::ObservationResult;
use kngr_core::{Entity, KnowledgeGraph, Relation};
use serde::Serialize;

use crate::classifier::ProjectClassifier;
use crate::diagram::DiagramReport;
use crate::error::GraphError;
use crate::path::{PathHints, PathResolver, ResolvedPath};
use crate::persistence::PersistenceManager;
use crate::query::QueryEngine;

/// Where a store built from configuration keeps its files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreLocation {
    pub resolved: ResolvedPath,
    /// Root scanned by the classifier when the graph starts fresh.
    pub project_root: PathBuf,
    pub diagram_path: PathBuf,
    pub fallback_dir: PathBuf,
}

#[derive(Debug)]
pub struct GraphStore {
    graph: KnowledgeGraph,
    index: HashMap<String, usize>,
    relation_keys: HashSet<Relation>,
    persistence: PersistenceManager,
    last_save_error: Option<GraphError>,
}

impl GraphStore {
    /// Work out file locations from configuration and caller hints.
    ///
    /// A project root hint wins over `general.project_root`; without either
    /// the working directory is classified.
    #[must_use]
    pub fn locate(config: &KngrConfig, hints: &PathHints) -> StoreLocation {
        let mut hints = hints.clone();
        if hints.project_root.is_none() {
            hints.project_root = config.general.project_root();
        }
        let resolved = PathResolver::new(&config.graph).resolve(&hints);
        let project_root = hints
            .project_root
            .or(hints.working_dir)
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));

        StoreLocation {
            diagram_path: crate::path::diagram_path(&resolved.path),
            resolved,
            project_root,
            fallback_dir: config.graph.fallback_dir(),
        }
    }

    /// Resolve locations and open the store there.
    #[must_use]
    pub fn from_config(config: &KngrConfig, hints: &PathHints) -> Self {
        let location = Self::locate(config, hints);
        let persistence = PersistenceManager::new(location.resolved.path, location.fallback_dir);
        Self::open(persistence, &ProjectClassifier::new(location.project_root))
    }

    /// Load the graph (or start fresh) and normalize it.
    #[must_use]
    pub fn open(mut persistence: PersistenceManager, classifier: &ProjectClassifier) -> Self {
        let loaded = persistence.load(classifier);
        let mut store = Self {
            graph: KnowledgeGraph::empty(loaded.project_type, loaded.project_metadata.clone()),
            index: HashMap::new(),
            relation_keys: HashSet::new(),
            persistence,
            last_save_error: None,
        };
        store.absorb(loaded);
        store
    }

    /// Rebuild the lookup structures from a parsed graph, restoring the
    /// invariants a hand-edited file may break.
    fn absorb(&mut self, loaded: KnowledgeGraph) {
        let (raw_entities, raw_relations) = (loaded.entities.len(), loaded.relations.len());
        let mut repairs = 0usize;

        for entity in loaded.entities {
            let observation_count = entity.observations.len();
            let (index, created) = self.upsert_entity(&entity.name, &entity.entity_type);
            let added = self.append_observations(index, &entity.observations).len();
            repairs += usize::from(!created) + (observation_count - added);
        }
        for relation in loaded.relations {
            let before = self.graph.entities.len();
            if !self.insert_relation(relation) {
                repairs += 1;
            }
            repairs += self.graph.entities.len() - before;
        }

        if repairs > 0 {
            tracing::warn!(
                path = %self.persistence.path().display(),
                repairs,
                entities = raw_entities,
                relations = raw_relations,
                "normalized inconsistent graph file"
            );
        }
    }

    /// Create entities. Existing names are updated (type replaced, new
    /// observations appended) and left out of the result.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Core`] if any item lacks a name or type; nothing
    /// is applied in that case.
    pub fn create_entities(&mut self, inputs: &[EntityInput]) -> Result<Vec<Entity>, GraphError> {
        validate_all(inputs)?;

        let mut created = Vec::new();
        for input in inputs {
            let (index, is_new) = self.upsert_entity(&input.name, &input.entity_type);
            self.append_observations(index, &input.observations);
            if is_new {
                created.push(index);
            }
        }

        let result = created
            .into_iter()
            .map(|index| self.graph.entities[index].clone())
            .collect();
        self.persist();
        Ok(result)
    }

    /// Create relations, auto-creating missing endpoints as `unknown`.
    /// Triples already present are skipped and left out of the result.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Core`] if any item lacks an endpoint or type.
    pub fn create_relations(
        &mut self,
        inputs: &[RelationInput],
    ) -> Result<Vec<Relation>, GraphError> {
        validate_all(inputs)?;

        let mut created = Vec::new();
        for input in inputs {
            let relation = input.to_relation();
            if self.insert_relation(relation.clone()) {
                created.push(relation);
            }
        }
        self.persist();
        Ok(created)
    }

    /// Append observations, creating missing entities as `unknown`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Core`] if any item lacks an entity name.
    pub fn add_observations(
        &mut self,
        inputs: &[ObservationInput],
    ) -> Result<Vec<ObservationResult>, GraphError> {
        validate_all(inputs)?;

        let mut results = Vec::with_capacity(inputs.len());
        for input in inputs {
            let index = self.ensure_entity(&input.entity_name);
            let added = self.append_observations(index, &input.contents);
            results.push(ObservationResult {
                entity_name: input.entity_name.clone(),
                added_observations: added,
            });
        }
        self.persist();
        Ok(results)
    }

    /// Remove entities and every relation touching them.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Core`] if any name is blank.
    pub fn delete_entities(&mut self, names: &[String]) -> Result<KnowledgeGraph, GraphError> {
        validate_all(names)?;

        let doomed: HashSet<&str> = names.iter().map(String::as_str).collect();
        let before = self.graph.entity_count();
        self.graph
            .entities
            .retain(|entity| !doomed.contains(entity.name.as_str()));
        if self.graph.entity_count() != before {
            self.graph.relations.retain(|relation| {
                !doomed.contains(relation.from_entity.as_str())
                    && !doomed.contains(relation.to_entity.as_str())
            });
            self.rebuild_lookups();
        }

        self.persist();
        Ok(self.read_graph())
    }

    /// Remove listed observations. Unknown entities are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Core`] if any item lacks an entity name.
    pub fn delete_observations(
        &mut self,
        deletions: &[ObservationDeletion],
    ) -> Result<KnowledgeGraph, GraphError> {
        validate_all(deletions)?;

        for deletion in deletions {
            let Some(&index) = self.index.get(&deletion.entity_name) else {
                tracing::debug!(entity = %deletion.entity_name, "observation deletion for unknown entity");
                continue;
            };
            self.graph.entities[index]
                .observations
                .retain(|observation| !deletion.observations.contains(observation));
        }

        self.persist();
        Ok(self.read_graph())
    }

    /// Remove exactly matching relation triples.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Core`] if any item lacks an endpoint or type.
    pub fn delete_relations(
        &mut self,
        inputs: &[RelationInput],
    ) -> Result<KnowledgeGraph, GraphError> {
        validate_all(inputs)?;

        let doomed: HashSet<Relation> = inputs.iter().map(RelationInput::to_relation).collect();
        self.graph
            .relations
            .retain(|relation| !doomed.contains(relation));
        self.relation_keys
            .retain(|relation| !doomed.contains(relation));

        self.persist();
        Ok(self.read_graph())
    }

    /// Snapshot of the current graph.
    #[must_use]
    pub fn read_graph(&self) -> KnowledgeGraph {
        self.graph.clone()
    }

    #[must_use]
    pub const fn graph(&self) -> &KnowledgeGraph {
        &self.graph
    }

    #[must_use]
    pub fn search_nodes(&self, query: &str) -> KnowledgeGraph {
        QueryEngine::new(&self.graph).search_nodes(query)
    }

    #[must_use]
    pub fn open_nodes<S: AsRef<str>>(&self, names: &[S]) -> KnowledgeGraph {
        QueryEngine::new(&self.graph).open_nodes(names)
    }

    /// Rewrite the diagram companion from the current state.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Io`] if the diagram cannot be written.
    pub fn regenerate_diagram(&mut self) -> Result<DiagramReport, GraphError> {
        self.persistence.write_diagram(&self.graph)
    }

    /// Current graph file path. Moves to the fallback directory after a
    /// failed directory creation.
    #[must_use]
    pub fn graph_path(&self) -> &Path {
        self.persistence.path()
    }

    /// The most recent save failure, cleared by the next successful save.
    #[must_use]
    pub const fn last_save_error(&self) -> Option<&GraphError> {
        self.last_save_error.as_ref()
    }

    fn persist(&mut self) {
        match self.persistence.save(&self.graph) {
            Ok(report) => {
                tracing::debug!(
                    path = %report.graph_path.display(),
                    entities = self.graph.entity_count(),
                    relations = self.graph.relation_count(),
                    "saved knowledge graph"
                );
                self.last_save_error = None;
            }
            Err(error) => {
                tracing::warn!(
                    path = %self.persistence.path().display(),
                    %error,
                    "failed to save knowledge graph, keeping in-memory state"
                );
                self.last_save_error = Some(error);
            }
        }
    }

    /// Insert or retype an entity. Returns its position and whether it is new.
    fn upsert_entity(&mut self, name: &str, entity_type: &str) -> (usize, bool) {
        if let Some(&index) = self.index.get(name) {
            entity_type.clone_into(&mut self.graph.entities[index].entity_type);
            return (index, false);
        }
        (self.push_entity(Entity::new(name, entity_type)), true)
    }

    fn ensure_entity(&mut self, name: &str) -> usize {
        match self.index.get(name) {
            Some(&index) => index,
            None => self.push_entity(Entity::unknown(name)),
        }
    }

    fn push_entity(&mut self, entity: Entity) -> usize {
        let index = self.graph.entities.len();
        self.index.insert(entity.name.clone(), index);
        self.graph.entities.push(entity);
        index
    }

    /// Append observations not yet present; returns the ones added.
    fn append_observations(&mut self, index: usize, observations: &[String]) -> Vec<String> {
        let entity = &mut self.graph.entities[index];
        observations
            .iter()
            .filter(|observation| entity.push_observation(observation))
            .cloned()
            .collect()
    }

    /// Add a relation (and missing endpoints). Returns false for a duplicate.
    fn insert_relation(&mut self, relation: Relation) -> bool {
        self.ensure_entity(&relation.from_entity);
        self.ensure_entity(&relation.to_entity);
        if self.relation_keys.contains(&relation) {
            return false;
        }
        self.relation_keys.insert(relation.clone());
        self.graph.relations.push(relation);
        true
    }

    fn rebuild_lookups(&mut self) {
        self.index = self
            .graph
            .entities
            .iter()
            .enumerate()
            .map(|(index, entity)| (entity.name.clone(), index))
            .collect();
        self.relation_keys = self.graph.relations.iter().cloned().collect();
    }
}
