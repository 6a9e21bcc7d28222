//! Persisted knowledge graph model.
//!
//! These structs define the exact JSON shape of the graph file:
//!
//! ```json
//! {
//!   "entities": [{"name": "...", "entity_type": "...", "observations": ["..."]}],
//!   "relations": [{"from_entity": "...", "to_entity": "...", "relation_type": "..."}],
//!   "project_type": "software",
//!   "project_metadata": {"has_rust": true, "software_score": 1}
//! }
//! ```
//!
//! `entities` and `relations` are required keys; a file missing either is
//! treated as structurally invalid by the loader. `project_type` and
//! `project_metadata` default to `generic` and `{}`.

use std::collections::BTreeMap;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::ProjectType;

/// Entity type assigned to entities created implicitly (relation endpoints,
/// observation targets).
pub const UNKNOWN_ENTITY_TYPE: &str = "unknown";

/// A named, typed node with an ordered, duplicate-free list of observations.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Entity {
    pub name: String,
    pub entity_type: String,
    #[serde(default)]
    pub observations: Vec<String>,
}

impl Entity {
    #[must_use]
    pub fn new(name: impl Into<String>, entity_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entity_type: entity_type.into(),
            observations: Vec::new(),
        }
    }

    /// Placeholder entity for a name referenced before it was created.
    #[must_use]
    pub fn unknown(name: impl Into<String>) -> Self {
        Self::new(name, UNKNOWN_ENTITY_TYPE)
    }

    /// Append `observation` unless it is already present. Returns whether it was added.
    pub fn push_observation(&mut self, observation: &str) -> bool {
        if self.observations.iter().any(|existing| existing == observation) {
            return false;
        }
        self.observations.push(observation.to_string());
        true
    }
}

/// A directed, typed edge. The `(from, to, type)` triple is unique within a graph.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
pub struct Relation {
    pub from_entity: String,
    pub to_entity: String,
    pub relation_type: String,
}

impl Relation {
    #[must_use]
    pub fn new(
        from_entity: impl Into<String>,
        to_entity: impl Into<String>,
        relation_type: impl Into<String>,
    ) -> Self {
        Self {
            from_entity: from_entity.into(),
            to_entity: to_entity.into(),
            relation_type: relation_type.into(),
        }
    }
}

/// A single project metadata value: an indicator flag or a count.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(untagged)]
pub enum MetadataValue {
    Flag(bool),
    Count(i64),
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(value) => write!(f, "{value}"),
            Self::Count(value) => write!(f, "{value}"),
        }
    }
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        Self::Count(value)
    }
}

/// Project metadata recorded at classification time.
pub type ProjectMetadata = BTreeMap<String, MetadataValue>;

/// The whole graph as persisted and as returned by read operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct KnowledgeGraph {
    pub entities: Vec<Entity>,
    pub relations: Vec<Relation>,
    #[serde(default)]
    pub project_type: ProjectType,
    #[serde(default)]
    pub project_metadata: ProjectMetadata,
}

impl KnowledgeGraph {
    /// Empty graph tagged with a classification.
    #[must_use]
    pub const fn empty(project_type: ProjectType, project_metadata: ProjectMetadata) -> Self {
        Self {
            entities: Vec::new(),
            relations: Vec::new(),
            project_type,
            project_metadata,
        }
    }

    #[must_use]
    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.name == name)
    }

    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn relation_count(&self) -> usize {
        self.relations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.relations.is_empty()
    }
}
