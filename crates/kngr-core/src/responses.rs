//! Response records returned by graph operations.
//!
//! Operations that return entities, relations, or whole graphs reuse the
//! persisted model types from [`crate::graph`]; only shapes without a model
//! counterpart live here.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Result item from `add_observations`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ObservationResult {
    #[serde(rename = "entityName")]
    pub entity_name: String,
    #[serde(rename = "addedObservations")]
    pub added_observations: Vec<String>,
}
