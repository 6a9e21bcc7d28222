//! Request records accepted by graph operations.
//!
//! Field names follow the tool-call convention (`entityType`, `relationType`,
//! `entityName`) with snake_case and short (`type`) aliases. Required fields
//! deserialize to empty strings when absent so that [`Validate`] can report
//! every problem as a [`CoreError::Validation`] instead of a serde error.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::graph::Relation;

/// Boundary validation for request records.
pub trait Validate {
    /// Record kind used in error messages (e.g. `entities`).
    const RECORD: &'static str;

    /// Check required fields of the item at `index` within its batch.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] naming the first missing field.
    fn validate(&self, index: usize) -> Result<(), CoreError>;
}

/// Validate a whole batch, failing on the first invalid item.
///
/// # Errors
///
/// Returns the first item's [`CoreError::Validation`].
pub fn validate_all<T: Validate>(items: &[T]) -> Result<(), CoreError> {
    items
        .iter()
        .enumerate()
        .try_for_each(|(index, item)| item.validate(index))
}

fn require(value: &str, record: &str, index: usize, field: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::missing_field(record, index, field));
    }
    Ok(())
}

/// Input for `create_entities`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct EntityInput {
    #[serde(default)]
    pub name: String,
    #[serde(
        default,
        rename = "entityType",
        alias = "entity_type",
        alias = "type"
    )]
    pub entity_type: String,
    #[serde(default)]
    pub observations: Vec<String>,
}

impl EntityInput {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        entity_type: impl Into<String>,
        observations: &[&str],
    ) -> Self {
        Self {
            name: name.into(),
            entity_type: entity_type.into(),
            observations: observations.iter().map(ToString::to_string).collect(),
        }
    }
}

impl Validate for EntityInput {
    const RECORD: &'static str = "entities";

    fn validate(&self, index: usize) -> Result<(), CoreError> {
        require(&self.name, Self::RECORD, index, "name")?;
        require(&self.entity_type, Self::RECORD, index, "entityType")
    }
}

/// Input for `create_relations` and `delete_relations`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RelationInput {
    #[serde(default, alias = "from_entity")]
    pub from: String,
    #[serde(default, alias = "to_entity")]
    pub to: String,
    #[serde(
        default,
        rename = "relationType",
        alias = "relation_type",
        alias = "type"
    )]
    pub relation_type: String,
}

impl RelationInput {
    #[must_use]
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        relation_type: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            relation_type: relation_type.into(),
        }
    }

    #[must_use]
    pub fn to_relation(&self) -> Relation {
        Relation::new(&self.from, &self.to, &self.relation_type)
    }
}

impl Validate for RelationInput {
    const RECORD: &'static str = "relations";

    fn validate(&self, index: usize) -> Result<(), CoreError> {
        require(&self.from, Self::RECORD, index, "from")?;
        require(&self.to, Self::RECORD, index, "to")?;
        require(&self.relation_type, Self::RECORD, index, "relationType")
    }
}

/// Input for `add_observations`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ObservationInput {
    #[serde(default, rename = "entityName", alias = "entity_name")]
    pub entity_name: String,
    #[serde(default)]
    pub contents: Vec<String>,
}

impl ObservationInput {
    #[must_use]
    pub fn new(entity_name: impl Into<String>, contents: &[&str]) -> Self {
        Self {
            entity_name: entity_name.into(),
            contents: contents.iter().map(ToString::to_string).collect(),
        }
    }
}

impl Validate for ObservationInput {
    const RECORD: &'static str = "observations";

    fn validate(&self, index: usize) -> Result<(), CoreError> {
        require(&self.entity_name, Self::RECORD, index, "entityName")
    }
}

/// Input for `delete_observations`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ObservationDeletion {
    #[serde(default, rename = "entityName", alias = "entity_name")]
    pub entity_name: String,
    #[serde(default)]
    pub observations: Vec<String>,
}

impl ObservationDeletion {
    #[must_use]
    pub fn new(entity_name: impl Into<String>, observations: &[&str]) -> Self {
        Self {
            entity_name: entity_name.into(),
            observations: observations.iter().map(ToString::to_string).collect(),
        }
    }
}

impl Validate for ObservationDeletion {
    const RECORD: &'static str = "deletions";

    fn validate(&self, index: usize) -> Result<(), CoreError> {
        require(&self.entity_name, Self::RECORD, index, "entityName")
    }
}

/// Entity names passed to `delete_entities` and `open_nodes`.
impl Validate for String {
    const RECORD: &'static str = "names";

    fn validate(&self, index: usize) -> Result<(), CoreError> {
        require(self, Self::RECORD, index, "name")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_input_accepts_aliases() {
        for payload in [
            r#"{"name": "Alice", "entityType": "person"}"#,
            r#"{"name": "Alice", "entity_type": "person"}"#,
            r#"{"name": "Alice", "type": "person"}"#,
        ] {
            let input: EntityInput = serde_json::from_str(payload).unwrap();
            assert_eq!(input.entity_type, "person");
            assert!(input.observations.is_empty());
        }
    }

    #[test]
    fn relation_input_accepts_persisted_field_names() {
        let input: RelationInput = serde_json::from_str(
            r#"{"from_entity": "Alice", "to_entity": "Bob", "relation_type": "knows"}"#,
        )
        .unwrap();
        assert_eq!(input.to_relation(), Relation::new("Alice", "Bob", "knows"));
    }

    #[test]
    fn missing_name_is_a_validation_error() {
        let input: EntityInput = serde_json::from_str(r#"{"entityType": "person"}"#).unwrap();
        let err = input.validate(3).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(
            err.to_string(),
            "Validation error: entities[3]: 'name' is required"
        );
    }

    #[test]
    fn blank_fields_are_rejected() {
        let input = RelationInput::new("Alice", "  ", "knows");
        assert!(input.validate(0).is_err());
    }

    #[test]
    fn validate_all_reports_first_invalid_item() {
        let batch = vec![
            ObservationInput::new("Alice", &["likes tea"]),
            ObservationInput::new("", &["orphan"]),
        ];
        let err = validate_all(&batch).unwrap_err();
        assert!(err.to_string().contains("observations[1]"));
    }

    #[test]
    fn names_are_validated() {
        let names = vec!["Alice".to_string(), String::new()];
        assert!(validate_all(&names).is_err());
    }
}
