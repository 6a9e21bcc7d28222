//! Knowledge graph storage configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::general::non_empty_path;

fn default_subdir() -> String {
    String::from("ai-kngr")
}

fn default_file_name() -> String {
    String::from("knowledge_graph.json")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GraphConfig {
    /// Directory override for tests and ephemeral runs. Wins over every other tier.
    #[serde(default)]
    pub ephemeral_dir: String,

    /// Externally supplied knowledge graph directory.
    #[serde(default)]
    pub dir: String,

    /// Directory name appended to the project, working-directory, and temp tiers.
    #[serde(default = "default_subdir")]
    pub subdir: String,

    /// Graph file name. The diagram companion swaps the extension for `.md`.
    #[serde(default = "default_file_name")]
    pub file_name: String,

    /// Alternate directory used when the graph directory cannot be created at save time.
    #[serde(default)]
    pub fallback_dir: String,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            ephemeral_dir: String::new(),
            dir: String::new(),
            subdir: default_subdir(),
            file_name: default_file_name(),
            fallback_dir: String::new(),
        }
    }
}

impl GraphConfig {
    #[must_use]
    pub fn ephemeral_dir(&self) -> Option<PathBuf> {
        non_empty_path(&self.ephemeral_dir)
    }

    #[must_use]
    pub fn configured_dir(&self) -> Option<PathBuf> {
        non_empty_path(&self.dir)
    }

    /// Save-time fallback directory: the configured value, else
    /// `<data_local_dir>/kngr`, else `<temp>/kngr`.
    #[must_use]
    pub fn fallback_dir(&self) -> PathBuf {
        non_empty_path(&self.fallback_dir)
            .or_else(|| dirs::data_local_dir().map(|dir| dir.join("kngr")))
            .unwrap_or_else(|| std::env::temp_dir().join("kngr"))
    }

    /// Check that the file and directory names are plain path components.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for empty names or names with separators.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("graph.file_name", &self.file_name),
            ("graph.subdir", &self.subdir),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: "must not be empty".to_string(),
                });
            }
            if value.contains('/') || value.contains('\\') {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: format!("'{value}' must be a single path component"),
                });
            }
        }
        Ok(())
    }
}
