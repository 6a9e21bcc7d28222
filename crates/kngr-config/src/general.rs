//! General application configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Project root used for classification and the `<project>/ai-kngr` tier.
    /// Empty means the caller decides (CLI flag or working directory).
    #[serde(default)]
    pub project_root: String,
}

impl GeneralConfig {
    #[must_use]
    pub fn project_root(&self) -> Option<PathBuf> {
        non_empty_path(&self.project_root)
    }
}

pub(crate) fn non_empty_path(value: &str) -> Option<PathBuf> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(PathBuf::from(trimmed))
    }
}
