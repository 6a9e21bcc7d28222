//! Graph store error types.

use std::path::PathBuf;

use kngr_core::CoreError;
use thiserror::Error;

/// Errors surfaced by graph store operations.
///
/// Only [`GraphError::Core`] validation failures reach callers of mutation
/// methods; I/O and serialization failures during save are logged and kept
/// as the store's last save error.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Caller input failed boundary validation.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A filesystem operation failed.
    #[error("I/O error at '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The graph could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GraphError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Why an existing graph file could not be loaded.
///
/// Every variant is recovered locally by starting a fresh graph; the variant
/// only decides whether the offending file is backed up first.
#[derive(Debug, Error)]
pub enum LoadFailure {
    /// The file is not valid JSON (truncated, garbage).
    #[error("malformed JSON: {0}")]
    Parse(#[source] serde_json::Error),

    /// The file is valid JSON but lacks required keys or has wrong types.
    #[error("invalid graph structure: {0}")]
    Schema(#[source] serde_json::Error),

    /// The file exists but could not be read (permissions, race).
    #[error("cannot read graph file: {0}")]
    Read(#[source] std::io::Error),
}

impl LoadFailure {
    /// Classify a deserialization error into parse vs. structure failures.
    pub(crate) fn from_json(error: serde_json::Error) -> Self {
        match error.classify() {
            serde_json::error::Category::Data => Self::Schema(error),
            serde_json::error::Category::Syntax
            | serde_json::error::Category::Eof
            | serde_json::error::Category::Io => Self::Parse(error),
        }
    }

    /// Suffix category used in the backup file name, or `None` when the file
    /// is not considered corrupted and must not be copied.
    #[must_use]
    pub const fn backup_category(&self) -> Option<&'static str> {
        match self {
            Self::Parse(_) => Some("json_error"),
            Self::Schema(_) => Some("schema_error"),
            Self::Read(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kngr_core::KnowledgeGraph;

    #[test]
    fn truncated_json_is_a_parse_failure() {
        let error = serde_json::from_str::<KnowledgeGraph>(r#"{"entities": [{"name": "X""#)
            .unwrap_err();
        let failure = LoadFailure::from_json(error);
        assert!(matches!(failure, LoadFailure::Parse(_)));
        assert_eq!(failure.backup_category(), Some("json_error"));
    }

    #[test]
    fn missing_key_is_a_schema_failure() {
        let error = serde_json::from_str::<KnowledgeGraph>(r#"{"entities": []}"#).unwrap_err();
        let failure = LoadFailure::from_json(error);
        assert!(matches!(failure, LoadFailure::Schema(_)));
        assert_eq!(failure.backup_category(), Some("schema_error"));
    }

    #[test]
    fn read_failures_are_not_backed_up() {
        let failure = LoadFailure::Read(std::io::Error::from(std::io::ErrorKind::PermissionDenied));
        assert_eq!(failure.backup_category(), None);
    }
}
