//! JSON file persistence for the knowledge graph.
//!
//! Loading never fails from the caller's point of view: a missing file, a
//! corrupted file, or an unreadable file all yield a fresh graph classified
//! from the project root. Corrupted files are copied aside first as
//! `<path>.<category>.backup.<timestamp>`.
//!
//! Saving writes the full graph as pretty JSON, then regenerates the Mermaid
//! companion next to it (same base name, `.md`). If the graph directory
//! cannot be created, the manager switches once to its fallback directory and
//! stays there for the rest of the session. Loading applies the same switch,
//! so a graph saved to the fallback directory is found again on the next run.

use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;
use kngr_core::KnowledgeGraph;
use serde::Serialize;

use crate::classifier::ProjectClassifier;
use crate::diagram::{DiagramRenderer, DiagramReport};
use crate::error::{GraphError, LoadFailure};
use crate::path::diagram_path;

const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S_%3f";

/// Files written by a successful save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveReport {
    pub graph_path: PathBuf,
    pub diagram: DiagramReport,
}

#[derive(Debug)]
pub struct PersistenceManager {
    path: PathBuf,
    fallback_dir: PathBuf,
    fell_back: bool,
    renderer: DiagramRenderer,
}

impl PersistenceManager {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, fallback_dir: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            fallback_dir: fallback_dir.into(),
            fell_back: false,
            renderer: DiagramRenderer::new(),
        }
    }

    /// Current graph file path (changes after a directory fallback).
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn diagram_path(&self) -> PathBuf {
        diagram_path(&self.path)
    }

    /// Whether saves have been redirected to the fallback directory.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        self.fell_back
    }

    /// Read the graph file without any recovery.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns the [`LoadFailure`] describing why the file is unusable.
    pub fn try_load(&self) -> Result<Option<KnowledgeGraph>, LoadFailure> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
            Err(error) if error.kind() == ErrorKind::InvalidData => {
                // Not UTF-8: the bytes are there but unusable.
                return Err(LoadFailure::Parse(serde_json::Error::io(error)));
            }
            Err(error) => return Err(LoadFailure::Read(error)),
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(LoadFailure::from_json)
    }

    /// Load the graph, recovering from every failure with a fresh graph.
    ///
    /// When the primary file cannot exist because its directory is unusable,
    /// the manager moves to the fallback location before reading.
    #[must_use]
    pub fn load(&mut self, classifier: &ProjectClassifier) -> KnowledgeGraph {
        let mut outcome = self.try_load();
        if matches!(outcome, Ok(None) | Err(LoadFailure::Read(_))) && self.redirect_if_unusable() {
            outcome = self.try_load();
        }
        match outcome {
            Ok(Some(graph)) => {
                tracing::debug!(
                    path = %self.path.display(),
                    entities = graph.entity_count(),
                    relations = graph.relation_count(),
                    "loaded knowledge graph"
                );
                return graph;
            }
            Ok(None) => {
                tracing::debug!(path = %self.path.display(), "no graph file, starting fresh");
            }
            Err(failure) => {
                tracing::error!(path = %self.path.display(), %failure, "cannot load graph file, starting fresh");
                if let Some(category) = failure.backup_category() {
                    backup_corrupted(&self.path, category);
                }
            }
        }
        fresh_graph(classifier)
    }

    /// Write the graph and its diagram.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError`] when the directory (including the fallback),
    /// the JSON file, or the diagram cannot be written.
    pub fn save(&mut self, graph: &KnowledgeGraph) -> Result<SaveReport, GraphError> {
        self.ensure_directory()?;

        let json = serde_json::to_string_pretty(graph)?;
        fs::write(&self.path, json).map_err(|e| GraphError::io(&self.path, e))?;
        let diagram = self.renderer.write(graph, &self.diagram_path())?;

        Ok(SaveReport {
            graph_path: self.path.clone(),
            diagram,
        })
    }

    /// Write only the diagram companion.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Io`] if the directory or file cannot be written.
    pub fn write_diagram(&mut self, graph: &KnowledgeGraph) -> Result<DiagramReport, GraphError> {
        self.ensure_directory()?;
        self.renderer.write(graph, &self.diagram_path())
    }

    /// Switch to the fallback location when the primary directory is missing
    /// and cannot be created. Returns whether the path changed.
    fn redirect_if_unusable(&mut self) -> bool {
        if self.fell_back || self.parent_dir().is_none_or(Path::is_dir) {
            return false;
        }
        match self.ensure_directory() {
            Ok(()) => self.fell_back,
            Err(error) => {
                tracing::warn!(%error, "fallback location unavailable for loading");
                false
            }
        }
    }

    fn parent_dir(&self) -> Option<&Path> {
        self.path.parent().filter(|p| !p.as_os_str().is_empty())
    }

    fn ensure_directory(&mut self) -> Result<(), GraphError> {
        let Some(parent) = self.parent_dir() else {
            return Ok(());
        };
        let error = match fs::create_dir_all(parent) {
            Ok(()) => return Ok(()),
            Err(error) => error,
        };
        if self.fell_back {
            return Err(GraphError::io(parent, error));
        }

        let file_name = self
            .path
            .file_name()
            .map_or_else(|| OsString::from("knowledge_graph.json"), ToOwned::to_owned);
        let alternate = self.fallback_dir.join(file_name);
        fs::create_dir_all(&self.fallback_dir).map_err(|e| GraphError::io(&self.fallback_dir, e))?;

        tracing::warn!(
            dir = %parent.display(),
            %error,
            fallback = %alternate.display(),
            "graph directory unavailable, switching to fallback location"
        );
        self.path = alternate;
        self.fell_back = true;
        Ok(())
    }
}

/// Graph started when no usable file exists.
fn fresh_graph(classifier: &ProjectClassifier) -> KnowledgeGraph {
    let classification = classifier.classify();
    tracing::debug!(
        root = %classifier.root().display(),
        project_type = %classification.project_type,
        "classified project for fresh graph"
    );
    KnowledgeGraph::empty(classification.project_type, classification.metadata)
}

/// Path of the backup copy for a corrupted file.
#[must_use]
pub fn backup_path(path: &Path, category: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(format!(
        ".{category}.backup.{}",
        Utc::now().format(BACKUP_TIMESTAMP_FORMAT)
    ));
    PathBuf::from(name)
}

/// Copy a corrupted file aside. Best effort: failures are logged only.
fn backup_corrupted(path: &Path, category: &str) -> Option<PathBuf> {
    let backup = backup_path(path, category);
    match fs::copy(path, &backup) {
        Ok(_) => {
            tracing::warn!(backup = %backup.display(), "backed up corrupted graph file");
            Some(backup)
        }
        Err(error) => {
            tracing::warn!(path = %path.display(), %error, "failed to back up corrupted graph file");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kngr_core::{Entity, MetadataValue, ProjectMetadata, ProjectType, Relation};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn backups_in(dir: &Path, category: &str) -> Vec<PathBuf> {
        let marker = format!(".{category}.backup.");
        fs::read_dir(dir)
            .expect("dir should list")
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.to_string_lossy().contains(&marker))
            .collect()
    }

    fn sample_graph() -> KnowledgeGraph {
        let mut alice = Entity::new("Alice", "person");
        alice.push_observation("likes tea");
        let mut metadata = ProjectMetadata::new();
        metadata.insert("has_rust".into(), MetadataValue::Flag(true));
        metadata.insert("software_score".into(), MetadataValue::Count(1));
        KnowledgeGraph {
            entities: vec![alice, Entity::unknown("Bob")],
            relations: vec![Relation::new("Alice", "Bob", "knows")],
            project_type: ProjectType::Software,
            project_metadata: metadata,
        }
    }

    #[test]
    fn save_then_load_roundtrips() {
        let temp = TempDir::new().expect("tempdir should create");
        let mut manager = PersistenceManager::new(
            temp.path().join("graph/knowledge_graph.json"),
            temp.path().join("fallback"),
        );
        let graph = sample_graph();

        let report = manager.save(&graph).expect("save should succeed");
        assert_eq!(report.graph_path, temp.path().join("graph/knowledge_graph.json"));
        assert!(temp.path().join("graph/knowledge_graph.md").is_file());

        let loaded = manager.try_load().expect("load should succeed");
        assert_eq!(loaded, Some(graph));
    }

    #[test]
    fn missing_file_loads_fresh_classified_graph() {
        let temp = TempDir::new().expect("tempdir should create");
        fs::write(temp.path().join("Cargo.toml"), "[package]").expect("marker should write");
        let mut manager = PersistenceManager::new(temp.path().join("kg.json"), temp.path());

        let graph = manager.load(&ProjectClassifier::new(temp.path()));
        assert!(graph.is_empty());
        assert_eq!(graph.project_type, ProjectType::Software);
        assert_eq!(
            graph.project_metadata.get("has_rust"),
            Some(&MetadataValue::Flag(true))
        );
        assert!(backups_in(temp.path(), "json_error").is_empty());
    }

    #[test]
    fn truncated_json_is_backed_up_and_replaced() {
        let temp = TempDir::new().expect("tempdir should create");
        let path = temp.path().join("knowledge_graph.json");
        fs::write(&path, r#"{"entities": [{"name": "X", "entity_type""#).expect("file should write");
        let mut manager = PersistenceManager::new(&path, temp.path().join("fallback"));

        let graph = manager.load(&ProjectClassifier::new(temp.path().join("empty-root")));
        assert_eq!(graph.entity_count(), 0);
        assert_eq!(graph.relation_count(), 0);

        let backups = backups_in(temp.path(), "json_error");
        assert_eq!(backups.len(), 1);
        let name = backups[0].file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("knowledge_graph.json.json_error.backup."));
        assert_eq!(
            fs::read_to_string(&backups[0]).unwrap(),
            r#"{"entities": [{"name": "X", "entity_type""#
        );
    }

    #[test]
    fn missing_required_key_is_backed_up_as_schema_error() {
        let temp = TempDir::new().expect("tempdir should create");
        let path = temp.path().join("knowledge_graph.json");
        fs::write(&path, r#"{"entities": []}"#).expect("file should write");
        let mut manager = PersistenceManager::new(&path, temp.path().join("fallback"));

        assert!(matches!(manager.try_load(), Err(LoadFailure::Schema(_))));
        let graph = manager.load(&ProjectClassifier::new(temp.path()));
        assert!(graph.is_empty());
        assert_eq!(backups_in(temp.path(), "schema_error").len(), 1);
    }

    #[test]
    fn unreadable_path_recovers_without_backup() {
        let temp = TempDir::new().expect("tempdir should create");
        // A directory where the file should be: reading fails with an I/O error.
        let path = temp.path().join("knowledge_graph.json");
        fs::create_dir(&path).expect("dir should create");
        let mut manager = PersistenceManager::new(&path, temp.path().join("fallback"));

        assert!(matches!(manager.try_load(), Err(LoadFailure::Read(_))));
        let graph = manager.load(&ProjectClassifier::new(temp.path().join("none")));
        assert!(graph.is_empty());
        assert!(backups_in(temp.path(), "json_error").is_empty());
        assert!(backups_in(temp.path(), "schema_error").is_empty());
    }

    #[test]
    fn uncreatable_directory_falls_back_once_and_sticks() {
        let temp = TempDir::new().expect("tempdir should create");
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "file, not dir").expect("blocker should write");
        let fallback = temp.path().join("fallback");
        let mut manager = PersistenceManager::new(blocker.join("kg.json"), &fallback);

        let report = manager.save(&sample_graph()).expect("fallback save should succeed");
        assert_eq!(report.graph_path, fallback.join("kg.json"));
        assert!(manager.is_fallback());
        assert_eq!(manager.path(), fallback.join("kg.json"));
        assert!(fallback.join("kg.md").is_file());

        manager.save(&KnowledgeGraph::default()).expect("second save should succeed");
        assert_eq!(manager.path(), fallback.join("kg.json"));
    }

    #[test]
    fn load_finds_graph_saved_to_fallback() {
        let temp = TempDir::new().expect("tempdir should create");
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "file, not dir").expect("blocker should write");
        let fallback = temp.path().join("fallback");
        let classifier = ProjectClassifier::new(temp.path().join("none"));

        let mut first = PersistenceManager::new(blocker.join("kg.json"), &fallback);
        first.save(&sample_graph()).expect("fallback save should succeed");

        let mut second = PersistenceManager::new(blocker.join("kg.json"), &fallback);
        let graph = second.load(&classifier);
        assert_eq!(graph, sample_graph());
        assert!(second.is_fallback());
        assert_eq!(second.path(), fallback.join("kg.json"));
    }

    #[test]
    fn load_keeps_primary_path_when_directory_exists() {
        let temp = TempDir::new().expect("tempdir should create");
        let fallback = temp.path().join("fallback");
        fs::create_dir(&fallback).expect("fallback should create");
        fs::write(fallback.join("kg.json"), "{}").expect("stale file should write");
        let mut manager = PersistenceManager::new(temp.path().join("kg.json"), &fallback);

        let graph = manager.load(&ProjectClassifier::new(temp.path().join("none")));
        assert!(graph.is_empty());
        assert!(!manager.is_fallback());
        assert_eq!(manager.path(), temp.path().join("kg.json"));
    }

    #[test]
    fn failed_fallback_is_reported() {
        let temp = TempDir::new().expect("tempdir should create");
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "file, not dir").expect("blocker should write");
        let mut manager = PersistenceManager::new(blocker.join("kg.json"), blocker.join("fb"));

        let result = manager.save(&sample_graph());
        assert!(matches!(result, Err(GraphError::Io { .. })));
    }

    #[test]
    fn backup_path_encodes_category() {
        let path = backup_path(Path::new("/data/kg.json"), "json_error");
        assert!(path.to_string_lossy().starts_with("/data/kg.json.json_error.backup."));
    }
}
