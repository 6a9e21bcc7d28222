//! Graph file location.
//!
//! Without an explicit path, the graph directory is chosen from an ordered
//! list of candidate tiers. Each tier's directory is created if missing; a
//! tier whose directory cannot be created is skipped.
//!
//! ```text
//! explicit path  (wins outright, no probing)
//! ephemeral      graph.ephemeral_dir
//! configured     graph.dir
//! project        <project_root>/<subdir>
//! working_dir    <cwd>/<subdir>
//! temp           <temp_dir>/<subdir>
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use kngr_config::GraphConfig;
use serde::Serialize;

/// Which tier produced the graph path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PathSource {
    Explicit,
    Ephemeral,
    Configured,
    Project,
    WorkingDir,
    Temp,
}

/// Caller-supplied location hints.
#[derive(Debug, Clone, Default)]
pub struct PathHints {
    /// Explicit graph file path (or a directory to hold the default file name).
    pub explicit_path: Option<PathBuf>,
    /// Resolved project root.
    pub project_root: Option<PathBuf>,
    /// Working directory; `std::env::current_dir()` when unset.
    pub working_dir: Option<PathBuf>,
}

/// The chosen graph file and the tier it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPath {
    pub path: PathBuf,
    pub source: PathSource,
}

/// One directory tier in the fallback chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub source: PathSource,
    pub dir: PathBuf,
}

impl Candidate {
    /// Create the directory if needed. Returns whether the tier is usable.
    fn try_prepare(&self) -> bool {
        match fs::create_dir_all(&self.dir) {
            Ok(()) if self.dir.is_dir() => true,
            Ok(()) => false,
            Err(error) => {
                tracing::debug!(
                    tier = ?self.source,
                    dir = %self.dir.display(),
                    %error,
                    "graph directory candidate unavailable"
                );
                false
            }
        }
    }
}

pub struct PathResolver<'a> {
    config: &'a GraphConfig,
}

impl<'a> PathResolver<'a> {
    #[must_use]
    pub const fn new(config: &'a GraphConfig) -> Self {
        Self { config }
    }

    /// Directory tiers in priority order. Tiers without a hint are omitted.
    #[must_use]
    pub fn candidates(&self, hints: &PathHints) -> Vec<Candidate> {
        let subdir = self.config.subdir.as_str();
        let working_dir = hints
            .working_dir
            .clone()
            .or_else(|| std::env::current_dir().ok());

        [
            (PathSource::Ephemeral, self.config.ephemeral_dir()),
            (PathSource::Configured, self.config.configured_dir()),
            (
                PathSource::Project,
                hints.project_root.as_ref().map(|root| root.join(subdir)),
            ),
            (
                PathSource::WorkingDir,
                working_dir.map(|dir| dir.join(subdir)),
            ),
            (PathSource::Temp, Some(std::env::temp_dir().join(subdir))),
        ]
        .into_iter()
        .filter_map(|(source, dir)| dir.map(|dir| Candidate { source, dir }))
        .collect()
    }

    /// Pick the graph file path.
    ///
    /// Never fails: when no tier's directory can be created, the last tier
    /// (temp) is returned anyway and the save path reports the failure.
    #[must_use]
    pub fn resolve(&self, hints: &PathHints) -> ResolvedPath {
        if let Some(explicit) = &hints.explicit_path {
            return ResolvedPath {
                path: self.explicit_file(explicit),
                source: PathSource::Explicit,
            };
        }

        let candidates = self.candidates(hints);
        let chosen = candidates
            .iter()
            .find(|candidate| candidate.try_prepare())
            .or_else(|| candidates.last());

        match chosen {
            Some(candidate) => {
                let resolved = ResolvedPath {
                    path: candidate.dir.join(&self.config.file_name),
                    source: candidate.source,
                };
                tracing::debug!(
                    tier = ?resolved.source,
                    path = %resolved.path.display(),
                    "resolved graph path"
                );
                resolved
            }
            None => ResolvedPath {
                path: std::env::temp_dir().join(&self.config.file_name),
                source: PathSource::Temp,
            },
        }
    }

    fn explicit_file(&self, explicit: &Path) -> PathBuf {
        if explicit.is_dir() {
            explicit.join(&self.config.file_name)
        } else {
            explicit.to_path_buf()
        }
    }
}

/// Companion diagram path: same base name, `.md` extension.
#[must_use]
pub fn diagram_path(graph_path: &Path) -> PathBuf {
    graph_path.with_extension("md")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn config_with(ephemeral: &Path, dir: &Path) -> GraphConfig {
        GraphConfig {
            ephemeral_dir: ephemeral.display().to_string(),
            dir: dir.display().to_string(),
            ..GraphConfig::default()
        }
    }

    #[test]
    fn explicit_path_wins() {
        let temp = TempDir::new().expect("tempdir should create");
        let config = config_with(&temp.path().join("eph"), &temp.path().join("cfg"));
        let explicit = temp.path().join("custom.json");
        let hints = PathHints {
            explicit_path: Some(explicit.clone()),
            ..PathHints::default()
        };

        let resolved = PathResolver::new(&config).resolve(&hints);
        assert_eq!(resolved.source, PathSource::Explicit);
        assert_eq!(resolved.path, explicit);
        assert!(!temp.path().join("eph").exists());
    }

    #[test]
    fn explicit_directory_gets_default_file_name() {
        let temp = TempDir::new().expect("tempdir should create");
        let config = GraphConfig::default();
        let hints = PathHints {
            explicit_path: Some(temp.path().to_path_buf()),
            ..PathHints::default()
        };

        let resolved = PathResolver::new(&config).resolve(&hints);
        assert_eq!(resolved.path, temp.path().join("knowledge_graph.json"));
    }

    #[test]
    fn ephemeral_dir_beats_configured_dir() {
        let temp = TempDir::new().expect("tempdir should create");
        let config = config_with(&temp.path().join("eph"), &temp.path().join("cfg"));

        let resolved = PathResolver::new(&config).resolve(&PathHints::default());
        assert_eq!(resolved.source, PathSource::Ephemeral);
        assert_eq!(resolved.path, temp.path().join("eph/knowledge_graph.json"));
        assert!(temp.path().join("eph").is_dir());
    }

    #[test]
    fn uncreatable_tier_falls_through_to_next() {
        let temp = TempDir::new().expect("tempdir should create");
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "not a directory").expect("blocker should write");
        let config = config_with(&blocker.join("eph"), &temp.path().join("cfg"));

        let resolved = PathResolver::new(&config).resolve(&PathHints::default());
        assert_eq!(resolved.source, PathSource::Configured);
        assert_eq!(resolved.path, temp.path().join("cfg/knowledge_graph.json"));
    }

    #[test]
    fn project_tier_uses_subdir() {
        let temp = TempDir::new().expect("tempdir should create");
        let config = GraphConfig::default();
        let hints = PathHints {
            project_root: Some(temp.path().to_path_buf()),
            working_dir: Some(temp.path().join("elsewhere")),
            ..PathHints::default()
        };

        let resolved = PathResolver::new(&config).resolve(&hints);
        assert_eq!(resolved.source, PathSource::Project);
        assert_eq!(
            resolved.path,
            temp.path().join("ai-kngr/knowledge_graph.json")
        );
    }

    #[test]
    fn working_dir_tier_when_no_project() {
        let temp = TempDir::new().expect("tempdir should create");
        let config = GraphConfig::default();
        let hints = PathHints {
            working_dir: Some(temp.path().to_path_buf()),
            ..PathHints::default()
        };

        let resolved = PathResolver::new(&config).resolve(&hints);
        assert_eq!(resolved.source, PathSource::WorkingDir);
        assert!(temp.path().join("ai-kngr").is_dir());
    }

    #[test]
    fn candidates_are_ordered_and_end_with_temp() {
        let temp = TempDir::new().expect("tempdir should create");
        let config = config_with(&temp.path().join("eph"), &temp.path().join("cfg"));
        let hints = PathHints {
            project_root: Some(temp.path().join("proj")),
            working_dir: Some(temp.path().join("cwd")),
            ..PathHints::default()
        };

        let sources = PathResolver::new(&config)
            .candidates(&hints)
            .into_iter()
            .map(|candidate| candidate.source)
            .collect::<Vec<_>>();
        assert_eq!(
            sources,
            vec![
                PathSource::Ephemeral,
                PathSource::Configured,
                PathSource::Project,
                PathSource::WorkingDir,
                PathSource::Temp,
            ]
        );
    }

    #[test]
    fn diagram_path_swaps_extension() {
        assert_eq!(
            diagram_path(Path::new("/data/knowledge_graph.json")),
            PathBuf::from("/data/knowledge_graph.md")
        );
    }
}
