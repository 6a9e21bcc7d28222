use std::path::PathBuf;

use kngr_config::KngrConfig;
use kngr_graph::{GraphStore, PathHints, StoreLocation};

use crate::cli::GlobalFlags;

/// Everything a command needs to open the graph.
#[derive(Debug)]
pub struct AppContext {
    pub config: KngrConfig,
    pub hints: PathHints,
    /// Directory used for default classification and `.kngr/config.toml`.
    pub project_dir: PathBuf,
}

impl AppContext {
    /// Build path hints from the flags. An explicit `--project` becomes the
    /// project-root hint; otherwise `general.project_root` (or the working
    /// directory) decides.
    #[must_use]
    pub fn new(config: KngrConfig, project_dir: PathBuf, explicit_project: bool, flags: &GlobalFlags) -> Self {
        let hints = PathHints {
            explicit_path: flags.graph_file.as_ref().map(PathBuf::from),
            project_root: explicit_project.then(|| project_dir.clone()),
            working_dir: None,
        };
        Self {
            config,
            hints,
            project_dir,
        }
    }

    #[must_use]
    pub fn location(&self) -> StoreLocation {
        GraphStore::locate(&self.config, &self.hints)
    }

    #[must_use]
    pub fn open_store(&self) -> GraphStore {
        let store = GraphStore::from_config(&self.config, &self.hints);
        tracing::debug!(path = %store.graph_path().display(), "opened graph store");
        store
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::AppContext;
    use crate::cli::{GlobalFlags, OutputFormat};

    fn flags(graph_file: Option<String>) -> GlobalFlags {
        GlobalFlags {
            format: OutputFormat::Json,
            quiet: false,
            verbose: false,
            project: None,
            graph_file,
        }
    }

    #[test]
    fn graph_file_flag_becomes_explicit_path() {
        let temp = TempDir::new().expect("tempdir should create");
        let file = temp.path().join("kg.json");
        let ctx = AppContext::new(
            kngr_config::KngrConfig::default(),
            temp.path().to_path_buf(),
            true,
            &flags(Some(file.display().to_string())),
        );

        let location = ctx.location();
        assert_eq!(location.resolved.path, file);
        assert_eq!(location.diagram_path, temp.path().join("kg.md"));
    }

    #[test]
    fn explicit_project_is_the_project_tier() {
        let temp = TempDir::new().expect("tempdir should create");
        let ctx = AppContext::new(
            kngr_config::KngrConfig::default(),
            temp.path().to_path_buf(),
            true,
            &flags(None),
        );

        assert_eq!(
            ctx.location().resolved.path,
            temp.path().join("ai-kngr/knowledge_graph.json")
        );
    }
}
