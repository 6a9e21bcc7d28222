//! # kngr-config
//!
//! Layered configuration loading for kngr using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`KNGR_*` prefix, `__` as separator)
//! 2. Project-level `.kngr/config.toml`
//! 3. User-level `~/.config/kngr/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `KNGR_GRAPH__DIR` -> `graph.dir`, `KNGR_GRAPH__EPHEMERAL_DIR` ->
//! `graph.ephemeral_dir`, etc. The `__` (double underscore) separates nested
//! config sections.
//!
//! # Usage
//!
//! ```no_run
//! use kngr_config::KngrConfig;
//!
//! let config = KngrConfig::load_with_dotenv(None).expect("config");
//! if let Some(dir) = config.graph.configured_dir() {
//!     println!("graph directory: {}", dir.display());
//! }
//! ```

mod error;
mod general;
mod graph;

pub use error::ConfigError;
pub use general::GeneralConfig;
pub use graph::GraphConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Project-local config file, relative to the project root.
pub const LOCAL_CONFIG_PATH: &str = ".kngr/config.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct KngrConfig {
    #[serde(default)]
    pub graph: GraphConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl KngrConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need `.env` file loading.
    ///
    /// `project_root` locates the project-local `.kngr/config.toml`; when `None`
    /// the current directory is used.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if extraction fails or a value is invalid.
    pub fn load(project_root: Option<&Path>) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(project_root).extract()?;
        config.graph.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if extraction fails or a value is invalid.
    pub fn load_with_dotenv(project_root: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_dotenv(project_root);
        Self::load(project_root)
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment(project_root: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = project_root.map_or_else(
            || PathBuf::from(LOCAL_CONFIG_PATH),
            |root| root.join(LOCAL_CONFIG_PATH),
        );
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("KNGR_").split("__"))
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("kngr").join("config.toml"))
    }

    /// Load `.env` from the project root, falling back to the current directory.
    /// Silently does nothing if no `.env` is found.
    fn load_dotenv(project_root: Option<&Path>) {
        if let Some(root) = project_root {
            let env_path = root.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
        }
        let _ = dotenvy::dotenv();
    }
}
