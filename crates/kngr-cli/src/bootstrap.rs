use std::path::Path;

use anyhow::Context;
use kngr_config::KngrConfig;

/// Load layered configuration, reading `<project_root>/.env` (or the
/// current directory's) first.
pub fn load_config(project_root: &Path) -> anyhow::Result<KngrConfig> {
    KngrConfig::load_with_dotenv(Some(project_root)).with_context(|| {
        format!(
            "failed to load kngr configuration for {}",
            project_root.display()
        )
    })
}
