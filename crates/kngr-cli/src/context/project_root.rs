use std::path::PathBuf;

use anyhow::Context;

/// Validate an explicit `--project` directory, or fall back to the current
/// directory.
pub fn resolve_project_dir(project_override: Option<&str>) -> anyhow::Result<(PathBuf, bool)> {
    if let Some(path) = project_override {
        let explicit = PathBuf::from(path);
        if explicit.is_dir() {
            return Ok((explicit, true));
        }
        anyhow::bail!(
            "invalid --project '{}': directory does not exist",
            explicit.display()
        );
    }

    let cwd = std::env::current_dir().context("failed to read current directory")?;
    Ok((cwd, false))
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::resolve_project_dir;

    #[test]
    fn explicit_directory_is_accepted() {
        let temp = TempDir::new().expect("tempdir should create");
        let (dir, explicit) = resolve_project_dir(temp.path().to_str())
            .expect("existing dir should resolve");
        assert_eq!(dir, temp.path());
        assert!(explicit);
    }

    #[test]
    fn missing_directory_is_rejected() {
        let temp = TempDir::new().expect("tempdir should create");
        let missing = temp.path().join("nope");
        let error = resolve_project_dir(missing.to_str()).expect_err("should fail");
        assert!(error.to_string().contains("directory does not exist"));
    }

    #[test]
    fn defaults_to_current_directory() {
        let (dir, explicit) = resolve_project_dir(None).expect("cwd should resolve");
        assert_eq!(dir, std::env::current_dir().expect("cwd"));
        assert!(!explicit);
    }
}
