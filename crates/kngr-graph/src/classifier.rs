//! Heuristic project classification.
//!
//! Scans the project root and its immediate subdirectories for ecosystem
//! markers. Markers are grouped; a group counts once no matter how many files
//! match it. The data-science side also looks inside dependency manifests for
//! ML framework names.
//!
//! Decision rule: more data-science groups than software groups means
//! `data_science`; otherwise any software group means `software`; otherwise
//! `generic`.

use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use kngr_core::{MetadataValue, ProjectMetadata, ProjectType};
use serde::Serialize;
use toml::Value as TomlValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    Software,
    DataScience,
}

struct IndicatorGroup {
    key: &'static str,
    category: Category,
    files: &'static [&'static str],
    extensions: &'static [&'static str],
}

impl IndicatorGroup {
    fn matches(&self, file_name: &str) -> bool {
        if self.files.contains(&file_name) {
            return true;
        }
        Path::new(file_name)
            .extension()
            .and_then(OsStr::to_str)
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }
}

const INDICATOR_GROUPS: &[IndicatorGroup] = &[
    IndicatorGroup {
        key: "python",
        category: Category::Software,
        files: &["setup.py", "setup.cfg", "pyproject.toml", "requirements.txt", "Pipfile"],
        extensions: &[],
    },
    IndicatorGroup {
        key: "javascript",
        category: Category::Software,
        files: &["package.json"],
        extensions: &[],
    },
    IndicatorGroup {
        key: "rust",
        category: Category::Software,
        files: &["Cargo.toml"],
        extensions: &[],
    },
    IndicatorGroup {
        key: "go",
        category: Category::Software,
        files: &["go.mod"],
        extensions: &[],
    },
    IndicatorGroup {
        key: "java",
        category: Category::Software,
        files: &["pom.xml", "build.gradle", "build.gradle.kts"],
        extensions: &[],
    },
    IndicatorGroup {
        key: "dotnet",
        category: Category::Software,
        files: &[],
        extensions: &["csproj", "fsproj", "sln"],
    },
    IndicatorGroup {
        key: "ruby",
        category: Category::Software,
        files: &["Gemfile"],
        extensions: &[],
    },
    IndicatorGroup {
        key: "php",
        category: Category::Software,
        files: &["composer.json"],
        extensions: &[],
    },
    IndicatorGroup {
        key: "c_cpp",
        category: Category::Software,
        files: &["CMakeLists.txt", "Makefile", "meson.build"],
        extensions: &[],
    },
    IndicatorGroup {
        key: "jupyter",
        category: Category::DataScience,
        files: &[],
        extensions: &["ipynb"],
    },
    IndicatorGroup {
        key: "r_project",
        category: Category::DataScience,
        files: &["renv.lock"],
        extensions: &["rproj", "rmd", "r"],
    },
    IndicatorGroup {
        key: "conda",
        category: Category::DataScience,
        files: &["environment.yml", "environment.yaml"],
        extensions: &[],
    },
    IndicatorGroup {
        key: "data_files",
        category: Category::DataScience,
        files: &[],
        extensions: &[
            "csv", "tsv", "parquet", "feather", "arrow", "h5", "hdf5", "pkl", "pickle", "npy",
            "npz",
        ],
    },
];

/// Data-science group matched by framework names inside dependency manifests.
const ML_GROUP_KEY: &str = "ml_frameworks";

const DEPENDENCY_MANIFESTS: &[&str] = &[
    "requirements.txt",
    "pyproject.toml",
    "setup.py",
    "setup.cfg",
    "Pipfile",
    "environment.yml",
    "environment.yaml",
];

const ML_FRAMEWORKS: &[&str] = &[
    "tensorflow",
    "torch",
    "pytorch",
    "keras",
    "scikit-learn",
    "sklearn",
    "xgboost",
    "lightgbm",
    "catboost",
    "jax",
    "transformers",
    "statsmodels",
    "pandas",
    "numpy",
    "scipy",
];

const SKIPPED_DIRS: &[&str] = &["node_modules", "target", "venv", "__pycache__", "dist"];

/// Outcome of a classification scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub project_type: ProjectType,
    pub metadata: ProjectMetadata,
    /// Entries or files that could not be read during the scan.
    pub scan_errors: usize,
}

/// Decide the project type from matched group counts.
#[must_use]
pub const fn decide(software: usize, data_science: usize) -> ProjectType {
    if data_science > software {
        ProjectType::DataScience
    } else if software > 0 {
        ProjectType::Software
    } else {
        ProjectType::Generic
    }
}

#[derive(Debug, Clone)]
pub struct ProjectClassifier {
    root: PathBuf,
    max_depth: usize,
}

impl ProjectClassifier {
    /// Root entries plus one level of subdirectories.
    pub const DEFAULT_DEPTH: usize = 2;

    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_depth: Self::DEFAULT_DEPTH,
        }
    }

    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Scan the root and classify it. Scan errors are logged and counted;
    /// classification proceeds with whatever was gathered.
    #[must_use]
    pub fn classify(&self) -> Classification {
        let mut matched: BTreeSet<&'static str> = BTreeSet::new();
        let mut scan_errors = 0usize;

        let walker = WalkBuilder::new(&self.root)
            .max_depth(Some(self.max_depth))
            .hidden(true)
            .parents(false)
            .ignore(false)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .filter_entry(|entry| {
                let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
                !(is_dir && entry.depth() > 0 && SKIPPED_DIRS.iter().any(|d| entry.file_name() == *d))
            })
            .build();

        for result in walker {
            let entry = match result {
                Ok(entry) => entry,
                Err(error) => {
                    tracing::warn!(root = %self.root.display(), %error, "project scan error");
                    scan_errors += 1;
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let file_name = entry.file_name().to_string_lossy();
            for group in INDICATOR_GROUPS {
                if group.matches(&file_name) {
                    matched.insert(group.key);
                }
            }

            if matched.contains(ML_GROUP_KEY) || !DEPENDENCY_MANIFESTS.contains(&&*file_name) {
                continue;
            }
            match fs::read_to_string(entry.path()) {
                Ok(content) => {
                    if mentions_ml_framework(&file_name, &content) {
                        matched.insert(ML_GROUP_KEY);
                    }
                }
                Err(error) => {
                    tracing::warn!(path = %entry.path().display(), %error, "cannot read dependency manifest");
                    scan_errors += 1;
                }
            }
        }

        let software = INDICATOR_GROUPS
            .iter()
            .filter(|group| group.category == Category::Software && matched.contains(group.key))
            .count();
        let data_science = matched.len() - software;

        let mut metadata = ProjectMetadata::new();
        for key in &matched {
            metadata.insert(format!("has_{key}"), MetadataValue::Flag(true));
        }
        metadata.insert("software_score".into(), count(software));
        metadata.insert("data_science_score".into(), count(data_science));

        let project_type = decide(software, data_science);
        tracing::debug!(
            root = %self.root.display(),
            %project_type,
            software,
            data_science,
            "classified project"
        );

        Classification {
            project_type,
            metadata,
            scan_errors,
        }
    }
}

fn count(value: usize) -> MetadataValue {
    MetadataValue::Count(i64::try_from(value).unwrap_or(i64::MAX))
}

/// Whether a dependency manifest names an ML framework.
fn mentions_ml_framework(file_name: &str, content: &str) -> bool {
    let names = if file_name == "pyproject.toml" {
        pyproject_dependencies(content).unwrap_or_else(|| requirement_tokens(content))
    } else {
        requirement_tokens(content)
    };
    names
        .iter()
        .any(|name| ML_FRAMEWORKS.contains(&name.as_str()))
}

/// Lowercased package-name tokens from a line-oriented manifest, comments removed.
fn requirement_tokens(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.split('#').next().unwrap_or_default())
        .flat_map(|line| {
            line.split(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
                .filter(|token| !token.is_empty())
                .map(str::to_ascii_lowercase)
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Dependency names declared in a `pyproject.toml` (PEP 621 and Poetry layouts).
/// Returns `None` when the document does not parse.
fn pyproject_dependencies(content: &str) -> Option<Vec<String>> {
    let document: TomlValue = toml::from_str(content).ok()?;
    let mut names = Vec::new();

    let project = document.get("project");
    if let Some(deps) = project.and_then(|p| p.get("dependencies")).and_then(TomlValue::as_array) {
        names.extend(deps.iter().filter_map(TomlValue::as_str).flat_map(requirement_tokens));
    }
    if let Some(extras) = project
        .and_then(|p| p.get("optional-dependencies"))
        .and_then(TomlValue::as_table)
    {
        for deps in extras.values().filter_map(TomlValue::as_array) {
            names.extend(deps.iter().filter_map(TomlValue::as_str).flat_map(requirement_tokens));
        }
    }

    let poetry = document.get("tool").and_then(|tool| tool.get("poetry"));
    if let Some(deps) = poetry.and_then(|p| p.get("dependencies")).and_then(TomlValue::as_table) {
        names.extend(deps.keys().map(|key| key.to_ascii_lowercase()));
    }
    if let Some(groups) = poetry.and_then(|p| p.get("group")).and_then(TomlValue::as_table) {
        for group in groups.values() {
            if let Some(deps) = group.get("dependencies").and_then(TomlValue::as_table) {
                names.extend(deps.keys().map(|key| key.to_ascii_lowercase()));
            }
        }
    }

    Some(names)
}
