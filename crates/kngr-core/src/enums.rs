//! Project classification enum.
//!
//! Uses `snake_case` serialization via `#[serde(rename_all = "snake_case")]`,
//! matching the `project_type` field of the persisted graph file.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

/// Coarse project classification stored alongside a graph.
///
/// Selects the diagram flavor used when rendering the companion markdown.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ProjectType {
    Software,
    DataScience,
    #[default]
    Generic,
}

impl ProjectType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Software => "software",
            Self::DataScience => "data_science",
            Self::Generic => "generic",
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "software" => Ok(Self::Software),
            "data_science" => Ok(Self::DataScience),
            "generic" => Ok(Self::Generic),
            other => Err(CoreError::Validation(format!(
                "unknown project type '{other}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_snake_case() {
        let json = serde_json::to_string(&ProjectType::DataScience).unwrap();
        assert_eq!(json, "\"data_science\"");
    }

    #[test]
    fn parses_every_variant() {
        for variant in [
            ProjectType::Software,
            ProjectType::DataScience,
            ProjectType::Generic,
        ] {
            assert_eq!(variant.as_str().parse::<ProjectType>().unwrap(), variant);
        }
    }

    #[test]
    fn rejects_unknown_variant() {
        assert!("mobile".parse::<ProjectType>().is_err());
    }
}
