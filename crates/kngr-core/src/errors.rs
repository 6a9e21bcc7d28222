//! Cross-cutting error types for kngr.
//!
//! This module defines errors that can originate from any crate in the system.
//! Domain-specific errors (e.g., `GraphError`, `ConfigError`) are defined in
//! their respective crates. Only the binary converges everything into `anyhow`.

use thiserror::Error;

/// Errors that can be raised by any kngr crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Caller-supplied input failed validation (missing or blank field).
    #[error("Validation error: {0}")]
    Validation(String),
}

impl CoreError {
    /// Build a validation error for a required field that was missing or blank.
    #[must_use]
    pub fn missing_field(record: &str, index: usize, field: &str) -> Self {
        Self::Validation(format!("{record}[{index}]: '{field}' is required"))
    }
}
