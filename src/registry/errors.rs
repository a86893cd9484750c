//! Class registry errors

use thiserror::Error;

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors raised while building or loading class tables.
///
/// Lookups of unknown classes during a decode are not registry errors;
/// they surface as `UnknownType` decode issues.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// No table exists for the requested revision
    #[error("No class table for revision {0}")]
    UnknownRevision(u32),

    /// A shipped class layout may not be replaced
    #[error("Class '{class}' is already registered for revision {revision}")]
    Immutable { revision: u32, class: String },

    /// A schema file or in-memory schema is malformed
    #[error("Malformed schema '{source_name}': {reason}")]
    Malformed { source_name: String, reason: String },
}

impl RegistryError {
    pub fn malformed(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }
}
