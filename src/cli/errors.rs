//! CLI-specific error types
//!
//! Every CLI error ends the process. Each variant carries a stable code
//! string and maps to its own exit code.

use std::io;

use thiserror::Error;

use crate::decode::DecodeError;
use crate::document::EnvelopeError;
use crate::registry::RegistryError;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration file missing, malformed or invalid
    #[error("SCENEPACK_CLI_CONFIG_ERROR: {0}")]
    Config(String),

    /// Reading input or writing output failed
    #[error("SCENEPACK_CLI_IO_ERROR: {0}")]
    Io(String),

    /// The pack file is not a valid envelope
    #[error("SCENEPACK_CLI_ENVELOPE_ERROR: {0}")]
    Envelope(#[from] EnvelopeError),

    /// Class tables could not be loaded or the revision is unknown
    #[error("SCENEPACK_CLI_SCHEMA_ERROR: {0}")]
    Schema(#[from] RegistryError),

    /// The decode aborted
    #[error("SCENEPACK_CLI_DECODE_FAILED: {0}")]
    Decode(#[from] DecodeError),

    /// One or more self-test cases failed
    #[error("SCENEPACK_CLI_SELFTEST_FAILED: {failed} of {total} cases failed")]
    SelftestFailed { failed: usize, total: usize },
}

impl CliError {
    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "SCENEPACK_CLI_CONFIG_ERROR",
            Self::Io(_) => "SCENEPACK_CLI_IO_ERROR",
            Self::Envelope(_) => "SCENEPACK_CLI_ENVELOPE_ERROR",
            Self::Schema(_) => "SCENEPACK_CLI_SCHEMA_ERROR",
            Self::Decode(_) => "SCENEPACK_CLI_DECODE_FAILED",
            Self::SelftestFailed { .. } => "SCENEPACK_CLI_SELFTEST_FAILED",
        }
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::SelftestFailed { .. } => 1,
            Self::Config(_) => 2,
            Self::Io(_) => 3,
            Self::Envelope(_) => 4,
            Self::Schema(_) => 5,
            Self::Decode(_) => 6,
        }
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_starts_with_code() {
        let err = CliError::config_error("bad value");
        assert_eq!(err.to_string(), "SCENEPACK_CLI_CONFIG_ERROR: bad value");
        assert_eq!(err.code(), "SCENEPACK_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_exit_codes_are_distinct() {
        let errors = [
            CliError::SelftestFailed {
                failed: 1,
                total: 2,
            },
            CliError::config_error("x"),
            CliError::io_error("x"),
            CliError::from(RegistryError::UnknownRevision(3)),
            CliError::from(DecodeError::graph_cycle(0)),
        ];
        let mut codes: Vec<i32> = errors.iter().map(CliError::exit_code).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
        assert!(codes.iter().all(|c| *c != 0));
    }

    #[test]
    fn test_decode_error_keeps_pack_code() {
        let err = CliError::from(DecodeError::graph_cycle(2));
        assert!(err.to_string().contains("PACK_GRAPH_CYCLE"));
    }
}
