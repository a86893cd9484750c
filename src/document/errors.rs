//! Envelope parsing errors

use thiserror::Error;

/// Result type for envelope parsing
pub type EnvelopeResult<T> = Result<T, EnvelopeError>;

/// Errors raised while turning envelope JSON into a `PackedDocument`
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// Not JSON, or the top-level shape is wrong
    #[error("Invalid envelope JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A pool entry has no packed meaning
    #[error("Invalid pool entry {index}: {reason}")]
    InvalidPoolEntry { index: usize, reason: String },

    /// The asset table is neither an object nor an array of identifiers
    #[error("Invalid asset table: {0}")]
    InvalidAssetTable(String),
}

impl EnvelopeError {
    pub fn pool_entry(index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidPoolEntry {
            index,
            reason: reason.into(),
        }
    }
}
