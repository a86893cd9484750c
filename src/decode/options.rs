//! Decode options

use serde::{Deserialize, Serialize};

/// What to do when a type identifier is missing from the registry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownTypePolicy {
    /// Record an `UnknownType` issue, decode the record positionally
    #[default]
    Report,
    /// Abort the decode
    Fail,
}

/// Options for a single decode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    pub unknown_types: UnknownTypePolicy,
    /// Resolve asset references against the document's asset table
    pub resolve_assets: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            unknown_types: UnknownTypePolicy::Report,
            resolve_assets: true,
        }
    }
}

impl DecodeOptions {
    pub fn strict() -> Self {
        Self {
            unknown_types: UnknownTypePolicy::Fail,
            ..Self::default()
        }
    }
}
