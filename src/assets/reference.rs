//! Asset references found in asset-typed fields

use std::fmt;

use serde::Serialize;

/// Lookup state of an asset reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetStatus {
    /// Not yet looked up in an asset table
    Pending,
    /// The slot exists in the asset table
    Resolved,
    /// The slot is missing from the asset table
    Unresolved,
}

impl AssetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetStatus::Pending => "pending",
            AssetStatus::Resolved => "resolved",
            AssetStatus::Unresolved => "unresolved",
        }
    }
}

/// A reference to an asset by slot index.
///
/// Only the stable identifier is ever attached; asset contents are never
/// loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetReference {
    /// Slot index into the asset table
    pub slot: usize,
    /// Stable identifier, once resolved
    pub identifier: Option<String>,
    pub status: AssetStatus,
}

impl AssetReference {
    /// A reference that has not been looked up yet
    pub fn pending(slot: usize) -> Self {
        Self {
            slot,
            identifier: None,
            status: AssetStatus::Pending,
        }
    }

    pub fn resolved(slot: usize, identifier: impl Into<String>) -> Self {
        Self {
            slot,
            identifier: Some(identifier.into()),
            status: AssetStatus::Resolved,
        }
    }

    pub fn unresolved(slot: usize) -> Self {
        Self {
            slot,
            identifier: None,
            status: AssetStatus::Unresolved,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.status == AssetStatus::Resolved
    }
}

impl fmt::Display for AssetReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.status, &self.identifier) {
            (AssetStatus::Resolved, Some(id)) => write!(f, "asset#{} -> {}", self.slot, id),
            (AssetStatus::Unresolved, _) => write!(f, "asset#{} (unresolved)", self.slot),
            _ => write!(f, "asset#{}", self.slot),
        }
    }
}
