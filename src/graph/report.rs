//! Resolution report

use serde::Serialize;

use crate::decode::{DecodeError, DecodeErrorCode};

/// Counters and recoverable issues collected during a decode.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResolutionReport {
    pub resolved_asset_count: usize,
    pub unresolved_asset_count: usize,
    pub unknown_type_count: usize,
    pub field_mismatch_count: usize,
    /// Recoverable issues, in the order they were found
    pub issues: Vec<DecodeError>,
}

impl ResolutionReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a recoverable issue and bumps its counter
    pub fn record(&mut self, issue: DecodeError) {
        match issue.code() {
            DecodeErrorCode::UnknownType => self.unknown_type_count += 1,
            DecodeErrorCode::TypeMismatch => self.field_mismatch_count += 1,
            _ => {}
        }
        self.issues.push(issue);
    }

    /// No issues and no unresolved assets
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty() && self.unresolved_asset_count == 0
    }

    /// Issues with a given code
    pub fn issues_with(&self, code: DecodeErrorCode) -> impl Iterator<Item = &DecodeError> {
        self.issues.iter().filter(move |issue| issue.code() == code)
    }
}
