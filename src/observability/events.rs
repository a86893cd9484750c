//! Observable lifecycle events
//!
//! Events are explicit and typed. Each has a stable uppercase name used as
//! the `event` field of the log record.

use std::fmt;

/// Observable events in scenepack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration file loaded and validated
    ConfigLoaded,
    /// Class tables loaded from the schema directory
    SchemasLoaded,

    // Input
    /// Envelope parsed into a packed document
    DocumentParsed,
    /// Envelope rejected
    DocumentRejected,

    // Decode
    /// A component type is absent from the class registry
    UnknownType,
    /// Asset references looked up in the asset table
    AssetsResolved,

    // Self-test
    /// A self-test case passed
    SelftestPassed,
    /// A self-test case failed
    SelftestFailed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SchemasLoaded => "SCHEMAS_LOADED",
            Event::DocumentParsed => "DOCUMENT_PARSED",
            Event::DocumentRejected => "DOCUMENT_REJECTED",
            Event::UnknownType => "UNKNOWN_TYPE",
            Event::AssetsResolved => "ASSETS_RESOLVED",
            Event::SelftestPassed => "SELFTEST_CASE_PASSED",
            Event::SelftestFailed => "SELFTEST_CASE_FAILED",
        }
    }

    /// Returns true if this event reports a failure
    pub fn is_failure(&self) -> bool {
        matches!(self, Event::DocumentRejected | Event::SelftestFailed)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
