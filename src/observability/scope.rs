//! Timed observation scopes
//!
//! A scope brackets one unit of work, such as a decode, with a pair of log
//! records: `{name}_BEGIN` when opened, then `{name}_COMPLETE` or
//! `{name}_FAILED` when closed. Closing records carry `elapsed_ms`. A scope
//! dropped while still open (an early return or a panic) logs
//! `{name}_INCOMPLETE`.
//!
//! Context such as node counts belongs on the enclosing `tracing` span, so
//! every record of the scope carries it as structured fields.

use std::time::Instant;

use tracing::{error, info, warn};

/// An open unit of work.
///
/// ```ignore
/// let scope = ObservationScope::new("DECODE");
/// let graph = build()?; // an early return logs DECODE_INCOMPLETE
/// scope.complete();
/// ```
pub struct ObservationScope<'a> {
    name: &'a str,
    started: Instant,
    closed: bool,
}

impl<'a> ObservationScope<'a> {
    pub fn new(name: &'a str) -> Self {
        info!(event = %format!("{}_BEGIN", name));
        Self {
            name,
            started: Instant::now(),
            closed: false,
        }
    }

    /// Milliseconds since the scope was opened
    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    /// Closes the scope successfully
    pub fn complete(mut self) {
        info!(
            event = %format!("{}_COMPLETE", self.name),
            elapsed_ms = self.elapsed_ms()
        );
        self.closed = true;
    }

    /// Closes the scope as failed
    pub fn fail(mut self, reason: &str) {
        error!(
            event = %format!("{}_FAILED", self.name),
            elapsed_ms = self.elapsed_ms(),
            reason = reason
        );
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Drop for ObservationScope<'_> {
    fn drop(&mut self) {
        if !self.closed {
            warn!(
                event = %format!("{}_INCOMPLETE", self.name),
                elapsed_ms = self.elapsed_ms()
            );
        }
    }
}
