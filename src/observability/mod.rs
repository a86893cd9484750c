//! Observability subsystem
//!
//! Lifecycle events and scoped begin/complete logging on top of `tracing`.
//! The library never installs a subscriber; the binary does.
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on decoding
//! 3. No background threads
//!
//! # Usage
//!
//! ```ignore
//! use crate::observability::{log_event, Event, ObservationScope};
//!
//! log_event!(Event::SchemasLoaded, classes = 16);
//!
//! let span = tracing::info_span!("decode", nodes = 12, issues = tracing::field::Empty);
//! let _entered = span.enter();
//! let scope = ObservationScope::new("DECODE");
//! // ... do work ...
//! span.record("issues", 0);
//! scope.complete();
//! ```

mod events;
mod scope;

pub use events::Event;
pub use scope::ObservationScope;

/// Logs a lifecycle event, followed by any `tracing` field list.
///
/// Failure events log at error level, the rest at info.
macro_rules! log_event {
    ($event:expr $(, $($fields:tt)+)?) => {{
        let event: $crate::observability::Event = $event;
        if event.is_failure() {
            ::tracing::error!(event = event.as_str() $(, $($fields)+)?);
        } else {
            ::tracing::info!(event = event.as_str() $(, $($fields)+)?);
        }
    }};
}

pub(crate) use log_event;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event() {
        log_event!(Event::DocumentParsed);
        log_event!(Event::SchemasLoaded, revisions = 1);
        log_event!(Event::DocumentRejected, reason = %"bad envelope");
    }

    #[test]
    fn test_log_event_evaluates_event_once() {
        let mut evaluated = 0;
        log_event!(
            {
                evaluated += 1;
                Event::SelftestFailed
            },
            case = "memoization",
            reason = "mismatch"
        );
        assert_eq!(evaluated, 1);
    }
}
