//! Lifecycle event vocabulary.
//!
//! The generated script reports progress by calling an observer function with a `pgmi_test_event` row whose first
//! field is one of the names below. The set is closed: observers may switch on these spellings.

use crate::registry::{self, VocabInfo};

/// Stable identifier for a lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventId {
    SuiteStart,
    SuiteEnd,
    FixtureStart,
    FixtureEnd,
    TestStart,
    TestEnd,
    Rollback,
    TeardownStart,
    TeardownEnd,
}

/// Metadata entry for an event.
pub type EventInfo = VocabInfo<EventId>;

/// Registry of lifecycle events, in the order they can first occur in a script.
pub const EVENTS: &[EventInfo] = &[
    info(EventId::SuiteStart, "suite_start", "Emitted once before the first step."),
    info(EventId::SuiteEnd, "suite_end", "Emitted once after the last step."),
    info(EventId::FixtureStart, "fixture_start", "A directory fixture is about to run."),
    info(EventId::FixtureEnd, "fixture_end", "A directory fixture finished."),
    info(EventId::TestStart, "test_start", "A test is about to run inside its own savepoint."),
    info(EventId::TestEnd, "test_end", "A test finished and its writes were discarded."),
    info(EventId::Rollback, "rollback", "A test raised; its writes are being rolled back."),
    info(EventId::TeardownStart, "teardown_start", "A directory scope is being retired."),
    info(EventId::TeardownEnd, "teardown_end", "A directory scope was retired."),
];

/// Resolve an event name to its stable id.
pub fn from_str(name: &str) -> Option<EventId> {
    registry::resolve(EVENTS, name)
}

/// Return the canonical spelling for an event.
pub fn as_str(id: EventId) -> &'static str {
    info_for(id).canonical
}

/// Return the metadata entry for an event.
pub fn info_for(id: EventId) -> &'static EventInfo {
    registry::lookup(EVENTS, id).expect("INVARIANT: every EventId has a registry row")
}

/// Whether the event row carries the step's script path.
///
/// Suite and teardown events describe a directory or the whole run, so their path field is `NULL`.
pub fn carries_script_path(id: EventId) -> bool {
    matches!(
        id,
        EventId::FixtureStart | EventId::FixtureEnd | EventId::TestStart | EventId::TestEnd | EventId::Rollback
    )
}

const fn info(id: EventId, canonical: &'static str, description: &'static str) -> EventInfo {
    VocabInfo {
        id,
        canonical,
        aliases: &[],
        description,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_events_round_trip() {
        for info in EVENTS {
            assert_eq!(from_str(info.canonical), Some(info.id));
            assert_eq!(as_str(info.id), info.canonical);
        }
    }

    #[test]
    fn test_unknown_event() {
        assert_eq!(from_str("suite_begin"), None);
        assert_eq!(from_str(""), None);
    }

    #[test]
    fn test_path_carrying_events() {
        assert!(carries_script_path(EventId::TestStart));
        assert!(carries_script_path(EventId::Rollback));
        assert!(!carries_script_path(EventId::SuiteStart));
        assert!(!carries_script_path(EventId::TeardownEnd));
    }
}
