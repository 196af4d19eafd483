//! Step kind vocabulary.
//!
//! The metadata resolver emits a flat plan in which every row is one of these kinds. Older plans label fixtures
//! as `setup`, which is kept as an alias.

use crate::registry::{self, VocabInfo};

/// Stable identifier for a plan step kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKindId {
    Fixture,
    Test,
    Teardown,
}

/// Metadata entry for a step kind.
pub type StepKindInfo = VocabInfo<StepKindId>;

pub const STEP_KINDS: &[StepKindInfo] = &[
    VocabInfo {
        id: StepKindId::Fixture,
        canonical: "fixture",
        aliases: &["setup"],
        description: "Directory-level setup script; its effects are visible to every test in the directory.",
    },
    VocabInfo {
        id: StepKindId::Test,
        canonical: "test",
        aliases: &[],
        description: "Test script; runs in a disposable savepoint.",
    },
    VocabInfo {
        id: StepKindId::Teardown,
        canonical: "teardown",
        aliases: &[],
        description: "Marker closing the innermost directory scope.",
    },
];

/// Resolve a step kind spelling (canonical or alias).
pub fn from_str(name: &str) -> Option<StepKindId> {
    registry::resolve(STEP_KINDS, name)
}

/// Return the canonical spelling for a step kind.
pub fn as_str(id: StepKindId) -> &'static str {
    info_for(id).canonical
}

/// Human-facing label used in plan listings.
pub fn label(id: StepKindId) -> &'static str {
    match id {
        StepKindId::Fixture => "Fixture",
        StepKindId::Test => "Test",
        StepKindId::Teardown => "Teardown",
    }
}

/// Return the metadata entry for a step kind.
pub fn info_for(id: StepKindId) -> &'static StepKindInfo {
    registry::lookup(STEP_KINDS, id).expect("INVARIANT: every StepKindId has a registry row")
}
