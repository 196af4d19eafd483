//! Plan input: one row per fixture, test, or teardown marker.
//!
//! Steps come from the metadata resolver already sorted by ordinal. A directory's fixture is optional; its
//! teardown arrives as a later, separate row rather than as a nested structure.

use std::fmt;

use pgmi_core::steps::{self, StepKindId};
use serde::{Deserialize, Serialize};

/// Kind of a plan step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StepKind {
    Fixture,
    Test,
    Teardown,
}

impl StepKind {
    /// Canonical spelling (`fixture`, `test`, `teardown`).
    pub fn as_str(self) -> &'static str {
        steps::as_str(self.into())
    }

    /// Label used in listings (`Fixture`, `Test`, `Teardown`).
    pub fn label(self) -> &'static str {
        steps::label(self.into())
    }

    /// Whether steps of this kind execute a script.
    pub fn runs_script(self) -> bool {
        !matches!(self, StepKind::Teardown)
    }
}

impl From<StepKind> for StepKindId {
    fn from(kind: StepKind) -> Self {
        match kind {
            StepKind::Fixture => StepKindId::Fixture,
            StepKind::Test => StepKindId::Test,
            StepKind::Teardown => StepKindId::Teardown,
        }
    }
}

impl From<StepKindId> for StepKind {
    fn from(id: StepKindId) -> Self {
        match id {
            StepKindId::Fixture => StepKind::Fixture,
            StepKindId::Test => StepKind::Test,
            StepKindId::Teardown => StepKind::Teardown,
        }
    }
}

impl TryFrom<String> for StepKind {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        steps::from_str(&value)
            .map(StepKind::from)
            .ok_or_else(|| format!("unknown step kind {value:?} (expected fixture, test or teardown)"))
    }
}

impl From<StepKind> for String {
    fn from(kind: StepKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One planned unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Position in the plan; strictly increasing across the input
    pub ordinal: u32,
    #[serde(alias = "step_type")]
    pub kind: StepKind,
    /// Script to execute; required for fixtures and tests, absent for teardown markers
    #[serde(default, alias = "path")]
    pub script_path: Option<String>,
    /// Normalized directory the step belongs to (the scoping unit)
    pub directory: String,
    /// Nesting level of `directory`, 0 for the root
    #[serde(default)]
    pub depth: u32,
}

impl Step {
    pub fn fixture(ordinal: u32, path: impl Into<String>, directory: impl Into<String>, depth: u32) -> Self {
        Self {
            ordinal,
            kind: StepKind::Fixture,
            script_path: Some(path.into()),
            directory: directory.into(),
            depth,
        }
    }

    pub fn test(ordinal: u32, path: impl Into<String>, directory: impl Into<String>, depth: u32) -> Self {
        Self {
            ordinal,
            kind: StepKind::Test,
            script_path: Some(path.into()),
            directory: directory.into(),
            depth,
        }
    }

    pub fn teardown(ordinal: u32, directory: impl Into<String>, depth: u32) -> Self {
        Self {
            ordinal,
            kind: StepKind::Teardown,
            script_path: None,
            directory: directory.into(),
            depth,
        }
    }

    pub fn script_path(&self) -> Option<&str> {
        self.script_path.as_deref()
    }
}
