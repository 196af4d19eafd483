//! Define error types for plan compilation.
//!
//! Only input-shape problems are errors here. Anything that can go wrong while the script runs (a failing test, a
//! failing fixture) is handled by the database when the script executes.
//!
//! ## Notes
//!
//! - Every variant carries the offending step's ordinal so callers can point at the plan row.
//! - Diagnostic codes are stable; tooling may match on them.

use miette::Diagnostic;
use thiserror::Error;

use super::step::StepKind;

/// Error produced while compiling a plan.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum PlanError {
    #[error(
        "teardown at ordinal {ordinal} targets '{directory}' (depth {depth}), but the innermost open scope is \
         '{open_directory}' (depth {open_depth})"
    )]
    #[diagnostic(
        code(pgmi::plan::unmatched_teardown),
        help("teardown steps must close directory scopes in reverse order of opening")
    )]
    UnmatchedTeardown {
        ordinal: u32,
        directory: String,
        depth: u32,
        open_directory: String,
        open_depth: u32,
    },

    #[error("teardown at ordinal {ordinal} targets '{directory}' (depth {depth}), but no directory scope is open")]
    #[diagnostic(
        code(pgmi::plan::teardown_without_scope),
        help("a teardown needs a fixture or test in the same directory before it")
    )]
    TeardownWithoutScope { ordinal: u32, directory: String, depth: u32 },

    #[error("{kind} step at ordinal {ordinal} has no script path")]
    #[diagnostic(code(pgmi::plan::missing_script_path))]
    MissingScriptPath { ordinal: u32, kind: StepKind },

    #[error("step ordinal {ordinal} does not follow {previous}; plan steps must be sorted by strictly increasing ordinal")]
    #[diagnostic(code(pgmi::plan::ordinal_out_of_order))]
    OrdinalOutOfOrder { ordinal: u32, previous: u32 },

    #[error("block tag {tag:?} cannot delimit a dollar-quoted string")]
    #[diagnostic(
        code(pgmi::config::invalid_block_tag),
        help("block tags contain only ASCII letters, digits and underscores, and do not start with a digit")
    )]
    InvalidBlockTag { tag: String },
}

impl PlanError {
    /// Ordinal of the step that made the plan invalid, or `None` for configuration errors.
    pub fn ordinal(&self) -> Option<u32> {
        match self {
            PlanError::UnmatchedTeardown { ordinal, .. }
            | PlanError::TeardownWithoutScope { ordinal, .. }
            | PlanError::MissingScriptPath { ordinal, .. }
            | PlanError::OrdinalOutOfOrder { ordinal, .. } => Some(*ordinal),
            PlanError::InvalidBlockTag { .. } => None,
        }
    }
}

/// Error produced when a callback name is not a `[schema.]function` reference.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum CallbackNameError {
    #[error("invalid callback {name:?}: expected [schema.]function format")]
    #[diagnostic(code(pgmi::callback::too_many_parts))]
    TooManyParts { name: String },

    #[error("invalid callback {name:?}: empty identifier")]
    #[diagnostic(code(pgmi::callback::empty_identifier))]
    EmptyIdentifier { name: String },

    #[error("invalid callback {name:?}: identifier {part:?} exceeds {limit} character limit")]
    #[diagnostic(code(pgmi::callback::identifier_too_long))]
    IdentifierTooLong { name: String, part: String, limit: usize },

    #[error("invalid callback {name:?}: {part:?} is not a valid identifier")]
    #[diagnostic(
        code(pgmi::callback::invalid_identifier),
        help("identifiers start with a letter or underscore and contain only letters, digits and underscores")
    )]
    InvalidIdentifier { name: String, part: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unmatched_teardown_message() {
        let err = PlanError::UnmatchedTeardown {
            ordinal: 7,
            directory: "./a/".to_string(),
            depth: 1,
            open_directory: "./a/b/".to_string(),
            open_depth: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("ordinal 7"));
        assert!(msg.contains("'./a/b/' (depth 2)"));
        assert_eq!(err.ordinal(), Some(7));
    }

    #[test]
    fn test_missing_path_message_names_kind() {
        let err = PlanError::MissingScriptPath {
            ordinal: 3,
            kind: StepKind::Fixture,
        };
        assert_eq!(err.to_string(), "fixture step at ordinal 3 has no script path");
    }

    #[test]
    fn test_diagnostic_codes() {
        let err = PlanError::OrdinalOutOfOrder { ordinal: 2, previous: 5 };
        let code = err.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("pgmi::plan::ordinal_out_of_order"));
    }

    #[test]
    fn test_block_tag_error_has_no_ordinal() {
        let err = PlanError::InvalidBlockTag { tag: "1x".to_string() };
        assert_eq!(err.ordinal(), None);
        assert_eq!(err.code().map(|c| c.to_string()).as_deref(), Some("pgmi::config::invalid_block_tag"));
    }
}
