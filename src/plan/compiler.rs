//! Plan compiler facade
//!
//! `PlanCompiler` is the entry point turning an ordered step list into a script and its source map:
//!
//! ```text
//! Vec<Step> → StatementEmitter (ScopeStack + Observer) → GeneratedPlan { sql, source_map }
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use pgmi_testplan::{PlanCompiler, Step};
//!
//! let steps = vec![
//!     Step::fixture(1, "./t/__test__/_setup.sql", "./t/__test__/", 1),
//!     Step::test(2, "./t/__test__/01_insert.sql", "./t/__test__/", 1),
//!     Step::teardown(3, "./t/__test__/", 1),
//! ];
//! let plan = PlanCompiler::new().generate(&steps, "pg_temp.observer")?;
//! assert_eq!(plan.source_map.len(), 2);
//! # Ok::<(), pgmi_testplan::PlanError>(())
//! ```
//!
//! ## Guarantees
//!
//! - Pure: identical input yields byte-identical output. No randomness, clock, or global state is involved, so dry
//!   runs can be diffed.
//! - Empty input yields an empty script and an empty source map, never an error.
//! - The script contains no transaction control; run it inside a transaction the caller opens and rolls back.

use super::emitter::StatementEmitter;
use super::errors::PlanError;
use super::quote::is_valid_dollar_tag;
use super::source_map::SourceMap;
use super::step::Step;
use crate::config::PlanConfig;

/// Generated script and its source map.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GeneratedPlan {
    /// UTF-8 SQL script, statements separated by newlines
    pub sql: String,
    pub source_map: SourceMap,
}

impl GeneratedPlan {
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }
}

/// Compiles plan steps into a savepoint-scoped SQL script.
///
/// Holds configuration only; every `generate` call starts from fresh state, so one compiler can be shared across
/// threads.
#[derive(Debug, Clone, Default)]
pub struct PlanCompiler {
    config: PlanConfig,
}

impl PlanCompiler {
    /// Create a compiler with default settings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PlanConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlanConfig {
        &self.config
    }

    /// Compile `steps` into a script. `callback` names the observer function, or is empty to disable events.
    ///
    /// ## Errors
    ///
    /// Returns a [`PlanError`] when the input is malformed: ordinals out of order, a fixture or test without a
    /// script path, a teardown that does not close the innermost open directory scope, or a configured block tag that
    /// cannot delimit a dollar-quoted string.
    #[tracing::instrument(skip_all, fields(step_count = steps.len(), has_callback = !callback.is_empty()))]
    pub fn generate(&self, steps: &[Step], callback: &str) -> Result<GeneratedPlan, PlanError> {
        if steps.is_empty() {
            return Ok(GeneratedPlan::default());
        }

        if !is_valid_dollar_tag(&self.config.block_tag) {
            return Err(PlanError::InvalidBlockTag {
                tag: self.config.block_tag.clone(),
            });
        }

        let (sql, source_map) = StatementEmitter::new(&self.config, callback).emit_plan(steps)?;
        tracing::debug!(entries = source_map.len(), bytes = sql.len(), "plan compiled");
        Ok(GeneratedPlan { sql, source_map })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_with_callback_is_empty() {
        let plan = PlanCompiler::new().generate(&[], "pg_temp.observer").unwrap();
        assert!(plan.is_empty());
        assert!(plan.source_map.is_empty());
    }

    #[test]
    fn test_generate_is_deterministic() {
        let steps = vec![
            Step::fixture(1, "f.sql", "./a/", 0),
            Step::test(2, "t.sql", "./a/", 0),
            Step::teardown(3, "./a/", 0),
        ];
        let compiler = PlanCompiler::new();
        let first = compiler.generate(&steps, "obs").unwrap();
        let second = compiler.generate(&steps, "obs").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_config_is_used() {
        let compiler = PlanCompiler::with_config(PlanConfig::new().with_event_type("ev.row"));
        let plan = compiler.generate(&[Step::test(1, "t.sql", "./", 0)], "obs").unwrap();
        assert!(plan.sql.contains("::ev.row);"));
        assert_eq!(compiler.config().event_type, "ev.row");
    }

    #[test]
    fn test_error_propagates() {
        let err = PlanCompiler::new()
            .generate(&[Step::teardown(1, "./a/", 0)], "")
            .unwrap_err();
        assert_eq!(err.ordinal(), Some(1));
    }

    #[test]
    fn test_invalid_block_tag_is_rejected() {
        let step = [Step::test(1, "t.sql", "./", 0)];
        for tag in ["pgmi-plan", "1tag", "a$b"] {
            let compiler = PlanCompiler::with_config(PlanConfig::new().with_block_tag(tag));
            assert_eq!(
                compiler.generate(&step, "").unwrap_err(),
                PlanError::InvalidBlockTag { tag: tag.to_string() }
            );
        }
        let compiler = PlanCompiler::with_config(PlanConfig::new().with_block_tag("Plan_2"));
        assert!(compiler.generate(&step, "").unwrap().sql.contains("DO $Plan_2$"));
    }
}
