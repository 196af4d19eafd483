#![forbid(unsafe_code)]
//! pgmi test-plan compiler
//!
//! Compiles an ordered list of test steps (fixtures, tests, teardown markers) into a single PostgreSQL script that
//! executes the suite with savepoint isolation and optional observer callbacks. The script contains no transaction
//! control: the caller opens a transaction, runs the script, and rolls back.
//!
//! ```rust
//! use pgmi_testplan::{Step, generate};
//!
//! let steps = vec![
//!     Step::test(1, "./__test__/01_smoke.sql", "./__test__/", 1),
//! ];
//! let plan = generate(&steps, "")?;
//! assert!(plan.sql.starts_with("SAVEPOINT __pgmi_d0__;"));
//! # Ok::<(), pgmi_testplan::PlanError>(())
//! ```
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` and `plan` modules
//!   enforce `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **True invariants**: If a panic represents a compiler bug (logic error), use `.expect("INVARIANT: reason")` with a
//!   clear explanation.

pub mod cli;
pub mod config;
pub mod plan;
pub mod version;

pub use config::PlanConfig;
pub use plan::{
    GeneratedPlan, PlanCompiler, PlanError, PlanSummary, SourceMap, SourceMapEntry, Step, StepKind,
    format_callback_existence_check, format_callback_invocation, render_listing,
};

/// Compile `steps` with the default configuration.
///
/// `callback` is the observer function name, or empty for a silent script.
pub fn generate(steps: &[Step], callback: &str) -> Result<GeneratedPlan, PlanError> {
    PlanCompiler::new().generate(steps, callback)
}
