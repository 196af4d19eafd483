//! Test-plan compilation
//!
//! Turns an ordered list of plan steps (fixtures, tests, teardown markers) into one SQL script that runs the whole
//! suite inside the caller's transaction, using savepoints for isolation:
//!
//! - each directory opens a scope savepoint on first use; its fixtures run inside it and it is released by the
//!   directory's teardown marker
//! - each test runs inside its own savepoint, which is always rolled back, so tests never see each other's writes
//! - an optional observer callback receives one event row per lifecycle transition
//!
//! ## Modules
//!
//! - `compiler` - `PlanCompiler` facade and `GeneratedPlan`
//! - `emitter` - single-pass statement emission
//! - `scope` - directory scope stack and savepoint naming
//! - `callback` - observer events and invocation formatting
//! - `quote` - SQL literal/identifier quoting and dollar-quote tags
//! - `source_map` - script line → step mapping
//! - `summary` - dry-run listing
//! - `writer` - indentation-aware line writer

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]

pub mod callback;
pub mod compiler;
mod emitter;
pub mod errors;
pub mod quote;
pub mod scope;
pub mod source_map;
pub mod step;
pub mod summary;
mod writer;

pub use callback::{CallbackEvent, Observer, format_callback_existence_check, format_callback_invocation};
pub use compiler::{GeneratedPlan, PlanCompiler};
pub use errors::{CallbackNameError, PlanError};
pub use source_map::{SourceMap, SourceMapEntry};
pub use step::{Step, StepKind};
pub use summary::{PlanSummary, render_listing};
