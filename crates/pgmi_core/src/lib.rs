//! Provide the canonical vocabulary shared by the pgmi test-plan compiler and its tooling.
//!
//! This crate is intentionally small and dependency-free. It holds the spellings that appear on the wire between
//! the generated SQL and the database session:
//! - lifecycle event names delivered to the observer callback,
//! - step kinds produced by the metadata resolver,
//! - names of session objects (source table, event row type) and savepoint naming rules.
//!
//! ## Notes
//!
//! - No IO, no global state, no compiler types. Callers work with stable IDs (`EventId`, `StepKindId`) and look up
//!   spellings through the registry tables.
//!
//! ## Examples
//! ```rust
//! use pgmi_core::events::{self, EventId};
//!
//! assert_eq!(events::from_str("test_start"), Some(EventId::TestStart));
//! assert_eq!(events::as_str(EventId::Rollback), "rollback");
//! ```

pub mod events;
pub mod registry;
pub mod sql;
pub mod steps;
