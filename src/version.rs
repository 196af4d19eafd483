//! Plan compiler version information.
//!
//! ## Notes
//!
//! - The value is taken from Cargo metadata (`CARGO_PKG_VERSION`) at compile time.
//! - Prefer this constant over repeating `env!("CARGO_PKG_VERSION")` in multiple places.

/// The plan compiler version string (for example, `0.3.0`).
pub const PGMI_PLAN_VERSION: &str = env!("CARGO_PKG_VERSION");
