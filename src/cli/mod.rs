//! CLI module for the plan compiler
//!
//! Dry-run front end: reads a plan from a JSON file and prints what the compiler would hand to the database.
//!
//! ## Commands
//!
//! - `generate <PLAN>` - Print the compiled script (and optionally its source map)
//! - `list <PLAN>` - Print the plan listing with totals
//! - `resolve <PLAN> <LINE>` - Name the step a script line belongs to
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};

use crate::config::PlanConfig;
use crate::version::PGMI_PLAN_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }

    /// Render a diagnostic-carrying error through miette.
    pub fn diagnostic<E>(err: E) -> Self
    where
        E: miette::Diagnostic + Send + Sync + 'static,
    {
        Self::failure(format!("{:?}", miette::Report::new(err)))
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Dry-run front end for the pgmi test-plan compiler
#[derive(Parser, Debug)]
#[command(name = "pgmi-plan")]
#[command(version = PGMI_PLAN_VERSION)]
#[command(about = "Compile pgmi test plans into savepoint-scoped SQL", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the compiled script
    Generate {
        /// Plan file (JSON array of steps, or an object with a `steps` array)
        #[arg(value_name = "PLAN")]
        plan: PathBuf,
        /// Also print the source map to stderr
        #[arg(long)]
        source_map: bool,
        #[command(flatten)]
        options: PlanOptions,
    },

    /// Print the plan listing
    List {
        #[arg(value_name = "PLAN")]
        plan: PathBuf,
    },

    /// Name the step a line of the compiled script belongs to
    Resolve {
        #[arg(value_name = "PLAN")]
        plan: PathBuf,
        /// 1-based line number in the compiled script
        #[arg(value_name = "LINE")]
        line: usize,
        #[command(flatten)]
        options: PlanOptions,
    },
}

/// Compiler options shared by commands that compile.
#[derive(Args, Debug, Clone, Default)]
pub struct PlanOptions {
    /// Observer function receiving lifecycle events (`[schema.]name`)
    #[arg(long, value_name = "NAME", default_value = "")]
    pub callback: String,
    /// Table holding script bodies
    #[arg(long, value_name = "TABLE")]
    pub source_table: Option<String>,
    /// Composite type of the observer's argument
    #[arg(long, value_name = "TYPE")]
    pub event_type: Option<String>,
    /// Spaces per indentation level
    #[arg(long, value_name = "N")]
    pub indent: Option<usize>,
    /// Do not raise a WARNING when a test fails
    #[arg(long)]
    pub no_failure_warnings: bool,
}

impl PlanOptions {
    pub fn to_config(&self) -> PlanConfig {
        let mut config = PlanConfig::new().with_failure_warnings(!self.no_failure_warnings);
        if let Some(table) = &self.source_table {
            config = config.with_source_table(table.as_str());
        }
        if let Some(ty) = &self.event_type {
            config = config.with_event_type(ty.as_str());
        }
        if let Some(width) = self.indent {
            config = config.with_indent_width(width);
        }
        config
    }
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Generate {
            plan,
            source_map,
            options,
        } => commands::generate(&plan, &options, source_map),
        Command::List { plan } => commands::list(&plan),
        Command::Resolve { plan, line, options } => commands::resolve(&plan, line, &options),
    }
}

// ============================================================================
// Tests
// ============================================================================
