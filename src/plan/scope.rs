//! Directory scope tracking.
//!
//! Directories nest, but their teardown markers arrive as flat rows later in the plan, not as a call-stack unwind.
//! Open scopes are therefore kept on an explicit LIFO stack and a teardown closes the scope it names by lookup.
//!
//! ## Notes
//!
//! - At most one scope per `(directory, depth)` is open at any time.
//! - Savepoint serials come from one counter shared with per-test savepoints, so no two savepoints in a script ever
//!   share a name, even for sibling directories at the same depth.
//! - Retiring a scope releases its savepoint: the directory's effects merge into the parent. Discarding everything is
//!   the job of the caller's enclosing transaction.

use pgmi_core::sql::{SavepointClass, savepoint_name};

use super::errors::PlanError;

/// Identity of a directory scope, unique within one compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(u32);

impl ScopeId {
    pub fn serial(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeState {
    Open,
    Closed,
}

/// One directory checkpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    pub id: ScopeId,
    pub directory: String,
    pub depth: u32,
    pub state: ScopeState,
    pub savepoint: String,
}

impl Scope {
    fn matches(&self, directory: &str, depth: u32) -> bool {
        self.depth == depth && self.directory == directory
    }
}

/// Result of entering a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeEntry {
    /// A new scope was pushed; its savepoint must be opened now
    Opened(String),
    /// The directory already has an open scope; nothing to emit
    AlreadyOpen(String),
}

/// LIFO stack of open directory scopes.
#[derive(Debug, Default)]
pub struct ScopeStack {
    open: Vec<Scope>,
    next_serial: u32,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter `directory`, opening a scope for it unless one is already open.
    pub fn enter(&mut self, directory: &str, depth: u32) -> ScopeEntry {
        if let Some(scope) = self.open.iter().rev().find(|s| s.matches(directory, depth)) {
            return ScopeEntry::AlreadyOpen(scope.savepoint.clone());
        }

        let serial = self.allocate();
        let savepoint = savepoint_name(SavepointClass::Directory, serial);
        tracing::debug!(directory, depth, savepoint = %savepoint, "opening directory scope");
        self.open.push(Scope {
            id: ScopeId(serial),
            directory: directory.to_string(),
            depth,
            state: ScopeState::Open,
            savepoint: savepoint.clone(),
        });
        ScopeEntry::Opened(savepoint)
    }

    /// Allocate a disposable savepoint isolating a single test.
    ///
    /// Not tied to any directory: the caller opens it before the test and rolls back to it afterwards.
    pub fn isolate_test(&mut self) -> String {
        let serial = self.allocate();
        savepoint_name(SavepointClass::Test, serial)
    }

    /// Close the innermost scope, which must belong to `(directory, depth)`.
    pub fn exit(&mut self, ordinal: u32, directory: &str, depth: u32) -> Result<Scope, PlanError> {
        let Some(innermost) = self.open.last() else {
            return Err(PlanError::TeardownWithoutScope {
                ordinal,
                directory: directory.to_string(),
                depth,
            });
        };

        if !innermost.matches(directory, depth) {
            return Err(PlanError::UnmatchedTeardown {
                ordinal,
                directory: directory.to_string(),
                depth,
                open_directory: innermost.directory.clone(),
                open_depth: innermost.depth,
            });
        }

        let mut scope = self.open.pop().ok_or(PlanError::TeardownWithoutScope {
            ordinal,
            directory: directory.to_string(),
            depth,
        })?;
        scope.state = ScopeState::Closed;
        tracing::debug!(directory, depth, savepoint = %scope.savepoint, "retiring directory scope");
        Ok(scope)
    }

    /// Innermost open scope, if any.
    pub fn innermost(&self) -> Option<&Scope> {
        self.open.last()
    }

    /// Number of open scopes.
    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    /// Close every scope still open at the end of the plan, innermost first.
    ///
    /// No statement is emitted for these: the caller's transaction discards them with everything else.
    pub fn finish(mut self) -> Vec<Scope> {
        let mut closed = Vec::with_capacity(self.open.len());
        while let Some(mut scope) = self.open.pop() {
            scope.state = ScopeState::Closed;
            if scope.depth > 0 {
                tracing::warn!(
                    directory = %scope.directory,
                    depth = scope.depth,
                    "directory scope was never torn down; leaving it to the enclosing transaction"
                );
            } else {
                tracing::debug!(directory = %scope.directory, "closing root scope at end of plan");
            }
            closed.push(scope);
        }
        closed
    }

    fn allocate(&mut self) -> u32 {
        let serial = self.next_serial;
        self.next_serial += 1;
        serial
    }
}
