//! Names of the session objects and savepoints the generated script refers to.
//!
//! The session loader creates the source table and the event row type in `pg_temp` before the plan runs. The
//! compiler only references them by name.

/// Table holding test script bodies, keyed by `path`.
pub const DEFAULT_SOURCE_TABLE: &str = "pg_temp._pgmi_test_source";

/// Composite type every observer callback receives.
pub const DEFAULT_EVENT_TYPE: &str = "pg_temp.pgmi_test_event";

/// Base tag for dollar-quoted DO block bodies.
pub const DEFAULT_BLOCK_TAG: &str = "__pgmi__";

/// Field names of the event row, in positional order.
///
/// `context` is reserved for a future event payload and is always `NULL` today.
pub const EVENT_FIELDS: &[&str] = &["event", "path", "directory", "depth", "ordinal", "context"];

/// Error conditions a test's exception handler catches.
///
/// `OTHERS` excludes `assert_failure`, so PL/pgSQL `ASSERT` failures must be named explicitly. `query_canceled` stays
/// uncaught: a statement timeout or cancel request aborts the whole run.
pub const TEST_FAILURE_CONDITIONS: &[&str] = &["OTHERS", "assert_failure"];

/// PostgreSQL identifier length limit (`NAMEDATALEN - 1`).
pub const MAX_IDENTIFIER_LEN: usize = 63;

/// Savepoint class: one per directory scope, or one per test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SavepointClass {
    Directory,
    Test,
}

impl SavepointClass {
    /// Single-letter marker embedded in the savepoint name.
    pub fn marker(self) -> char {
        match self {
            SavepointClass::Directory => 'd',
            SavepointClass::Test => 't',
        }
    }
}

/// Render a savepoint name, e.g. `__pgmi_d0__`.
///
/// `serial` comes from a counter shared by both classes, so two savepoints of one script never share a number.
pub fn savepoint_name(class: SavepointClass, serial: u32) -> String {
    format!("__pgmi_{}{}__", class.marker(), serial)
}

/// Class of a savepoint name produced by [`savepoint_name`], if it is one.
pub fn classify_savepoint(name: &str) -> Option<SavepointClass> {
    let inner = name.strip_prefix("__pgmi_")?.strip_suffix("__")?;
    let mut chars = inner.chars();
    let class = match chars.next()? {
        'd' => SavepointClass::Directory,
        't' => SavepointClass::Test,
        _ => return None,
    };
    let digits = chars.as_str();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(class)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_savepoint_names() {
        assert_eq!(savepoint_name(SavepointClass::Directory, 0), "__pgmi_d0__");
        assert_eq!(savepoint_name(SavepointClass::Test, 12), "__pgmi_t12__");
    }

    #[test]
    fn test_classify_savepoint() {
        assert_eq!(classify_savepoint("__pgmi_d3__"), Some(SavepointClass::Directory));
        assert_eq!(classify_savepoint("__pgmi_t10__"), Some(SavepointClass::Test));
        assert_eq!(classify_savepoint("__pgmi_x1__"), None);
        assert_eq!(classify_savepoint("__pgmi_d__"), None);
        assert_eq!(classify_savepoint("sp1"), None);
    }

    #[test]
    fn test_failure_conditions_include_assert() {
        assert!(TEST_FAILURE_CONDITIONS.contains(&"OTHERS"));
        assert!(TEST_FAILURE_CONDITIONS.contains(&"assert_failure"));
        assert!(!TEST_FAILURE_CONDITIONS.contains(&"query_canceled"));
    }

    #[test]
    fn test_event_fields_shape() {
        assert_eq!(EVENT_FIELDS.len(), 6);
        assert_eq!(EVENT_FIELDS[0], "event");
    }
}
