//! Plan generation configuration
//!
//! Names of the session objects the script refers to and a few layout knobs. Defaults match the objects the pgmi
//! session loader creates in `pg_temp`.

use pgmi_core::sql::{DEFAULT_BLOCK_TAG, DEFAULT_EVENT_TYPE, DEFAULT_SOURCE_TABLE};

/// Plan generation configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanConfig {
    /// Table holding script bodies (`path`, `content` columns), as a possibly schema-qualified name
    pub source_table: String,
    /// Composite type passed to the observer callback
    pub event_type: String,
    /// Base tag for dollar-quoted DO block bodies (without the surrounding `$`); checked by `PlanCompiler::generate`
    pub block_tag: String,
    /// Number of spaces per indentation level inside multi-line blocks
    pub indent_width: usize,
    /// Whether a failing test raises a WARNING naming the script before its writes are discarded
    pub failure_warnings: bool,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            source_table: DEFAULT_SOURCE_TABLE.to_string(),
            event_type: DEFAULT_EVENT_TYPE.to_string(),
            block_tag: DEFAULT_BLOCK_TAG.to_string(),
            indent_width: 4,
            failure_warnings: true,
        }
    }
}

impl PlanConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the source table
    pub fn with_source_table(mut self, table: impl Into<String>) -> Self {
        self.source_table = table.into();
        self
    }

    /// Set the event row type
    pub fn with_event_type(mut self, ty: impl Into<String>) -> Self {
        self.event_type = ty.into();
        self
    }

    /// Set the dollar-quote base tag
    ///
    /// The tag must be ASCII letters, digits and underscores, not starting with a digit. `PlanCompiler::generate`
    /// rejects anything else.
    pub fn with_block_tag(mut self, tag: impl Into<String>) -> Self {
        self.block_tag = tag.into();
        self
    }

    /// Set the indentation width
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    /// Enable or disable the WARNING raised by a failing test
    pub fn with_failure_warnings(mut self, enabled: bool) -> Self {
        self.failure_warnings = enabled;
        self
    }
}
