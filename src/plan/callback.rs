//! Observer callback statements.
//!
//! When the caller names an observer function, the script reports every lifecycle step to it as a positional
//! `pgmi_test_event` row:
//!
//! ```text
//! (event text, path text | NULL, directory text, depth integer, ordinal integer, context NULL)
//! ```
//!
//! ## Notes
//!
//! - A plain `[schema.]function` name is spliced in verbatim. Any other name would be an injection vector, so it is
//!   only ever passed as a quoted literal, resolved through `regproc`, and invoked with dynamic SQL.
//! - The existence check is a single exception-guarded DO block placed before any savepoint, so a missing observer
//!   aborts the run before it touches database state.

use pgmi_core::events::{self, EventId};
use pgmi_core::sql::EVENT_FIELDS;

use super::quote::{dollar_tag, escape_qualified_name, is_plain_qualified_name, quote_literal, quote_nullable};
use super::step::Step;
use crate::config::PlanConfig;

/// A lifecycle event about to be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallbackEvent<'a> {
    pub event: EventId,
    pub script_path: Option<&'a str>,
    pub directory: &'a str,
    pub depth: u32,
    pub ordinal: u32,
}

impl<'a> CallbackEvent<'a> {
    /// Event describing `step`. The script path is kept only for events that carry one.
    pub fn for_step(event: EventId, step: &'a Step) -> Self {
        Self {
            event,
            script_path: step.script_path().filter(|_| events::carries_script_path(event)),
            directory: &step.directory,
            depth: step.depth,
            ordinal: step.ordinal,
        }
    }

    /// Suite-level event (`suite_start`/`suite_end`): empty directory, depth 0.
    pub fn suite(event: EventId, ordinal: u32) -> Self {
        Self {
            event,
            script_path: None,
            directory: "",
            depth: 0,
            ordinal,
        }
    }

    /// Render the `ROW(...)::<type>` value, one positional value per event field.
    fn row(&self, event_type: &str) -> String {
        let values: [String; EVENT_FIELDS.len()] = [
            quote_literal(events::as_str(self.event)),
            quote_nullable(self.script_path),
            quote_literal(self.directory),
            self.depth.to_string(),
            self.ordinal.to_string(),
            // context
            "NULL".to_string(),
        ];
        format!("ROW({})::{}", values.join(", "), event_type)
    }
}

/// How the callback is reached from SQL.
#[derive(Debug, Clone, PartialEq, Eq)]
enum CallTarget {
    /// Plain `[schema.]function` name, spliced in as-is
    Direct(String),
    /// Quoted literal resolved through `regproc` at run time
    Dynamic(String),
}

/// Observer capability, resolved once per compilation.
///
/// Built only when a callback name is present; an absent observer is `None` rather than a flag checked at every
/// emission site.
#[derive(Debug, Clone)]
pub struct Observer {
    callback: String,
    target: CallTarget,
    event_type: String,
    block_tag: String,
}

impl Observer {
    /// Build the observer for `callback`, or `None` when events are disabled.
    pub fn new(callback: &str, config: &PlanConfig) -> Option<Self> {
        if callback.is_empty() {
            return None;
        }
        let target = if is_plain_qualified_name(callback) {
            CallTarget::Direct(callback.to_string())
        } else {
            CallTarget::Dynamic(quote_literal(callback))
        };
        Some(Self {
            callback: callback.to_string(),
            target,
            event_type: escape_qualified_name(&config.event_type),
            block_tag: config.block_tag.clone(),
        })
    }

    pub fn callback(&self) -> &str {
        &self.callback
    }

    /// Top-level statement delivering `event`.
    pub fn invocation(&self, event: &CallbackEvent<'_>) -> String {
        let row = event.row(&self.event_type);
        match &self.target {
            CallTarget::Direct(name) => format!("SELECT {name}({row});"),
            CallTarget::Dynamic(literal) => {
                let body = format!(" BEGIN {} END ", dynamic_call(literal, &row));
                let tag = dollar_tag(&body, &self.block_tag);
                format!("DO {tag}{body}{tag};")
            }
        }
    }

    /// PL/pgSQL statement delivering `event` from inside a block (e.g. an exception handler).
    pub fn handler_invocation(&self, event: &CallbackEvent<'_>) -> String {
        let row = event.row(&self.event_type);
        match &self.target {
            CallTarget::Direct(name) => format!("PERFORM {name}({row});"),
            CallTarget::Dynamic(literal) => dynamic_call(literal, &row),
        }
    }

    /// DO block verifying the callback resolves to a function.
    pub fn existence_check(&self) -> String {
        let reference = quote_literal(&self.callback);
        let body = format!(
            " BEGIN PERFORM {reference}::regproc; EXCEPTION WHEN undefined_function OR invalid_name THEN \
             RAISE EXCEPTION 'Callback function \"%\" does not exist. Expected signature: (%) RETURNS void', \
             {}, {}; END ",
            quote_literal(&self.callback),
            quote_literal(&self.event_type)
        );
        let tag = dollar_tag(&body, &self.block_tag);
        format!("DO {tag}{body}{tag};")
    }
}

/// Call a `regproc`-resolved function with the event row bound as `$1`.
fn dynamic_call(literal: &str, row: &str) -> String {
    format!("EXECUTE format('SELECT %s($1)', {literal}::regproc) USING {row};")
}

/// Format one callback invocation with the default event type.
///
/// Produces `SELECT <callback>(ROW('<event>', <path|NULL>, '<directory>', <depth>, <ordinal>, NULL)::pg_temp.pgmi_test_event);`
/// for plain callback names. Returns an empty string for an empty callback.
pub fn format_callback_invocation(
    callback: &str,
    event: EventId,
    path: Option<&str>,
    directory: &str,
    depth: u32,
    ordinal: u32,
) -> String {
    let event = CallbackEvent {
        event,
        script_path: path,
        directory,
        depth,
        ordinal,
    };
    Observer::new(callback, &PlanConfig::default())
        .map(|o| o.invocation(&event))
        .unwrap_or_default()
}

/// Format the callback existence check with the default event type.
///
/// Returns an empty string for an empty callback.
pub fn format_callback_existence_check(callback: &str) -> String {
    Observer::new(callback, &PlanConfig::default())
        .map(|o| o.existence_check())
        .unwrap_or_default()
}
