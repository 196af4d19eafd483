//! Single-pass statement emission.
//!
//! Walks the ordered steps once, driving the scope stack and the observer, and writes statements in input order. A
//! step's own bracketing statements (events, its savepoint) always immediately surround it.
//!
//! Per step kind:
//!
//! | Kind     | Statements                                                                              |
//! |----------|-----------------------------------------------------------------------------------------|
//! | Fixture  | `SAVEPOINT d` (first entry only), `fixture_start`, execute, `fixture_end`               |
//! | Test     | `SAVEPOINT d` (first entry only), `test_start`, `SAVEPOINT t`, guarded execute,         |
//! |          | `ROLLBACK TO SAVEPOINT t`, `test_end`                                                   |
//! | Teardown | `RELEASE SAVEPOINT d`, `teardown_start`, `teardown_end`                                 |
//!
//! ## Notes
//!
//! - A test's script runs inside a PL/pgSQL exception block. A failure fires the `rollback` event and is reported as a
//!   WARNING; sibling tests keep running. The unconditional `ROLLBACK TO SAVEPOINT` afterwards discards the test's
//!   writes whether it passed or failed, leaving fixture state intact.
//! - The handler catches `OTHERS` and `assert_failure` (which `OTHERS` excludes). `query_canceled` is left uncaught,
//!   so a timeout or cancel still aborts the run.
//! - Fixture failures are not caught. Later tests cannot trust a fixture that failed to apply, so the run aborts.
//! - Transaction control (`BEGIN`/`COMMIT`/`ROLLBACK`) is never emitted; the caller owns the transaction.

use pgmi_core::events::EventId;
use pgmi_core::sql::TEST_FAILURE_CONDITIONS;

use super::callback::{CallbackEvent, Observer};
use super::errors::PlanError;
use super::quote::{dollar_tag, escape_qualified_name, quote_literal};
use super::scope::{ScopeEntry, ScopeStack};
use super::source_map::{SourceMap, SourceMapBuilder};
use super::step::{Step, StepKind};
use super::writer::ScriptWriter;
use crate::config::PlanConfig;

pub(crate) struct StatementEmitter<'a> {
    config: &'a PlanConfig,
    /// Escaped source table name
    source_table: String,
    observer: Option<Observer>,
    scopes: ScopeStack,
    writer: ScriptWriter,
    source_map: SourceMapBuilder,
    previous_ordinal: Option<u32>,
}

impl<'a> StatementEmitter<'a> {
    pub(crate) fn new(config: &'a PlanConfig, callback: &str) -> Self {
        Self {
            config,
            source_table: escape_qualified_name(&config.source_table),
            observer: Observer::new(callback, config),
            scopes: ScopeStack::new(),
            writer: ScriptWriter::new(config.indent_width),
            source_map: SourceMapBuilder::new(),
            previous_ordinal: None,
        }
    }

    /// Emit the whole plan and return the script with its source map.
    pub(crate) fn emit_plan(mut self, steps: &[Step]) -> Result<(String, SourceMap), PlanError> {
        if let Some(observer) = &self.observer {
            tracing::debug!(callback = observer.callback(), "observer enabled");
            self.writer.line(&observer.existence_check());
        }
        self.notify(CallbackEvent::suite(EventId::SuiteStart, 0));

        for step in steps {
            self.check_order(step)?;
            tracing::trace!(ordinal = step.ordinal, kind = %step.kind, directory = %step.directory, "emitting step");
            match step.kind {
                StepKind::Fixture => self.emit_fixture(step)?,
                StepKind::Test => self.emit_test(step)?,
                StepKind::Teardown => self.emit_teardown(step)?,
            }
        }

        let last_ordinal = steps.last().map_or(0, |s| s.ordinal);
        self.notify(CallbackEvent::suite(EventId::SuiteEnd, last_ordinal));

        let StatementEmitter {
            scopes,
            writer,
            source_map,
            ..
        } = self;
        let implicit = scopes.finish();
        tracing::debug!(
            lines = writer.line_count(),
            implicitly_closed = implicit.len(),
            "plan emitted"
        );
        Ok((writer.finish(), source_map.finish()))
    }

    fn check_order(&mut self, step: &Step) -> Result<(), PlanError> {
        if let Some(previous) = self.previous_ordinal {
            if step.ordinal <= previous {
                return Err(PlanError::OrdinalOutOfOrder {
                    ordinal: step.ordinal,
                    previous,
                });
            }
        }
        self.previous_ordinal = Some(step.ordinal);
        Ok(())
    }

    fn emit_fixture(&mut self, step: &Step) -> Result<(), PlanError> {
        let path = required_path(step)?;
        self.enter_scope(step);
        self.notify(CallbackEvent::for_step(EventId::FixtureStart, step));

        let body = format!(" BEGIN {} END ", self.execute_statement(path));
        let tag = dollar_tag(&body, &self.config.block_tag);
        let line = self.writer.next_line();
        self.writer.line(&format!("DO {tag}{body}{tag};"));
        self.source_map.record(step, path, line, line);

        self.notify(CallbackEvent::for_step(EventId::FixtureEnd, step));
        Ok(())
    }

    fn emit_test(&mut self, step: &Step) -> Result<(), PlanError> {
        let path = required_path(step)?;
        self.enter_scope(step);
        self.notify(CallbackEvent::for_step(EventId::TestStart, step));

        let savepoint = self.scopes.isolate_test();
        self.writer.line(&format!("SAVEPOINT {savepoint};"));
        let (start, end) = self.write_guarded_test(step, path);
        self.writer.line(&format!("ROLLBACK TO SAVEPOINT {savepoint};"));
        self.source_map.record(step, path, start, end);

        self.notify(CallbackEvent::for_step(EventId::TestEnd, step));
        Ok(())
    }

    fn emit_teardown(&mut self, step: &Step) -> Result<(), PlanError> {
        let scope = self.scopes.exit(step.ordinal, &step.directory, step.depth)?;
        self.writer.line(&format!("RELEASE SAVEPOINT {};", scope.savepoint));
        self.notify(CallbackEvent::for_step(EventId::TeardownStart, step));
        self.notify(CallbackEvent::for_step(EventId::TeardownEnd, step));
        Ok(())
    }

    /// Write the DO block running a test with its failure handler. Returns its first and last line.
    fn write_guarded_test(&mut self, step: &Step, path: &str) -> (usize, usize) {
        let execute = self.execute_statement(path);

        let mut handler = Vec::new();
        if let Some(observer) = &self.observer {
            handler.push(observer.handler_invocation(&CallbackEvent::for_step(EventId::Rollback, step)));
        }
        if self.config.failure_warnings {
            handler.push(format!(
                "RAISE WARNING 'pgmi: test % failed, rolling back: %', {}, SQLERRM;",
                quote_literal(path)
            ));
        }
        if handler.is_empty() {
            handler.push("NULL;".to_string());
        }

        let body = format!("{execute}\n{}", handler.join("\n"));
        let tag = dollar_tag(&body, &self.config.block_tag);

        let start = self.writer.next_line();
        self.writer.line(&format!("DO {tag}"));
        self.writer.line("BEGIN");
        self.writer.indent();
        self.writer.line(&execute);
        self.writer.dedent();
        self.writer
            .line(&format!("EXCEPTION WHEN {} THEN", TEST_FAILURE_CONDITIONS.join(" OR ")));
        self.writer.indent();
        for statement in &handler {
            self.writer.line(statement);
        }
        self.writer.dedent();
        self.writer.line("END");
        self.writer.line(&format!("{tag};"));
        (start, self.writer.line_count())
    }

    fn enter_scope(&mut self, step: &Step) {
        if let ScopeEntry::Opened(savepoint) = self.scopes.enter(&step.directory, step.depth) {
            self.writer.line(&format!("SAVEPOINT {savepoint};"));
        }
    }

    fn notify(&mut self, event: CallbackEvent<'_>) {
        if let Some(observer) = &self.observer {
            self.writer.line(&observer.invocation(&event));
        }
    }

    fn execute_statement(&self, path: &str) -> String {
        format!(
            "EXECUTE (SELECT content FROM {} WHERE path = {});",
            self.source_table,
            quote_literal(path)
        )
    }
}

fn required_path(step: &Step) -> Result<&str, PlanError> {
    step.script_path().ok_or(PlanError::MissingScriptPath {
        ordinal: step.ordinal,
        kind: step.kind,
    })
}
