//! Source map from generated script lines back to plan steps.
//!
//! When the database reports a failure at some line of the generated script, the source map says which script file,
//! directory and ordinal that line was executing. Entries are appended in emission order during the single compiler
//! pass, so their line ranges increase monotonically and lookup is a binary search.

use serde::Serialize;

use super::step::{Step, StepKind};

/// One executed fixture or test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceMapEntry {
    /// Index of this entry in the map (execution order)
    pub position: usize,
    /// First script line of the statement executing the step (1-based, inclusive)
    pub start_line: usize,
    /// Last script line of that statement (1-based, inclusive)
    pub end_line: usize,
    pub kind: StepKind,
    pub script_path: String,
    pub directory: String,
    pub depth: u32,
    pub ordinal: u32,
}

impl SourceMapEntry {
    pub fn contains_line(&self, line: usize) -> bool {
        self.start_line <= line && line <= self.end_line
    }

    /// Human-readable description, e.g. `test: ./users/__test__/01_test.sql (ordinal 4)`.
    pub fn description(&self) -> String {
        format!("{}: {} (ordinal {})", self.kind, self.script_path, self.ordinal)
    }
}

/// Immutable, ordered list of source map entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SourceMap {
    entries: Vec<SourceMapEntry>,
}

impl SourceMap {
    /// Create an empty source map.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `position` (execution order).
    pub fn get(&self, position: usize) -> Option<&SourceMapEntry> {
        self.entries.get(position)
    }

    pub fn entries(&self) -> &[SourceMapEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceMapEntry> {
        self.entries.iter()
    }

    /// Find the entry whose statement spans script line `line`.
    pub fn resolve(&self, line: usize) -> Option<&SourceMapEntry> {
        let idx = self.entries.partition_point(|e| e.end_line < line);
        self.entries.get(idx).filter(|e| e.contains_line(line))
    }

    /// Find the entry recorded for plan ordinal `ordinal`.
    pub fn find_ordinal(&self, ordinal: u32) -> Option<&SourceMapEntry> {
        self.entries.iter().find(|e| e.ordinal == ordinal)
    }

    /// Describe what script line `line` was executing, if it belongs to a fixture or test.
    pub fn describe(&self, line: usize) -> Option<String> {
        self.resolve(line).map(SourceMapEntry::description)
    }

    /// Map for a script embedded after `line_offset` lines of `self`'s script.
    ///
    /// Returns a new map holding `self`'s entries followed by `other`'s entries shifted by `line_offset`, with
    /// positions renumbered. Entries are appended, never re-sorted, so the shifted entries must start after `self`'s
    /// last line; returns `None` when they would overlap it.
    pub fn merged(&self, other: &SourceMap, line_offset: usize) -> Option<SourceMap> {
        let last_line = self.entries.last().map_or(0, |e| e.end_line);
        if let Some(first) = other.entries.first() {
            if first.start_line + line_offset <= last_line {
                return None;
            }
        }

        let shifted = other.entries.iter().map(|e| SourceMapEntry {
            start_line: e.start_line + line_offset,
            end_line: e.end_line + line_offset,
            ..e.clone()
        });
        let mut entries: Vec<SourceMapEntry> = self.entries.iter().cloned().chain(shifted).collect();
        for (position, entry) in entries.iter_mut().enumerate() {
            entry.position = position;
        }
        Some(SourceMap { entries })
    }
}

/// Append-only builder used during emission.
#[derive(Debug, Default)]
pub(crate) struct SourceMapBuilder {
    entries: Vec<SourceMapEntry>,
}

impl SourceMapBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Record that lines `start_line..=end_line` execute `step`'s script.
    pub(crate) fn record(&mut self, step: &Step, script_path: &str, start_line: usize, end_line: usize) {
        self.entries.push(SourceMapEntry {
            position: self.entries.len(),
            start_line,
            end_line,
            kind: step.kind,
            script_path: script_path.to_string(),
            directory: step.directory.clone(),
            depth: step.depth,
            ordinal: step.ordinal,
        });
    }

    pub(crate) fn finish(self) -> SourceMap {
        SourceMap { entries: self.entries }
    }
}
