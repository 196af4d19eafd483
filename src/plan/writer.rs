//! Line-oriented script writer with indentation tracking
//!
//! Every statement is written as one or more whole lines, so the writer always knows the 1-based line number the
//! next statement starts on. The source map records those numbers.

/// Writer that builds the script and counts lines
#[derive(Debug)]
pub struct ScriptWriter {
    /// The output buffer
    output: String,
    /// Current indentation level
    indent_level: usize,
    /// Spaces per indentation level
    indent_width: usize,
    /// Lines written so far
    lines: usize,
}

impl ScriptWriter {
    /// Create a new writer
    pub fn new(indent_width: usize) -> Self {
        Self {
            output: String::new(),
            indent_level: 0,
            indent_width,
            lines: 0,
        }
    }

    /// Get the script; lines are separated by `\n` with no trailing newline
    pub fn finish(mut self) -> String {
        if self.output.ends_with('\n') {
            self.output.pop();
        }
        self.output
    }

    /// Increase indentation level
    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    /// Decrease indentation level
    pub fn dedent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    /// Write one line at the current indentation
    pub fn line(&mut self, s: &str) {
        for _ in 0..self.indent_level * self.indent_width {
            self.output.push(' ');
        }
        self.output.push_str(s);
        self.output.push('\n');
        self.lines += 1;
    }

    /// Line number (1-based) the next write starts on
    pub fn next_line(&self) -> usize {
        self.lines + 1
    }

    /// Number of lines written
    pub fn line_count(&self) -> usize {
        self.lines
    }
}
