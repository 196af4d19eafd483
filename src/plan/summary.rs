//! Plan listing for dry runs.
//!
//! Summarizes a step list without compiling it, in the same shape `pgmi test --list` prints.

use std::collections::BTreeSet;
use std::fmt::Write;

use super::step::{Step, StepKind};

/// Step counts of a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanSummary {
    pub fixtures: usize,
    pub tests: usize,
    pub teardowns: usize,
    /// Distinct `(directory, depth)` pairs holding at least one fixture or test
    pub scopes: usize,
}

impl PlanSummary {
    pub fn from_steps(steps: &[Step]) -> Self {
        let mut summary = Self::default();
        let mut scopes = BTreeSet::new();
        for step in steps {
            match step.kind {
                StepKind::Fixture => summary.fixtures += 1,
                StepKind::Test => summary.tests += 1,
                StepKind::Teardown => summary.teardowns += 1,
            }
            if step.kind.runs_script() {
                scopes.insert((step.directory.as_str(), step.depth));
            }
        }
        summary.scopes = scopes.len();
        summary
    }

    /// Closing line of a listing.
    pub fn total_line(&self) -> String {
        format!(
            "Total: {} tests (with {} fixtures, {} teardowns)",
            self.tests, self.fixtures, self.teardowns
        )
    }
}

/// Render one line per step followed by the totals.
///
/// ```text
/// 1. Fixture:  ./t/__test__/_setup.sql
/// 2. Test:     ./t/__test__/01_insert.sql
/// 3. Teardown: ./t/__test__/
/// ```
pub fn render_listing(steps: &[Step]) -> String {
    let mut out = String::new();
    for step in steps {
        let label = format!("{}:", step.kind.label());
        let target = step.script_path().unwrap_or(&step.directory);
        let _ = writeln!(out, "{}. {:<9} {}", step.ordinal, label, target);
    }
    if !steps.is_empty() {
        out.push('\n');
    }
    out.push_str(&PlanSummary::from_steps(steps).total_line());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Step> {
        vec![
            Step::fixture(1, "./t/__test__/_setup.sql", "./t/__test__/", 1),
            Step::test(2, "./t/__test__/01_insert.sql", "./t/__test__/", 1),
            Step::test(3, "./u/__test__/01_a.sql", "./u/__test__/", 1),
            Step::teardown(4, "./t/__test__/", 1),
        ]
    }

    #[test]
    fn test_summary_counts() {
        let summary = PlanSummary::from_steps(&sample());
        assert_eq!(
            summary,
            PlanSummary {
                fixtures: 1,
                tests: 2,
                teardowns: 1,
                scopes: 2
            }
        );
    }

    #[test]
    fn test_render_listing() {
        let listing = render_listing(&sample());
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines[0], "1. Fixture:  ./t/__test__/_setup.sql");
        assert_eq!(lines[1], "2. Test:     ./t/__test__/01_insert.sql");
        assert_eq!(lines[3], "4. Teardown: ./t/__test__/");
        assert_eq!(lines[5], "Total: 2 tests (with 1 fixtures, 1 teardowns)");
    }

    #[test]
    fn test_render_empty_listing() {
        assert_eq!(render_listing(&[]), "Total: 0 tests (with 0 fixtures, 0 teardowns)");
    }
}
