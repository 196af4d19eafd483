//! Property-based tests for the plan compiler
//!
//! These tests use proptest to verify invariants across many randomly
//! generated plans, catching edge cases that hand-written tests might miss.

use pgmi_testplan::plan::quote::quote_literal;
use pgmi_testplan::{Step, generate};
use proptest::prelude::*;

// =============================================================================
// Plan generation
// =============================================================================

/// Shape of one directory's slice of a plan
#[derive(Debug, Clone)]
struct DirectoryShape {
    fixtures: usize,
    tests: usize,
    teardown: bool,
}

fn directory_shape() -> impl Strategy<Value = DirectoryShape> {
    (0usize..3, 0usize..4, any::<bool>()).prop_map(|(fixtures, tests, teardown)| DirectoryShape {
        fixtures,
        tests,
        teardown,
    })
}

/// Build a well-formed plan: each directory runs its fixtures, then its tests, then (optionally) its teardown.
/// Directories without any script never get a teardown.
fn build_plan(shapes: &[DirectoryShape]) -> Vec<Step> {
    let mut steps = Vec::new();
    let mut ordinal = 0;
    let mut next = || {
        ordinal += 1;
        ordinal
    };
    for (i, shape) in shapes.iter().enumerate() {
        let dir = format!("./d{i}/__test__/");
        for f in 0..shape.fixtures {
            steps.push(Step::fixture(next(), format!("{dir}_setup{f}.sql"), dir.as_str(), 1));
        }
        for t in 0..shape.tests {
            steps.push(Step::test(next(), format!("{dir}{t:02}_test.sql"), dir.as_str(), 1));
        }
        if shape.teardown && shape.fixtures + shape.tests > 0 {
            steps.push(Step::teardown(next(), dir.as_str(), 1));
        }
    }
    steps
}

fn count_lines(sql: &str, prefix: &str) -> usize {
    sql.lines().filter(|line| line.starts_with(prefix)).count()
}

proptest! {
    /// Property: one directory savepoint per directory with scripts, one release per teardown
    #[test]
    fn savepoints_balance(shapes in prop::collection::vec(directory_shape(), 1..6)) {
        let steps = build_plan(&shapes);
        let plan = generate(&steps, "").unwrap();

        let scopes = shapes.iter().filter(|s| s.fixtures + s.tests > 0).count();
        let teardowns = steps.iter().filter(|s| s.script_path.is_none()).count();
        let tests: usize = shapes.iter().map(|s| s.tests).sum();

        prop_assert_eq!(count_lines(&plan.sql, "SAVEPOINT __pgmi_d"), scopes);
        prop_assert_eq!(count_lines(&plan.sql, "RELEASE SAVEPOINT __pgmi_d"), teardowns);
        prop_assert_eq!(count_lines(&plan.sql, "SAVEPOINT __pgmi_t"), tests);
        prop_assert_eq!(count_lines(&plan.sql, "ROLLBACK TO SAVEPOINT __pgmi_t"), tests);
    }

    /// Property: identical input compiles to identical output
    #[test]
    fn generation_is_deterministic(shapes in prop::collection::vec(directory_shape(), 0..5)) {
        let steps = build_plan(&shapes);
        let first = generate(&steps, "pg_temp.observer").unwrap();
        let second = generate(&steps, "pg_temp.observer").unwrap();
        prop_assert_eq!(first, second);
    }

    /// Property: one source map entry per script, each inside the script's bounds and in order
    #[test]
    fn source_map_covers_every_script(shapes in prop::collection::vec(directory_shape(), 1..5)) {
        let steps = build_plan(&shapes);
        let plan = generate(&steps, "obs").unwrap();
        let line_count = plan.sql.lines().count();

        let scripts = steps.iter().filter(|s| s.script_path.is_some()).count();
        prop_assert_eq!(plan.source_map.len(), scripts);

        let mut previous_end = 0;
        for (position, entry) in plan.source_map.iter().enumerate() {
            prop_assert_eq!(entry.position, position);
            prop_assert!(entry.start_line > previous_end);
            prop_assert!(entry.start_line <= entry.end_line);
            prop_assert!(entry.end_line <= line_count);
            prop_assert_eq!(plan.source_map.resolve(entry.start_line), Some(entry));
            previous_end = entry.end_line;
        }
    }

    /// Property: N embedded quotes become 2N; quote-free text is only wrapped
    #[test]
    fn quote_literal_doubles_quotes(s in ".*") {
        let quoted = quote_literal(&s);
        let inner = &quoted[1..quoted.len() - 1];
        prop_assert_eq!(inner.matches('\'').count(), 2 * s.matches('\'').count());
        if !s.contains('\'') {
            prop_assert_eq!(inner, s.as_str());
        }
    }

    /// Property: no caller text can end a literal early
    #[test]
    fn paths_never_break_out_of_literals(name in "[a-z']{1,12}") {
        let path = format!("./t/{name}.sql");
        let plan = generate(&[Step::test(1, path.as_str(), "./t/", 0)], "").unwrap();
        let expected = format!("WHERE path = {});", quote_literal(&path));
        prop_assert!(plan.sql.contains(&expected));
    }
}
