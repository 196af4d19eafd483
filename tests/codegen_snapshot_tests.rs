//! Golden snapshot tests for generated scripts
//!
//! These tests compile small plans and compare the script against stored
//! snapshots. This ensures output changes are reviewed and intentional.
//!
//! Run with: `cargo test --test codegen_snapshot_tests`
//! Review changes: `cargo insta review`

use pgmi_testplan::{Step, generate};

fn compile(steps: &[Step], callback: &str) -> String {
    generate(steps, callback).expect("plan failed to compile").sql
}

#[test]
fn test_fixture_test_teardown_with_observer() {
    let steps = vec![
        Step::fixture(1, "./t/__test__/_setup.sql", "./t/__test__/", 1),
        Step::test(2, "./t/__test__/01_insert.sql", "./t/__test__/", 1),
        Step::teardown(3, "./t/__test__/", 1),
    ];
    insta::assert_snapshot!("fixture_test_teardown_with_observer", compile(&steps, "pg_temp.observer"));
}

#[test]
fn test_nested_directories_without_observer() {
    let steps = vec![
        Step::fixture(1, "./a/_setup.sql", "./a/", 1),
        Step::test(2, "./a/b/01.sql", "./a/b/", 2),
        Step::teardown(3, "./a/b/", 2),
        Step::teardown(4, "./a/", 1),
    ];
    insta::assert_snapshot!("nested_directories_without_observer", compile(&steps, ""));
}

#[test]
fn test_non_plain_callback_uses_dynamic_calls() {
    let steps = vec![Step::test(1, "t.sql", "./t/", 0)];
    insta::assert_snapshot!("non_plain_callback_uses_dynamic_calls", compile(&steps, "pg_temp.cb's"));
}
