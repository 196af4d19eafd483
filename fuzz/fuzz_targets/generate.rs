#![no_main]

use libfuzzer_sys::fuzz_target;
use pgmi_testplan::{Step, generate};

fuzz_target!(|data: &[u8]| {
    // Decode arbitrary bytes as a plan (ignore anything that is not one)
    let Ok(steps) = serde_json::from_slice::<Vec<Step>>(data) else {
        return;
    };
    // Malformed plans must be rejected with an error, never a panic
    if let Ok(plan) = generate(&steps, "pg_temp.observer") {
        let lines = plan.sql.lines().count();
        for entry in plan.source_map.iter() {
            assert!(entry.start_line <= entry.end_line && entry.end_line <= lines);
        }
    }
});
