//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::plan::quote::validate_callback_name;
use crate::plan::{GeneratedPlan, PlanCompiler, SourceMap, Step, render_listing};

use super::{CliError, CliResult, ExitCode, PlanOptions};

// ============================================================================
// Plan loading
// ============================================================================

/// Accepted plan file layouts.
#[derive(Deserialize)]
#[serde(untagged)]
enum PlanFile {
    Steps(Vec<Step>),
    Wrapped { steps: Vec<Step> },
}

/// Decode a plan from JSON text.
pub fn parse_plan(source: &str) -> CliResult<Vec<Step>> {
    let file: PlanFile =
        serde_json::from_str(source).map_err(|e| CliError::failure(format!("Error: invalid plan: {}", e)))?;
    Ok(match file {
        PlanFile::Steps(steps) | PlanFile::Wrapped { steps } => steps,
    })
}

fn read_plan(path: &Path) -> CliResult<Vec<Step>> {
    let source = fs::read_to_string(path)
        .map_err(|e| CliError::failure(format!("Error reading {}: {}", path.display(), e)))?;
    let steps = parse_plan(&source)?;
    tracing::debug!(path = %path.display(), steps = steps.len(), "plan loaded");
    Ok(steps)
}

/// Validate options and compile.
pub fn compile(steps: &[Step], options: &PlanOptions) -> CliResult<GeneratedPlan> {
    if !options.callback.is_empty() {
        validate_callback_name(&options.callback).map_err(CliError::diagnostic)?;
    }
    PlanCompiler::with_config(options.to_config())
        .generate(steps, &options.callback)
        .map_err(CliError::diagnostic)
}

// ============================================================================
// Commands
// ============================================================================

/// `generate`: script to stdout, source map (JSON) to stderr on request.
pub fn generate(path: &Path, options: &PlanOptions, show_source_map: bool) -> CliResult<ExitCode> {
    let steps = read_plan(path)?;
    let plan = compile(&steps, options)?;
    if !plan.sql.is_empty() {
        println!("{}", plan.sql);
    }
    if show_source_map {
        eprintln!("{}", render_source_map(&plan.source_map)?);
    }
    Ok(ExitCode::SUCCESS)
}

/// `list`: one line per step plus totals.
pub fn list(path: &Path) -> CliResult<ExitCode> {
    let steps = read_plan(path)?;
    println!("{}", render_listing(&steps));
    Ok(ExitCode::SUCCESS)
}

/// `resolve`: describe the step owning `line`, failing when the line is outside every script block.
pub fn resolve(path: &Path, line: usize, options: &PlanOptions) -> CliResult<ExitCode> {
    let steps = read_plan(path)?;
    let plan = compile(&steps, options)?;
    println!("{}", describe_line(&plan.source_map, line)?);
    Ok(ExitCode::SUCCESS)
}

pub fn render_source_map(map: &SourceMap) -> CliResult<String> {
    serde_json::to_string_pretty(map).map_err(|e| CliError::failure(format!("Error encoding source map: {}", e)))
}

pub fn describe_line(map: &SourceMap, line: usize) -> CliResult<String> {
    map.describe(line)
        .map(|description| format!("line {}: {}", line, description))
        .ok_or_else(|| CliError::failure(format!("line {} is not inside a fixture or test block", line)))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::plan::StepKind;

    const PLAN: &str = r#"[
        {"ordinal": 1, "kind": "fixture", "script_path": "./t/__test__/_setup.sql", "directory": "./t/__test__/", "depth": 1},
        {"ordinal": 2, "kind": "test", "script_path": "./t/__test__/01_a.sql", "directory": "./t/__test__/", "depth": 1},
        {"ordinal": 3, "kind": "teardown", "directory": "./t/__test__/", "depth": 1}
    ]"#;

    #[test]
    fn test_parse_plan_array() {
        let steps = parse_plan(PLAN).unwrap();
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[2].kind, StepKind::Teardown);
        assert_eq!(steps[2].script_path, None);
    }

    #[test]
    fn test_parse_plan_wrapped_with_aliases() {
        let steps = parse_plan(
            r#"{"steps": [{"ordinal": 1, "step_type": "setup", "path": "s.sql", "directory": "./"}]}"#,
        )
        .unwrap();
        assert_eq!(steps[0].kind, StepKind::Fixture);
        assert_eq!(steps[0].script_path.as_deref(), Some("s.sql"));
        assert_eq!(steps[0].depth, 0);
    }

    #[test]
    fn test_parse_plan_rejects_garbage() {
        let err = parse_plan("{\"nope\": 1}").unwrap_err();
        assert!(err.message.starts_with("Error: invalid plan"));
    }

    #[test]
    fn test_compile_rejects_bad_callback() {
        let steps = parse_plan(PLAN).unwrap();
        let options = PlanOptions {
            callback: "a.b.c".to_string(),
            ..PlanOptions::default()
        };
        let err = compile(&steps, &options).unwrap_err();
        assert!(err.message.contains("a.b.c"));
        assert_eq!(err.exit_code, ExitCode::FAILURE);
    }

    #[test]
    fn test_compile_reports_plan_error() {
        let steps = parse_plan(r#"[{"ordinal": 1, "kind": "teardown", "directory": "./x/", "depth": 1}]"#).unwrap();
        let err = compile(&steps, &PlanOptions::default()).unwrap_err();
        assert!(err.message.contains("pgmi::plan::teardown_without_scope"));
    }

    #[test]
    fn test_describe_line() {
        let steps = parse_plan(PLAN).unwrap();
        let plan = compile(&steps, &PlanOptions::default()).unwrap();
        let entry = plan.source_map.find_ordinal(2).unwrap();
        let text = describe_line(&plan.source_map, entry.start_line).unwrap();
        assert_eq!(text, format!("line {}: test: ./t/__test__/01_a.sql (ordinal 2)", entry.start_line));
        assert!(describe_line(&plan.source_map, 1).is_err());
    }

    #[test]
    fn test_render_source_map_json() {
        let steps = parse_plan(PLAN).unwrap();
        let plan = compile(&steps, &PlanOptions::default()).unwrap();
        let json = render_source_map(&plan.source_map).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
        assert_eq!(value[1]["kind"], "test");
    }
}
