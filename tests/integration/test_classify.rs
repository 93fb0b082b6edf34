//! Integration tests for `branchflow classify`

use crate::helpers::*;
use anyhow::Result;
use serde_json::Value;

fn classify_json(workspace: &TestWorkspace, args: &[&str], env: &[(&str, &str)]) -> Result<Value> {
  let mut all = vec!["classify", "--json"];
  all.extend_from_slice(args);
  let output = run_branchflow_raw(&workspace.path, &all, env)?;
  assert!(output.status.success(), "classify failed: {}", stderr(&output));
  Ok(serde_json::from_str(&stdout(&output))?)
}

#[test]
fn test_classify_explicit_release_branch() -> Result<()> {
  let workspace = TestWorkspace::new()?;

  let report = classify_json(&workspace, &["--branch", "release/1.0.0"], &[])?;
  assert_eq!(report["name"], "release/1.0.0");
  assert_eq!(report["category"], "release");
  assert_eq!(report["versioned"], true);
  assert_eq!(report["expected_version"], "1.0.0");

  Ok(())
}

#[test]
fn test_classify_from_branch_expression() -> Result<()> {
  let workspace = TestWorkspace::new()?;

  let report = classify_json(&workspace, &[], &[("GIT_BRANCH", "support/1.2")])?;
  assert_eq!(report["name"], "support/1.2");
  assert_eq!(report["category"], "support");
  assert_eq!(report["expected_version"], "1.2");

  Ok(())
}

#[test]
fn test_classify_mainline_has_no_expected_version() -> Result<()> {
  let workspace = TestWorkspace::new()?;

  let report = classify_json(&workspace, &["--branch", "origin/master"], &[])?;
  assert_eq!(report["category"], "mainline");
  assert_eq!(report["versioned"], true);
  assert!(report["expected_version"].is_null());

  Ok(())
}

#[test]
fn test_classify_detects_git_branch() -> Result<()> {
  let workspace = TestWorkspace::with_config("")?;
  workspace.init_git("develop")?;

  let report = classify_json(&workspace, &[], &[])?;
  assert_eq!(report["name"], "develop");
  assert_eq!(report["category"], "development");
  assert_eq!(report["versioned"], false);

  Ok(())
}

#[test]
fn test_classify_without_git_binary_is_undefined() -> Result<()> {
  let workspace = TestWorkspace::with_config("")?;

  let report = classify_json(&workspace, &[], &[("PATH", "/nonexistent")])?;
  assert_eq!(report["category"], "undefined");

  Ok(())
}

#[test]
fn test_classify_undefined_without_branch() -> Result<()> {
  let workspace = TestWorkspace::new()?;

  let output = run_branchflow(&workspace.path, &["classify"])?;
  let text = stdout(&output);
  assert!(text.contains("<undetermined>"), "unexpected output: {}", text);
  assert!(text.contains("UNDEFINED"));

  // stderr is piped here, so log lines carry no color codes
  let log = stderr(&output);
  assert!(log.contains("Unable to determine the current branch"), "stderr: {}", log);
  assert!(!log.contains('\u{1b}'), "stderr: {:?}", log);

  Ok(())
}

#[test]
fn test_classify_other_branch_deploy_pattern() -> Result<()> {
  let workspace = TestWorkspace::with_config(
    r#"[branches]
detect_from_git = false
other_deploy = "spike/.*"
"#,
  )?;

  let report = classify_json(&workspace, &["--branch", "spike/fast-path"], &[])?;
  assert_eq!(report["category"], "other");
  assert_eq!(report["other_deploys"], true);

  let report = classify_json(&workspace, &["--branch", "experiment/x"], &[])?;
  assert_eq!(report["category"], "other");
  assert_eq!(report["other_deploys"], false);

  Ok(())
}

#[test]
fn test_classify_invalid_pattern_is_configuration_error() -> Result<()> {
  let workspace = TestWorkspace::with_config(
    r#"[branches]
detect_from_git = false
release = "release/(.*"
"#,
  )?;

  let output = run_branchflow_raw(&workspace.path, &["classify", "--branch", "release/1.0"], &[])?;
  assert!(!output.status.success());
  assert!(stderr(&output).contains("release/(.*"), "stderr: {}", stderr(&output));

  Ok(())
}
