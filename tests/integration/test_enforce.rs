//! Integration tests for `branchflow enforce`

use crate::helpers::*;
use anyhow::Result;
use serde_json::json;

fn enforce(workspace: &TestWorkspace, branch: &str) -> Result<std::process::Output> {
  run_branchflow_raw(
    &workspace.path,
    &["enforce", "--graph", "graph.json", "--branch", branch],
    &[],
  )
}

#[test]
fn test_release_branch_accepts_matching_version() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.write_graph(vec![module("com.example", "app", "1.0.0")], vec![])?;

  let output = enforce(&workspace, "release/1.0.0")?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));
  assert!(stdout(&output).contains("1 module(s) satisfy the version rules"));

  Ok(())
}

#[test]
fn test_release_branch_rejects_other_version() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.write_graph(vec![module("com.example", "app", "1.2.0")], vec![])?;

  let output = enforce(&workspace, "release/1.0.0")?;
  assert_eq!(output.status.code(), Some(3));
  let err = stderr(&output);
  assert!(err.contains("1.2.0"), "stderr: {}", err);
  assert!(err.contains("[1.0.0]"), "stderr: {}", err);

  Ok(())
}

#[test]
fn test_support_branch_accepts_version_prefix() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.write_graph(vec![module("com.example", "app", "1.2.4")], vec![])?;

  let output = enforce(&workspace, "support/1.2")?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));

  Ok(())
}

#[test]
fn test_versioned_branch_rejects_snapshot_dependency() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  let mut app = module("com.example", "app", "1.2.4");
  app["dependencies"] = json!([{ "group_id": "org.lib", "artifact_id": "util", "version": "2.0-SNAPSHOT" }]);
  workspace.write_graph(vec![app], vec![])?;

  let output = enforce(&workspace, "support/1.2")?;
  assert_eq!(output.status.code(), Some(3));
  assert!(stderr(&output).contains("org.lib:util"), "stderr: {}", stderr(&output));

  Ok(())
}

#[test]
fn test_development_branch_requires_snapshot() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.write_graph(vec![module("com.example", "app", "1.0")], vec![])?;

  let output = enforce(&workspace, "develop")?;
  assert_eq!(output.status.code(), Some(3));
  assert!(stderr(&output).contains("-SNAPSHOT"));

  workspace.write_graph(vec![module("com.example", "app", "1.1-SNAPSHOT")], vec![])?;
  let output = enforce(&workspace, "develop")?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));

  Ok(())
}

#[test]
fn test_feature_branch_is_not_checked() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.write_graph(vec![module("com.example", "app", "1.0")], vec![])?;

  run_branchflow(
    &workspace.path,
    &["enforce", "--graph", "graph.json", "--branch", "feature/login"],
  )?;

  Ok(())
}

#[test]
fn test_unknown_module_is_rejected() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.write_graph(vec![module("com.example", "app", "1.0.0")], vec![])?;

  let output = run_branchflow_raw(
    &workspace.path,
    &["enforce", "--graph", "graph.json", "--branch", "release/1.0.0", "--module", "com.example:nope"],
    &[],
  )?;
  assert_eq!(output.status.code(), Some(1));

  Ok(())
}
