//! Integration tests for `branchflow refresh-stage`

use crate::helpers::*;
use anyhow::Result;
use serde_json::{Value, json};

fn staged_workspace() -> Result<TestWorkspace> {
  let workspace = TestWorkspace::new()?;
  workspace.write_config(&format!(
    r#"[branches]
detect_from_git = false

[repositories]
stage = "stage::default::file://{}::false"
local = "cache"
"#,
    workspace.path.join("stage-repo").display()
  ))?;
  let mut app = module("com.example", "app", "2.0.0");
  app["dependencies"] = json!([
    { "group_id": "org.lib", "artifact_id": "util", "version": "1.4" },
    { "group_id": "org.lib", "artifact_id": "local", "version": "3.0" },
    { "group_id": "org.lib", "artifact_id": "edge", "version": "1.0-SNAPSHOT" },
  ]);
  workspace.write_graph(vec![app], vec![])?;
  Ok(workspace)
}

#[test]
fn test_refresh_purges_and_refetches_staged_dependencies() -> Result<()> {
  let workspace = staged_workspace()?;
  workspace.publish("stage-repo", "org.lib", "util", "1.4", "util-1.4.jar", b"staged")?;
  workspace.publish("cache", "org.lib", "util", "1.4", "util-1.4.jar", b"stale")?;
  workspace.publish("cache", "org.lib", "local", "3.0", "local-3.0.jar", b"kept")?;

  let output = run_branchflow(
    &workspace.path,
    &["refresh-stage", "--graph", "graph.json", "--branch", "release/2.0", "--json"],
  )?;

  let refresh: Value = serde_json::from_str(&stdout(&output))?;
  assert_eq!(refresh["checked"], 2);
  assert_eq!(refresh["purged"].as_array().map(Vec::len), Some(1));
  assert_eq!(workspace.read_file("cache/org/lib/util/1.4/util-1.4.jar")?, "staged");
  assert_eq!(workspace.read_file("cache/org/lib/local/3.0/local-3.0.jar")?, "kept");

  Ok(())
}

#[test]
fn test_refresh_is_a_no_op_off_stage_branches() -> Result<()> {
  let workspace = staged_workspace()?;
  workspace.publish("stage-repo", "org.lib", "util", "1.4", "util-1.4.jar", b"staged")?;
  workspace.publish("cache", "org.lib", "util", "1.4", "util-1.4.jar", b"stale")?;

  let output = run_branchflow(&workspace.path, &["refresh-stage", "--graph", "graph.json", "--branch", "develop"])?;
  assert!(stdout(&output).contains("nothing to refresh"), "{}", stdout(&output));
  assert_eq!(workspace.read_file("cache/org/lib/util/1.4/util-1.4.jar")?, "stale");

  Ok(())
}

#[test]
fn test_refresh_without_stage_repository_is_a_configuration_error() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.write_graph(vec![module("com.example", "app", "2.0.0")], vec![])?;

  let output = run_branchflow_raw(
    &workspace.path,
    &["refresh-stage", "--graph", "graph.json", "--branch", "hotfix/2.0.1"],
    &[],
  )?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("No stage repository configured"), "stderr: {}", stderr(&output));

  Ok(())
}
