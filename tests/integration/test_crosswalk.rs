//! Integration tests for `branchflow crosswalk`

use crate::helpers::*;
use anyhow::Result;
use serde_json::{Value, json};

const SPIKE_CONFIG: &str = r#"[branches]
detect_from_git = false
other_deploy = "spike/.*"
"#;

fn project(workspace: &TestWorkspace) -> Result<()> {
  let core = module("com.example", "core", "1.0-SNAPSHOT");
  let mut app = module("com.example", "app", "1.0-SNAPSHOT");
  app["dependencies"] = json!([
    { "group_id": "com.example", "artifact_id": "core", "version": "1.0-SNAPSHOT" },
    { "group_id": "com.example", "artifact_id": "tools", "version": "${tools.version}" },
    { "group_id": "org.lib", "artifact_id": "util", "version": "2.0" }
  ]);
  app["properties"] = json!({ "tools.version": "1.0-SNAPSHOT" });
  let tools = module("com.example", "tools", "1.0-SNAPSHOT");
  workspace.write_graph(vec![core, app], vec![tools])?;
  Ok(())
}

#[test]
fn test_crosswalk_prints_plan_for_deployable_branch() -> Result<()> {
  let workspace = TestWorkspace::with_config(SPIKE_CONFIG)?;
  project(&workspace)?;

  let output = run_branchflow(
    &workspace.path,
    &["crosswalk", "--graph", "graph.json", "--branch", "spike/fast"],
  )?;
  let text = stdout(&output);
  assert!(text.contains("com.example:core:1.0-SNAPSHOT -> 1.0+spike-fast-SNAPSHOT"), "{}", text);
  assert!(text.contains("com.example:tools:1.0-SNAPSHOT -> 1.0+spike-fast-SNAPSHOT (outside reactor)"), "{}", text);
  assert!(!text.contains("org.lib:util"));

  Ok(())
}

#[test]
fn test_crosswalk_without_deploy_match_changes_nothing() -> Result<()> {
  let workspace = TestWorkspace::with_config(SPIKE_CONFIG)?;
  project(&workspace)?;

  let output = run_branchflow(
    &workspace.path,
    &["crosswalk", "--graph", "graph.json", "--branch", "experiment/x"],
  )?;
  assert!(stdout(&output).contains("No version changes"));

  let output = run_branchflow(
    &workspace.path,
    &["crosswalk", "--graph", "graph.json", "--branch", "develop", "--json"],
  )?;
  let plan: Value = serde_json::from_str(&stdout(&output))?;
  assert_eq!(plan["changes"], json!([]));

  Ok(())
}

#[test]
fn test_crosswalk_writes_rewritten_graph() -> Result<()> {
  let workspace = TestWorkspace::with_config(SPIKE_CONFIG)?;
  project(&workspace)?;

  let args = [
    "crosswalk",
    "--graph",
    "graph.json",
    "--branch",
    "spike/fast",
    "--write",
    "graph.out.json",
  ];
  let output = run_branchflow(&workspace.path, &args)?;
  assert!(stdout(&output).contains("Wrote"));

  let rewritten: Value = serde_json::from_str(&workspace.read_file("graph.out.json")?)?;
  let reactor = rewritten["reactor"].as_array().expect("reactor");
  let app = reactor.iter().find(|m| m["artifact_id"] == "app").expect("app");
  assert_eq!(app["version"], "1.0+spike-fast-SNAPSHOT");
  assert_eq!(app["dependencies"][0]["version"], "1.0+spike-fast-SNAPSHOT");
  assert_eq!(app["dependencies"][1]["version"], "1.0+spike-fast-SNAPSHOT");
  assert_eq!(app["dependencies"][2]["version"], "2.0");

  // siblings keep their versions
  assert_eq!(rewritten["siblings"][0]["version"], "1.0-SNAPSHOT");

  let output = run_branchflow(&workspace.path, &args)?;
  assert!(stdout(&output).contains("is up to date"), "{}", stdout(&output));

  Ok(())
}
