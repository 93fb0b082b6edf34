//! Integration tests for `branchflow promote`

use crate::helpers::*;
use anyhow::Result;
use serde_json::Value;

const CATALOG: &[u8] = b"[artifacts]\ncom.example:app:jar:1.0\ncom.example:app:jar:sources:1.0\n";

/// Stage repository under `stage-repo`, local cache under `cache`
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
  Ok(workspace)
}

fn promote(workspace: &TestWorkspace, extra: &[&str]) -> Result<std::process::Output> {
  let mut args = vec![
    "promote",
    "--module",
    "com.example:app:1.0",
    "--output-dir",
    "promoted",
    "--branch",
    "release/1.0",
  ];
  args.extend_from_slice(extra);
  run_branchflow_raw(&workspace.path, &args, &[])
}

#[test]
fn test_promote_reattaches_cataloged_artifacts() -> Result<()> {
  let workspace = staged_workspace()?;
  workspace.publish("stage-repo", "com.example", "app", "1.0", "app-1.0-catalog.txt", CATALOG)?;
  workspace.publish("stage-repo", "com.example", "app", "1.0", "app-1.0.jar", b"jar")?;
  workspace.publish("stage-repo", "com.example", "app", "1.0", "app-1.0-sources.jar", b"sources")?;

  let output = promote(&workspace, &["--json"])?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));

  let outcome: Value = serde_json::from_str(&stdout(&output))?;
  assert_eq!(outcome["catalog_found"], true);
  assert_eq!(outcome["bypassed_cache"], true);
  assert_eq!(outcome["category"], "release");

  let roles: Vec<&str> = outcome["artifacts"]
    .as_array()
    .expect("artifacts")
    .iter()
    .filter_map(|a| a["role"].as_str())
    .collect();
  assert_eq!(roles, vec!["catalog", "primary", "attached"]);

  assert_eq!(workspace.read_file("promoted/app-1.0.jar")?, "jar");
  assert_eq!(workspace.read_file("promoted/app-1.0-sources.jar")?, "sources");
  assert!(workspace.file_exists("promoted/app-1.0-catalog.txt"));

  // bypassing leaves the normal cache alone
  assert!(!workspace.file_exists("cache/com/example/app/1.0/app-1.0.jar"));

  Ok(())
}

#[test]
fn test_promote_keep_cache_fills_local_repository() -> Result<()> {
  let workspace = staged_workspace()?;
  workspace.publish("stage-repo", "com.example", "app", "1.0", "app-1.0-catalog.txt", CATALOG)?;
  workspace.publish("stage-repo", "com.example", "app", "1.0", "app-1.0.jar", b"jar")?;
  workspace.publish("stage-repo", "com.example", "app", "1.0", "app-1.0-sources.jar", b"sources")?;

  let output = promote(&workspace, &["--keep-cache"])?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));
  assert!(stdout(&output).contains("Promoted 2 artifact(s)"), "{}", stdout(&output));
  assert!(workspace.file_exists("cache/com/example/app/1.0/app-1.0.jar"));

  Ok(())
}

#[test]
fn test_promote_header_only_catalog_promotes_nothing() -> Result<()> {
  let workspace = staged_workspace()?;
  workspace.publish("stage-repo", "com.example", "app", "1.0", "app-1.0-catalog.txt", b"[artifacts]\n")?;

  let output = promote(&workspace, &[])?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));
  assert!(stdout(&output).contains("Promoted 0 artifact(s)"), "{}", stdout(&output));

  Ok(())
}

#[test]
fn test_promote_missing_catalog() -> Result<()> {
  let workspace = staged_workspace()?;

  let output = promote(&workspace, &[])?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));
  assert!(stdout(&output).contains("No artifact catalog found"));

  let output = promote(&workspace, &["--require-catalog"])?;
  assert_eq!(output.status.code(), Some(2));

  Ok(())
}

#[test]
fn test_promote_missing_listed_artifact_fails() -> Result<()> {
  let workspace = staged_workspace()?;
  workspace.publish("stage-repo", "com.example", "app", "1.0", "app-1.0-catalog.txt", CATALOG)?;
  workspace.publish("stage-repo", "com.example", "app", "1.0", "app-1.0.jar", b"jar")?;

  let output = promote(&workspace, &[])?;
  assert_eq!(output.status.code(), Some(2));
  assert!(stderr(&output).contains("com.example:app:jar:sources:1.0"), "stderr: {}", stderr(&output));

  Ok(())
}

#[test]
fn test_promote_from_local_repository_for_feature_branch() -> Result<()> {
  let workspace = staged_workspace()?;
  workspace.publish("cache", "com.example", "app", "1.0", "app-1.0-catalog.txt", b"[artifacts]\ncom.example:app:jar:1.0\n")?;
  workspace.publish("cache", "com.example", "app", "1.0", "app-1.0.jar", b"local")?;

  let output = run_branchflow(
    &workspace.path,
    &[
      "promote",
      "--module",
      "com.example:app:1.0",
      "--output-dir",
      "promoted",
      "--branch",
      "feature/login",
    ],
  )?;
  assert!(stdout(&output).contains("from local repository"), "{}", stdout(&output));
  assert_eq!(workspace.read_file("promoted/app-1.0.jar")?, "local");

  Ok(())
}

#[test]
fn test_promote_without_source_repository_fails_while_bypassing() -> Result<()> {
  let workspace = TestWorkspace::with_config(&format!("{}\n[repositories]\nlocal = \"cache\"\n", BASE_CONFIG))?;

  let output = run_branchflow_raw(
    &workspace.path,
    &[
      "promote",
      "--module",
      "com.example:app:1.0",
      "--output-dir",
      "promoted",
      "--branch",
      "master",
    ],
    &[],
  )?;
  assert_eq!(output.status.code(), Some(1));
  assert!(
    stderr(&output).contains("Cannot resolve artifacts without a source repository"),
    "stderr: {}",
    stderr(&output)
  );

  // --keep-cache falls back to the local repository
  let output = run_branchflow_raw(
    &workspace.path,
    &[
      "promote",
      "--module",
      "com.example:app:1.0",
      "--output-dir",
      "promoted",
      "--branch",
      "master",
      "--keep-cache",
    ],
    &[],
  )?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));

  Ok(())
}
