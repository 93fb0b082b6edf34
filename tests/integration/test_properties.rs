//! Integration tests for `branchflow properties`

use crate::helpers::*;
use anyhow::Result;
use serde_json::Value;

const CONFIG: &str = r#"[branches]
detect_from_git = false

[properties]
registry = "registry.example.com"

[branch_properties.release]
image = "${registry}/stage/${gitBranchName}"
channel = "${channel.override}"

[[mappers]]
property = "imageTag"
transform = "docker-name"
"#;

#[test]
fn test_properties_for_release_branch() -> Result<()> {
  let workspace = TestWorkspace::with_config(CONFIG)?;

  let output = run_branchflow(
    &workspace.path,
    &["properties", "--json", "--branch", "release/2.0", "-D", "channel.override=rc"],
  )?;
  let props: Value = serde_json::from_str(&stdout(&output))?;
  assert_eq!(props["branchType"], "RELEASE");
  assert_eq!(props["gitBranchName"], "release/2.0");
  assert_eq!(props["image"], "registry.example.com/stage/release/2.0");
  assert_eq!(props["channel"], "rc");
  assert!(props["imageTag"].is_string());

  Ok(())
}

#[test]
fn test_properties_written_to_file() -> Result<()> {
  let workspace = TestWorkspace::with_config(CONFIG)?;

  let output = run_branchflow(
    &workspace.path,
    &["properties", "--branch", "develop", "--output", "branch.properties"],
  )?;
  assert!(stdout(&output).contains("branch.properties"));

  let written = workspace.read_file("branch.properties")?;
  assert!(written.contains("branchType=DEVELOPMENT\n"), "{}", written);
  assert!(written.contains("gitBranchName=develop\n"));
  assert!(!written.contains("image="));

  Ok(())
}

#[test]
fn test_properties_cycle_is_reported() -> Result<()> {
  let workspace = TestWorkspace::with_config(
    r#"[branches]
detect_from_git = false

[properties]
a = "${b}"
b = "${a}"

[branch_properties.development]
value = "${a}"
"#,
  )?;

  let output = run_branchflow_raw(&workspace.path, &["properties", "--branch", "develop"], &[])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("Circular property definition"), "stderr: {}", stderr(&output));

  Ok(())
}
