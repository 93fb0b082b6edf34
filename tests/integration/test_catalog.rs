//! Integration tests for `branchflow catalog`

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_catalog_lists_primary_and_attachments() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  std::fs::create_dir_all(workspace.path.join("target"))?;
  std::fs::write(workspace.path.join("target/app-1.0.jar"), b"jar")?;
  std::fs::write(workspace.path.join("target/app-1.0-sources.jar"), b"sources")?;

  let output = run_branchflow(
    &workspace.path,
    &[
      "catalog",
      "--module",
      "com.example:app:1.0",
      "--output-dir",
      "target",
      "--primary",
      "target/app-1.0.jar",
      "--attach",
      "jar:sources=target/app-1.0-sources.jar",
    ],
  )?;

  let text = stdout(&output);
  assert!(text.starts_with("com.example:app:txt:catalog:1.0\n"), "{}", text);
  assert!(text.contains("app.txt"));

  assert_eq!(
    workspace.read_file("target/app.txt")?,
    "[artifacts]\ncom.example:app:jar:1.0\ncom.example:app:jar:sources:1.0\n"
  );

  Ok(())
}

#[test]
fn test_catalog_without_outputs_writes_header_only() -> Result<()> {
  let workspace = TestWorkspace::new()?;

  run_branchflow(
    &workspace.path,
    &[
      "catalog",
      "--module",
      "com.example:parent:1.0",
      "--packaging",
      "pom",
      "--output-dir",
      "target",
      "--primary",
      "target/missing.pom",
    ],
  )?;

  assert_eq!(workspace.read_file("target/parent.txt")?, "[artifacts]\n");

  Ok(())
}

#[test]
fn test_catalog_rejects_bad_module() -> Result<()> {
  let workspace = TestWorkspace::new()?;

  let output = run_branchflow_raw(
    &workspace.path,
    &["catalog", "--module", "com.example:app", "--output-dir", "target"],
    &[],
  )?;
  assert_eq!(output.status.code(), Some(1));
  assert!(!workspace.file_exists("target/app.txt"));

  Ok(())
}
