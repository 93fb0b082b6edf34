//! Test helpers for integration tests

use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Config with git detection off, so only `--branch` or the expression decide
pub const BASE_CONFIG: &str = r#"[branches]
detect_from_git = false
"#;

/// A scratch project directory with a flow.toml
pub struct TestWorkspace {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestWorkspace {
  /// Create a workspace using [`BASE_CONFIG`]
  pub fn new() -> Result<Self> {
    Self::with_config(BASE_CONFIG)
  }

  pub fn with_config(config: &str) -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();
    std::fs::write(path.join("flow.toml"), config)?;
    Ok(Self { _root: root, path })
  }

  /// Replace flow.toml
  pub fn write_config(&self, config: &str) -> Result<()> {
    std::fs::write(self.path.join("flow.toml"), config)?;
    Ok(())
  }

  /// Initialize git on `branch` with one commit
  pub fn init_git(&self, branch: &str) -> Result<()> {
    git(&self.path, &["init", &format!("--initial-branch={}", branch)])?;
    git(&self.path, &["config", "user.name", "Test User"])?;
    git(&self.path, &["config", "user.email", "test@example.com"])?;
    git(&self.path, &["add", "."])?;
    git(&self.path, &["commit", "-m", "Initial commit"])?;
    Ok(())
  }

  /// Write `graph.json` from reactor and sibling module values
  pub fn write_graph(&self, reactor: Vec<Value>, siblings: Vec<Value>) -> Result<PathBuf> {
    let path = self.path.join("graph.json");
    let snapshot = json!({ "reactor": reactor, "siblings": siblings });
    std::fs::write(&path, serde_json::to_string_pretty(&snapshot)?)?;
    Ok(path)
  }

  /// Put `content` into the repository at `repo` under the default layout
  pub fn publish(&self, repo: &str, group: &str, artifact: &str, version: &str, file: &str, content: &[u8]) -> Result<PathBuf> {
    let mut dir = self.path.join(repo);
    for part in group.split('.') {
      dir.push(part);
    }
    dir.push(artifact);
    dir.push(version);
    std::fs::create_dir_all(&dir)?;
    let path = dir.join(file);
    std::fs::write(&path, content)?;
    Ok(path)
  }

  /// Check if a file exists
  pub fn file_exists(&self, path: &str) -> bool {
    self.path.join(path).exists()
  }

  /// Read a file
  pub fn read_file(&self, path: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join(path))?)
  }
}

/// Module entry of a graph snapshot
pub fn module(group: &str, artifact: &str, version: &str) -> Value {
  json!({ "group_id": group, "artifact_id": artifact, "version": version })
}

/// Run git command in a directory
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

/// Run branchflow and return its output whatever the exit status
pub fn run_branchflow_raw(cwd: &Path, args: &[&str], env: &[(&str, &str)]) -> Result<Output> {
  let bin = env!("CARGO_BIN_EXE_branchflow");

  let mut command = Command::new(bin);
  command
    .current_dir(cwd)
    .args(args)
    .env_remove("GIT_BRANCH")
    .env_remove("BRANCHFLOW_LOG")
    .env_remove("RUST_LOG");
  for (key, value) in env {
    command.env(key, value);
  }
  command.output().context("Failed to run branchflow")
}

/// Run branchflow CLI command, failing on a non-zero exit
pub fn run_branchflow(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = run_branchflow_raw(cwd, args, &[])?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "branchflow command failed: branchflow {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}

pub fn stdout(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
  String::from_utf8_lossy(&output.stderr).to_string()
}
