//! System git backend for branch detection
//!
//! Only plumbing commands are used (`rev-parse`, `show-ref`), each in an
//! isolated environment so user config cannot change their output.

use crate::core::error::{FlowError, FlowResult, GitError};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Git backend using the system `git` binary
pub struct SystemGit {
  /// Repository working directory
  pub(crate) repo_path: PathBuf,

  /// Working tree root
  pub(crate) work_tree: PathBuf,
}

impl SystemGit {
  /// Open a git repository
  pub fn open(path: &Path) -> FlowResult<Self> {
    let mut cmd = Command::new("git");
    cmd.arg("-C").arg(path).args(["rev-parse", "--show-toplevel"]);
    let output = run(cmd, "git rev-parse --show-toplevel")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("not a git repository") {
        return Err(FlowError::Git(GitError::RepoNotFound {
          path: path.to_path_buf(),
        }));
      }
      return Err(FlowError::Git(GitError::CommandFailed {
        command: "git rev-parse --show-toplevel".to_string(),
        stderr: stderr.to_string(),
      }));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(Self {
      repo_path: path.to_path_buf(),
      work_tree: PathBuf::from(stdout.trim()),
    })
  }

  pub fn work_tree(&self) -> &Path {
    &self.work_tree
  }

  /// Get HEAD commit SHA
  pub fn head_commit(&self) -> FlowResult<String> {
    let mut cmd = self.git_cmd();
    cmd.args(["rev-parse", "HEAD"]);
    let output = run(cmd, "git rev-parse HEAD")?;

    if !output.status.success() {
      return Err(FlowError::Git(GitError::CommandFailed {
        command: "git rev-parse HEAD".to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
      }));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Current local branch, `None` on a detached HEAD
  pub fn current_branch(&self) -> FlowResult<Option<String>> {
    let mut cmd = self.git_cmd();
    cmd.args(["rev-parse", "--abbrev-ref", "HEAD"]);
    let output = run(cmd, "git rev-parse --abbrev-ref HEAD")?;

    if !output.status.success() {
      return Ok(None);
    }

    let branch = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if branch.is_empty() || branch == "HEAD" {
      Ok(None)
    } else {
      Ok(Some(branch))
    }
  }

  /// Local and remote-tracking branches whose tip is `sha`
  ///
  /// Local branches are returned by name, remote ones as `<remote>/<name>`.
  pub fn branches_at(&self, sha: &str) -> FlowResult<Vec<String>> {
    let mut cmd = self.git_cmd();
    cmd.arg("show-ref");
    let output = run(cmd, "git show-ref")?;

    // show-ref exits 1 when the repository has no refs at all
    if !output.status.success() && !output.stderr.is_empty() {
      return Err(FlowError::Git(GitError::CommandFailed {
        command: "git show-ref".to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
      }));
    }

    let mut branches = parse_show_ref(&String::from_utf8_lossy(&output.stdout), sha);
    branches.sort();
    branches.dedup();
    Ok(branches)
  }

  /// Create a safe git command with isolated environment
  pub(crate) fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    cmd.arg("-C").arg(&self.repo_path);

    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
      cmd.env("PATH", path);
    }
    if let Ok(home) = std::env::var("HOME") {
      cmd.env("HOME", home);
    }

    cmd.arg("-c").arg("advice.detachedHead=false");
    cmd.arg("-c").arg("core.quotePath=false");

    cmd
  }
}

/// Run `cmd`; a git binary that cannot be started is a [`GitError`] too
fn run(mut cmd: Command, label: &str) -> FlowResult<Output> {
  cmd.output().map_err(|e| {
    FlowError::Git(GitError::CommandFailed {
      command: label.to_string(),
      stderr: format!("failed to start git: {}", e),
    })
  })
}

/// `<sha> refs/heads/<b>` and `<sha> refs/remotes/<r>/<b>` lines pointing at `sha`
fn parse_show_ref(output: &str, sha: &str) -> Vec<String> {
  output
    .lines()
    .filter_map(|line| line.split_once(' '))
    .filter(|(line_sha, _)| *line_sha == sha)
    .filter_map(|(_, refname)| {
      let refname = refname.trim();
      refname
        .strip_prefix("refs/heads/")
        .or_else(|| refname.strip_prefix("refs/remotes/"))
        .filter(|name| !name.ends_with("/HEAD"))
        .map(str::to_string)
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_show_ref_filters_by_sha() {
    let sha = "a".repeat(40);
    let other = "b".repeat(40);
    let output = format!(
      "{sha} refs/heads/develop\n{other} refs/heads/master\n{sha} refs/remotes/origin/develop\n{sha} refs/remotes/origin/HEAD\n{sha} refs/tags/v1\n"
    );
    assert_eq!(parse_show_ref(&output, &sha), vec!["develop", "origin/develop"]);
  }

  #[test]
  fn test_missing_git_binary_is_a_git_error() {
    let err = run(Command::new("/nonexistent/bin/git"), "git rev-parse HEAD").unwrap_err();
    match err {
      FlowError::Git(GitError::CommandFailed { command, stderr }) => {
        assert_eq!(command, "git rev-parse HEAD");
        assert!(stderr.starts_with("failed to start git"));
      }
      other => panic!("expected a git error, got {:?}", other),
    }
  }

  #[test]
  fn test_parse_show_ref_empty() {
    assert!(parse_show_ref("", "abc").is_empty());
  }
}
