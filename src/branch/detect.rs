//! Determine which branch is being built
//!
//! Sources in order: an explicit name, the configured expression resolved
//! through the property resolver, then git (`rev-parse --abbrev-ref HEAD`,
//! falling back to the branches that point at a detached HEAD).

use super::category::BranchCategory;
use super::classifier::{BranchClassifier, BranchInfo};
use crate::core::error::{FlowError, FlowResult};
use crate::core::vcs::SystemGit;
use crate::properties::{Properties, PropertyResolver, has_unresolved_placeholders};
use std::path::Path;
use tracing::{debug, warn};

/// Inputs for branch detection
#[derive(Debug, Clone, Copy)]
pub struct BranchSource<'a> {
  /// `--branch` on the command line
  pub explicit: Option<&'a str>,
  /// e.g. `${env.GIT_BRANCH}`
  pub expression: &'a str,
  pub detect_from_git: bool,
  pub repo: &'a Path,
}

impl BranchSource<'_> {
  /// Resolve and classify the current branch
  ///
  /// Never fails on a missing branch; that is reported as `Undefined`.
  pub fn detect(
    &self,
    classifier: &BranchClassifier,
    resolver: &PropertyResolver,
    project: &Properties,
  ) -> FlowResult<BranchInfo> {
    if let Some(name) = self.explicit.map(str::trim).filter(|name| !name.is_empty()) {
      debug!(branch = name, "using explicit branch");
      return Ok(classifier.classify(name));
    }

    if let Some(name) = self.from_expression(resolver, project)? {
      return Ok(classifier.classify(&name));
    }

    if self.detect_from_git {
      match SystemGit::open(self.repo).and_then(|git| from_git(&git, classifier)) {
        Ok(info) => return Ok(info),
        Err(FlowError::Git(e)) => debug!("git detection unavailable: {}", e),
        Err(e) => return Err(e),
      }
    }

    warn!("Unable to determine the current branch; treating it as UNDEFINED");
    Ok(BranchInfo::undefined())
  }

  fn from_expression(&self, resolver: &PropertyResolver, project: &Properties) -> FlowResult<Option<String>> {
    if self.expression.is_empty() {
      return Ok(None);
    }

    let resolved = resolver.resolve_value(self.expression, project)?;
    if has_unresolved_placeholders(&resolved) {
      debug!(
        expression = self.expression,
        resolved = %resolved,
        "branch expression has unresolved placeholders"
      );
      return Ok(None);
    }

    let resolved = resolved.trim();
    if resolved.is_empty() {
      Ok(None)
    } else {
      Ok(Some(resolved.to_string()))
    }
  }
}

fn from_git(git: &SystemGit, classifier: &BranchClassifier) -> FlowResult<BranchInfo> {
  if let Some(branch) = git.current_branch()? {
    debug!(branch = %branch, "detected local branch");
    return Ok(classifier.classify(&branch));
  }

  let sha = git.head_commit()?;
  let branches = git.branches_at(&sha)?;
  debug!(sha = %sha, ?branches, "HEAD is detached");

  match single_category(&branches, classifier) {
    Some(name) => Ok(classifier.classify(name)),
    None => {
      warn!(sha = %sha, ?branches, "Can't resolve detached HEAD to a single branch type");
      Ok(BranchInfo::undefined())
    }
  }
}

/// Pick a branch name when all `branches` share one category
///
/// Support, release and hotfix names carry a version, so more than one of
/// them is ambiguous even within the same category.
fn single_category<'a>(branches: &'a [String], classifier: &BranchClassifier) -> Option<&'a str> {
  let mut resolved: Option<(BranchCategory, &str)> = None;

  for branch in branches {
    let (category, _) = classifier.category_of(branch);
    match resolved {
      None => resolved = Some((category, branch)),
      Some((seen, _)) if seen != category => return None,
      Some((seen, _)) => {
        if matches!(
          seen,
          BranchCategory::Support | BranchCategory::Release | BranchCategory::Hotfix
        ) {
          return None;
        }
        resolved = Some((seen, branch));
      }
    }
  }

  resolved.map(|(_, name)| name)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn classifier() -> BranchClassifier {
    BranchClassifier::compile([
      (BranchCategory::Mainline, "(origin/)?master"),
      (BranchCategory::Release, "(origin/)?release/(.*)"),
      (BranchCategory::Development, "(origin/)?develop"),
    ])
    .unwrap()
  }

  fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
  }

  #[test]
  fn test_explicit_branch_wins() {
    let source = BranchSource {
      explicit: Some("release/1.0"),
      expression: "${env.GIT_BRANCH}",
      detect_from_git: false,
      repo: Path::new("."),
    };
    let resolver = PropertyResolver::new(
      Properties::new(),
      [("GIT_BRANCH".to_string(), "develop".to_string())].into(),
    );
    let info = source.detect(&classifier(), &resolver, &Properties::new()).unwrap();
    assert_eq!(info.category(), BranchCategory::Release);
  }

  #[test]
  fn test_expression_from_environment() {
    let source = BranchSource {
      explicit: None,
      expression: "${env.GIT_BRANCH}",
      detect_from_git: false,
      repo: Path::new("."),
    };
    let resolver = PropertyResolver::new(
      Properties::new(),
      [("GIT_BRANCH".to_string(), "origin/develop".to_string())].into(),
    );
    let info = source.detect(&classifier(), &resolver, &Properties::new()).unwrap();
    assert_eq!(info.name(), "origin/develop");
    assert_eq!(info.category(), BranchCategory::Development);
  }

  #[test]
  fn test_unresolved_expression_is_undefined_without_git() {
    let source = BranchSource {
      explicit: None,
      expression: "${env.GIT_BRANCH}",
      detect_from_git: false,
      repo: Path::new("."),
    };
    let info = source
      .detect(&classifier(), &PropertyResolver::default(), &Properties::new())
      .unwrap();
    assert_eq!(info.category(), BranchCategory::Undefined);
  }

  #[test]
  fn test_single_category_accepts_same_unversioned_type() {
    let branches = names(&["develop", "origin/develop"]);
    assert_eq!(single_category(&branches, &classifier()), Some("origin/develop"));
  }

  #[test]
  fn test_single_category_rejects_mixed_types() {
    let branches = names(&["develop", "master"]);
    assert_eq!(single_category(&branches, &classifier()), None);
  }

  #[test]
  fn test_single_category_rejects_multiple_versioned() {
    let branches = names(&["release/1.0", "release/1.1"]);
    assert_eq!(single_category(&branches, &classifier()), None);
    assert_eq!(single_category(&names(&["release/1.0"]), &classifier()), Some("release/1.0"));
  }
}
