//! Version rules per branch category
//!
//! Versioned branches (mainline, support, release, hotfix) build release
//! versions, optionally matching the version captured from the branch name,
//! and may not depend on snapshots. Development builds snapshots. Every other
//! category is unconstrained.

use super::mangle::is_snapshot;
use crate::branch::{BranchCategory, BranchInfo};
use crate::core::error::{FlowError, FlowResult};
use crate::graph::{ModuleDescriptor, Reference};
use crate::properties::PropertyResolver;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// How a module version is compared with the version in the branch name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReleaseMatch {
  /// Release/hotfix must equal it, support must start with it
  #[default]
  Equals,
  /// Every versioned category except mainline must start with it
  StartsWith,
}

/// Knobs for [`enforce`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnforcePolicy {
  pub release_match: ReleaseMatch,
  /// Reject snapshot dependencies and plugins on versioned branches
  pub non_snapshots: bool,
  /// `group:artifact` plugins tolerated as snapshots (with a warning)
  pub allowed_snapshot_plugins: Vec<String>,
}

impl Default for EnforcePolicy {
  fn default() -> Self {
    Self {
      release_match: ReleaseMatch::Equals,
      non_snapshots: true,
      allowed_snapshot_plugins: Vec::new(),
    }
  }
}

/// Check `module` (and its `parents`, nearest first) against the branch rules
pub fn enforce(
  module: &ModuleDescriptor,
  parents: &[&ModuleDescriptor],
  branch: &BranchInfo,
  policy: &EnforcePolicy,
  resolver: &PropertyResolver,
) -> FlowResult<()> {
  let version = resolver.resolve_value(&module.version, &module.properties)?;
  let category = branch.category();

  if category.is_versioned() {
    enforce_versioned(module, parents, branch, &version, policy, resolver)?;
  } else if category.is_snapshot() && !is_snapshot(&version) {
    return Err(FlowError::version_mismatch(
      branch.name(),
      &version,
      "snapshot-type branches expect a version ending with -SNAPSHOT",
    ));
  }

  info!(module = %module.id(), version = %version, branch = %branch, "version accepted");
  Ok(())
}

fn enforce_versioned(
  module: &ModuleDescriptor,
  parents: &[&ModuleDescriptor],
  branch: &BranchInfo,
  version: &str,
  policy: &EnforcePolicy,
  resolver: &PropertyResolver,
) -> FlowResult<()> {
  if is_snapshot(version) {
    return Err(FlowError::version_mismatch(
      branch.name(),
      version,
      "versioned branches may not build a snapshot version",
    ));
  }
  for parent in parents {
    let parent_version = resolver.resolve_value(&parent.version, &parent.properties)?;
    if is_snapshot(&parent_version) {
      return Err(FlowError::version_mismatch(
        branch.name(),
        version,
        format!("parent {}:{} is a snapshot version", parent.id(), parent_version),
      ));
    }
  }

  if let Some(expected) = branch.expected_version() {
    check_expected_version(branch, version, expected.trim(), policy.release_match)?;
  }

  if policy.non_snapshots {
    let deps = snapshot_references(&module.dependencies, module, resolver, &[])?;
    if !deps.is_empty() {
      return Err(FlowError::version_mismatch(
        branch.name(),
        version,
        format!("snapshot dependencies are not allowed: [{}]", deps.join(", ")),
      ));
    }

    let plugins = snapshot_references(&module.plugins, module, resolver, &policy.allowed_snapshot_plugins)?;
    if !plugins.is_empty() {
      return Err(FlowError::version_mismatch(
        branch.name(),
        version,
        format!("snapshot plugins are not allowed: [{}]", plugins.join(", ")),
      ));
    }
  }

  Ok(())
}

fn check_expected_version(branch: &BranchInfo, version: &str, expected: &str, mode: ReleaseMatch) -> FlowResult<()> {
  let version = version.trim();
  let exact = match (mode, branch.category()) {
    (_, BranchCategory::Mainline) => return Ok(()),
    (ReleaseMatch::Equals, BranchCategory::Release | BranchCategory::Hotfix) => true,
    _ => false,
  };

  if exact && version != expected {
    return Err(FlowError::version_mismatch(
      branch.name(),
      version,
      format!("expected the version to be [{}]", expected),
    ));
  }
  if !exact && !version.starts_with(expected) {
    return Err(FlowError::version_mismatch(
      branch.name(),
      version,
      format!("expected the version to start with [{}]", expected),
    ));
  }

  debug!(expected, version, exact, "version matches branch");
  Ok(())
}

fn snapshot_references(
  references: &[Reference],
  module: &ModuleDescriptor,
  resolver: &PropertyResolver,
  allowed: &[String],
) -> FlowResult<Vec<String>> {
  let mut found = Vec::new();
  for reference in references {
    let Some(raw) = &reference.version else {
      continue;
    };
    let version = resolver.resolve_value(raw, &module.properties)?;
    if !is_snapshot(&version) {
      continue;
    }
    if allowed.contains(&reference.id()) {
      warn!(plugin = %reference.id(), version = %version, "snapshot plugin allowed for this build");
      continue;
    }
    found.push(format!("{}:{}", reference.id(), version));
  }
  Ok(found)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::branch::BranchClassifier;

  fn classifier() -> BranchClassifier {
    BranchClassifier::compile([
      (BranchCategory::Mainline, "(origin/)?master"),
      (BranchCategory::Support, "(origin/)?support/(.*)"),
      (BranchCategory::Release, "(origin/)?release/(.*)"),
      (BranchCategory::Hotfix, "(origin/)?hotfix/(.*)"),
      (BranchCategory::Development, "(origin/)?develop"),
    ])
    .unwrap()
  }

  fn check(branch: &str, version: &str) -> FlowResult<()> {
    check_with(branch, &ModuleDescriptor::new("g", "a", version), &EnforcePolicy::default())
  }

  fn check_with(branch: &str, module: &ModuleDescriptor, policy: &EnforcePolicy) -> FlowResult<()> {
    let info = classifier().classify(branch);
    enforce(module, &[], &info, policy, &PropertyResolver::default())
  }

  #[test]
  fn test_release_branch_requires_exact_version() {
    let err = check("origin/release/1.0.0", "1.2.0").unwrap_err();
    assert!(matches!(err, FlowError::VersionMismatch { .. }));
    assert!(check("origin/release/1.0.0", "1.0.0").is_ok());
  }

  #[test]
  fn test_support_branch_accepts_prefix() {
    assert!(check("origin/support/1.2", "1.2.4").is_ok());
    assert!(check("origin/support/1.2", "1.3.0").is_err());
  }

  #[test]
  fn test_starts_with_mode_relaxes_release() {
    let policy = EnforcePolicy {
      release_match: ReleaseMatch::StartsWith,
      ..EnforcePolicy::default()
    };
    let module = ModuleDescriptor::new("g", "a", "3.1.2");
    assert!(check_with("release/3.1", &module, &policy).is_ok());
    assert!(check("release/3.1", "3.1.2").is_err());
  }

  #[test]
  fn test_versioned_branches_reject_snapshots() {
    assert!(check("master", "1.0.0-SNAPSHOT").is_err());
    assert!(check("master", "1.0.0").is_ok());
    assert!(check("hotfix/1.0.1", "1.0.1-SNAPSHOT").is_err());
  }

  #[test]
  fn test_snapshot_parent_is_rejected() {
    let parent = ModuleDescriptor::new("g", "parent", "1.0-SNAPSHOT");
    let module = ModuleDescriptor::new("g", "a", "1.0.0");
    let info = classifier().classify("release/1.0.0");
    let err = enforce(
      &module,
      &[&parent],
      &info,
      &EnforcePolicy::default(),
      &PropertyResolver::default(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("parent g:parent"));
  }

  #[test]
  fn test_development_requires_snapshot() {
    assert!(check("develop", "1.0.0").is_err());
    assert!(check("develop", "1.0.0-SNAPSHOT").is_ok());
  }

  #[test]
  fn test_unconstrained_categories() {
    assert!(check("feature/x", "1.0.0").is_ok());
    assert!(check("wip", "whatever-SNAPSHOT").is_ok());
  }

  #[test]
  fn test_snapshot_dependencies_and_allowed_plugins() {
    let mut module = ModuleDescriptor::new("g", "a", "1.0.0");
    module.properties.insert("lib.version".to_string(), "2.0-SNAPSHOT".to_string());
    module.dependencies.push(Reference::new("g", "lib", "${lib.version}"));

    let err = check_with("master", &module, &EnforcePolicy::default()).unwrap_err();
    assert!(err.to_string().contains("g:lib:2.0-SNAPSHOT"));

    let relaxed = EnforcePolicy {
      non_snapshots: false,
      ..EnforcePolicy::default()
    };
    assert!(check_with("master", &module, &relaxed).is_ok());

    let mut module = ModuleDescriptor::new("g", "a", "1.0.0");
    module.plugins.push(Reference::new("org.tools", "helper", "1.0-SNAPSHOT"));
    assert!(check_with("master", &module, &EnforcePolicy::default()).is_err());

    let allowed = EnforcePolicy {
      allowed_snapshot_plugins: vec!["org.tools:helper".to_string()],
      ..EnforcePolicy::default()
    };
    assert!(check_with("master", &module, &allowed).is_ok());
  }
}
