//! Where a branch deploys to and where promotion fetches from

use super::remote::{RemoteRepository, RepositoryDefinition};
use crate::branch::{BranchCategory, BranchInfo};
use crate::core::error::FlowResult;
use crate::version::mangle;
use serde::Serialize;
use std::fmt;
use tracing::info;

/// Configured repository roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RepositorySlot {
  Release,
  Stage,
  Snapshot,
}

impl fmt::Display for RepositorySlot {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RepositorySlot::Release => f.write_str("release"),
      RepositorySlot::Stage => f.write_str("stage"),
      RepositorySlot::Snapshot => f.write_str("snapshot"),
    }
  }
}

/// Repository specs per slot as written in flow.toml
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositorySpecs {
  pub release: Option<String>,
  pub stage: Option<String>,
  pub snapshot: Option<String>,
  pub definitions: Vec<RepositoryDefinition>,
}

impl RepositorySpecs {
  pub fn spec(&self, slot: RepositorySlot) -> Option<&str> {
    match slot {
      RepositorySlot::Release => self.release.as_deref(),
      RepositorySlot::Stage => self.stage.as_deref(),
      RepositorySlot::Snapshot => self.snapshot.as_deref(),
    }
    .map(str::trim)
    .filter(|spec| !spec.is_empty())
  }

  /// Resolve the repository configured for `slot`
  pub fn repository(&self, slot: RepositorySlot) -> FlowResult<Option<RemoteRepository>> {
    self
      .spec(slot)
      .map(|spec| RemoteRepository::from_spec(spec, &self.definitions))
      .transpose()
  }
}

/// Slot a branch publishes to and promotes from
///
/// `other_deploys` says whether an `Other` branch matched the deploy pattern.
pub fn slot_for(branch: &BranchInfo, other_deploys: bool) -> Option<RepositorySlot> {
  match branch.category() {
    BranchCategory::Mainline | BranchCategory::Support => Some(RepositorySlot::Release),
    BranchCategory::Release | BranchCategory::Hotfix => Some(RepositorySlot::Stage),
    BranchCategory::Development => Some(RepositorySlot::Snapshot),
    BranchCategory::Other if other_deploys => Some(RepositorySlot::Snapshot),
    _ => None,
  }
}

/// Deploy settings for the current branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeployTarget {
  pub branch: String,
  pub category: BranchCategory,
  pub slot: Option<RepositorySlot>,
  pub repository: Option<RemoteRepository>,
  /// Delimiter for branch-qualified artifact versions, `Some` only for deploying `Other` branches
  #[serde(skip_serializing_if = "Option::is_none")]
  pub version_delimiter: Option<String>,
  /// `deploy.skip`
  pub skip: bool,
}

impl DeployTarget {
  /// Version artifacts are deployed under
  pub fn artifact_version(&self, version: &str) -> String {
    match &self.version_delimiter {
      Some(delimiter) => mangle(version, &self.branch, delimiter),
      None => version.to_string(),
    }
  }
}

/// Pick the deploy repository for `branch`
pub fn retarget(
  branch: &BranchInfo,
  repositories: &RepositorySpecs,
  other_deploys: bool,
  delimiter: &str,
) -> FlowResult<DeployTarget> {
  let slot = slot_for(branch, other_deploys);
  let repository = match slot {
    Some(slot) => {
      info!(
        "Setting {} artifact repository to: [{}]",
        slot,
        repositories.spec(slot).unwrap_or_default()
      );
      repositories.repository(slot)?
    }
    None => {
      info!("Un-Setting artifact repositories.");
      info!("Setting deploy.skip = 'true'");
      None
    }
  };

  let version_delimiter = (branch.category() == BranchCategory::Other && slot.is_some()).then(|| delimiter.to_string());
  if let Some(delimiter) = &version_delimiter {
    info!(
      "Artifact versions updated with build metadata: {}{}-SNAPSHOT",
      delimiter,
      crate::version::sanitize(branch.name())
    );
  }

  Ok(DeployTarget {
    branch: branch.name().to_string(),
    category: branch.category(),
    slot,
    repository,
    version_delimiter,
    skip: slot.is_none(),
  })
}
