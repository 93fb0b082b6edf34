//! Release-flow branch categories

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category a branch name falls into
///
/// Declaration order is classification priority for the pattern-backed
/// categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BranchCategory {
  Mainline,
  Support,
  Release,
  Hotfix,
  Development,
  FeatureOrBugfix,
  Other,
  Undefined,
}

impl BranchCategory {
  /// Categories tried against patterns, highest priority first
  pub const PRIORITY: [BranchCategory; 6] = [
    BranchCategory::Mainline,
    BranchCategory::Support,
    BranchCategory::Release,
    BranchCategory::Hotfix,
    BranchCategory::Development,
    BranchCategory::FeatureOrBugfix,
  ];

  /// Mainline, Support, Release and Hotfix carry release versions
  pub fn is_versioned(&self) -> bool {
    matches!(
      self,
      BranchCategory::Mainline | BranchCategory::Support | BranchCategory::Release | BranchCategory::Hotfix
    )
  }

  /// Development must carry a snapshot version
  pub fn is_snapshot(&self) -> bool {
    matches!(self, BranchCategory::Development)
  }

  /// `MAINLINE`, `FEATURE_OR_BUGFIX`, ...
  pub fn screaming_name(&self) -> &'static str {
    match self {
      BranchCategory::Mainline => "MAINLINE",
      BranchCategory::Support => "SUPPORT",
      BranchCategory::Release => "RELEASE",
      BranchCategory::Hotfix => "HOTFIX",
      BranchCategory::Development => "DEVELOPMENT",
      BranchCategory::FeatureOrBugfix => "FEATURE_OR_BUGFIX",
      BranchCategory::Other => "OTHER",
      BranchCategory::Undefined => "UNDEFINED",
    }
  }
}

impl fmt::Display for BranchCategory {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.screaming_name())
  }
}
