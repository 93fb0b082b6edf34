//! Module descriptors of a multi-module build

use crate::properties::Properties;
use serde::{Deserialize, Serialize};
use std::fmt;

fn default_packaging() -> String {
  "jar".to_string()
}

/// `(groupId, artifactId, version)` identity of a module
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleKey {
  pub group_id: String,
  pub artifact_id: String,
  pub version: String,
}

impl ModuleKey {
  pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>, version: impl Into<String>) -> Self {
    Self {
      group_id: group_id.into(),
      artifact_id: artifact_id.into(),
      version: version.into(),
    }
  }
}

impl fmt::Display for ModuleKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
  }
}

/// A dependency, plugin or parent reference
///
/// The version may be a `${...}` expression or absent (managed elsewhere).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
  pub group_id: String,
  pub artifact_id: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub version: Option<String>,
}

impl Reference {
  pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>, version: impl Into<String>) -> Self {
    Self {
      group_id: group_id.into(),
      artifact_id: artifact_id.into(),
      version: Some(version.into()),
    }
  }

  /// Same group and artifact as `module`, any version
  pub fn points_at(&self, module: &ModuleDescriptor) -> bool {
    self.group_id == module.group_id && self.artifact_id == module.artifact_id
  }

  /// `group:artifact`
  pub fn id(&self) -> String {
    format!("{}:{}", self.group_id, self.artifact_id)
  }
}

impl fmt::Display for Reference {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.version {
      Some(version) => write!(f, "{}:{}:{}", self.group_id, self.artifact_id, version),
      None => write!(f, "{}:{}", self.group_id, self.artifact_id),
    }
  }
}

/// Reference lists of a module, named for edits and reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
  Parent,
  Dependency,
  ManagedDependency,
  Plugin,
  ManagedPlugin,
}

impl fmt::Display for ReferenceKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      ReferenceKind::Parent => "parent",
      ReferenceKind::Dependency => "dependency",
      ReferenceKind::ManagedDependency => "managed dependency",
      ReferenceKind::Plugin => "plugin",
      ReferenceKind::ManagedPlugin => "managed plugin",
    };
    f.write_str(name)
  }
}

/// One module of a multi-module build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
  pub group_id: String,
  pub artifact_id: String,
  pub version: String,
  #[serde(default = "default_packaging")]
  pub packaging: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub parent: Option<Reference>,
  #[serde(default)]
  pub dependencies: Vec<Reference>,
  #[serde(default)]
  pub managed_dependencies: Vec<Reference>,
  #[serde(default)]
  pub plugins: Vec<Reference>,
  #[serde(default)]
  pub managed_plugins: Vec<Reference>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub final_name: Option<String>,
  #[serde(default, skip_serializing_if = "Properties::is_empty")]
  pub properties: Properties,
}

impl ModuleDescriptor {
  pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>, version: impl Into<String>) -> Self {
    Self {
      group_id: group_id.into(),
      artifact_id: artifact_id.into(),
      version: version.into(),
      packaging: default_packaging(),
      parent: None,
      dependencies: Vec::new(),
      managed_dependencies: Vec::new(),
      plugins: Vec::new(),
      managed_plugins: Vec::new(),
      final_name: None,
      properties: Properties::new(),
    }
  }

  /// Key with the version as written (unresolved)
  pub fn key(&self) -> ModuleKey {
    ModuleKey::new(&self.group_id, &self.artifact_id, &self.version)
  }

  /// `group:artifact`
  pub fn id(&self) -> String {
    format!("{}:{}", self.group_id, self.artifact_id)
  }

  pub fn references(&self, kind: ReferenceKind) -> &[Reference] {
    match kind {
      ReferenceKind::Parent => self.parent.as_slice(),
      ReferenceKind::Dependency => &self.dependencies,
      ReferenceKind::ManagedDependency => &self.managed_dependencies,
      ReferenceKind::Plugin => &self.plugins,
      ReferenceKind::ManagedPlugin => &self.managed_plugins,
    }
  }

  pub fn references_mut(&mut self, kind: ReferenceKind) -> &mut [Reference] {
    match kind {
      ReferenceKind::Parent => self.parent.as_mut_slice(),
      ReferenceKind::Dependency => &mut self.dependencies,
      ReferenceKind::ManagedDependency => &mut self.managed_dependencies,
      ReferenceKind::Plugin => &mut self.plugins,
      ReferenceKind::ManagedPlugin => &mut self.managed_plugins,
    }
  }

  /// Every reference with its kind, parent first
  pub fn all_references(&self) -> impl Iterator<Item = (ReferenceKind, &Reference)> {
    [
      ReferenceKind::Parent,
      ReferenceKind::Dependency,
      ReferenceKind::ManagedDependency,
      ReferenceKind::Plugin,
      ReferenceKind::ManagedPlugin,
    ]
    .into_iter()
    .flat_map(move |kind| self.references(kind).iter().map(move |r| (kind, r)))
  }
}

impl fmt::Display for ModuleDescriptor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
  }
}
