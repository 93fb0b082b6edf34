//! Repository specifications and layouts
//!
//! A repository is named either by an id defined under
//! `[[repositories.definitions]]` or inline as `id::layout::url::unique`.

use crate::artifact::Coordinate;
use crate::core::error::{FlowError, FlowResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use tracing::debug;

const ALT_SEPARATOR: &str = "::";

fn default_layout() -> String {
  "default".to_string()
}

/// `[[repositories.definitions]]` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryDefinition {
  pub id: String,
  pub url: String,
  #[serde(default = "default_layout")]
  pub layout: String,
  /// Snapshot deploys get unique (timestamped) versions
  #[serde(default = "default_unique")]
  pub unique: bool,
}

fn default_unique() -> bool {
  true
}

/// Directory structure of a repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RepositoryLayout {
  /// `group/as/path/artifact/version/artifact-version[-classifier].ext`
  #[default]
  Default,
}

impl RepositoryLayout {
  pub fn parse(id: &str) -> FlowResult<Self> {
    match id.trim() {
      "default" => Ok(RepositoryLayout::Default),
      other => Err(FlowError::configuration_with_help(
        format!("Invalid repository layout: {}", other),
        "Only the \"default\" layout is supported.",
      )),
    }
  }

  /// Relative path of `coordinate` inside a repository
  pub fn path_for(&self, coordinate: &Coordinate) -> PathBuf {
    match self {
      RepositoryLayout::Default => {
        let mut path: PathBuf = coordinate.group_id().split('.').collect();
        path.push(coordinate.artifact_id());
        path.push(coordinate.version());
        path.push(coordinate.file_name());
        path
      }
    }
  }
}

impl fmt::Display for RepositoryLayout {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RepositoryLayout::Default => f.write_str("default"),
    }
  }
}

/// A resolved repository target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteRepository {
  pub id: String,
  pub url: String,
  pub layout: RepositoryLayout,
  pub unique: bool,
}

impl RemoteRepository {
  /// Parse `spec` as `id::layout::url::unique`, or look it up by id
  pub fn from_spec(spec: &str, definitions: &[RepositoryDefinition]) -> FlowResult<Self> {
    if let Some(repository) = Self::parse_alt_syntax(spec)? {
      return Ok(repository);
    }

    let id = spec.trim();
    for candidate in definitions {
      debug!("Checking defined repository ID: {} against: {}", candidate.id.trim(), id);
      if candidate.id.trim() == id {
        return Ok(Self {
          id: candidate.id.trim().to_string(),
          url: candidate.url.trim().to_string(),
          layout: RepositoryLayout::parse(&candidate.layout)?,
          unique: candidate.unique,
        });
      }
    }

    Err(FlowError::configuration_with_help(
      format!("Invalid syntax for repository or repository id not resolved: {}", spec),
      "Use \"id::layout::url::unique\" or only specify the \"id\" and define it under [[repositories.definitions]] in flow.toml.",
    ))
  }

  fn parse_alt_syntax(spec: &str) -> FlowResult<Option<Self>> {
    // greedy on the id, as `(.+)::(.+)::(.+)::(.+)` would be
    let mut parts: Vec<&str> = spec.rsplitn(4, ALT_SEPARATOR).collect();
    if parts.len() != 4 || parts.iter().any(|part| part.is_empty()) {
      return Ok(None);
    }
    parts.reverse();

    Ok(Some(Self {
      id: parts[0].trim().to_string(),
      layout: RepositoryLayout::parse(parts[1])?,
      url: parts[2].trim().to_string(),
      unique: parts[3].trim().eq_ignore_ascii_case("true"),
    }))
  }
}

impl fmt::Display for RemoteRepository {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} ({})", self.id, self.url)
  }
}
