//! Artifact coordinates (`group:artifact[:extension[:classifier]]:version`)

use crate::core::error::{FlowError, FlowResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_EXTENSION: &str = "jar";

/// Identifies one build output
///
/// Serialized by joining the non-empty segments of
/// `[group, artifact, extension, classifier, version]` with `:`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
  group_id: String,
  artifact_id: String,
  extension: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  classifier: Option<String>,
  version: String,
}

impl Coordinate {
  pub fn new(
    group_id: impl Into<String>,
    artifact_id: impl Into<String>,
    extension: impl Into<String>,
    version: impl Into<String>,
  ) -> Self {
    let extension = extension.into();
    Self {
      group_id: group_id.into(),
      artifact_id: artifact_id.into(),
      extension: if extension.is_empty() {
        DEFAULT_EXTENSION.to_string()
      } else {
        extension
      },
      classifier: None,
      version: version.into(),
    }
  }

  /// An empty classifier is the same as none
  pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
    let classifier = classifier.into();
    self.classifier = (!classifier.is_empty()).then_some(classifier);
    self
  }

  pub fn group_id(&self) -> &str {
    &self.group_id
  }

  pub fn artifact_id(&self) -> &str {
    &self.artifact_id
  }

  pub fn extension(&self) -> &str {
    &self.extension
  }

  pub fn classifier(&self) -> Option<&str> {
    self.classifier.as_deref()
  }

  pub fn version(&self) -> &str {
    &self.version
  }

  /// Catalog form; two coordinates are the same artifact iff these match
  pub fn serialize(&self) -> String {
    [
      Some(self.group_id.as_str()),
      Some(self.artifact_id.as_str()),
      Some(self.extension.as_str()),
      self.classifier.as_deref(),
      Some(self.version.as_str()),
    ]
    .into_iter()
    .flatten()
    .filter(|segment| !segment.is_empty())
    .collect::<Vec<_>>()
    .join(":")
  }

  /// Accepts `g:a:v`, `g:a:ext:v` and `g:a:ext:classifier:v`
  pub fn parse(text: &str) -> FlowResult<Self> {
    let parts: Vec<&str> = text.trim().split(':').collect();
    if parts.iter().any(|part| part.trim().is_empty()) {
      return Err(FlowError::invalid_argument(format!("empty segment in coordinate '{}'", text)));
    }

    match parts.as_slice() {
      [group, artifact, version] => Ok(Self::new(*group, *artifact, DEFAULT_EXTENSION, *version)),
      [group, artifact, extension, version] => Ok(Self::new(*group, *artifact, *extension, *version)),
      [group, artifact, extension, classifier, version] => {
        Ok(Self::new(*group, *artifact, *extension, *version).with_classifier(*classifier))
      }
      _ => Err(FlowError::invalid_argument(format!(
        "expected group:artifact[:extension[:classifier]]:version, got '{}'",
        text
      ))),
    }
  }

  /// File name in a default-layout repository
  pub fn file_name(&self) -> String {
    match &self.classifier {
      Some(classifier) => format!(
        "{}-{}-{}.{}",
        self.artifact_id, self.version, classifier, self.extension
      ),
      None => format!("{}-{}.{}", self.artifact_id, self.version, self.extension),
    }
  }
}

impl fmt::Display for Coordinate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.serialize())
  }
}

impl FromStr for Coordinate {
  type Err = FlowError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::parse(s)
  }
}
