//! Artifact catalog: the durable list of what one build produced
//!
//! ```text
//! [artifacts]
//! com.example:app:jar:1.0
//! com.example:app:jar:sources:1.0
//! ```
//!
//! The header is always written so an empty catalog is still a file. Catalogs
//! from before the header existed start directly with a coordinate.

use super::coordinate::Coordinate;
use crate::core::error::{FlowError, FlowResult};

pub const HEADER: &str = "[artifacts]";

/// Classifier and extension of the catalog artifact itself
pub const CATALOG_CLASSIFIER: &str = "catalog";
pub const CATALOG_EXTENSION: &str = "txt";

/// Coordinate under which a module's catalog is published
pub fn catalog_coordinate(group_id: &str, artifact_id: &str, version: &str) -> Coordinate {
  Coordinate::new(group_id, artifact_id, CATALOG_EXTENSION, version).with_classifier(CATALOG_CLASSIFIER)
}

pub fn write(artifacts: &[Coordinate]) -> Vec<u8> {
  let mut out = String::with_capacity(HEADER.len() + 1 + artifacts.len() * 48);
  out.push_str(HEADER);
  out.push('\n');
  for artifact in artifacts {
    out.push_str(&artifact.serialize());
    out.push('\n');
  }
  out.into_bytes()
}

/// Fails with [`FlowError::CatalogFormat`] on the first bad line (1-based)
pub fn parse(bytes: &[u8]) -> FlowResult<Vec<Coordinate>> {
  let text = std::str::from_utf8(bytes).map_err(|e| FlowError::CatalogFormat {
    line: 0,
    content: String::new(),
    reason: format!("catalog is not UTF-8: {}", e),
  })?;

  let mut coordinates = Vec::new();
  for (idx, raw) in text.lines().enumerate() {
    let line = raw.trim();
    if line.is_empty() || (idx == 0 && line == HEADER) {
      continue;
    }

    let coordinate = Coordinate::parse(line).map_err(|e| FlowError::CatalogFormat {
      line: idx + 1,
      content: line.to_string(),
      reason: match e {
        FlowError::InvalidArgument { message } => message,
        other => other.to_string(),
      },
    })?;
    coordinates.push(coordinate);
  }

  Ok(coordinates)
}
