//! Build outputs of one module and the catalog that records them

use super::catalog::{self, catalog_coordinate};
use super::coordinate::Coordinate;
use crate::core::error::{FlowResult, ResultExt};
use crate::graph::ModuleDescriptor;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A file registered under a coordinate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildOutput {
  pub coordinate: Coordinate,
  pub file: PathBuf,
}

/// Primary artifact plus attached artifacts of a module
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildOutputs {
  pub primary: Option<BuildOutput>,
  pub attached: Vec<BuildOutput>,
}

impl BuildOutputs {
  pub fn attach(&mut self, coordinate: Coordinate, file: PathBuf) {
    debug!(coordinate = %coordinate, file = %file.display(), "attached output");
    self.attached.push(BuildOutput { coordinate, file });
  }

  /// Primary output that names an existing regular file
  fn cataloguable_primary(&self) -> Option<&BuildOutput> {
    self.primary.as_ref().filter(|output| output.file.is_file())
  }
}

/// File extension used for a packaging type
pub fn extension_for(packaging: &str) -> &str {
  match packaging {
    "" | "bundle" | "maven-plugin" | "ejb" => "jar",
    other => other,
  }
}

/// Coordinate of the module's main artifact
///
/// When `file` does not carry the packaging's extension, the file's own
/// extension is used.
pub fn primary_coordinate(module: &ModuleDescriptor, file: Option<&Path>) -> Coordinate {
  let mut extension = extension_for(&module.packaging).to_string();

  if let Some(file) = file {
    let name = file
      .file_name()
      .map(|n| n.to_string_lossy().to_lowercase())
      .unwrap_or_default();
    if !name.ends_with(&extension.to_lowercase())
      && let Some(actual) = file.extension().map(|e| e.to_string_lossy().to_string())
    {
      warn!(
        file = %file.display(),
        packaging = %module.packaging,
        "file name does not match the packaging extension; cataloging with .{}",
        actual
      );
      extension = actual;
    }
  }

  Coordinate::new(&module.group_id, &module.artifact_id, extension, &module.version)
}

/// Write `<build_dir>/<artifactId>.txt` and return it as an output to attach
///
/// The primary artifact is listed only if its file exists; attached artifacts
/// are listed as they are.
pub fn catalog_outputs(module: &ModuleDescriptor, outputs: &BuildOutputs, build_dir: &Path) -> FlowResult<BuildOutput> {
  info!("Cataloging artifacts for promotion & reattachment: {}", build_dir.display());

  std::fs::create_dir_all(build_dir)
    .with_context(|| format!("Failed to create build directory {}", build_dir.display()))?;
  let path = build_dir.join(format!("{}.txt", module.artifact_id));
  if path.exists() {
    std::fs::remove_file(&path).with_context(|| format!("Failed to remove old catalog {}", path.display()))?;
  }

  let mut entries = Vec::new();
  match outputs.cataloguable_primary() {
    Some(primary) => entries.push(primary.coordinate.clone()),
    None => info!("No primary artifact to catalog, cataloging attached artifacts instead."),
  }
  entries.extend(outputs.attached.iter().map(|output| output.coordinate.clone()));

  for entry in &entries {
    info!("Cataloging: {}", entry);
  }
  if entries.is_empty() {
    info!("No artifacts were catalogued.");
  }

  std::fs::write(&path, catalog::write(&entries))
    .with_context(|| format!("Failed to write catalog {}", path.display()))?;

  let coordinate = catalog_coordinate(&module.group_id, &module.artifact_id, &module.version);
  info!("Attaching catalog artifact: {} ({})", path.display(), coordinate);
  Ok(BuildOutput { coordinate, file: path })
}
