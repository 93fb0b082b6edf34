//! `branchflow catalog` - Record a module's build outputs for later promotion

use super::module_from_gav;
use crate::artifact::{BuildOutput, BuildOutputs, Coordinate, catalog_outputs, primary_coordinate};
use crate::core::context::FlowContext;
use crate::core::error::{FlowError, FlowResult};
use crate::graph::ModuleDescriptor;
use std::path::{Path, PathBuf};

/// Parse `ext[:classifier]=FILE`
fn parse_attachment(module: &ModuleDescriptor, spec: &str) -> FlowResult<(Coordinate, PathBuf)> {
  let (kind, file) = spec
    .split_once('=')
    .filter(|(kind, file)| !kind.is_empty() && !file.is_empty())
    .ok_or_else(|| FlowError::invalid_argument(format!("--attach expects ext[:classifier]=FILE, got '{}'", spec)))?;

  let coordinate = match kind.split_once(':') {
    Some((extension, classifier)) => {
      Coordinate::new(&module.group_id, &module.artifact_id, extension, &module.version).with_classifier(classifier)
    }
    None => Coordinate::new(&module.group_id, &module.artifact_id, kind, &module.version),
  };
  Ok((coordinate, PathBuf::from(file)))
}

/// Run the catalog command
pub fn run_catalog(
  ctx: &FlowContext,
  module: &str,
  packaging: &str,
  output_dir: &Path,
  primary: Option<&Path>,
  attach: &[String],
) -> FlowResult<()> {
  let module = module_from_gav(module, packaging)?;

  let mut outputs = BuildOutputs::default();
  if let Some(file) = primary {
    let file = ctx.path(file);
    outputs.primary = Some(BuildOutput {
      coordinate: primary_coordinate(&module, Some(&file)),
      file,
    });
  }
  for spec in attach {
    let (coordinate, file) = parse_attachment(&module, spec)?;
    outputs.attach(coordinate, ctx.path(&file));
  }

  let catalog = catalog_outputs(&module, &outputs, &ctx.path(output_dir))?;
  println!("{}", catalog.coordinate);
  println!("{}", catalog.file.display());
  Ok(())
}
