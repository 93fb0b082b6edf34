//! `branchflow promote` - Re-attach previously deployed artifacts

use super::module_from_gav;
use crate::core::context::FlowContext;
use crate::core::error::FlowResult;
use crate::promote::{ArtifactRole, PromotionRequest, PromotionResolver, select_source};
use crate::repository::{FileSystemResolver, slot_for};
use std::path::Path;

/// Options of the promote command
#[derive(Debug, Clone, Copy, Default)]
pub struct PromoteOptions {
  /// Resolve through the normal local cache instead of a throwaway one
  pub keep_cache: bool,
  pub require_catalog: bool,
  pub json: bool,
  pub progress: bool,
}

/// Run the promote command
pub fn run_promote(
  ctx: &FlowContext,
  module: &str,
  packaging: &str,
  output_dir: &Path,
  options: PromoteOptions,
) -> FlowResult<()> {
  let module = module_from_gav(module, packaging)?;
  let other_deploys = ctx.other_deploys()?;
  let source = select_source(&ctx.branch, &ctx.settings.repositories, other_deploys)?;
  // bypass follows the slot; the session rejects a slot with no repository configured
  let bypass_cache = slot_for(&ctx.branch, other_deploys).is_some() && !options.keep_cache;

  let output_dir = ctx.path(output_dir);
  let request = PromotionRequest {
    module: &module,
    output_dir: &output_dir,
    require_catalog: options.require_catalog,
  };

  let resolver = FileSystemResolver::new();
  let outcome = PromotionResolver::new(&resolver, ctx.path(&ctx.settings.local_repository()?))
    .with_progress(options.progress && !options.json)
    .promote(&ctx.branch, source, bypass_cache, &request)?;

  if options.json {
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    return Ok(());
  }

  if !outcome.catalog_found {
    println!("No artifact catalog found for {}; nothing promoted", outcome.module);
    return Ok(());
  }

  println!(
    "Promoted {} artifact(s) for {} from {}",
    outcome.resolved().count(),
    outcome.module,
    outcome.source.as_deref().unwrap_or("local repository")
  );
  for artifact in &outcome.artifacts {
    let role = match artifact.role {
      ArtifactRole::Primary => "primary ",
      ArtifactRole::Attached => "attached",
      ArtifactRole::Catalog => "catalog ",
    };
    println!("  {} {} {}", role, artifact.coordinate, &artifact.sha256[..12.min(artifact.sha256.len())]);
  }
  Ok(())
}
