//! `branchflow refresh-stage` - Re-resolve cached dependencies held by stage

use crate::core::context::FlowContext;
use crate::core::error::{FlowError, FlowResult};
use crate::graph::ProjectGraph;
use crate::repository::{
  FileSystemResolver, RepositorySlot, ResolutionSession, external_dependencies, refresh_stage_dependencies, slot_for,
};
use std::path::Path;

/// Run the refresh-stage command
///
/// Only release and hotfix branches resolve from stage; on any other branch
/// there is nothing to do.
pub fn run_refresh_stage(ctx: &FlowContext, graph: &Path, module: Option<&str>, json: bool) -> FlowResult<()> {
  if slot_for(&ctx.branch, ctx.other_deploys()?) != Some(RepositorySlot::Stage) {
    println!("{} does not resolve from stage; nothing to refresh", ctx.branch);
    return Ok(());
  }

  let stage = ctx.settings.repositories.repository(RepositorySlot::Stage)?.ok_or_else(|| {
    FlowError::configuration_with_help(
      format!("No stage repository configured for {}", ctx.branch),
      "Set [repositories] stage in flow.toml.",
    )
  })?;

  let graph = ProjectGraph::load(&ctx.path(graph))?;
  let modules = match module {
    Some(id) => {
      let found = graph
        .reactor()
        .iter()
        .find(|m| m.id() == id)
        .ok_or_else(|| FlowError::invalid_argument(format!("module '{}' is not part of the reactor", id)))?;
      vec![found]
    }
    None => graph.reactor().iter().collect(),
  };
  let dependencies = external_dependencies(&graph, &modules, &ctx.resolver)?;

  let session = ResolutionSession::open(&ctx.path(&ctx.settings.local_repository()?), Some(stage), false)?;
  let refresh = refresh_stage_dependencies(&FileSystemResolver::new(), &session, &dependencies);
  session.close();
  let refresh = refresh?;

  if json {
    println!("{}", serde_json::to_string_pretty(&refresh)?);
    return Ok(());
  }

  if refresh.purged.is_empty() {
    println!("No cached stage dependencies to refresh ({} checked)", refresh.checked);
  } else {
    println!("✅ Purged and re-resolved {} stage dependency(ies)", refresh.purged.len());
    for coordinate in &refresh.purged {
      println!("  {}", coordinate);
    }
  }
  Ok(())
}
