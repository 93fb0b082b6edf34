//! `branchflow enforce` - Check module versions against the branch rules

use crate::core::context::FlowContext;
use crate::core::error::{FlowError, FlowResult};
use crate::graph::ProjectGraph;
use crate::version::enforce;
use std::path::Path;

/// Run the enforce command
///
/// Checks every reactor module, or only `module` (`group:artifact`). The
/// first violation aborts.
pub fn run_enforce(ctx: &FlowContext, graph: &Path, module: Option<&str>) -> FlowResult<()> {
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

  for module in &modules {
    let parents = graph.parents(module);
    enforce(module, &parents, &ctx.branch, &ctx.settings.enforce, &ctx.resolver)?;
  }

  println!(
    "✅ {} module(s) satisfy the version rules for {}",
    modules.len(),
    ctx.branch
  );
  Ok(())
}
