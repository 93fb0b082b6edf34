//! `branchflow crosswalk` - Rewrite module versions for deployable ad-hoc branches
//!
//! Prints the rewrite plan; with `--write` the rewritten graph snapshot is
//! saved (only when its contents change).

use crate::artifact::sha256_hex;
use crate::core::context::FlowContext;
use crate::core::error::{FlowResult, ResultExt};
use crate::graph::ProjectGraph;
use crate::version::plan;
use std::path::Path;

/// Run the crosswalk command
pub fn run_crosswalk(ctx: &FlowContext, graph: &Path, write: Option<&Path>, json: bool) -> FlowResult<()> {
  let graph = ProjectGraph::load(&ctx.path(graph))?;
  let rewrite = plan(
    &graph,
    &ctx.branch,
    &ctx.settings.delimiter,
    ctx.other_deploys()?,
    &ctx.resolver,
  )?;

  if json {
    println!("{}", serde_json::to_string_pretty(&rewrite)?);
  } else if rewrite.is_empty() {
    println!("No version changes for {}", ctx.branch);
  } else {
    println!("Version changes ({}):", rewrite.changes.len());
    for change in &rewrite.changes {
      let scope = if change.in_reactor { "" } else { " (outside reactor)" };
      println!("  {} -> {}{}", change.key, change.new_version, scope);
    }
    if !rewrite.edits.is_empty() {
      println!("\nReference updates ({}):", rewrite.edits.len());
      for edit in &rewrite.edits {
        println!(
          "  {} {} {}: {} -> {}",
          edit.module, edit.kind, edit.target, edit.old_version, edit.new_version
        );
      }
    }
  }

  if let Some(out) = write {
    let out = ctx.path(out);
    let rewritten = rewrite.apply(graph.into_snapshot());
    let content = serde_json::to_string_pretty(&rewritten)? + "\n";

    let unchanged = std::fs::read(&out)
      .map(|existing| sha256_hex(&existing) == sha256_hex(content.as_bytes()))
      .unwrap_or(false);
    if unchanged {
      if !json {
        println!("✅ {} is up to date", out.display());
      }
    } else {
      std::fs::write(&out, content).with_context(|| format!("Failed to write graph file {}", out.display()))?;
      if !json {
        println!("✅ Wrote {}", out.display());
      }
    }
  }

  Ok(())
}
