//! `branchflow properties` - Print the properties derived from the branch

use crate::core::context::FlowContext;
use crate::core::error::{FlowResult, ResultExt};
use std::path::Path;

/// Run the properties command
///
/// Renders `key=value` lines (or JSON) to stdout, or to `output` if given.
pub fn run_properties(ctx: &FlowContext, json: bool, output: Option<&Path>) -> FlowResult<()> {
  let props = ctx.branch_properties()?;

  let rendered = if json {
    serde_json::to_string_pretty(&props)? + "\n"
  } else {
    props.iter().map(|(k, v)| format!("{}={}\n", k, v)).collect::<String>()
  };

  match output {
    Some(path) => {
      let path = ctx.path(path);
      std::fs::write(&path, rendered).with_context(|| format!("Failed to write {}", path.display()))?;
      println!("Wrote {} properties to {}", props.len(), path.display());
    }
    None => print!("{}", rendered),
  }
  Ok(())
}
