//! `branchflow retarget` - Show where this branch deploys to

use crate::core::context::FlowContext;
use crate::core::error::FlowResult;
use crate::repository::retarget;

/// Run the retarget command
pub fn run_retarget(ctx: &FlowContext, json: bool) -> FlowResult<()> {
  let target = retarget(
    &ctx.branch,
    &ctx.settings.repositories,
    ctx.other_deploys()?,
    &ctx.settings.delimiter,
  )?;

  if json {
    println!("{}", serde_json::to_string_pretty(&target)?);
    return Ok(());
  }

  match (&target.slot, &target.repository) {
    (Some(slot), Some(repository)) => {
      println!("{} repository: {} [{}]", slot, repository, repository.layout);
    }
    (Some(slot), None) => println!("{} repository: <not configured>", slot),
    (None, _) => println!("deploy.skip=true"),
  }
  if let Some(delimiter) = &target.version_delimiter {
    println!(
      "Artifact versions: <version>{}{}-SNAPSHOT",
      delimiter,
      crate::version::sanitize(&target.branch)
    );
  }
  Ok(())
}
