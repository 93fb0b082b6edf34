//! `branchflow classify` - Show how the current branch is classified

use crate::branch::{BranchCategory, BranchInfo};
use crate::core::context::FlowContext;
use crate::core::error::FlowResult;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ClassifyReport<'a> {
  #[serde(flatten)]
  branch: &'a BranchInfo,
  versioned: bool,
  expected_version: Option<&'a str>,
  other_deploys: bool,
}

/// Run the classify command
pub fn run_classify(ctx: &FlowContext, json: bool) -> FlowResult<()> {
  let branch = &ctx.branch;
  let report = ClassifyReport {
    branch,
    versioned: branch.category().is_versioned(),
    // mainline patterns capture only the remote prefix
    expected_version: branch
      .expected_version()
      .filter(|_| branch.category().is_versioned() && branch.category() != BranchCategory::Mainline),
    other_deploys: ctx.other_deploys()?,
  };

  if json {
    println!("{}", serde_json::to_string_pretty(&report)?);
    return Ok(());
  }

  if branch.category() == BranchCategory::Undefined {
    println!("Branch:   <undetermined>");
  } else {
    println!("Branch:   {}", branch.name());
  }
  println!("Category: {}", branch.category());
  if let Some(pattern) = branch.matched() {
    println!("Pattern:  {}", pattern.pattern);
  }
  if let Some(version) = report.expected_version {
    println!("Expected version: {}", version);
  }
  if branch.category() == BranchCategory::Other {
    println!("Deploys:  {}", if report.other_deploys { "yes" } else { "no" });
  }

  Ok(())
}
