//! CLI commands for branchflow
//!
//! ## Branch
//! - **classify**: Show the branch category and captured version
//! - **properties**: Properties derived from the branch
//!
//! ## Versions
//! - **enforce**: Check module versions against the branch rules
//! - **crosswalk**: Branch-qualified versions for deployable ad-hoc branches
//!
//! ## Artifacts
//! - **retarget**: Where this branch deploys to
//! - **catalog**: Record build outputs
//! - **promote**: Re-attach previously deployed outputs
//! - **refresh-stage**: Re-resolve cached dependencies the stage repository holds
//!
//! All commands accept `&FlowContext` so the branch is classified once.

pub mod catalog;
pub mod classify;
pub mod crosswalk;
pub mod enforce;
pub mod promote;
pub mod properties;
pub mod refresh_stage;
pub mod retarget;

pub use catalog::run_catalog;
pub use classify::run_classify;
pub use crosswalk::run_crosswalk;
pub use enforce::run_enforce;
pub use promote::{PromoteOptions, run_promote};
pub use properties::run_properties;
pub use refresh_stage::run_refresh_stage;
pub use retarget::run_retarget;

use crate::core::error::{FlowError, FlowResult};
use crate::graph::ModuleDescriptor;

/// Module from `group:artifact:version` and a packaging type
pub fn module_from_gav(gav: &str, packaging: &str) -> FlowResult<ModuleDescriptor> {
  match gav.trim().split(':').collect::<Vec<_>>().as_slice() {
    [group, artifact, version] if !group.is_empty() && !artifact.is_empty() && !version.is_empty() => {
      let mut module = ModuleDescriptor::new(*group, *artifact, *version);
      module.packaging = packaging.to_string();
      Ok(module)
    }
    _ => Err(FlowError::invalid_argument(format!(
      "--module expects group:artifact:version, got '{}'",
      gav
    ))),
  }
}
