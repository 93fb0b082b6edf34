//! Version rules, branch-qualified versions and the cross-module rewrite

pub mod crosswalk;
pub mod enforce;
pub mod mangle;

pub use crosswalk::{RewritePlan, other_deploy_matches, plan, rewrite};
pub use enforce::{EnforcePolicy, ReleaseMatch, enforce};
pub use mangle::{DEFAULT_DELIMITER, SNAPSHOT_SUFFIX, is_snapshot, mangle, sanitize};
