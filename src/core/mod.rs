//! Core building blocks shared by every command
//!
//! - **config**: flow.toml parsing and compilation into settings
//! - **context**: branch, settings and resolver built once per invocation
//! - **error**: error types with contextual help messages and exit codes
//! - **logging**: tracing subscriber setup
//! - **vcs**: git access for branch detection (SystemGit)

pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod vcs;
