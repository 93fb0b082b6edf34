//! branchflow - branch-driven release promotion for multi-module builds
//!
//! Classifies the branch being built, enforces the version rules of its
//! category, rewrites versions across the module graph for deployable ad-hoc
//! branches, and records/re-resolves build outputs so a later build can
//! promote them without recompiling.

pub mod artifact;
pub mod branch;
pub mod commands;
pub mod core;
pub mod graph;
pub mod promote;
pub mod properties;
pub mod repository;
pub mod ui;
pub mod version;
