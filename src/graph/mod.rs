//! Multi-module build graph
//!
//! Modules and references come from a JSON snapshot written by the build
//! tool; petgraph orders them so producers precede their dependents.

pub mod module;
pub mod project_graph;

pub use module::{ModuleDescriptor, ModuleKey, Reference, ReferenceKind};
pub use project_graph::{GraphSnapshot, ProjectGraph};
