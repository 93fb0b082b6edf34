//! Multi-module project graph built from a JSON snapshot + petgraph
//!
//! ## Graph Structure
//!
//! - **Nodes**: every known module, reactor first then siblings
//! - **Edges**: `A → B` means "B references A" (producer before dependent)
//! - **Reactor**: modules built in this invocation
//! - **Siblings**: modules of the same project excluded by a partial build;
//!   they take part in lookups but are never built

use super::module::{ModuleDescriptor, Reference};
use crate::core::error::{FlowError, FlowResult, ResultExt};
use petgraph::algo;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Build-graph snapshot as exchanged with the build tool
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
  #[serde(default)]
  pub reactor: Vec<ModuleDescriptor>,
  #[serde(default)]
  pub siblings: Vec<ModuleDescriptor>,
}

impl GraphSnapshot {
  pub fn load(path: &Path) -> FlowResult<Self> {
    let content =
      std::fs::read_to_string(path).with_context(|| format!("Failed to read graph file {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse graph file {}", path.display()))
  }

  pub fn save(&self, path: &Path) -> FlowResult<()> {
    let content = serde_json::to_string_pretty(self)?;
    std::fs::write(path, content + "\n").with_context(|| format!("Failed to write graph file {}", path.display()))
  }
}

/// Indexed view over a [`GraphSnapshot`]
pub struct ProjectGraph {
  snapshot: GraphSnapshot,
  /// Node weight is the index into `reactor ++ siblings`
  graph: DiGraph<usize, ()>,
  /// Index: `group:artifact` → node index
  id_to_node: HashMap<String, NodeIndex>,
}

impl ProjectGraph {
  pub fn load(path: &Path) -> FlowResult<Self> {
    Self::new(GraphSnapshot::load(path)?)
  }

  /// Index modules and link references between them
  ///
  /// Fails if two modules share a `group:artifact`.
  pub fn new(snapshot: GraphSnapshot) -> FlowResult<Self> {
    let mut graph = DiGraph::new();
    let mut id_to_node = HashMap::new();

    for (idx, module) in snapshot.reactor.iter().chain(&snapshot.siblings).enumerate() {
      let node = graph.add_node(idx);
      if id_to_node.insert(module.id(), node).is_some() {
        return Err(FlowError::with_help(
          format!("Module {} appears more than once in the build graph", module.id()),
          "Each module must be listed exactly once across reactor and siblings.",
        ));
      }
    }

    let mut edges = HashSet::new();
    for (idx, module) in snapshot.reactor.iter().chain(&snapshot.siblings).enumerate() {
      let dependent = NodeIndex::new(idx);
      for (_, reference) in module.all_references() {
        if let Some(&producer) = id_to_node.get(&reference.id())
          && producer != dependent
          && edges.insert((producer, dependent))
        {
          graph.add_edge(producer, dependent, ());
        }
      }
    }

    Ok(Self {
      snapshot,
      graph,
      id_to_node,
    })
  }

  pub fn snapshot(&self) -> &GraphSnapshot {
    &self.snapshot
  }

  pub fn into_snapshot(self) -> GraphSnapshot {
    self.snapshot
  }

  pub fn reactor(&self) -> &[ModuleDescriptor] {
    &self.snapshot.reactor
  }

  pub fn siblings(&self) -> &[ModuleDescriptor] {
    &self.snapshot.siblings
  }

  /// Reactor modules followed by siblings
  pub fn modules(&self) -> impl Iterator<Item = &ModuleDescriptor> {
    self.snapshot.reactor.iter().chain(&self.snapshot.siblings)
  }

  pub fn is_reactor(&self, module: &ModuleDescriptor) -> bool {
    self
      .snapshot
      .reactor
      .iter()
      .any(|m| m.group_id == module.group_id && m.artifact_id == module.artifact_id)
  }

  /// Find a module by `group:artifact`
  pub fn find(&self, id: &str) -> Option<&ModuleDescriptor> {
    self.id_to_node.get(id).map(|&node| self.module_at(node))
  }

  pub fn find_reference(&self, reference: &Reference) -> Option<&ModuleDescriptor> {
    self.find(&reference.id())
  }

  /// Parent chain of `module`, nearest first
  ///
  /// Stops at the first parent that is not part of the graph.
  pub fn parents(&self, module: &ModuleDescriptor) -> Vec<&ModuleDescriptor> {
    let mut chain = Vec::new();
    let mut seen = HashSet::from([module.id()]);
    let mut current = module;

    while let Some(parent_ref) = &current.parent {
      let Some(parent) = self.find_reference(parent_ref) else {
        break;
      };
      if !seen.insert(parent.id()) {
        break;
      }
      chain.push(parent);
      current = parent;
    }

    chain
  }

  /// All modules with producers before the modules that reference them
  ///
  /// # Errors
  /// Returns error if module references form a cycle.
  pub fn build_order(&self) -> FlowResult<Vec<&ModuleDescriptor>> {
    let topo = algo::toposort(&self.graph, None).map_err(|cycle| {
      let module = self.module_at(cycle.node_id());
      FlowError::message(format!("Module reference cycle detected involving '{}'", module.id()))
    })?;

    Ok(topo.into_iter().map(|node| self.module_at(node)).collect())
  }

  fn module_at(&self, node: NodeIndex) -> &ModuleDescriptor {
    let idx = self.graph[node];
    let reactor_len = self.snapshot.reactor.len();
    if idx < reactor_len {
      &self.snapshot.reactor[idx]
    } else {
      &self.snapshot.siblings[idx - reactor_len]
    }
  }
}
