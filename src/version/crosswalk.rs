//! Cross-module version rewrite for ad-hoc branches
//!
//! On an `Other` branch that matches the configured deploy pattern, every
//! module of the project gets a branch-qualified snapshot version, and every
//! reference to one of those modules (parent, dependency, managed dependency,
//! plugin, managed plugin) is pointed at the new version.
//!
//! The rewrite is computed as a [`RewritePlan`] over the whole graph before
//! anything is changed; the caller applies it with [`RewritePlan::apply`].
//! Siblings outside the reactor contribute version mappings so their
//! dependents stay consistent, but are not edited themselves.

use super::mangle::mangle;
use crate::branch::{BranchCategory, BranchInfo, BranchPattern};
use crate::core::error::FlowResult;
use crate::graph::{GraphSnapshot, ModuleDescriptor, ModuleKey, ProjectGraph, ReferenceKind};
use crate::properties::{Properties, PropertyResolver};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// New version for one module
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionChange {
  /// Key with the resolved original version
  pub key: ModuleKey,
  pub new_version: String,
  pub in_reactor: bool,
}

/// One reference inside a reactor module pointed at a new version
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceEdit {
  /// `group:artifact` of the module holding the reference
  pub module: String,
  pub kind: ReferenceKind,
  /// Position within that reference list
  pub index: usize,
  /// `group:artifact` of the referenced module
  pub target: String,
  pub old_version: String,
  pub new_version: String,
}

/// `final_name` of a reactor module with the old version replaced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalNameEdit {
  pub module: String,
  pub old_name: String,
  pub new_name: String,
}

/// Everything the crosswalk changes, in build order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RewritePlan {
  pub changes: Vec<VersionChange>,
  pub edits: Vec<ReferenceEdit>,
  pub final_names: Vec<FinalNameEdit>,
}

impl RewritePlan {
  pub fn is_empty(&self) -> bool {
    self.changes.is_empty()
  }

  /// Original key → new version
  pub fn version_map(&self) -> BTreeMap<ModuleKey, String> {
    self
      .changes
      .iter()
      .map(|change| (change.key.clone(), change.new_version.clone()))
      .collect()
  }

  /// Produce the rewritten graph
  ///
  /// Only reactor modules are changed; siblings are returned as they were.
  pub fn apply(&self, mut snapshot: GraphSnapshot) -> GraphSnapshot {
    for change in self.changes.iter().filter(|c| c.in_reactor) {
      if let Some(module) = find_mut(&mut snapshot, &change.key.group_id, &change.key.artifact_id) {
        module.version = change.new_version.clone();
      }
    }

    for edit in &self.edits {
      let Some(module) = find_reactor_mut(&mut snapshot, &edit.module) else {
        continue;
      };
      if let Some(reference) = module.references_mut(edit.kind).get_mut(edit.index) {
        reference.version = Some(edit.new_version.clone());
      }
    }

    for edit in &self.final_names {
      if let Some(module) = find_reactor_mut(&mut snapshot, &edit.module) {
        module.final_name = Some(edit.new_name.clone());
      }
    }

    snapshot
  }
}

fn find_mut<'a>(snapshot: &'a mut GraphSnapshot, group: &str, artifact: &str) -> Option<&'a mut ModuleDescriptor> {
  snapshot
    .reactor
    .iter_mut()
    .find(|m| m.group_id == group && m.artifact_id == artifact)
}

fn find_reactor_mut<'a>(snapshot: &'a mut GraphSnapshot, id: &str) -> Option<&'a mut ModuleDescriptor> {
  snapshot.reactor.iter_mut().find(|m| m.id() == id)
}

/// Whether `branch` qualifies for the rewrite
///
/// `deploy_expression` is resolved against the project properties first; an
/// empty result never matches.
pub fn other_deploy_matches(
  branch: &BranchInfo,
  deploy_expression: &str,
  resolver: &PropertyResolver,
  project: &Properties,
) -> FlowResult<bool> {
  if branch.category() != BranchCategory::Other {
    return Ok(false);
  }
  let pattern = resolver.resolve_value(deploy_expression, project)?;
  if pattern.is_empty() {
    return Ok(false);
  }
  let matches = BranchPattern::compile(&pattern)?.is_match(branch.name());
  debug!(branch = %branch.name(), pattern = %pattern, matches, "tested other-branch deploy pattern");
  Ok(matches)
}

/// Compute the rewrite for `graph`
///
/// Returns an empty plan unless the branch is `Other` and
/// `deploy_pattern_matches` holds.
pub fn plan(
  graph: &ProjectGraph,
  branch: &BranchInfo,
  delimiter: &str,
  deploy_pattern_matches: bool,
  resolver: &PropertyResolver,
) -> FlowResult<RewritePlan> {
  if branch.category() != BranchCategory::Other || !deploy_pattern_matches {
    debug!(branch = %branch, "crosswalk not applicable");
    return Ok(RewritePlan::default());
  }

  let order = graph.build_order()?;

  // Producer versions first, over the whole project
  let mut plan = RewritePlan::default();
  let mut versions: BTreeMap<(String, String), (String, String)> = BTreeMap::new();
  for module in &order {
    let original = resolver.resolve_value(&module.version, &module.properties)?;
    let new_version = mangle(&original, branch.name(), delimiter);
    let in_reactor = graph.is_reactor(module);

    if in_reactor {
      info!("Updating project {}:{} to: {}", module.id(), original, new_version);
    } else {
      info!("Updating outside-reactor project {}:{} to: {}", module.id(), original, new_version);
    }

    versions.insert(
      (module.group_id.clone(), module.artifact_id.clone()),
      (original.clone(), new_version.clone()),
    );
    plan.changes.push(VersionChange {
      key: ModuleKey::new(&module.group_id, &module.artifact_id, original),
      new_version,
      in_reactor,
    });
  }

  // Then every reference inside the reactor
  for module in order.iter().filter(|m| graph.is_reactor(m)) {
    for kind in [
      ReferenceKind::Parent,
      ReferenceKind::ManagedDependency,
      ReferenceKind::Dependency,
      ReferenceKind::ManagedPlugin,
      ReferenceKind::Plugin,
    ] {
      for (index, reference) in module.references(kind).iter().enumerate() {
        let Some(raw) = &reference.version else {
          continue;
        };
        let Some((original, new_version)) =
          versions.get(&(reference.group_id.clone(), reference.artifact_id.clone()))
        else {
          continue;
        };
        let resolved = resolver.resolve_value(raw, &module.properties)?;
        if &resolved != original {
          continue;
        }

        info!("Updating {} {} of {}: {} -> {}", kind, reference.id(), module.id(), resolved, new_version);
        plan.edits.push(ReferenceEdit {
          module: module.id(),
          kind,
          index,
          target: reference.id(),
          old_version: raw.clone(),
          new_version: new_version.clone(),
        });
      }
    }

    if let Some(final_name) = &module.final_name
      && let Some((original, new_version)) = versions.get(&(module.group_id.clone(), module.artifact_id.clone()))
    {
      let resolved = resolver.resolve_value(final_name, &module.properties)?;
      let renamed = resolved.replace(original.as_str(), new_version);
      if &renamed != final_name {
        debug!(module = %module.id(), from = %final_name, to = %renamed, "final name updated");
        plan.final_names.push(FinalNameEdit {
          module: module.id(),
          old_name: final_name.clone(),
          new_name: renamed,
        });
      }
    }
  }

  Ok(plan)
}

/// Original key → new version for every module of `graph`
pub fn rewrite(
  graph: &ProjectGraph,
  branch: &BranchInfo,
  delimiter: &str,
  deploy_pattern_matches: bool,
  resolver: &PropertyResolver,
) -> FlowResult<BTreeMap<ModuleKey, String>> {
  Ok(plan(graph, branch, delimiter, deploy_pattern_matches, resolver)?.version_map())
}
