//! Re-resolve release dependencies the stage repository provides
//!
//! A release or hotfix build may depend on artifacts that an earlier build
//! staged. Copies of those already in the local cache can be stale, so every
//! cached non-snapshot dependency that stage also holds is purged and fetched
//! again before the build uses it.

use super::resolver::{ArtifactResolver, ResolveFailure};
use super::session::ResolutionSession;
use crate::artifact::{Coordinate, DEFAULT_EXTENSION};
use crate::core::error::FlowResult;
use crate::graph::{ModuleDescriptor, ProjectGraph};
use crate::properties::PropertyResolver;
use crate::version::is_snapshot;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, error, info, warn};

/// What a refresh purged and fetched again
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StageRefresh {
  /// Non-snapshot dependencies looked at
  pub checked: usize,
  /// Cached copies removed because stage holds them
  pub purged: Vec<Coordinate>,
}

/// Non-snapshot dependencies of `modules` on artifacts outside the graph
///
/// Versions are resolved with the declaring module's properties. References
/// to modules of the graph are left out; the build produces those itself.
pub fn external_dependencies(
  graph: &ProjectGraph,
  modules: &[&ModuleDescriptor],
  resolver: &PropertyResolver,
) -> FlowResult<Vec<Coordinate>> {
  let mut found = BTreeSet::new();
  for module in modules {
    for reference in &module.dependencies {
      if graph.find_reference(reference).is_some() {
        continue;
      }
      let Some(raw) = &reference.version else {
        continue;
      };
      let version = resolver.resolve_value(raw, &module.properties)?;
      if is_snapshot(&version) {
        continue;
      }
      found.insert(Coordinate::new(
        &reference.group_id,
        &reference.artifact_id,
        DEFAULT_EXTENSION,
        version,
      ));
    }
  }
  Ok(found.into_iter().collect())
}

/// Purge cached `dependencies` that the session's remote also has, then
/// resolve them again
///
/// A dependency missing after the purge is fatal.
pub fn refresh_stage_dependencies(
  resolver: &dyn ArtifactResolver,
  session: &ResolutionSession,
  dependencies: &[Coordinate],
) -> FlowResult<StageRefresh> {
  let mut refresh = StageRefresh::default();

  for coordinate in dependencies.iter().filter(|c| !is_snapshot(c.version())) {
    refresh.checked += 1;

    let cached = session.cached_path(coordinate);
    if !cached.is_file() {
      debug!(coordinate = %coordinate, "not cached");
      continue;
    }
    let provider = resolver.provider(session, coordinate).map_err(ResolveFailure::into_error)?;
    let Some(repository) = provider else {
      continue;
    };

    info!("Purging: {} from remote repository: {}.", coordinate, repository);
    if let Err(e) = std::fs::remove_file(&cached) {
      warn!("Failed to purge stage artifact from local repository: {} ({})", cached.display(), e);
    }
    refresh.purged.push(coordinate.clone());
  }

  if refresh.purged.is_empty() {
    return Ok(refresh);
  }

  info!("Resolving purged dependencies...");
  for coordinate in &refresh.purged {
    if let Err(failure) = resolver.resolve(session, coordinate) {
      error!("Post-purge dependency resolution failed!");
      return Err(failure.into_error());
    }
  }
  info!("All stage dependencies purged and re-resolved.");

  Ok(refresh)
}
