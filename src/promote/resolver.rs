//! Re-attach the artifacts a previous build deployed
//!
//! The module's catalog is fetched from the repository its branch type
//! deploys to, then every listed coordinate is resolved from the same
//! session and copied into the output directory. A missing catalog means
//! there is nothing to promote; a missing listed artifact aborts.

use crate::artifact::{
  BuildOutput, BuildOutputs, Coordinate, catalog, catalog_coordinate, primary_coordinate, sha256_hex,
};
use crate::branch::{BranchCategory, BranchInfo};
use crate::core::error::{FlowError, FlowResult, ResultExt};
use crate::graph::ModuleDescriptor;
use crate::repository::{
  ArtifactResolver, RemoteRepository, RepositorySpecs, ResolutionSession, ResolveFailure, slot_for,
};
use crate::ui::progress::ResolveProgress;
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Repository to promote from for `branch`, `None` for local-only
pub fn select_source(
  branch: &BranchInfo,
  repositories: &RepositorySpecs,
  other_deploys: bool,
) -> FlowResult<Option<RemoteRepository>> {
  match slot_for(branch, other_deploys) {
    Some(slot) => {
      if branch.category() == BranchCategory::Other {
        info!("Attaching branch artifacts from {} repository...", slot);
      } else {
        info!("Attaching artifacts from {} repository...", slot);
      }
      let repository = repositories.repository(slot)?;
      if repository.is_none() {
        debug!(%slot, "no repository configured for slot");
      }
      Ok(repository)
    }
    None => {
      info!("Attaching artifacts from local repository...");
      Ok(None)
    }
  }
}

/// What to promote and where to put it
#[derive(Debug, Clone)]
pub struct PromotionRequest<'a> {
  pub module: &'a ModuleDescriptor,
  pub output_dir: &'a Path,
  /// Surface a missing catalog as an error
  pub require_catalog: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactRole {
  Primary,
  Attached,
  Catalog,
}

/// One artifact copied into the output directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromotedArtifact {
  pub coordinate: Coordinate,
  pub file: PathBuf,
  pub sha256: String,
  pub role: ArtifactRole,
}

/// Audit record of one promotion
#[derive(Debug, Clone, Serialize)]
pub struct PromotionOutcome {
  pub module: String,
  pub branch: String,
  pub category: BranchCategory,
  pub source: Option<String>,
  pub bypassed_cache: bool,
  pub catalog_found: bool,
  pub artifacts: Vec<PromotedArtifact>,
  pub timestamp: DateTime<Utc>,
}

impl PromotionOutcome {
  /// Catalog-listed artifacts, without the catalog itself
  pub fn resolved(&self) -> impl Iterator<Item = &PromotedArtifact> {
    self.artifacts.iter().filter(|a| a.role != ArtifactRole::Catalog)
  }

  /// Outputs to register on the module
  pub fn outputs(&self) -> BuildOutputs {
    let mut outputs = BuildOutputs::default();
    for artifact in &self.artifacts {
      if artifact.role == ArtifactRole::Primary {
        outputs.primary = Some(BuildOutput {
          coordinate: artifact.coordinate.clone(),
          file: artifact.file.clone(),
        });
      } else {
        outputs.attach(artifact.coordinate.clone(), artifact.file.clone());
      }
    }
    outputs
  }
}

/// Drives promotion through an [`ArtifactResolver`]
pub struct PromotionResolver<'a> {
  resolver: &'a dyn ArtifactResolver,
  local_cache: PathBuf,
  show_progress: bool,
}

impl<'a> PromotionResolver<'a> {
  pub fn new(resolver: &'a dyn ArtifactResolver, local_cache: impl Into<PathBuf>) -> Self {
    Self {
      resolver,
      local_cache: local_cache.into(),
      show_progress: false,
    }
  }

  pub fn with_progress(mut self, show: bool) -> Self {
    self.show_progress = show;
    self
  }

  /// Resolve and re-attach everything the module's catalog lists
  ///
  /// The temporary cache of a bypassing session is removed whether or not
  /// promotion succeeds.
  pub fn promote(
    &self,
    branch: &BranchInfo,
    source: Option<RemoteRepository>,
    bypass_cache: bool,
    request: &PromotionRequest<'_>,
  ) -> FlowResult<PromotionOutcome> {
    let session = ResolutionSession::open(&self.local_cache, source, bypass_cache)?;
    let result = self.promote_in(&session, branch, request);
    session.close();
    result
  }

  fn promote_in(
    &self,
    session: &ResolutionSession,
    branch: &BranchInfo,
    request: &PromotionRequest<'_>,
  ) -> FlowResult<PromotionOutcome> {
    let module = request.module;
    let source_label = session
      .remotes()
      .first()
      .map(|r| r.to_string())
      .unwrap_or_else(|| format!("local ({})", session.cache().display()));

    let mut outcome = PromotionOutcome {
      module: format!("{}:{}", module.id(), module.version),
      branch: branch.name().to_string(),
      category: branch.category(),
      source: session.remotes().first().map(|r| r.id.clone()),
      bypassed_cache: session.is_bypassing_cache(),
      catalog_found: false,
      artifacts: Vec::new(),
      timestamp: Utc::now(),
    };

    let catalog_coordinate = catalog_coordinate(&module.group_id, &module.artifact_id, &module.version);
    let catalog_file = match self.resolver.resolve(session, &catalog_coordinate) {
      Ok(path) => path,
      Err(ResolveFailure::NotFound { .. }) if !request.require_catalog => {
        info!("No artifact catalog {} in {}; nothing to promote.", catalog_coordinate, source_label);
        return Ok(outcome);
      }
      Err(failure) => {
        return Err(
          failure
            .into_error()
            .context("Could not locate artifact catalog in remote repository."),
        );
      }
    };
    outcome.catalog_found = true;

    let bytes = std::fs::read(&catalog_file)
      .with_context(|| format!("Could not read artifact catalog {}", catalog_file.display()))?;
    let entries = catalog::parse(&bytes)?;
    info!("Catalog {} lists {} artifact(s)", catalog_coordinate, entries.len());

    let progress = (self.show_progress && !entries.is_empty())
      .then(|| ResolveProgress::new(entries.len(), format!("Resolving {}", module.artifact_id)));
    let resolved = entries
      .par_iter()
      .map(|coordinate| {
        let path = self
          .resolver
          .resolve(session, coordinate)
          .map_err(|failure| failure.into_error())
          .with_context(|| format!("Failed to resolve the required project files from: {}", source_label));
        if let Some(progress) = &progress {
          progress.inc();
        }
        path.map(|path| (coordinate.clone(), path))
      })
      .collect::<FlowResult<Vec<_>>>()?;

    std::fs::create_dir_all(request.output_dir)
      .with_context(|| format!("Failed to create output directory {}", request.output_dir.display()))?;

    let primary = primary_coordinate(module, None).serialize();
    debug!("Current Project Coordinates: {}", primary);

    outcome
      .artifacts
      .push(copy_out(&catalog_coordinate, &catalog_file, request.output_dir, ArtifactRole::Catalog)?);
    for (coordinate, path) in &resolved {
      let role = if coordinate.serialize() == primary {
        ArtifactRole::Primary
      } else {
        ArtifactRole::Attached
      };
      outcome
        .artifacts
        .push(copy_out(coordinate, path, request.output_dir, role)?);
    }

    Ok(outcome)
  }
}

fn copy_out(coordinate: &Coordinate, file: &Path, output_dir: &Path, role: ArtifactRole) -> FlowResult<PromotedArtifact> {
  let name = file
    .file_name()
    .ok_or_else(|| FlowError::resolution(coordinate.serialize(), "resolved path has no file name"))?;
  let target = output_dir.join(name);
  std::fs::copy(file, &target).with_context(|| {
    format!(
      "Failed to copy resolved artifact {} to {}",
      file.display(),
      output_dir.display()
    )
  })?;

  let bytes = std::fs::read(&target).with_context(|| format!("Failed to read {}", target.display()))?;
  let sha256 = sha256_hex(&bytes);

  match role {
    ArtifactRole::Primary => info!("Setting primary artifact: {} ({})", target.display(), coordinate),
    _ => info!("Attaching artifact: {} {}", coordinate, target.display()),
  }

  Ok(PromotedArtifact {
    coordinate: coordinate.clone(),
    file: target,
    sha256,
    role,
  })
}
