//! Resolution sessions
//!
//! A session pairs the remote repositories to search with a local artifact
//! cache. With `bypass_cache` the cache is a fresh temporary directory that
//! only this session owns and removes on [`ResolutionSession::close`].
//! Remotes are always consulted before the cache.

use super::remote::{RemoteRepository, RepositoryLayout};
use crate::artifact::Coordinate;
use crate::core::error::{FlowError, FlowResult, ResultExt};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info, warn};

pub struct ResolutionSession {
  remotes: Vec<RemoteRepository>,
  cache: PathBuf,
  temp: Option<TempDir>,
}

impl ResolutionSession {
  /// Open a session against `source` (or the cache alone when `None`)
  ///
  /// # Errors
  /// `bypass_cache` without a source is a configuration error: nothing could
  /// ever be resolved.
  pub fn open(local_cache: &Path, source: Option<RemoteRepository>, bypass_cache: bool) -> FlowResult<Self> {
    if bypass_cache && source.is_none() {
      return Err(FlowError::configuration_with_help(
        "Cannot resolve artifacts without a source repository while the local cache is bypassed",
        "Configure a repository for this branch type under [repositories] or pass --keep-cache.",
      ));
    }

    let (cache, temp) = if bypass_cache {
      info!("Disabling local repository @ {}", local_cache.display());
      let temp = tempfile::Builder::new()
        .prefix("branchflow-repo")
        .tempdir()
        .context("Failed to create temporary local repository")?;
      info!("Using temporary local repository @ {}", temp.path().display());
      (temp.path().to_path_buf(), Some(temp))
    } else {
      debug!(cache = %local_cache.display(), "using local repository");
      (local_cache.to_path_buf(), None)
    };

    if source.is_none() {
      debug!("Resolving existing artifacts from local repository only.");
    }

    Ok(Self {
      remotes: source.into_iter().collect(),
      cache,
      temp,
    })
  }

  pub fn remotes(&self) -> &[RemoteRepository] {
    &self.remotes
  }

  /// Local cache directory in use (temporary when bypassing)
  pub fn cache(&self) -> &Path {
    &self.cache
  }

  pub fn is_bypassing_cache(&self) -> bool {
    self.temp.is_some()
  }

  /// Layout shared by the remotes and the cache
  pub fn layout(&self) -> RepositoryLayout {
    self.remotes.first().map(|remote| remote.layout).unwrap_or_default()
  }

  /// Where `coordinate` lives in the cache
  pub fn cached_path(&self, coordinate: &Coordinate) -> PathBuf {
    self.cache.join(self.layout().path_for(coordinate))
  }

  /// Remove the temporary cache, if any
  ///
  /// Cleanup failures are logged, never returned.
  pub fn close(self) {
    if let Some(temp) = self.temp {
      let path = temp.path().to_path_buf();
      match temp.close() {
        Ok(()) => debug!(path = %path.display(), "removed temporary repository"),
        Err(e) => warn!("Failed to cleanup temporary repository directory: {} ({})", path.display(), e),
      }
    }
  }
}
