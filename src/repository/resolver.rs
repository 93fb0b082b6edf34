//! Artifact resolution against a [`ResolutionSession`]

use super::session::ResolutionSession;
use crate::artifact::Coordinate;
use crate::core::error::{FlowError, ResultExt};
use crate::repository::RemoteRepository;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Why an artifact could not be resolved
#[derive(Debug)]
pub enum ResolveFailure {
  /// No repository in the session has it; the caller decides if that matters
  NotFound { coordinate: Coordinate, searched: Vec<String> },
  /// Anything else; always aborts
  Fatal(FlowError),
}

impl ResolveFailure {
  /// Turn into an error regardless of kind
  pub fn into_error(self) -> FlowError {
    match self {
      ResolveFailure::NotFound { coordinate, searched } => {
        FlowError::resolution(coordinate.serialize(), format!("not found in [{}]", searched.join(", ")))
      }
      ResolveFailure::Fatal(e) => e,
    }
  }
}

impl From<FlowError> for ResolveFailure {
  fn from(err: FlowError) -> Self {
    ResolveFailure::Fatal(err)
  }
}

impl fmt::Display for ResolveFailure {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ResolveFailure::NotFound { coordinate, searched } => {
        write!(f, "{} not found in [{}]", coordinate, searched.join(", "))
      }
      ResolveFailure::Fatal(e) => write!(f, "{}", e),
    }
  }
}

/// Fetch artifacts into a session's cache
pub trait ArtifactResolver: Sync {
  /// Resolve `coordinate` and return the cached file
  fn resolve(&self, session: &ResolutionSession, coordinate: &Coordinate) -> Result<PathBuf, ResolveFailure>;

  /// Id of the first remote holding `coordinate`, without fetching it
  fn provider(&self, session: &ResolutionSession, coordinate: &Coordinate) -> Result<Option<String>, ResolveFailure>;
}

/// Resolver for repositories on the local file system (`file://` or a path)
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSystemResolver;

impl FileSystemResolver {
  pub fn new() -> Self {
    Self
  }

  /// First remote with the file, and the file's path there
  fn locate<'s>(
    &self,
    session: &'s ResolutionSession,
    relative: &Path,
  ) -> Result<Option<(&'s RemoteRepository, PathBuf)>, ResolveFailure> {
    for remote in session.remotes() {
      let candidate = repository_root(remote)?.join(relative);
      debug!(repository = %remote.id, path = %candidate.display(), "checking remote");
      if candidate.is_file() {
        return Ok(Some((remote, candidate)));
      }
    }
    Ok(None)
  }

  fn from_remotes(&self, session: &ResolutionSession, relative: &Path) -> Result<Option<PathBuf>, ResolveFailure> {
    let Some((_, candidate)) = self.locate(session, relative)? else {
      return Ok(None);
    };

    let cached = session.cache().join(relative);
    if let Some(parent) = cached.parent() {
      std::fs::create_dir_all(parent)
        .with_context(|| format!("Failed to create cache directory {}", parent.display()))?;
    }
    std::fs::copy(&candidate, &cached).with_context(|| {
      format!("Failed to copy {} into {}", candidate.display(), cached.display())
    })?;
    Ok(Some(cached))
  }
}

impl ArtifactResolver for FileSystemResolver {
  fn resolve(&self, session: &ResolutionSession, coordinate: &Coordinate) -> Result<PathBuf, ResolveFailure> {
    let relative = session.layout().path_for(coordinate);

    // remotes are re-checked before the cache is trusted
    let found = match self.from_remotes(session, &relative)? {
      Some(path) => Some(path),
      None => {
        let cached = session.cache().join(&relative);
        cached.is_file().then_some(cached)
      }
    };

    match found {
      Some(path) => {
        debug!(coordinate = %coordinate, file = %path.display(), "resolved");
        Ok(path)
      }
      None => {
        let mut searched: Vec<String> = session.remotes().iter().map(|r| r.id.clone()).collect();
        searched.push(format!("local ({})", session.cache().display()));
        Err(ResolveFailure::NotFound {
          coordinate: coordinate.clone(),
          searched,
        })
      }
    }
  }

  fn provider(&self, session: &ResolutionSession, coordinate: &Coordinate) -> Result<Option<String>, ResolveFailure> {
    let relative = session.layout().path_for(coordinate);
    Ok(self.locate(session, &relative)?.map(|(remote, _)| remote.id.clone()))
  }
}

/// Directory behind a `file://` URL or plain path
fn repository_root(remote: &RemoteRepository) -> Result<PathBuf, ResolveFailure> {
  let url = remote.url.trim();
  if let Some(path) = url.strip_prefix("file://") {
    return Ok(PathBuf::from(path));
  }
  if let Some((scheme, _)) = url.split_once("://") {
    return Err(ResolveFailure::Fatal(FlowError::configuration_with_help(
      format!("Repository '{}' uses unsupported scheme '{}'", remote.id, scheme),
      "Only file:// URLs and plain directory paths can be resolved.",
    )));
  }
  Ok(PathBuf::from(url))
}
