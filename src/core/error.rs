//! Error types for branchflow with contextual messages and exit codes
//!
//! Every failure the tool can report maps onto one variant here. Variants that
//! abort an operation carry enough context (branch, version, pattern) to be
//! acted on without re-running the build, and most come with a help message.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for branchflow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, bad patterns)
  User = 1,
  /// System error (git, I/O, artifact resolution)
  System = 2,
  /// Validation failure (version rules, malformed catalogs)
  Validation = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for branchflow
#[derive(Debug)]
pub enum FlowError {
  /// Malformed value handed to a constructor (e.g. an empty branch name)
  InvalidArgument { message: String },

  /// A configured regular expression failed to compile
  PatternSyntax { pattern: String, reason: String },

  /// The branch category demands a version the module does not have
  VersionMismatch {
    branch: String,
    version: String,
    reason: String,
  },

  /// Property expansion revisited a key
  CircularDefinition { chain: String },

  /// Impossible or incomplete configuration
  Configuration { message: String, help: Option<String> },

  /// A required artifact could not be fetched
  ArtifactResolution { coordinate: String, reason: String },

  /// A resolved catalog could not be parsed
  CatalogFormat { line: usize, content: String, reason: String },

  /// Git operation errors
  Git(GitError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl FlowError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    FlowError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    FlowError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  pub fn invalid_argument(msg: impl Into<String>) -> Self {
    FlowError::InvalidArgument { message: msg.into() }
  }

  pub fn configuration(msg: impl Into<String>) -> Self {
    FlowError::Configuration {
      message: msg.into(),
      help: None,
    }
  }

  pub fn configuration_with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    FlowError::Configuration {
      message: msg.into(),
      help: Some(help.into()),
    }
  }

  pub fn version_mismatch(branch: impl Into<String>, version: impl Into<String>, reason: impl Into<String>) -> Self {
    FlowError::VersionMismatch {
      branch: branch.into(),
      version: version.into(),
      reason: reason.into(),
    }
  }

  pub fn resolution(coordinate: impl Into<String>, reason: impl Into<String>) -> Self {
    FlowError::ArtifactResolution {
      coordinate: coordinate.into(),
      reason: reason.into(),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      FlowError::Message { message, context, help } => FlowError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      FlowError::Io(e) => FlowError::Message {
        message: format!("I/O error: {}", e),
        context: Some(ctx_str),
        help: None,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      FlowError::InvalidArgument { .. } => ExitCode::User,
      FlowError::PatternSyntax { .. } => ExitCode::User,
      FlowError::Configuration { .. } => ExitCode::User,
      FlowError::CircularDefinition { .. } => ExitCode::User,
      FlowError::VersionMismatch { .. } => ExitCode::Validation,
      FlowError::CatalogFormat { .. } => ExitCode::Validation,
      FlowError::ArtifactResolution { .. } => ExitCode::System,
      FlowError::Git(_) => ExitCode::System,
      FlowError::Io(_) => ExitCode::System,
      FlowError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      FlowError::PatternSyntax { .. } => {
        Some("Branch patterns are whole-string regular expressions; check [branches] in flow.toml.".to_string())
      }
      FlowError::VersionMismatch { .. } => Some(
        "Versioned branches (mainline, support, release, hotfix) need release versions; develop needs a SNAPSHOT version."
          .to_string(),
      ),
      FlowError::CircularDefinition { .. } => {
        Some("A property refers back to itself through the chain shown; break the cycle in [properties].".to_string())
      }
      FlowError::Configuration { help, .. } => help.clone(),
      FlowError::CatalogFormat { .. } => Some(
        "Catalog lines must be group:artifact[:extension[:classifier]]:version after the [artifacts] header.".to_string(),
      ),
      FlowError::Git(e) => e.help_message(),
      FlowError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for FlowError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      FlowError::InvalidArgument { message } => write!(f, "Invalid argument: {}", message),
      FlowError::PatternSyntax { pattern, reason } => {
        write!(f, "Invalid branch pattern '{}': {}", pattern, reason)
      }
      FlowError::VersionMismatch {
        branch,
        version,
        reason,
      } => write!(
        f,
        "The current git branch: [{}] does not accept version [{}]: {}",
        branch, version, reason
      ),
      FlowError::CircularDefinition { chain } => write!(f, "Circular property definition: {}", chain),
      FlowError::Configuration { message, .. } => write!(f, "Configuration error: {}", message),
      FlowError::ArtifactResolution { coordinate, reason } => {
        write!(f, "Failed to resolve artifact {}: {}", coordinate, reason)
      }
      FlowError::CatalogFormat { line, content, reason } => {
        write!(f, "Malformed catalog line {} '{}': {}", line, content, reason)
      }
      FlowError::Git(e) => write!(f, "{}", e),
      FlowError::Io(e) => write!(f, "I/O error: {}", e),
      FlowError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for FlowError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      FlowError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for FlowError {
  fn from(err: io::Error) -> Self {
    FlowError::Io(err)
  }
}

impl From<String> for FlowError {
  fn from(msg: String) -> Self {
    FlowError::message(msg)
  }
}

impl From<&str> for FlowError {
  fn from(msg: &str) -> Self {
    FlowError::message(msg)
  }
}

impl From<toml_edit::de::Error> for FlowError {
  fn from(err: toml_edit::de::Error) -> Self {
    FlowError::configuration(format!("TOML deserialization error: {}", err))
  }
}

impl From<regex::Error> for FlowError {
  fn from(err: regex::Error) -> Self {
    FlowError::PatternSyntax {
      pattern: String::new(),
      reason: err.to_string(),
    }
  }
}

impl From<serde_json::Error> for FlowError {
  fn from(err: serde_json::Error) -> Self {
    FlowError::message(format!("JSON error: {}", err))
  }
}

impl From<std::string::FromUtf8Error> for FlowError {
  fn from(err: std::string::FromUtf8Error) -> Self {
    FlowError::message(format!("UTF-8 conversion error: {}", err))
  }
}

impl From<anyhow::Error> for FlowError {
  fn from(err: anyhow::Error) -> Self {
    FlowError::message(err.to_string())
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// Repository not found
  RepoNotFound { path: PathBuf },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::RepoNotFound { path } => Some(format!(
        "Pass --branch or set GIT_BRANCH when building outside a git checkout ({}).",
        path.display()
      )),
      _ => None,
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr)
      }
      GitError::RepoNotFound { path } => {
        write!(f, "Git repository not found at: {}", path.display())
      }
    }
  }
}

/// Result type alias for branchflow
pub type FlowResult<T> = Result<T, FlowError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> FlowResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> FlowResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<FlowError>,
{
  fn context(self, ctx: impl Into<String>) -> FlowResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> FlowResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &FlowError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
