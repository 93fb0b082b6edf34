//! Build context - resolved once, passed everywhere
//!
//! ```text
//! main.rs:
//!   FlowContext::build(options) -> &FlowContext
//!   |
//!   v
//! commands/classify.rs, promote.rs, etc:
//!   fn run_*(ctx: &FlowContext, ...)
//! ```
//!
//! Configuration is compiled into [`FlowSettings`] and the branch is
//! detected and classified exactly once; nothing downstream re-reads either.

use crate::branch::{BranchInfo, BranchSource};
use crate::core::config::{FlowConfig, FlowSettings};
use crate::core::error::{FlowError, FlowResult};
use crate::properties::{Properties, PropertyResolver, branch_properties};
use crate::version::other_deploy_matches;
use std::path::{Path, PathBuf};

/// Inputs to [`FlowContext::build`] taken from the command line
#[derive(Debug, Clone, Default)]
pub struct ContextOptions {
  pub root: PathBuf,
  pub config: Option<PathBuf>,
  pub branch: Option<String>,
  /// `-D key=value` pairs
  pub defines: Vec<String>,
}

pub struct FlowContext {
  pub root: PathBuf,
  pub settings: FlowSettings,
  pub resolver: PropertyResolver,
  /// Project-scope properties from flow.toml
  pub project: Properties,
  pub branch: BranchInfo,
}

impl FlowContext {
  /// Load config, snapshot the environment, detect and classify the branch
  pub fn build(options: &ContextOptions) -> FlowResult<Self> {
    let config = FlowConfig::load(&options.root, options.config.as_deref())?;
    let settings = config.settings()?;
    let resolver = PropertyResolver::from_process_env(parse_defines(&options.defines)?);
    let project = settings.project_properties.clone();

    let branch = BranchSource {
      explicit: options.branch.as_deref(),
      expression: &settings.branch_expression,
      detect_from_git: settings.detect_from_git,
      repo: &options.root,
    }
    .detect(&settings.classifier, &resolver, &project)?;

    Ok(Self {
      root: options.root.clone(),
      settings,
      resolver,
      project,
      branch,
    })
  }

  /// Assemble from parts (tests, embedding)
  pub fn from_parts(root: &Path, settings: FlowSettings, resolver: PropertyResolver, branch: BranchInfo) -> Self {
    Self {
      root: root.to_path_buf(),
      project: settings.project_properties.clone(),
      settings,
      resolver,
      branch,
    }
  }

  /// Whether the current `Other` branch matches `branches.other_deploy`
  pub fn other_deploys(&self) -> FlowResult<bool> {
    other_deploy_matches(&self.branch, &self.settings.other_deploy, &self.resolver, &self.project)
  }

  /// Properties for the current branch
  pub fn branch_properties(&self) -> FlowResult<Properties> {
    branch_properties(&self.branch, &self.settings, &self.resolver, &self.project)
  }

  /// Resolve a path given on the command line against the root
  pub fn path(&self, path: &Path) -> PathBuf {
    if path.is_absolute() {
      path.to_path_buf()
    } else {
      self.root.join(path)
    }
  }
}

/// Parse `key=value` pairs; a bare `key` means `key=true`
pub fn parse_defines(defines: &[String]) -> FlowResult<Properties> {
  let mut props = Properties::new();
  for define in defines {
    let (key, value) = define.split_once('=').unwrap_or((define.as_str(), "true"));
    let key = key.trim();
    if key.is_empty() {
      return Err(FlowError::invalid_argument(format!(
        "-D expects key=value, got '{}'",
        define
      )));
    }
    props.insert(key.to_string(), value.to_string());
  }
  Ok(props)
}
