use crate::branch::{BranchCategory, BranchClassifier};
use crate::core::error::{FlowError, FlowResult, ResultExt};
use crate::properties::{Properties, PropertyMapper};
use crate::repository::{RepositoryDefinition, RepositorySpecs};
use crate::version::{DEFAULT_DELIMITER, EnforcePolicy, ReleaseMatch};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration for branchflow
/// Searched in order: flow.toml, .flow.toml, .config/flow.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
  /// Property receiving the branch category (e.g. `RELEASE`)
  pub branch_type_property: String,
  /// Property receiving the branch name
  pub branch_name_property: String,
  pub branches: BranchesConfig,
  pub enforce: EnforceConfig,
  pub repositories: RepositoriesConfig,
  /// Project-scope properties
  pub properties: Properties,
  pub branch_properties: BranchPropertiesConfig,
  pub mappers: Vec<PropertyMapper>,
}

impl Default for FlowConfig {
  fn default() -> Self {
    Self {
      branch_type_property: "branchType".to_string(),
      branch_name_property: "gitBranchName".to_string(),
      branches: BranchesConfig::default(),
      enforce: EnforceConfig::default(),
      repositories: RepositoriesConfig::default(),
      properties: Properties::new(),
      branch_properties: BranchPropertiesConfig::default(),
      mappers: Vec::new(),
    }
  }
}

/// Branch patterns and branch detection
///
/// # Example
///
/// ```toml
/// [branches]
/// mainline = "(origin/)?main"
/// other_deploy = "(origin/)?spike/.*"
/// version_delimiter = "+"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BranchesConfig {
  pub mainline: String,
  pub support: String,
  pub release: String,
  pub hotfix: String,
  pub development: String,
  pub feature_or_bugfix: String,
  /// `Other` branches matching this deploy (and get branch-qualified versions); empty = never
  pub other_deploy: String,
  /// Where the branch name comes from, resolved through the property resolver
  pub expression: String,
  pub version_delimiter: String,
  pub release_match: ReleaseMatch,
  /// Ask git when the expression does not resolve
  pub detect_from_git: bool,
}

impl Default for BranchesConfig {
  fn default() -> Self {
    Self {
      mainline: "(origin/)?master".to_string(),
      support: "(origin/)?support/(.*)".to_string(),
      release: "(origin/)?release/(.*)".to_string(),
      hotfix: "(origin/)?hotfix/(.*)".to_string(),
      development: "(origin/)?develop".to_string(),
      feature_or_bugfix: "(origin/)?(?:feature|bugfix)/(.*)".to_string(),
      other_deploy: String::new(),
      expression: "${env.GIT_BRANCH}".to_string(),
      version_delimiter: DEFAULT_DELIMITER.to_string(),
      release_match: ReleaseMatch::Equals,
      detect_from_git: true,
    }
  }
}

impl BranchesConfig {
  fn patterns(&self) -> [(BranchCategory, &str); 6] {
    [
      (BranchCategory::Mainline, self.mainline.as_str()),
      (BranchCategory::Support, self.support.as_str()),
      (BranchCategory::Release, self.release.as_str()),
      (BranchCategory::Hotfix, self.hotfix.as_str()),
      (BranchCategory::Development, self.development.as_str()),
      (BranchCategory::FeatureOrBugfix, self.feature_or_bugfix.as_str()),
    ]
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnforceConfig {
  /// Reject snapshot dependencies and plugins on versioned branches
  pub non_snapshots: bool,
  /// `group:artifact` of plugins allowed to stay snapshots
  pub allowed_snapshot_plugins: Vec<String>,
}

impl Default for EnforceConfig {
  fn default() -> Self {
    Self {
      non_snapshots: true,
      allowed_snapshot_plugins: Vec::new(),
    }
  }
}

/// Repository specs per slot
///
/// Each slot takes a definition id or `id::layout::url::unique`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoriesConfig {
  pub release: Option<String>,
  pub stage: Option<String>,
  pub snapshot: Option<String>,
  /// Local artifact cache (default: ~/.branchflow/repository)
  pub local: Option<PathBuf>,
  pub definitions: Vec<RepositoryDefinition>,
}

/// `[branch_properties]` and its per-category tables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BranchPropertiesConfig {
  /// Prepended to every key
  pub key_prefix: String,
  /// Resolve keys and values through the property resolver
  pub resolve: bool,
  pub mainline: Properties,
  pub support: Properties,
  pub release: Properties,
  pub hotfix: Properties,
  pub development: Properties,
  pub feature_or_bugfix: Properties,
  pub other: Properties,
  pub undefined: Properties,
}

impl Default for BranchPropertiesConfig {
  fn default() -> Self {
    Self {
      key_prefix: String::new(),
      resolve: true,
      mainline: Properties::new(),
      support: Properties::new(),
      release: Properties::new(),
      hotfix: Properties::new(),
      development: Properties::new(),
      feature_or_bugfix: Properties::new(),
      other: Properties::new(),
      undefined: Properties::new(),
    }
  }
}

impl BranchPropertiesConfig {
  pub fn for_category(&self, category: BranchCategory) -> &Properties {
    match category {
      BranchCategory::Mainline => &self.mainline,
      BranchCategory::Support => &self.support,
      BranchCategory::Release => &self.release,
      BranchCategory::Hotfix => &self.hotfix,
      BranchCategory::Development => &self.development,
      BranchCategory::FeatureOrBugfix => &self.feature_or_bugfix,
      BranchCategory::Other => &self.other,
      BranchCategory::Undefined => &self.undefined,
    }
  }
}

/// Compiled, immutable form of [`FlowConfig`]
#[derive(Debug, Clone)]
pub struct FlowSettings {
  pub classifier: BranchClassifier,
  pub branch_expression: String,
  pub detect_from_git: bool,
  pub other_deploy: String,
  pub delimiter: String,
  pub enforce: EnforcePolicy,
  pub repositories: RepositorySpecs,
  local_repository: Option<PathBuf>,
  pub project_properties: Properties,
  pub branch_properties: BranchPropertiesConfig,
  pub mappers: Vec<PropertyMapper>,
  pub branch_type_property: String,
  pub branch_name_property: String,
}

impl FlowSettings {
  /// Local artifact cache directory
  pub fn local_repository(&self) -> FlowResult<PathBuf> {
    if let Some(path) = &self.local_repository {
      return Ok(path.clone());
    }
    dirs::home_dir()
      .map(|home| home.join(".branchflow").join("repository"))
      .ok_or_else(|| {
        FlowError::configuration_with_help(
          "Cannot determine the home directory for the local repository",
          "Set [repositories] local = \"<dir>\" in flow.toml.",
        )
      })
  }
}

impl FlowConfig {
  /// Find config file in search order: flow.toml, .flow.toml, .config/flow.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = vec![
      path.join("flow.toml"),
      path.join(".flow.toml"),
      path.join(".config").join("flow.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load `explicit`, or search `root`; no file at all means defaults
  pub fn load(root: &Path, explicit: Option<&Path>) -> FlowResult<Self> {
    let config_path = match explicit {
      Some(path) if !path.exists() => {
        return Err(FlowError::configuration(format!(
          "Config file not found: {}",
          path.display()
        )));
      }
      Some(path) => path.to_path_buf(),
      None => match Self::find_config_path(root) {
        Some(path) => path,
        None => {
          debug!(root = %root.display(), "no flow.toml found, using defaults");
          return Ok(Self::default());
        }
      },
    };

    debug!(path = %config_path.display(), "loading config");
    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    Self::parse(&content).with_context(|| format!("Failed to parse config from {}", config_path.display()))
  }

  pub fn parse(content: &str) -> FlowResult<Self> {
    let config: FlowConfig = toml_edit::de::from_str(content)?;
    config.validate()?;
    Ok(config)
  }

  fn validate(&self) -> FlowResult<()> {
    if self.branches.version_delimiter.is_empty() {
      return Err(FlowError::configuration_with_help(
        "branches.version_delimiter must not be empty",
        "Remove the key to use the default \"+\".",
      ));
    }
    for mapper in &self.mappers {
      if mapper.property.trim().is_empty() {
        return Err(FlowError::configuration("[[mappers]] entries need a non-empty property"));
      }
    }
    Ok(())
  }

  /// Compile patterns and repository specs
  pub fn settings(&self) -> FlowResult<FlowSettings> {
    let classifier = BranchClassifier::compile(self.branches.patterns())?;

    Ok(FlowSettings {
      classifier,
      branch_expression: self.branches.expression.clone(),
      detect_from_git: self.branches.detect_from_git,
      other_deploy: self.branches.other_deploy.clone(),
      delimiter: self.branches.version_delimiter.clone(),
      enforce: EnforcePolicy {
        release_match: self.branches.release_match,
        non_snapshots: self.enforce.non_snapshots,
        allowed_snapshot_plugins: self.enforce.allowed_snapshot_plugins.clone(),
      },
      repositories: RepositorySpecs {
        release: self.repositories.release.clone(),
        stage: self.repositories.stage.clone(),
        snapshot: self.repositories.snapshot.clone(),
        definitions: self.repositories.definitions.clone(),
      },
      local_repository: self.repositories.local.clone(),
      project_properties: self.properties.clone(),
      branch_properties: self.branch_properties.clone(),
      mappers: self.mappers.clone(),
      branch_type_property: self.branch_type_property.clone(),
      branch_name_property: self.branch_name_property.clone(),
    })
  }
}
