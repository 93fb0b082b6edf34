//! Properties derived from the current branch

use super::resolver::{Properties, PropertyResolver};
use crate::branch::BranchInfo;
use crate::core::config::FlowSettings;
use crate::core::error::FlowResult;
use tracing::{debug, info};

/// Branch type, branch name, mapped names and the category's property set
///
/// Category properties are resolved against the project properties plus
/// everything set before them, unless resolution is turned off.
pub fn branch_properties(
  branch: &BranchInfo,
  settings: &FlowSettings,
  resolver: &PropertyResolver,
  project: &Properties,
) -> FlowResult<Properties> {
  let mut out = Properties::new();

  if !settings.branch_type_property.trim().is_empty() {
    out.insert(
      settings.branch_type_property.clone(),
      branch.category().screaming_name().to_string(),
    );
  }
  if !settings.branch_name_property.trim().is_empty() {
    out.insert(settings.branch_name_property.clone(), branch.name().to_string());
  }

  for mapper in &settings.mappers {
    let mapped = mapper.map(branch);
    info!(
      "Mapped Git branch name [{}] for property [{}] to [{}]",
      branch.name(),
      mapper.property,
      mapped
    );
    out.insert(mapper.property.clone(), mapped);
  }

  let config = &settings.branch_properties;
  let set = config.for_category(branch.category());
  if set.is_empty() {
    return Ok(out);
  }

  info!("Setting {} properties...", set.len());
  let mut scope = project.clone();
  scope.extend(out.iter().map(|(k, v)| (k.clone(), v.clone())));

  for (raw_key, raw_value) in set {
    let (key, value) = if config.resolve {
      (
        resolver.resolve_value(raw_key, &scope)?,
        resolver.resolve_value(raw_value, &scope)?,
      )
    } else {
      (raw_key.clone(), raw_value.clone())
    };
    let key = format!("{}{}", config.key_prefix, key);
    debug!("  {} = {}", key, value);
    if let Some(replaced) = out.insert(key.clone(), value.clone()) {
      debug!("  replaced previous value '{}' of {}", replaced, key);
    }
    scope.insert(key, value);
  }

  Ok(out)
}
