//! Recursive `${...}` expansion over layered scopes
//!
//! Lookups go local scope, then process scope (`-D key=value`), then the
//! environment snapshot for keys starting with `env.` (prefix stripped).
//! Found values are spliced back and rescanned; absent keys stay verbatim and
//! are skipped. Visiting any key twice within one resolution is a
//! [`FlowError::CircularDefinition`](crate::core::error::FlowError::CircularDefinition).

use super::buffer::ExpansionBuffer;
use super::guard::CircularDefinitionGuard;
use crate::core::error::FlowResult;
use std::collections::BTreeMap;

/// Key/value scope (project properties, process properties, environment)
pub type Properties = BTreeMap<String, String>;

/// Keys with this prefix are looked up in the environment scope
pub const ENV_PREFIX: &str = "env.";

/// Placeholder expansion engine.
///
/// Holds the process-wide and environment scopes; the local scope is passed
/// per call so one resolver serves every module of a build.
#[derive(Debug, Clone, Default)]
pub struct PropertyResolver {
  process: Properties,
  environment: Properties,
}

impl PropertyResolver {
  pub fn new(process: Properties, environment: Properties) -> Self {
    Self { process, environment }
  }

  /// Snapshot the current process environment once
  pub fn from_process_env(process: Properties) -> Self {
    Self::new(process, std::env::vars().collect())
  }

  /// Resolve the value stored under `key` in `local`
  ///
  /// A key missing from `local` resolves to the empty string.
  pub fn resolve(&self, key: &str, local: &Properties) -> FlowResult<String> {
    let value = local.get(key).map(String::as_str);

    let mut guard = CircularDefinitionGuard::new();
    guard.visited(key, value)?;

    self.expand(ExpansionBuffer::new(value.unwrap_or_default()), guard, local)
  }

  /// Resolve every placeholder in an arbitrary expression
  pub fn resolve_value(&self, expression: &str, local: &Properties) -> FlowResult<String> {
    self.expand(ExpansionBuffer::new(expression), CircularDefinitionGuard::new(), local)
  }

  fn expand(
    &self,
    mut buffer: ExpansionBuffer,
    mut guard: CircularDefinitionGuard,
    local: &Properties,
  ) -> FlowResult<String> {
    while buffer.has_more_legal_placeholders() {
      let key = buffer.extract_property_key();
      let value = self.lookup(&key, local);

      guard.visited(&key, value)?;

      buffer.add(&key, value);
    }

    Ok(buffer.into_string())
  }

  fn lookup<'a>(&'a self, key: &str, local: &'a Properties) -> Option<&'a str> {
    local
      .get(key)
      .or_else(|| self.process.get(key))
      .or_else(|| {
        key
          .strip_prefix(ENV_PREFIX)
          .and_then(|env_key| self.environment.get(env_key))
      })
      .map(String::as_str)
  }
}

/// Resolve `key` from `local` with an empty process scope
pub fn resolve(key: &str, local: &Properties, environment: &Properties) -> FlowResult<String> {
  PropertyResolver::new(Properties::new(), environment.clone()).resolve(key, local)
}

/// True if `value` still holds a `${...}` that could not be resolved
pub fn has_unresolved_placeholders(value: &str) -> bool {
  ExpansionBuffer::new(value).has_more_legal_placeholders()
}
