//! Cycle detection for property expansion

use crate::core::error::{FlowError, FlowResult};
use std::collections::HashSet;

/// Records every `(key, value)` visited during one resolution and fails as
/// soon as a key is visited a second time.
#[derive(Debug, Default)]
pub struct CircularDefinitionGuard {
  visited: Vec<(String, Option<String>)>,
  keys_used: HashSet<String>,
}

impl CircularDefinitionGuard {
  pub fn new() -> Self {
    Self::default()
  }

  /// Record a visit, failing if `key` was seen before
  pub fn visited(&mut self, key: &str, value: Option<&str>) -> FlowResult<()> {
    self.visited.push((key.to_string(), value.map(str::to_string)));

    if !self.keys_used.insert(key.to_string()) {
      return Err(FlowError::CircularDefinition { chain: self.chain() });
    }
    Ok(())
  }

  /// `k1=v1 -> k2=v2 -> ...`
  pub fn chain(&self) -> String {
    self
      .visited
      .iter()
      .map(|(key, value)| format!("{}={}", key, value.as_deref().unwrap_or("null")))
      .collect::<Vec<_>>()
      .join(" -> ")
  }
}
