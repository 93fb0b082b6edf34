//! Whole-string branch patterns

use crate::core::error::{FlowError, FlowResult};
use regex::Regex;
use serde::Serialize;
use std::fmt;

/// A configured regular expression anchored to the whole branch name
#[derive(Debug, Clone)]
pub struct BranchPattern {
  source: String,
  regex: Regex,
}

impl BranchPattern {
  pub fn compile(source: &str) -> FlowResult<Self> {
    let regex = Regex::new(&format!("^(?:{})$", source)).map_err(|e| FlowError::PatternSyntax {
      pattern: source.to_string(),
      reason: e.to_string(),
    })?;
    Ok(Self {
      source: source.to_string(),
      regex,
    })
  }

  /// Pattern text as configured (without anchors)
  pub fn as_str(&self) -> &str {
    &self.source
  }

  pub fn is_match(&self, name: &str) -> bool {
    self.regex.is_match(name)
  }

  /// Match `name` and keep every capture group
  pub fn captures(&self, name: &str) -> Option<BranchMatch> {
    let caps = self.regex.captures(name)?;
    Some(BranchMatch {
      pattern: self.source.clone(),
      captures: caps
        .iter()
        .skip(1)
        .map(|group| group.map(|m| m.as_str().to_string()))
        .collect(),
    })
  }
}

impl fmt::Display for BranchPattern {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.source)
  }
}

/// The pattern that won classification together with its capture groups
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchMatch {
  pub pattern: String,
  /// Group 1.. in order; `None` for groups that did not participate
  pub captures: Vec<Option<String>>,
}

impl BranchMatch {
  /// Version fragment encoded in the branch name (last capture group)
  pub fn expected_version(&self) -> Option<&str> {
    self.captures.last().and_then(|group| group.as_deref())
  }
}
