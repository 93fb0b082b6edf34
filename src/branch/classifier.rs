//! Branch classification
//!
//! Patterns are tried in [`BranchCategory::PRIORITY`] order with whole-string
//! matching; the first match wins, no match is `Other`, and an empty name is
//! `Undefined` without trying any pattern.

use super::category::BranchCategory;
use super::pattern::{BranchMatch, BranchPattern};
use crate::core::error::{FlowError, FlowResult};
use serde::Serialize;
use std::fmt;
use tracing::info;

/// Name and category of the branch being built
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchInfo {
  name: String,
  category: BranchCategory,
  #[serde(rename = "matched_pattern", skip_serializing_if = "Option::is_none")]
  matched: Option<BranchMatch>,
}

impl BranchInfo {
  /// Fails on an empty name unless the category is `Undefined`
  pub fn new(name: impl Into<String>, category: BranchCategory, matched: Option<BranchMatch>) -> FlowResult<Self> {
    let name = name.into();
    if name.trim().is_empty() && category != BranchCategory::Undefined {
      return Err(FlowError::invalid_argument(format!(
        "branch name must not be empty for category {}",
        category
      )));
    }
    Ok(Self {
      name,
      category,
      matched,
    })
  }

  /// No branch could be determined
  pub fn undefined() -> Self {
    Self {
      name: String::new(),
      category: BranchCategory::Undefined,
      matched: None,
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn category(&self) -> BranchCategory {
    self.category
  }

  pub fn matched(&self) -> Option<&BranchMatch> {
    self.matched.as_ref()
  }

  /// Version fragment captured from the branch name, if any
  pub fn expected_version(&self) -> Option<&str> {
    self.matched.as_ref().and_then(BranchMatch::expected_version)
  }
}

impl fmt::Display for BranchInfo {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.name.is_empty() {
      write!(f, "<undetermined> ({})", self.category)
    } else {
      write!(f, "{} ({})", self.name, self.category)
    }
  }
}

/// Ordered category patterns
#[derive(Debug, Clone, Default)]
pub struct BranchClassifier {
  patterns: Vec<(BranchCategory, BranchPattern)>,
}

impl BranchClassifier {
  /// Build from `(category, pattern)` pairs; input order does not matter
  ///
  /// Pairs for `Other`/`Undefined` are ignored since those categories are
  /// never matched by pattern.
  pub fn new(patterns: impl IntoIterator<Item = (BranchCategory, BranchPattern)>) -> Self {
    let mut patterns: Vec<_> = patterns
      .into_iter()
      .filter(|(category, _)| BranchCategory::PRIORITY.contains(category))
      .collect();
    patterns.sort_by_key(|(category, _)| *category);
    Self { patterns }
  }

  /// Compile raw pattern strings
  pub fn compile<'a>(sources: impl IntoIterator<Item = (BranchCategory, &'a str)>) -> FlowResult<Self> {
    let patterns = sources
      .into_iter()
      .map(|(category, source)| Ok((category, BranchPattern::compile(source)?)))
      .collect::<FlowResult<Vec<_>>>()?;
    Ok(Self::new(patterns))
  }

  pub fn pattern(&self, category: BranchCategory) -> Option<&BranchPattern> {
    self
      .patterns
      .iter()
      .find(|(c, _)| *c == category)
      .map(|(_, pattern)| pattern)
  }

  /// Classify without logging
  pub fn category_of(&self, name: &str) -> (BranchCategory, Option<BranchMatch>) {
    if name.is_empty() {
      return (BranchCategory::Undefined, None);
    }
    for (category, pattern) in &self.patterns {
      if let Some(m) = pattern.captures(name) {
        return (*category, Some(m));
      }
    }
    (BranchCategory::Other, None)
  }

  pub fn classify(&self, name: &str) -> BranchInfo {
    let (category, matched) = self.category_of(name);
    let info = BranchInfo {
      name: name.to_string(),
      category,
      matched,
    };

    match info.matched() {
      Some(m) => info!(branch = %info.name, category = %category, pattern = %m.pattern, "classified branch"),
      None => info!(branch = %info.name, category = %category, "classified branch"),
    }
    info
  }
}

/// Classify `name` against `patterns`
pub fn classify(name: &str, patterns: &BranchClassifier) -> BranchInfo {
  patterns.classify(name)
}
