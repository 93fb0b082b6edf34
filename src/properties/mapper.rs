//! Named transforms that derive extra properties from the branch name

use crate::branch::BranchInfo;
use crate::version::sanitize;
use serde::{Deserialize, Serialize};

/// Closed set of branch-name transforms selectable from flow.toml
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PropertyTransform {
  #[default]
  Identity,
  LowerCase,
  UpperCase,
  /// Characters outside `[0-9A-Za-z-.]` become `-` (same rule as version mangling)
  Sanitize,
  /// A valid docker image name component
  DockerName,
}

impl PropertyTransform {
  pub fn apply(&self, value: &str) -> String {
    match self {
      PropertyTransform::Identity => value.to_string(),
      PropertyTransform::LowerCase => value.to_lowercase(),
      PropertyTransform::UpperCase => value.to_uppercase(),
      PropertyTransform::Sanitize => sanitize(value),
      PropertyTransform::DockerName => docker_name(value.trim()),
    }
  }
}

/// `[[mappers]]` entry: store the transformed branch name under `property`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyMapper {
  pub property: String,
  #[serde(default)]
  pub transform: PropertyTransform,
}

impl PropertyMapper {
  pub fn map(&self, branch: &BranchInfo) -> String {
    self.transform.apply(branch.name())
  }
}

fn docker_char(c: char) -> &'static str {
  match c {
    'a'..='z' | 'A'..='Z' | '0'..='9' => "",
    '.' => ".",
    '-' => "-",
    'ä' | 'Ä' => "ae",
    'ü' | 'Ü' => "ue",
    'ö' | 'Ö' => "oe",
    'ß' => "ss",
    _ => "_",
  }
}

fn push_docker_char(out: &mut String, c: char) -> char {
  let mapped = docker_char(c);
  if mapped.is_empty() {
    let lower = c.to_ascii_lowercase();
    out.push(lower);
    lower
  } else {
    out.push_str(mapped);
    mapped.chars().next().unwrap_or('_')
  }
}

/// Name components may not start with a separator, may hold one `.`, at most
/// two `_` or any number of `-` in a row.
fn docker_name(name: &str) -> String {
  let mut chars = name.chars();
  let Some(first) = chars.next() else {
    return String::new();
  };

  let mut out = String::with_capacity(name.len() + 2);
  let mut dots = 0;
  let mut underscores = 0;

  let mut head = String::new();
  match push_docker_char(&mut head, first) {
    '.' => {
      out.push_str("a.");
      dots += 1;
    }
    '_' => {
      out.push_str("a_");
      underscores += 1;
    }
    '-' => out.push_str("a-"),
    _ => out.push_str(&head),
  }

  for c in chars {
    let mut next = String::new();
    match push_docker_char(&mut next, c) {
      '.' => {
        dots += 1;
        if dots > 1 {
          out.push('a');
          dots = 0;
        }
        out.push('.');
      }
      '_' => {
        underscores += 1;
        if underscores > 2 {
          out.push('a');
          underscores = 1;
        }
        out.push('_');
      }
      _ => {
        out.push_str(&next);
        underscores = 0;
        dots = 0;
      }
    }
  }

  out
}
