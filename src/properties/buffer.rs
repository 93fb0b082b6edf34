//! Left-to-right placeholder scanner used by the resolver
//!
//! The buffer keeps two halves: text already emitted (`resolved`) and text
//! still to scan (`unresolved`). Each step pulls out the leftmost `${...}`
//! (the prefix paired with the *next* `}`), and the caller either splices a
//! value back onto the front of `unresolved` or leaves the placeholder in
//! `resolved` verbatim so it is never retried.

const PREFIX: &str = "${";
const SUFFIX: &str = "}";

#[derive(Debug, Clone, Default)]
pub struct ExpansionBuffer {
  resolved: String,
  unresolved: String,
}

impl ExpansionBuffer {
  pub fn new(unresolved: impl Into<String>) -> Self {
    Self {
      resolved: String::new(),
      unresolved: unresolved.into(),
    }
  }

  /// True while a `${` is followed (after it) by a `}`
  pub fn has_more_legal_placeholders(&self) -> bool {
    match self.unresolved.find(PREFIX) {
      Some(prefix) => self.unresolved[prefix + PREFIX.len()..].contains(SUFFIX),
      None => false,
    }
  }

  /// Move the text before the next placeholder to `resolved` and return the key
  pub fn extract_property_key(&mut self) -> String {
    let Some(prefix) = self.unresolved.find(PREFIX) else {
      return String::new();
    };
    self.resolved.push_str(&self.unresolved[..prefix]);

    let after_prefix = &self.unresolved[prefix + PREFIX.len()..];
    let (key, rest) = match after_prefix.find(SUFFIX) {
      Some(suffix) => (
        after_prefix[..suffix].to_string(),
        after_prefix[suffix + SUFFIX.len()..].to_string(),
      ),
      None => (after_prefix.to_string(), String::new()),
    };

    self.unresolved = rest;
    key
  }

  /// Splice a found value in front of the remaining text, or keep the placeholder
  pub fn add(&mut self, key: &str, value: Option<&str>) {
    match value {
      Some(value) => self.unresolved.insert_str(0, value),
      None => {
        self.resolved.push_str(PREFIX);
        self.resolved.push_str(key);
        self.resolved.push_str(SUFFIX);
      }
    }
  }

  pub fn into_string(self) -> String {
    let mut out = self.resolved;
    out.push_str(&self.unresolved);
    out
  }
}

impl std::fmt::Display for ExpansionBuffer {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}{}", self.resolved, self.unresolved)
  }
}
