//! Branch-qualified snapshot versions

pub const SNAPSHOT_SUFFIX: &str = "-SNAPSHOT";

/// Default delimiter between base version and branch name
pub const DEFAULT_DELIMITER: &str = "+";

/// Replace every character outside `[0-9A-Za-z-.]` with `-`
pub fn sanitize(name: &str) -> String {
  name
    .chars()
    .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '.' { c } else { '-' })
    .collect()
}

/// Qualify `version` with the branch: `1.0-SNAPSHOT` becomes `1.0+feature-x-SNAPSHOT`
///
/// A version that already carries the qualifier is returned unchanged.
pub fn mangle(version: &str, branch: &str, delimiter: &str) -> String {
  let qualifier = format!("{}{}{}", delimiter, sanitize(branch), SNAPSHOT_SUFFIX);
  if version.ends_with(&qualifier) {
    return version.to_string();
  }
  format!("{}{}", version.replace(SNAPSHOT_SUFFIX, ""), qualifier)
}

/// Ends with `SNAPSHOT` (any case) or is a timestamped snapshot
pub fn is_snapshot(version: &str) -> bool {
  let version = version.trim();
  version.to_ascii_uppercase().ends_with("SNAPSHOT") || is_timestamped(version)
}

/// `...-YYYYMMDD.HHMMSS-N`, the form a deployed snapshot gets in a remote repository
fn is_timestamped(version: &str) -> bool {
  let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

  let Some((head, build)) = version.rsplit_once('-') else {
    return false;
  };
  let Some((_, stamp)) = head.rsplit_once('-') else {
    return false;
  };
  match stamp.split_once('.') {
    Some((date, time)) => date.len() == 8 && time.len() == 6 && all_digits(date) && all_digits(time) && all_digits(build),
    None => false,
  }
}
