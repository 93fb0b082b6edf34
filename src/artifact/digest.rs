//! Content digests for promotion audit and change detection

use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of `contents`
pub fn sha256_hex(contents: &[u8]) -> String {
  let mut hasher = Sha256::new();
  hasher.update(contents);
  format!("{:x}", hasher.finalize())
}
