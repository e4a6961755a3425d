//! Content hashing of serializable records.
//!
//! Used to fingerprint a [`Composition`](crate::manifest::Composition) so
//! that two generations can be compared without diffing every record.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::consts::OBJ_HASH_PREFIX_LEN;

pub type HashError = serde_json::Error;

/// A truncated content hash.
///
/// The hash is a 20-character truncated SHA-256 of the JSON-serialized value,
/// as a lowercase hexadecimal string, e.g. `"a1b2c3d4e5f6789012ab"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectHash(pub String);

impl std::fmt::Display for ObjectHash {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

pub trait Hashable: Serialize {
  fn compute_hash(&self) -> Result<ObjectHash, HashError> {
    let serialized = serde_json::to_string(self)?;
    Ok(ObjectHash(hash_bytes(serialized.as_bytes())[..OBJ_HASH_PREFIX_LEN].to_string()))
  }
}

/// Full hexadecimal SHA-256 of arbitrary bytes.
pub fn hash_bytes(data: &[u8]) -> String {
  let mut hasher = Sha256::new();
  hasher.update(data);
  format!("{:x}", hasher.finalize())
}
