//! Content fingerprints for cache keys.

use quarry_core::{ScalarValue, tuple_repr};
use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;

/// SHA-256 digest identifying a (view id, SQL, binds) combination.
///
/// The digest input is the view id, a `0x00` byte, the SQL text, a `0x00`
/// byte and the tuple rendering of the binds (`(30,)`, `('a', None)`).
///
/// Keys are only meaningful inside one process. They are not compatible with
/// SHA-1 keys or with other tuple renderings (text containing a quote is
/// always rendered as `'it\'s'`), so never compare them against keys
/// persisted by another tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Compute the fingerprint of a compiled statement.
    pub fn compute(view_id: &str, sql: &str, binds: &[ScalarValue]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(view_id.as_bytes());
        hasher.update([0u8]);
        hasher.update(sql.as_bytes());
        hasher.update([0u8]);
        hasher.update(tuple_repr(binds).as_bytes());

        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&hasher.finalize());
        Self(bytes)
    }

    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}
