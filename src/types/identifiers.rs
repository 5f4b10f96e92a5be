use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Public, human-memorable document identifier (e.g. `cornflake-peddling-bp0q`).
///
/// The identifier is both the retrieval handle and the key-derivation
/// password, so it is never used directly as a storage key.
///
/// The default id is empty: a document has no name until it is stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        DocumentId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The storage lookup key for this identifier.
    pub fn hashed(&self) -> HashedKey {
        HashedKey::from_id(self)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        DocumentId(s.to_string())
    }
}

/// Hex-encoded SHA-256 of a [`DocumentId`].
///
/// Records are addressed by this digest so the store never holds the raw
/// identifier needed to derive a document's key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HashedKey(String);

impl HashedKey {
    pub fn from_id(id: &DocumentId) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(id.as_str().as_bytes());

        let hash = hasher.finalize();
        HashedKey(hex::encode(hash))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HashedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
