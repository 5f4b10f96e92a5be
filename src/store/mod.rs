//! Keyed record storage behind the engine.
//!
//! Records are addressed by [`HashedKey`] and carry the encrypted rendered
//! content plus the metadata needed to re-derive its key. Timestamps are
//! stored as strings in [`STORAGE_FORMAT`](crate::types::STORAGE_FORMAT).

pub mod memory;
pub mod sqlite;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::types::identifiers::HashedKey;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Stored expiration string for volatile documents.
pub(crate) const VOLATILE_EXPIRATION: &str = "1970-01-01 00:00:00";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document not found")]
    NotFound,
    #[error("A record already exists for key {0}")]
    Duplicate(HashedKey),
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("Migration error: {0}")]
    Migration(#[from] rusqlite_migration::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One persisted document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    pub key: HashedKey,
    /// `nonce || ciphertext` of the rendered content.
    pub content: Vec<u8>,
    pub custom: String,
    pub syntax: String,
    pub upload: String,
    pub expiration: Option<String>,
    pub views: u64,
}

impl StoredRecord {
    /// Hard-expired at `now`. Volatile records never are.
    pub fn is_expired_at(&self, now: &str) -> bool {
        match self.expiration.as_deref() {
            Some(expiration) => expiration > VOLATILE_EXPIRATION && expiration < now,
            None => false,
        }
    }
}

pub trait DocumentStore: Send + Sync {
    /// Insert a new record. Fails with [`StoreError::Duplicate`] if the key is taken.
    fn put(&self, record: StoredRecord) -> Result<(), StoreError>;

    fn get(&self, key: &HashedKey) -> Result<StoredRecord, StoreError>;

    fn exists(&self, key: &HashedKey) -> Result<bool, StoreError>;

    fn increment_views(&self, key: &HashedKey) -> Result<(), StoreError>;

    /// Returns whether a record was removed.
    fn delete(&self, key: &HashedKey) -> Result<bool, StoreError>;

    /// Remove every hard-expired record, returning how many were removed.
    fn delete_expired(&self, now: &DateTime<Utc>) -> Result<usize, StoreError>;
}
