use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::store::{DocumentStore, StoreError, StoredRecord};
use crate::types::identifiers::HashedKey;
use crate::types::timestamp::format_timestamp;

/// Process-local store. Contents are lost on drop.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<HashedKey, StoredRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Overwrite a record in place, bypassing the duplicate check.
    pub fn replace(&self, record: StoredRecord) {
        self.records.write().insert(record.key.clone(), record);
    }
}

impl DocumentStore for MemoryStore {
    fn put(&self, record: StoredRecord) -> Result<(), StoreError> {
        let mut records = self.records.write();
        if records.contains_key(&record.key) {
            return Err(StoreError::Duplicate(record.key));
        }
        records.insert(record.key.clone(), record);
        Ok(())
    }

    fn get(&self, key: &HashedKey) -> Result<StoredRecord, StoreError> {
        self.records
            .read()
            .get(key)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    fn exists(&self, key: &HashedKey) -> Result<bool, StoreError> {
        Ok(self.records.read().contains_key(key))
    }

    fn increment_views(&self, key: &HashedKey) -> Result<(), StoreError> {
        match self.records.write().get_mut(key) {
            Some(record) => {
                record.views += 1;
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    fn delete(&self, key: &HashedKey) -> Result<bool, StoreError> {
        Ok(self.records.write().remove(key).is_some())
    }

    fn delete_expired(&self, now: &DateTime<Utc>) -> Result<usize, StoreError> {
        let now = format_timestamp(now);
        let mut records = self.records.write();
        let before = records.len();
        records.retain(|_, record| !record.is_expired_at(&now));
        Ok(before - records.len())
    }
}
