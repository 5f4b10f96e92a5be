//! SQLite-backed record store.
//!
//! Schema: one `documents` row per snippet, keyed by the hex SHA-256 of the
//! document id. The primary key doubles as a uniqueness guard behind the
//! name generator's existence check.

use std::path::Path;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use rusqlite_migration::{Migrations, M};

use crate::store::{DocumentStore, StoreError, StoredRecord, VOLATILE_EXPIRATION};
use crate::types::identifiers::HashedKey;
use crate::types::timestamp::format_timestamp;

fn migrations() -> Migrations<'static> {
    Migrations::new(vec![M::up(
        "CREATE TABLE documents (
    id TEXT PRIMARY KEY,
    content BLOB NOT NULL,
    custom TEXT NOT NULL DEFAULT '',
    syntax TEXT NOT NULL DEFAULT '',
    upload TEXT NOT NULL,
    expiration TEXT,
    views INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX idx_documents_expiration ON documents(expiration);",
    )])
}

/// Rows written before encryption at rest hold their content as TEXT.
fn content_bytes(row: &Row<'_>) -> rusqlite::Result<Vec<u8>> {
    match row.get_ref(0)? {
        ValueRef::Blob(bytes) | ValueRef::Text(bytes) => Ok(bytes.to_vec()),
        other => Err(rusqlite::Error::InvalidColumnType(
            0,
            "content".to_string(),
            other.data_type(),
        )),
    }
}

/// rusqlite is synchronous; the connection is shared behind a mutex.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database file, enable WAL and run migrations.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        migrations().to_latest(&mut conn)?;

        tracing::info!("Document database initialized at {}", path.display());

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let mut conn = Connection::open_in_memory()?;
        migrations().to_latest(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl DocumentStore for SqliteStore {
    fn put(&self, record: StoredRecord) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        let result = conn.execute(
            "INSERT INTO documents (id, content, custom, syntax, upload, expiration, views)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                record.key.as_str(),
                record.content,
                record.custom,
                record.syntax,
                record.upload,
                record.expiration,
                record.views as i64,
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                Err(StoreError::Duplicate(record.key))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn get(&self, key: &HashedKey) -> Result<StoredRecord, StoreError> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT content, custom, syntax, upload, expiration, views FROM documents WHERE id = ?1",
            params![key.as_str()],
            |row| {
                Ok(StoredRecord {
                    key: key.clone(),
                    content: content_bytes(row)?,
                    custom: row.get(1)?,
                    syntax: row.get(2)?,
                    upload: row.get(3)?,
                    expiration: row.get(4)?,
                    views: row.get::<_, i64>(5)?.max(0) as u64,
                })
            },
        )
        .optional()?
        .ok_or(StoreError::NotFound)
    }

    fn exists(&self, key: &HashedKey) -> Result<bool, StoreError> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM documents WHERE id = ?1",
            params![key.as_str()],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn increment_views(&self, key: &HashedKey) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        let updated = conn.execute(
            "UPDATE documents SET views = views + 1 WHERE id = ?1",
            params![key.as_str()],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    fn delete(&self, key: &HashedKey) -> Result<bool, StoreError> {
        let conn = self.conn.lock();
        let deleted = conn.execute("DELETE FROM documents WHERE id = ?1", params![key.as_str()])?;
        Ok(deleted > 0)
    }

    fn delete_expired(&self, now: &DateTime<Utc>) -> Result<usize, StoreError> {
        let conn = self.conn.lock();
        let deleted = conn.execute(
            "DELETE FROM documents WHERE expiration IS NOT NULL AND expiration > ?1 AND expiration < ?2",
            params![VOLATILE_EXPIRATION, format_timestamp(now)],
        )?;
        Ok(deleted)
    }
}
