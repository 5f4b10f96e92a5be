//! Encrypted-at-rest document engine for text snippet hosting.
//!
//! `snippet-core` assigns each submitted snippet a human-memorable name,
//! renders it, and encrypts it with a key derived from the name and the
//! upload time. The key is never stored: a record can only be opened by
//! someone who knows the name, since the store itself is keyed by a hash
//! of it. Expiration covers both calendar deadlines and view-once
//! ("volatile") documents.

pub mod crypto;
pub mod document;
pub mod engine;
pub mod naming;
pub mod render;
pub mod store;
pub mod types;

pub use document::Document;
pub use engine::{DocumentEngine, EngineConfig, EngineError};
pub use store::{DocumentStore, MemoryStore, SqliteStore};
pub use types::{DocumentId, HashedKey};
