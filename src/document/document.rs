use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::identifiers::DocumentId;
use crate::types::timestamp::{volatile_marker, ExpirationPolicy};

/// A hosted text snippet.
///
/// Before [`store`](crate::engine::DocumentEngine::store), `content` is the
/// raw submission and `id`/`upload` are unset. After storing, `content` holds
/// the rendered form that was persisted. After a request it holds the decrypted
/// rendered form, or plain text when raw retrieval was asked for.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub content: String,
    /// Highlighting hint; empty means none.
    pub syntax: String,
    /// Non-empty marks an alternate rendering that skips highlighting.
    pub custom: String,
    pub upload: Option<DateTime<Utc>>,
    pub expiration: Option<DateTime<Utc>>,
    pub views: u64,
}

impl Document {
    pub fn new(content: impl Into<String>) -> Self {
        Document {
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn with_syntax(mut self, syntax: impl Into<String>) -> Self {
        self.syntax = syntax.into();
        self
    }

    pub fn with_custom(mut self, custom: impl Into<String>) -> Self {
        self.custom = custom.into();
        self
    }

    pub fn with_expiration(mut self, expiration: DateTime<Utc>) -> Self {
        self.expiration = Some(expiration);
        self
    }

    /// Mark the document for deletion after its first read.
    pub fn volatile(mut self) -> Self {
        self.expiration = Some(volatile_marker());
        self
    }

    pub fn expiration_policy(&self) -> ExpirationPolicy {
        ExpirationPolicy::classify(self.expiration)
    }
}
