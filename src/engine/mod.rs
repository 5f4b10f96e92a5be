//! The document engine: write and read paths over a [`DocumentStore`].
//!
//! Write: name -> timestamps -> normalize -> render -> spam check -> derive key
//! -> encrypt -> persist under the hashed id.
//!
//! Read: fetch -> queue view -> derive key -> decrypt -> expiration policy
//! -> optional strip to plain text.

pub mod config;
pub mod error;
pub mod views;

use std::sync::Arc;

use chrono::Utc;

use crate::crypto::{decrypt, derive_key, encrypt, CryptoError, DocumentKey};
use crate::document::{normalize_content, Document};
use crate::naming::{NameGenerator, WordList};
use crate::render::{strip_html, AcceptAll, Highlighter, PlainHighlighter, RenderPipeline, SpamFilter};
use crate::store::{DocumentStore, StoreError, StoredRecord};
use crate::types::identifiers::DocumentId;
use crate::types::timestamp::{
    format_timestamp, now_rounded, parse_timestamp, round_to_second, ExpirationPolicy,
};

pub use config::{ConfigError, EngineConfig, DEFAULT_MAX_DOCUMENT_SIZE};
pub use error::EngineError;
pub use views::ViewRecorder;

pub struct DocumentEngine<S, H = PlainHighlighter, F = AcceptAll>
where
    S: DocumentStore + 'static,
{
    store: Arc<S>,
    names: NameGenerator,
    pipeline: RenderPipeline<H, F>,
    config: EngineConfig,
    views: ViewRecorder,
}

impl<S> DocumentEngine<S>
where
    S: DocumentStore + 'static,
{
    /// Engine with default rendering, no word list and default config.
    pub fn new(store: Arc<S>) -> Result<Self, EngineError> {
        Self::with_parts(
            store,
            NameGenerator::default(),
            RenderPipeline::default(),
            EngineConfig::default(),
        )
    }
}

impl<S, H, F> DocumentEngine<S, H, F>
where
    S: DocumentStore + 'static,
    H: Highlighter,
    F: SpamFilter,
{
    pub fn with_parts(
        store: Arc<S>,
        names: NameGenerator,
        pipeline: RenderPipeline<H, F>,
        config: EngineConfig,
    ) -> Result<Self, EngineError> {
        let views = ViewRecorder::spawn(Arc::clone(&store))?;
        Ok(Self {
            store,
            names,
            pipeline,
            config,
            views,
        })
    }

    /// Build from config, loading the word list if one is configured.
    pub fn from_config(
        store: Arc<S>,
        config: EngineConfig,
        pipeline: RenderPipeline<H, F>,
    ) -> Result<Self, EngineError> {
        let words = match &config.words_file {
            Some(path) => Some(WordList::load(path)?),
            None => None,
        };
        Self::with_parts(store, NameGenerator::new(words), pipeline, config)
    }

    pub fn store_backend(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Persist `doc`, assigning its id and upload time.
    ///
    /// On success `doc.content` holds the rendered form that was encrypted.
    /// Rejections (binary, oversized, spam) happen before anything is written,
    /// and any failure leaves `doc` exactly as the caller passed it.
    pub fn store(&self, doc: &mut Document) -> Result<(), EngineError> {
        let mut staged = doc.clone();
        staged.id = self.free_name()?;
        let upload = now_rounded()?;
        staged.upload = Some(upload);
        staged.expiration = staged.expiration.map(round_to_second).transpose()?;

        staged.content = normalize_content(&staged.content)?;
        if staged.content.len() > self.config.max_document_size {
            return Err(EngineError::TooLarge {
                size: staged.content.len(),
                max: self.config.max_document_size,
            });
        }

        let rendered = self.pipeline.render(&mut staged);
        self.pipeline.check_spam(&staged, &rendered)?;

        loop {
            let key = derive_key(&staged.id, &upload)?;
            let data = encrypt(rendered.as_bytes(), &key).map_err(|e| {
                tracing::error!("AES error: {}", e);
                e
            })?;

            let record = StoredRecord {
                key: staged.id.hashed(),
                content: data,
                custom: staged.custom.clone(),
                syntax: staged.syntax.clone(),
                upload: format_timestamp(&upload),
                expiration: staged.expiration.as_ref().map(format_timestamp),
                views: 0,
            };
            match self.store.put(record) {
                Ok(()) => break,
                // Another writer claimed the name after the existence check.
                Err(StoreError::Duplicate(taken)) => {
                    tracing::debug!("Name {} was taken before the write, picking another", taken);
                    staged.id = self.free_name()?;
                }
                Err(e) => return Err(e.into()),
            }
        }

        staged.content = rendered;
        staged.views = 0;
        tracing::debug!("Stored document {}", staged.id.hashed());
        *doc = staged;
        Ok(())
    }

    /// Fetch and decrypt a document.
    ///
    /// Volatile documents are deleted by the read that returns them. With
    /// `raw`, markup is stripped from the returned content.
    pub fn request(&self, id: &DocumentId, raw: bool) -> Result<Document, EngineError> {
        let key = id.hashed();
        let record = match self.store.get(&key) {
            Ok(record) => record,
            Err(StoreError::NotFound) => return Err(EngineError::NotFound),
            Err(e) => {
                tracing::warn!("Error retrieving document: {}", e);
                return Err(e.into());
            }
        };

        self.views.record(key.clone());

        let upload = parse_timestamp(&record.upload)?;
        let doc_key = derive_key(id, &upload).map_err(|e| {
            tracing::error!("Invalid scrypt parameters: {}", e);
            e
        })?;
        let content = self.open_content(&record.content, &doc_key)?;

        let expiration = record
            .expiration
            .as_deref()
            .map(parse_timestamp)
            .transpose()?;

        let mut doc = Document {
            id: id.clone(),
            content,
            syntax: record.syntax,
            custom: record.custom,
            upload: Some(upload),
            expiration,
            views: record.views,
        };

        match doc.expiration_policy() {
            ExpirationPolicy::Never => {}
            ExpirationPolicy::Volatile => {
                // This read is the view that consumes the document.
                match self.store.delete(&key) {
                    Ok(_) => tracing::debug!("Deleted volatile document {}", key),
                    Err(e) => tracing::error!("Couldn't delete volatile document: {}", e),
                }
            }
            policy @ ExpirationPolicy::At(_) => {
                if policy.is_expired_at(Utc::now()) {
                    return Err(EngineError::Expired);
                }
            }
        }

        if raw {
            doc.content = strip_html(&doc.content);
        }
        Ok(doc)
    }

    /// Remove a document by id.
    pub fn delete(&self, id: &DocumentId) -> Result<(), EngineError> {
        if self.store.delete(&id.hashed())? {
            Ok(())
        } else {
            Err(EngineError::NotFound)
        }
    }

    /// Drop every hard-expired document. Volatile documents are left alone.
    pub fn purge_expired(&self) -> Result<usize, EngineError> {
        let count = self.store.delete_expired(&Utc::now())?;
        if count > 0 {
            tracing::info!("Purged {} expired documents", count);
        } else {
            tracing::debug!("No expired documents to purge");
        }
        Ok(count)
    }

    fn free_name(&self) -> Result<DocumentId, EngineError> {
        let store = &self.store;
        Ok(self
            .names
            .generate_safe_name(|candidate| store.exists(&candidate.hashed()))?)
    }

    fn open_content(&self, stored: &[u8], key: &DocumentKey) -> Result<String, EngineError> {
        match decrypt(stored, key) {
            Ok(plaintext) => Ok(String::from_utf8(plaintext)?),
            Err(e @ (CryptoError::Authentication | CryptoError::TooShort(_)))
                if self.config.allow_legacy_plaintext =>
            {
                match legacy_plaintext(stored) {
                    Some(text) => {
                        tracing::debug!("Serving document stored without encryption");
                        Ok(text)
                    }
                    None => {
                        tracing::error!("AES error: {}", e);
                        Err(e.into())
                    }
                }
            }
            Err(e) => {
                tracing::error!("AES error: {}", e);
                Err(e.into())
            }
        }
    }
}

/// Records written before encryption at rest are plain UTF-8 text, which
/// never contains NUL. Ciphertext of any real length almost always does.
fn legacy_plaintext(stored: &[u8]) -> Option<String> {
    if stored.contains(&0) {
        return None;
    }
    String::from_utf8(stored.to_vec()).ok()
}
