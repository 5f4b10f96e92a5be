use std::sync::Arc;

use chrono::{DateTime, Utc};
use snippet_core::document::Document;
use snippet_core::engine::{DocumentEngine, EngineConfig, EngineError};
use snippet_core::naming::NameGenerator;
use snippet_core::render::{
    escape_html, AcceptAll, BlocklistFilter, Highlighter, PlainHighlighter, RenderError,
    RenderPipeline,
};
use snippet_core::store::{DocumentStore, MemoryStore, StoreError, StoredRecord};
use snippet_core::types::{DocumentId, HashedKey};

fn engine() -> (Arc<MemoryStore>, DocumentEngine<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let engine = DocumentEngine::new(Arc::clone(&store)).unwrap();
    (store, engine)
}

/// Wraps content in a marker element for any non-empty syntax.
struct TaggingHighlighter;

impl Highlighter for TaggingHighlighter {
    fn highlight(&self, content: &str, syntax: &str) -> Result<String, RenderError> {
        if syntax.is_empty() {
            return Ok(escape_html(content));
        }
        Ok(format!("<code class=\"{}\">{}</code>", syntax, escape_html(content)))
    }
}

#[test]
fn store_then_request_returns_rendered_content() {
    let (_store, engine) = engine();
    let mut doc = Document::new("fn main() { a < b }");
    engine.store(&mut doc).unwrap();

    assert!(!doc.id.is_empty());
    assert_eq!(doc.content, "fn main() { a &lt; b }\n");

    let fetched = engine.request(&doc.id, false).unwrap();
    assert_eq!(fetched.content, doc.content);
    assert_eq!(fetched.upload, doc.upload);
    assert_eq!(fetched.id, doc.id);
}

#[test]
fn raw_request_strips_markup() {
    let store = Arc::new(MemoryStore::new());
    let engine = DocumentEngine::with_parts(
        Arc::clone(&store),
        NameGenerator::default(),
        RenderPipeline::new(TaggingHighlighter, AcceptAll),
        EngineConfig::default(),
    )
    .unwrap();

    let mut doc = Document::new("if a && b {}\n").with_syntax("rust");
    engine.store(&mut doc).unwrap();
    assert_eq!(doc.content, "<code class=\"rust\">if a &amp;&amp; b {}\n</code>");

    let rendered = engine.request(&doc.id, false).unwrap();
    assert_eq!(rendered.content, doc.content);
    assert_eq!(rendered.syntax, "rust");

    let raw = engine.request(&doc.id, true).unwrap();
    assert_eq!(raw.content, "if a && b {}\n");
}

#[test]
fn line_endings_are_normalized() {
    let (_store, engine) = engine();
    let mut doc = Document::new("line1\r\nline2\r");
    engine.store(&mut doc).unwrap();

    let raw = engine.request(&doc.id, true).unwrap();
    assert_eq!(raw.content, "line1\nline2\n");
}

#[test]
fn upload_is_whole_seconds() {
    let (_store, engine) = engine();
    let mut doc = Document::new("x");
    engine.store(&mut doc).unwrap();

    let upload = doc.upload.unwrap();
    assert_eq!(upload.timestamp_subsec_nanos(), 0);
    assert!((Utc::now() - upload).num_seconds().abs() <= 2);
}

#[test]
fn binary_content_is_rejected_before_persisting() {
    let (store, engine) = engine();
    let mut doc = Document::new("header\0payload");
    let err = engine.store(&mut doc).unwrap_err();

    assert!(matches!(err, EngineError::BinaryContent));
    assert!(err.is_rejection());
    assert!(store.is_empty());
}

#[test]
fn oversized_content_is_rejected() {
    let store = Arc::new(MemoryStore::new());
    let config = EngineConfig {
        max_document_size: 8,
        ..EngineConfig::default()
    };
    let engine = DocumentEngine::with_parts(
        Arc::clone(&store),
        NameGenerator::default(),
        RenderPipeline::default(),
        config,
    )
    .unwrap();

    let mut doc = Document::new("0123456789");
    let err = engine.store(&mut doc).unwrap_err();
    assert!(matches!(err, EngineError::TooLarge { size: 11, max: 8 }));
    assert!(store.is_empty());
}

#[test]
fn spam_hit_aborts_the_write() {
    let store = Arc::new(MemoryStore::new());
    let engine = DocumentEngine::with_parts(
        Arc::clone(&store),
        NameGenerator::default(),
        RenderPipeline::new(PlainHighlighter, BlocklistFilter::new(["cheap pills"])),
        EngineConfig::default(),
    )
    .unwrap();

    let mut doc = Document::new("Buy CHEAP PILLS now");
    let err = engine.store(&mut doc).unwrap_err();
    assert!(matches!(err, EngineError::Spam(_)));
    assert!(err.to_string().starts_with("spam: "));
    assert!(store.is_empty());

    let mut clean = Document::new("perfectly normal text");
    engine.store(&mut clean).unwrap();
    assert_eq!(store.len(), 1);
}

#[test]
fn custom_documents_are_escaped_not_highlighted() {
    let store = Arc::new(MemoryStore::new());
    let engine = DocumentEngine::with_parts(
        Arc::clone(&store),
        NameGenerator::default(),
        RenderPipeline::new(TaggingHighlighter, AcceptAll),
        EngineConfig::default(),
    )
    .unwrap();

    let mut doc = Document::new("<b>hi</b>").with_syntax("html").with_custom("markdown");
    engine.store(&mut doc).unwrap();

    let fetched = engine.request(&doc.id, false).unwrap();
    assert_eq!(fetched.content, "&lt;b&gt;hi&lt;/b&gt;\n");
    assert_eq!(fetched.custom, "markdown");

    let raw = engine.request(&doc.id, true).unwrap();
    assert_eq!(raw.content, "<b>hi</b>\n");
}

#[test]
fn unsupported_syntax_falls_back_to_plain() {
    let (_store, engine) = engine();
    let mut doc = Document::new("SELECT 1;").with_syntax("sql");
    engine.store(&mut doc).unwrap();

    assert_eq!(doc.content, "SELECT 1;\n");
    let fetched = engine.request(&doc.id, false).unwrap();
    assert_eq!(fetched.syntax, "sql");
}

#[test]
fn none_syntax_is_stored_as_empty() {
    let (_store, engine) = engine();
    let mut doc = Document::new("text").with_syntax("none");
    engine.store(&mut doc).unwrap();

    assert_eq!(engine.request(&doc.id, false).unwrap().syntax, "");
}

#[test]
fn unknown_id_is_not_found() {
    let (_store, engine) = engine();
    let result = engine.request(&DocumentId::from("no-such-thing"), false);
    assert!(matches!(result, Err(EngineError::NotFound)));
}

#[test]
fn explicit_delete() {
    let (_store, engine) = engine();
    let mut doc = Document::new("short lived");
    engine.store(&mut doc).unwrap();

    engine.delete(&doc.id).unwrap();
    assert!(matches!(engine.request(&doc.id, false), Err(EngineError::NotFound)));
    assert!(matches!(engine.delete(&doc.id), Err(EngineError::NotFound)));
}

#[test]
fn views_are_counted_in_the_background() {
    let (store, engine) = engine();
    let mut doc = Document::new("popular");
    engine.store(&mut doc).unwrap();

    let first = engine.request(&doc.id, false).unwrap();
    assert_eq!(first.views, 0);
    engine.request(&doc.id, true).unwrap();

    // Dropping the engine drains queued increments.
    drop(engine);
    assert_eq!(store.get(&doc.id.hashed()).unwrap().views, 2);
}

#[test]
fn distinct_documents_get_distinct_ids() {
    let (store, engine) = engine();
    let mut ids = std::collections::BTreeSet::new();
    for i in 0..5 {
        let mut doc = Document::new(format!("document {i}"));
        engine.store(&mut doc).unwrap();
        ids.insert(doc.id);
    }
    assert_eq!(ids.len(), 5);
    assert_eq!(store.len(), 5);
}

/// A backend that fails every operation.
struct BrokenStore;

fn broken() -> StoreError {
    StoreError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk on fire"))
}

impl DocumentStore for BrokenStore {
    fn put(&self, _record: StoredRecord) -> Result<(), StoreError> {
        Err(broken())
    }
    fn get(&self, _key: &HashedKey) -> Result<StoredRecord, StoreError> {
        Err(broken())
    }
    fn exists(&self, _key: &HashedKey) -> Result<bool, StoreError> {
        Ok(false)
    }
    fn increment_views(&self, _key: &HashedKey) -> Result<(), StoreError> {
        Err(broken())
    }
    fn delete(&self, _key: &HashedKey) -> Result<bool, StoreError> {
        Err(broken())
    }
    fn delete_expired(&self, _now: &DateTime<Utc>) -> Result<usize, StoreError> {
        Err(broken())
    }
}

#[test]
fn persistence_errors_are_surfaced() {
    let engine = DocumentEngine::new(Arc::new(BrokenStore)).unwrap();

    let mut doc = Document::new("won't make it");
    let err = engine.store(&mut doc).unwrap_err();
    assert!(matches!(err, EngineError::Store(StoreError::Io(_))));
    assert_eq!(err.to_string(), "IO error: disk on fire");

    let err = engine.request(&DocumentId::from("anything"), false).unwrap_err();
    assert!(matches!(err, EngineError::Store(StoreError::Io(_))));
}

#[test]
fn rejected_documents_are_left_untouched() {
    let store = Arc::new(MemoryStore::new());
    let engine = DocumentEngine::with_parts(
        Arc::clone(&store),
        NameGenerator::default(),
        RenderPipeline::new(PlainHighlighter, BlocklistFilter::new(["casino"])),
        EngineConfig::default(),
    )
    .unwrap();

    let mut fresh = Document::new("not stored yet");
    assert!(fresh.id.is_empty());
    assert_eq!(fresh.upload, None);

    let mut binary = Document::new("a\0b").with_syntax("none");
    engine.store(&mut binary).unwrap_err();
    assert_eq!(binary, Document::new("a\0b").with_syntax("none"));

    let mut spam = Document::new("online casino\r\n");
    engine.store(&mut spam).unwrap_err();
    assert!(spam.id.is_empty());
    assert_eq!(spam.upload, None);
    assert_eq!(spam.content, "online casino\r\n");

    engine.store(&mut fresh).unwrap();
    assert!(!fresh.id.is_empty());
    assert!(fresh.upload.is_some());
}

/// Reports every name as free, then refuses the first write as a duplicate,
/// as if another writer won the race for the name.
struct RacingStore {
    inner: MemoryStore,
    lost_races: std::sync::atomic::AtomicUsize,
}

impl DocumentStore for RacingStore {
    fn put(&self, record: StoredRecord) -> Result<(), StoreError> {
        use std::sync::atomic::Ordering;
        if self.lost_races.fetch_add(1, Ordering::SeqCst) == 0 {
            return Err(StoreError::Duplicate(record.key));
        }
        self.inner.put(record)
    }
    fn get(&self, key: &HashedKey) -> Result<StoredRecord, StoreError> {
        self.inner.get(key)
    }
    fn exists(&self, _key: &HashedKey) -> Result<bool, StoreError> {
        Ok(false)
    }
    fn increment_views(&self, key: &HashedKey) -> Result<(), StoreError> {
        self.inner.increment_views(key)
    }
    fn delete(&self, key: &HashedKey) -> Result<bool, StoreError> {
        self.inner.delete(key)
    }
    fn delete_expired(&self, now: &DateTime<Utc>) -> Result<usize, StoreError> {
        self.inner.delete_expired(now)
    }
}

#[test]
fn duplicate_on_write_retries_with_a_new_name() {
    let store = Arc::new(RacingStore {
        inner: MemoryStore::new(),
        lost_races: Default::default(),
    });
    let engine = DocumentEngine::new(Arc::clone(&store)).unwrap();

    let mut doc = Document::new("second time lucky");
    engine.store(&mut doc).unwrap();

    assert_eq!(store.inner.len(), 1);
    assert_eq!(
        store.lost_races.load(std::sync::atomic::Ordering::SeqCst),
        2
    );
    let fetched = engine.request(&doc.id, false).unwrap();
    assert_eq!(fetched.content, "second time lucky\n");
}
