use std::sync::Arc;

use proptest::prelude::*;
use snippet_core::document::{normalize_content, Document};
use snippet_core::engine::DocumentEngine;
use snippet_core::store::MemoryStore;

fn text() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-zA-Z0-9 <>&\"'\t\r\n]{0,64}").unwrap()
}

proptest! {
    #[test]
    fn normalized_text_has_canonical_line_endings(raw in text()) {
        let normalized = normalize_content(&raw).unwrap();
        prop_assert!(!normalized.contains('\r'));
        prop_assert!(normalized.ends_with('\n'));
        if normalized != "\n" {
            prop_assert!(!normalized.starts_with('\n'));
            prop_assert!(!normalized.ends_with("\n\n"));
        }
    }

    #[test]
    fn normalization_is_idempotent(raw in text()) {
        let once = normalize_content(&raw).unwrap();
        prop_assert_eq!(normalize_content(&once).unwrap(), once);
    }
}

proptest! {
    // Each case pays for two scrypt derivations.
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn raw_request_returns_normalized_input(raw in text()) {
        let engine = DocumentEngine::new(Arc::new(MemoryStore::new())).unwrap();
        let mut doc = Document::new(raw.clone());
        engine.store(&mut doc).unwrap();

        let fetched = engine.request(&doc.id, true).unwrap();
        prop_assert_eq!(fetched.content, normalize_content(&raw).unwrap());
    }
}
