//! Turning normalized text into the form that gets persisted.
//!
//! Highlighting and spam filtering are collaborators behind traits; the
//! defaults here are deliberately minimal.

pub mod html;
pub mod pipeline;

use thiserror::Error;

use crate::document::Document;

pub use html::{escape_html, strip_html};
pub use pipeline::RenderPipeline;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("No highlighter available for syntax {0:?}")]
    UnsupportedSyntax(String),
    #[error("Highlighting failed: {0}")]
    Failed(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct SpamDetected(pub String);

pub trait Highlighter {
    /// Render `content` as HTML. An empty `syntax` means no highlighting.
    fn highlight(&self, content: &str, syntax: &str) -> Result<String, RenderError>;
}

pub trait SpamFilter {
    /// Inspect a document about to be stored. An error vetoes the write.
    fn check(&self, doc: &Document, rendered: &str) -> Result<(), SpamDetected>;
}

/// Escapes content and supports no syntax hints.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainHighlighter;

impl Highlighter for PlainHighlighter {
    fn highlight(&self, content: &str, syntax: &str) -> Result<String, RenderError> {
        if syntax.is_empty() {
            Ok(escape_html(content))
        } else {
            Err(RenderError::UnsupportedSyntax(syntax.to_string()))
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct AcceptAll;

impl SpamFilter for AcceptAll {
    fn check(&self, _doc: &Document, _rendered: &str) -> Result<(), SpamDetected> {
        Ok(())
    }
}

/// Rejects rendered content containing any listed term (case-insensitive).
#[derive(Debug, Default, Clone)]
pub struct BlocklistFilter {
    terms: Vec<String>,
}

impl BlocklistFilter {
    pub fn new<I, T>(terms: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let terms = terms
            .into_iter()
            .map(|t| t.into().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        Self { terms }
    }
}

impl SpamFilter for BlocklistFilter {
    fn check(&self, _doc: &Document, rendered: &str) -> Result<(), SpamDetected> {
        let haystack = rendered.to_lowercase();
        match self.terms.iter().find(|term| haystack.contains(term.as_str())) {
            Some(term) => Err(SpamDetected(format!("blocked term {term:?}"))),
            None => Ok(()),
        }
    }
}
