use crate::document::Document;
use crate::render::{escape_html, AcceptAll, Highlighter, PlainHighlighter, SpamDetected, SpamFilter};

/// Syntax hint that explicitly asks for no highlighting.
const NO_SYNTAX: &str = "none";

pub struct RenderPipeline<H, F> {
    highlighter: H,
    spam_filter: F,
}

impl Default for RenderPipeline<PlainHighlighter, AcceptAll> {
    fn default() -> Self {
        Self {
            highlighter: PlainHighlighter,
            spam_filter: AcceptAll,
        }
    }
}

impl<H, F> RenderPipeline<H, F>
where
    H: Highlighter,
    F: SpamFilter,
{
    pub fn new(highlighter: H, spam_filter: F) -> Self {
        Self {
            highlighter,
            spam_filter,
        }
    }

    /// Produce the persisted representation of `doc.content`.
    ///
    /// Custom documents are only escaped. Everything else goes through the
    /// highlighter; a highlighter failure falls back to escaped content.
    /// A `"none"` syntax hint is cleared on the document first.
    pub fn render(&self, doc: &mut Document) -> String {
        if !doc.custom.is_empty() {
            return escape_html(&doc.content);
        }

        if doc.syntax == NO_SYNTAX {
            doc.syntax.clear();
        }

        match self.highlighter.highlight(&doc.content, &doc.syntax) {
            Ok(rendered) => rendered,
            Err(e) => {
                tracing::warn!("Skipped syntax highlighting for the following reason: {}", e);
                escape_html(&doc.content)
            }
        }
    }

    pub fn check_spam(&self, doc: &Document, rendered: &str) -> Result<(), SpamDetected> {
        self.spam_filter.check(doc, rendered).map_err(|e| {
            tracing::warn!("Spam filter hit for document: {}", e);
            e
        })
    }
}
