//! Document text extraction — flattens a paginated document into one buffer.
//!
//! An all-empty result means "nothing extractable" (typically a scanned,
//! image-only PDF), not "the document is blank". The sanity check is the
//! place that turns that into a user-facing error.

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("failed to read PDF: {0}")]
    Pdf(String),

    #[error("PDF parser aborted: {0}")]
    Crashed(String),
}

/// A document whose text can be read page by page.
///
/// `None` for a page means it has no extractable text; it is not an error.
pub trait PagedDocument {
    fn page_texts(&self) -> Result<Vec<Option<String>>, ExtractionError>;
}

/// PDF bytes received from an upload, parsed lazily with `pdf-extract`.
#[derive(Debug, Clone)]
pub struct PdfDocument {
    data: Bytes,
}

impl PdfDocument {
    pub fn new(data: Bytes) -> Self {
        Self { data }
    }
}

impl PagedDocument for PdfDocument {
    fn page_texts(&self) -> Result<Vec<Option<String>>, ExtractionError> {
        let pages = pdf_extract::extract_text_from_mem_by_pages(&self.data)
            .map_err(|e| ExtractionError::Pdf(e.to_string()))?;
        Ok(pages
            .into_iter()
            .map(|text| (!text.trim().is_empty()).then_some(text))
            .collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedDocument {
    pub raw_text: String,
    pub char_count: usize,
}

impl ExtractedDocument {
    /// Builds the record from text that did not come from a paged document
    /// (e.g. text the client extracted itself).
    pub fn from_text(text: &str) -> Self {
        let raw_text = text.trim().to_string();
        let char_count = raw_text.chars().count();
        Self {
            raw_text,
            char_count,
        }
    }
}

/// Concatenates every page's text in order and trims the result.
///
/// Takes the document by value so the handle is released on every return path.
pub fn extract_document<D: PagedDocument>(
    document: D,
) -> Result<ExtractedDocument, ExtractionError> {
    let pages = document.page_texts()?;
    let page_count = pages.len();

    let mut buffer = String::new();
    for page in pages.iter() {
        buffer.push_str(page.as_deref().unwrap_or(""));
    }

    let extracted = ExtractedDocument::from_text(&buffer);
    debug!(
        "Extracted {} chars from {} page(s) ({} without text)",
        extracted.char_count,
        page_count,
        pages.iter().filter(|p| p.is_none()).count()
    );
    Ok(extracted)
}
