//! Per-page PDF text extraction.
//!
//! The pipeline only needs one capability from a PDF library: given the raw
//! bytes, yield `(page_number, text)` for every page whose trimmed text is
//! non-empty, in page order. [`PageExtractor`] is that seam; two backends
//! implement it:
//!
//! | Backend | Crate | Notes |
//! |---------|-------|-------|
//! | [`PdfExtractBackend`] | `pdf-extract` | Default. Decodes all pages on open, yields lazily. |
//! | [`LopdfBackend`] | `lopdf` | Parses the document once, extracts one page per `next()`. |
//!
//! Iterators own everything they borrow from the library, so dropping one
//! early (including on an error) releases the parsed document.

use serde::Deserialize;
use thiserror::Error;

/// One non-empty page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// 1-based page number in the source document.
    pub number: u32,
    /// Page text with surrounding whitespace trimmed; never empty.
    pub text: String,
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to open PDF: {0}")]
    Open(String),

    #[error("failed to extract page {page}: {reason}")]
    Page { page: u32, reason: String },
}

/// Lazy, finite, non-restartable sequence of non-empty pages.
pub type PageIter<'a> = Box<dyn Iterator<Item = Result<Page, ExtractError>> + 'a>;

pub trait PageExtractor {
    /// Open `bytes` as a PDF and return its non-empty pages in order.
    fn pages<'a>(&self, bytes: &'a [u8]) -> Result<PageIter<'a>, ExtractError>;
}

/// Which PDF library backs extraction (`[extract] backend` in the config).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PdfBackend {
    #[default]
    PdfExtract,
    Lopdf,
}

impl PdfBackend {
    pub fn extractor(&self) -> Box<dyn PageExtractor> {
        match self {
            PdfBackend::PdfExtract => Box::new(PdfExtractBackend),
            PdfBackend::Lopdf => Box::new(LopdfBackend),
        }
    }
}

/// Trim a page's text and drop it if nothing is left.
fn non_empty_page(number: u32, raw: &str) -> Option<Page> {
    let text = raw.trim();
    if text.is_empty() {
        None
    } else {
        Some(Page {
            number,
            text: text.to_string(),
        })
    }
}

pub struct PdfExtractBackend;

impl PageExtractor for PdfExtractBackend {
    fn pages<'a>(&self, bytes: &'a [u8]) -> Result<PageIter<'a>, ExtractError> {
        // pdf-extract panics on some malformed inputs instead of returning Err.
        let pages =
            std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes))
                .map_err(|payload| ExtractError::Open(panic_message(&*payload)))?
                .map_err(|e| ExtractError::Open(e.to_string()))?;

        Ok(Box::new(pages.into_iter().zip(1u32..).filter_map(
            |(raw, number)| non_empty_page(number, &raw).map(Ok),
        )))
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("PDF parser panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("PDF parser panicked: {}", s)
    } else {
        "PDF parser panicked".to_string()
    }
}

pub struct LopdfBackend;

impl PageExtractor for LopdfBackend {
    fn pages<'a>(&self, bytes: &'a [u8]) -> Result<PageIter<'a>, ExtractError> {
        let doc =
            lopdf::Document::load_mem(bytes).map_err(|e| ExtractError::Open(e.to_string()))?;
        let numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
        Ok(Box::new(LopdfPages {
            doc,
            numbers: numbers.into_iter(),
            failed: false,
        }))
    }
}

struct LopdfPages {
    doc: lopdf::Document,
    numbers: std::vec::IntoIter<u32>,
    failed: bool,
}

impl Iterator for LopdfPages {
    type Item = Result<Page, ExtractError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        for number in self.numbers.by_ref() {
            match self.doc.extract_text(&[number]) {
                Ok(raw) => {
                    if let Some(page) = non_empty_page(number, &raw) {
                        return Some(Ok(page));
                    }
                }
                Err(e) => {
                    self.failed = true;
                    return Some(Err(ExtractError::Page {
                        page: number,
                        reason: e.to_string(),
                    }));
                }
            }
        }
        None
    }
}
