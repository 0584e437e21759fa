//! PDF access for blurbs.
//!
//! Loads a document with `lopdf` and exposes the positioned text runs of each
//! physical page to the core through [`blurbs_core::PageSource`].

use std::path::Path;

use blurbs_core::{Error as CoreError, PageSource, RawRun};
use thiserror::Error;

use parser::backend::{LopdfBackend, PageId, PdfBackend};

pub mod parser;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("PDF parsing error: {0}")]
    Parse(String),
    #[error("Document is encrypted")]
    Encrypted,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A loaded PDF whose pages are read on demand.
pub struct PdfDocument {
    backend: LopdfBackend,
    /// Page object ids in physical order.
    pages: Vec<PageId>,
}

impl std::fmt::Debug for PdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfDocument")
            .field("pages", &self.pages.len())
            .finish()
    }
}

impl PdfDocument {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PdfError> {
        let backend = LopdfBackend::load_bytes(bytes)?;
        let pages = backend.pages().into_values().collect();
        Ok(Self { backend, pages })
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self, PdfError> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_bytes(&bytes)
    }

    /// Runs of the page at 0-based physical `index`.
    pub fn runs(&self, index: usize) -> Result<Vec<RawRun>, PdfError> {
        let page_id = self
            .pages
            .get(index)
            .copied()
            .ok_or_else(|| PdfError::Parse(format!("no page at index {}", index)))?;
        parser::layout::extract_page_runs(&self.backend, page_id)
    }
}

impl PageSource for PdfDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_runs(&self, index: usize) -> Result<Vec<RawRun>, CoreError> {
        if index >= self.pages.len() {
            return Err(CoreError::PageOutOfRange {
                index: index as i64,
                count: self.pages.len(),
            });
        }
        self.runs(index).map_err(|e| CoreError::Page {
            index,
            reason: e.to_string(),
        })
    }
}
