use thiserror::Error;

/// Failures surfaced by the core.
///
/// `SourceUnavailable` and `HeadingNotFound` concern a single catalog entry
/// and are recoverable: callers log them and move on to the next entry.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{item_type} {name} is in unavailable source {book}")]
    SourceUnavailable {
        name: String,
        item_type: String,
        book: String,
    },

    #[error("Could not find {item_type} {name} at {book} p. {page}")]
    HeadingNotFound {
        name: String,
        item_type: String,
        book: String,
        page: usize,
    },

    #[error("Could not resolve the page offset after scanning {pages_scanned} pages")]
    PageOffsetUnresolved { pages_scanned: usize },

    #[error("Page {index} is out of range (document has {count} pages)")]
    PageOutOfRange { index: i64, count: usize },

    #[error("Failed to read page {index}: {reason}")]
    Page { index: usize, reason: String },

    #[error("Invalid catalog data: {0}")]
    Catalog(#[from] serde_json::Error),
}

impl Error {
    /// Whether the error only affects the current catalog entry.
    pub fn is_entry_level(&self) -> bool {
        matches!(
            self,
            Error::SourceUnavailable { .. } | Error::HeadingNotFound { .. } | Error::PageOutOfRange { .. }
        )
    }
}
