//! Loaded books, addressed by book code.

use std::collections::BTreeMap;

use crate::catalog::CatalogEntry;
use crate::error::Error;
use crate::locate::{extract_blurb, ExtractedRecord};
use crate::runs::StyleSheet;
use crate::source::PageSource;

/// A document together with its identification and page offset.
#[derive(Debug, Clone)]
pub struct Book<S> {
    pub code: String,
    pub offset: i64,
    pub source: S,
}

/// The books available for extraction.
#[derive(Debug, Clone)]
pub struct Shelf<S> {
    books: BTreeMap<String, Book<S>>,
}

impl<S> Default for Shelf<S> {
    fn default() -> Self {
        Shelf {
            books: BTreeMap::new(),
        }
    }
}

impl<S: PageSource> Shelf<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a book, replacing any earlier document with the same code.
    pub fn insert(&mut self, book: Book<S>) -> Option<Book<S>> {
        self.books.insert(book.code.clone(), book)
    }

    pub fn get(&self, code: &str) -> Option<&Book<S>> {
        self.books.get(code)
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.books.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Extract the blurb of `entry` from its book.
    pub fn extract(&self, entry: &CatalogEntry, sheet: &StyleSheet) -> Result<ExtractedRecord, Error> {
        let book = self.get(&entry.book).ok_or_else(|| Error::SourceUnavailable {
            name: entry.name.clone(),
            item_type: entry.item_type.clone(),
            book: entry.book.clone(),
        })?;
        let page = entry.physical_page(book.offset, book.source.page_count())?;
        extract_blurb(&book.source, sheet, &entry.request(page))
    }
}
