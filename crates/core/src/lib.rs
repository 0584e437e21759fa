//! Core library for blurbs
//!
//! This crate implements the **Functional Core** of the blurbs application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! The blurbs project uses a three-crate architecture:
//!
//! - **`blurbs_core`** (this crate): Pure transformations from positioned text
//!   runs to catalog blurbs, with zero I/O
//! - **`pdf`**: Reads PDF content streams and hands their runs to this crate
//!   through the [`PageSource`] trait
//! - **`blurbs`**: I/O operations and orchestration (the Imperative Shell)
//!
//! ## Functional Core Principles
//!
//! - **Pure functions**: Same runs in, same blocks out
//! - **No side effects**: Documents are only read through [`PageSource`]
//! - **Testable**: Every stage runs on in-memory fixtures
//!
//! # Pipeline
//!
//! ```text
//! PageSource ─► RawRun[] ─► condense ─► CondensedBlock[] ─► locate ─► ExtractedRecord
//!      │                                                                    │
//!      └─► resolve_page_offset                                   output::csv_row
//! ```
//!
//! # Module Organization
//!
//! - [`runs`]: Raw runs and the font markers that give them meaning
//! - [`condense`]: The run classifier and block condenser
//! - [`normalize`]: Whitespace and emphasis-artifact cleanup
//! - [`icons`]: Private-use icon glyphs to bracketed tags
//! - [`offset`]: Printed page number to physical index resolution
//! - [`locate`]: Heading search and body extraction
//! - [`catalog`]: Catalog data, overrides and formatting policies
//! - [`identify`]: Book identification from opening pages
//! - [`shelf`]: Loaded books by code
//! - [`output`]: The user-descriptions file format
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use blurbs_core::{condense, extract_entry, EntryRequest, FormattingPolicy, StyleSheet};
//!
//! let blocks = condense(&runs, &StyleSheet::default(), false);
//! let policy = FormattingPolicy::default();
//! let record = extract_entry(&blocks, &EntryRequest {
//!     name: "Gift of Air",
//!     search_name: "Gift of Air",
//!     item_type: "technique",
//!     book: "Core",
//!     page: 12,
//!     policy: &policy,
//! })?;
//! ```

pub mod catalog;
pub mod condense;
pub mod error;
pub mod icons;
pub mod identify;
pub mod locate;
pub mod normalize;
pub mod offset;
pub mod output;
pub mod runs;
pub mod shelf;
pub mod source;

pub use catalog::{Catalog, CatalogEntry, CatalogPart, Override, OverrideTable, PolicyTable};
pub use condense::{condense, Classification, CondensedBlock};
pub use error::Error;
pub use identify::{default_phrases, identify_book, BookPhrase};
pub use locate::{extract_blurb, extract_entry, EntryRequest, ExtractedRecord, FormattingPolicy};
pub use offset::{resolve_page_offset, OffsetWindow};
pub use runs::{Geometry, RawRun, StyleFlags, StyleSheet};
pub use shelf::{Book, Shelf};
pub use source::PageSource;
