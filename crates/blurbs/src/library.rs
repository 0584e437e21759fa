//! Finding, opening and identifying the books on disk.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use blurbs_core::{identify_book, resolve_page_offset, Book, Shelf};
use futures::future::join_all;
use pdf::PdfDocument;

use crate::config::Config;
use crate::prelude::*;

/// Directories searched when none are given.
pub const DEFAULT_PDF_DIRS: [&str; 2] = [".", "pdfs"];

/// PDF files directly inside `dirs`, sorted per directory. Missing
/// directories are skipped.
pub fn discover_pdfs(dirs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();

    for dir in dirs {
        if !dir.is_dir() {
            log::debug!("{} is not a directory; skipping", dir.display());
            continue;
        }

        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
            .wrap_err_with(|| f!("failed to list {}", dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && is_pdf(path))
            .collect();
        paths.sort();
        found.extend(paths);
    }

    Ok(found)
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

pub fn open_document(path: &Path) -> Result<PdfDocument> {
    PdfDocument::open(path).wrap_err_with(|| f!("failed to open {}", path.display()))
}

/// Open, identify and offset-resolve one document. Documents no phrase
/// matches are `None`.
pub fn load_book(path: &Path, config: &Config) -> Result<Option<Book<PdfDocument>>> {
    let document = open_document(path)?;

    let Some(code) = identify_book(&document, &config.style, &config.books)
        .wrap_err_with(|| f!("failed to identify {}", path.display()))?
    else {
        log::info!("{} is not a recognised book; skipping", path.display());
        return Ok(None);
    };

    let offset = resolve_page_offset(&document, &config.scan)
        .wrap_err_with(|| f!("{} ({})", path.display(), code))?;

    log::info!("loaded {} from {} with page offset {}", code, path.display(), offset);
    Ok(Some(Book {
        code,
        offset,
        source: document,
    }))
}

/// Load every document concurrently. Failures are logged and the document
/// left out.
pub async fn load_shelf(paths: Vec<PathBuf>, config: Arc<Config>) -> Result<Shelf<PdfDocument>> {
    let tasks = paths.into_iter().map(|path| {
        let config = Arc::clone(&config);
        tokio::task::spawn_blocking(move || {
            let result = load_book(&path, &config);
            (path, result)
        })
    });

    let mut shelf = Shelf::new();
    for joined in join_all(tasks).await {
        let (path, result) = joined?;
        match result {
            Ok(Some(book)) => {
                if let Some(previous) = shelf.insert(book) {
                    log::warn!(
                        "{} replaces an earlier document for {}",
                        path.display(),
                        previous.code
                    );
                }
            }
            Ok(None) => {}
            Err(err) => log::warn!("skipping document: {:#}", err),
        }
    }

    Ok(shelf)
}
