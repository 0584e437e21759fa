use std::path::{Path, PathBuf};
use std::sync::Arc;

use blurbs_core::output::{csv_document, USER_DESCRIPTIONS};
use blurbs_core::{Catalog, CatalogEntry, CatalogPart, ExtractedRecord, PageSource, Shelf, StyleSheet};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::Config;
use crate::library::{discover_pdfs, load_shelf, DEFAULT_PDF_DIRS};
use crate::prelude::{eprintln, println, *};

/// Directories searched for catalog files when none is given.
pub const DEFAULT_CATALOG_DIRS: [&str; 2] = ["jsons", "."];

#[derive(Debug, clap::Parser)]
#[command(name = "scrape")]
#[command(about = "Extract every catalog blurb from the available books")]
pub struct App {
    /// Directory holding PDF files (repeatable; defaults to `.` and `pdfs`)
    #[arg(long = "pdf-dir")]
    pub pdf_dirs: Vec<PathBuf>,

    /// Directory holding the catalog JSON files (defaults to `jsons`, then `.`)
    #[arg(long)]
    pub catalog_dir: Option<PathBuf>,

    /// Also extract the flat `<TYPE>s.json` list (repeatable)
    #[arg(long = "items", value_name = "TYPE")]
    pub items: Vec<String>,

    /// Output file
    #[arg(short, long, default_value = USER_DESCRIPTIONS)]
    pub output: PathBuf,
}

/// Records extracted in one pass, with the number of entries skipped.
#[derive(Debug, Default)]
pub struct Extraction {
    pub records: Vec<ExtractedRecord>,
    pub skipped: usize,
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let config = Arc::new(Config::load(global.config.as_deref())?);

    let pdf_dirs = if app.pdf_dirs.is_empty() {
        DEFAULT_PDF_DIRS.iter().map(PathBuf::from).collect()
    } else {
        app.pdf_dirs
    };
    let catalog_dirs = match app.catalog_dir {
        Some(dir) => vec![dir],
        None => DEFAULT_CATALOG_DIRS.iter().map(PathBuf::from).collect(),
    };

    let catalog = load_catalog(&catalog_dirs, &app.items)?;
    let entries = catalog.entries(&config.overrides, &config.policies);

    let paths = discover_pdfs(&pdf_dirs)?;
    if paths.is_empty() {
        let searched: Vec<String> = pdf_dirs.iter().map(|d| d.display().to_string()).collect();
        return Err(Error::NoDocuments(searched.join(", ")).into());
    }

    let shelf = load_shelf(paths, Arc::clone(&config)).await?;
    let codes: Vec<&str> = shelf.codes().collect();
    eprintln!("{} {}", "Books:".bold(), codes.join(", "));

    let bar = ProgressBar::new(entries.len() as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap(),
    );

    let extraction = tokio::task::spawn_blocking({
        let bar = bar.clone();
        let config = Arc::clone(&config);
        move || extract_all(&shelf, &entries, &config.style, Some(&bar))
    })
    .await?;
    bar.finish_and_clear();

    std::fs::write(&app.output, csv_document(&extraction.records))
        .wrap_err_with(|| f!("failed to write {}", app.output.display()))?;

    println!(
        "{} {} blurbs to {} ({} skipped)",
        "Wrote".green().bold(),
        extraction.records.len(),
        app.output.display(),
        extraction.skipped
    );

    Ok(())
}

/// First `<stem>.json` found in `dirs`.
pub fn find_catalog_file(dirs: &[PathBuf], stem: &str) -> Option<PathBuf> {
    dirs.iter()
        .map(|dir| dir.join(f!("{stem}.json")))
        .find(|path| path.is_file())
}

/// Load the structured catalog parts, then one flat list per `item_types`.
/// Every file must exist.
pub fn load_catalog(dirs: &[PathBuf], item_types: &[String]) -> Result<Catalog> {
    let parts = CatalogPart::STRUCTURED
        .into_iter()
        .chain(item_types.iter().cloned().map(CatalogPart::Items));

    let mut catalog = Catalog::default();
    for part in parts {
        let stem = part.file_stem();
        let path = find_catalog_file(dirs, &stem).ok_or(Error::CatalogFileMissing(stem))?;
        let json = read_to_string(&path)?;
        catalog
            .load_part(&part, &json)
            .wrap_err_with(|| f!("failed to parse {}", path.display()))?;
        log::debug!("loaded {}", path.display());
    }

    Ok(catalog)
}

fn read_to_string(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).wrap_err_with(|| f!("failed to read {}", path.display()))
}

/// Extract every entry in order. Entries that fail are logged and counted.
pub fn extract_all<S: PageSource>(
    shelf: &Shelf<S>,
    entries: &[CatalogEntry],
    sheet: &StyleSheet,
    progress: Option<&ProgressBar>,
) -> Extraction {
    let mut extraction = Extraction::default();

    for entry in entries {
        if let Some(bar) = progress {
            bar.set_message(entry.name.clone());
        }

        match shelf.extract(entry, sheet) {
            Ok(record) => extraction.records.push(record),
            Err(err) if err.is_entry_level() => {
                log::warn!("{}", err);
                extraction.skipped += 1;
            }
            Err(err) => {
                log::error!("{} {} ({} p. {}): {}", entry.item_type, entry.name, entry.book, entry.page, err);
                extraction.skipped += 1;
            }
        }

        if let Some(bar) = progress {
            bar.inc(1);
        }
    }

    extraction
}
