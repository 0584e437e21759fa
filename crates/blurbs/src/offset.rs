use std::path::PathBuf;
use std::sync::Arc;

use blurbs_core::{identify_book, resolve_page_offset, PageSource};
use colored::Colorize;
use futures::future::join_all;
use prettytable::row;
use serde::Serialize;

use crate::config::Config;
use crate::library::open_document;
use crate::prelude::{println, *};

#[derive(Debug, clap::Parser)]
#[command(name = "offset")]
#[command(about = "Identify documents and resolve their page offsets")]
pub struct App {
    /// PDF files
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
pub struct OffsetReport {
    pub path: PathBuf,
    pub book: Option<String>,
    pub pages: usize,
    pub offset: Option<i64>,
    pub error: Option<String>,
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let config = Arc::new(Config::load(global.config.as_deref())?);

    let tasks = app.paths.into_iter().map(|path| {
        let config = Arc::clone(&config);
        tokio::task::spawn_blocking(move || report(path, &config))
    });
    let reports = join_all(tasks)
        .await
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    if app.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    let mut table = crate::prelude::new_table();
    table.add_row(row!["File".bold(), "Book".bold(), "Pages".bold(), "Offset".bold()]);
    for report in &reports {
        let book = match &report.book {
            Some(code) => code.green().to_string(),
            None => "unknown".yellow().to_string(),
        };
        let offset = match (&report.offset, &report.error) {
            (Some(offset), _) => offset.to_string(),
            (None, Some(error)) => error.red().to_string(),
            (None, None) => "-".dimmed().to_string(),
        };
        table.add_row(row![report.path.display(), book, report.pages, offset]);
    }
    table.printstd();

    Ok(())
}

/// Identification and offset of one document. Failures end up in `error`.
fn report(path: PathBuf, config: &Config) -> OffsetReport {
    let mut report = OffsetReport {
        path,
        book: None,
        pages: 0,
        offset: None,
        error: None,
    };

    let document = match open_document(&report.path) {
        Ok(document) => document,
        Err(err) => {
            report.error = Some(f!("{err:#}"));
            return report;
        }
    };
    report.pages = document.page_count();

    match identify_book(&document, &config.style, &config.books) {
        Ok(book) => report.book = book,
        Err(err) => {
            report.error = Some(err.to_string());
            return report;
        }
    }

    match resolve_page_offset(&document, &config.scan) {
        Ok(offset) => report.offset = Some(offset),
        Err(err) => report.error = Some(err.to_string()),
    }

    report
}
