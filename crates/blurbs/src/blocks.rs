use std::path::PathBuf;

use blurbs_core::{condense, Classification, PageSource};
use colored::Colorize;
use prettytable::row;

use crate::config::Config;
use crate::library::open_document;
use crate::prelude::{println, *};

#[derive(Debug, clap::Parser)]
#[command(name = "blocks")]
#[command(about = "Show the condensed blocks of a page")]
pub struct App {
    /// Path to the PDF file
    pub path: PathBuf,

    /// 0-based physical page index
    pub page: usize,

    /// Leave out the following page
    #[arg(long)]
    pub single_page: bool,

    /// Condense as an entry that opens with a property list
    #[arg(long)]
    pub beginning_properties: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let config = Config::load(global.config.as_deref())?;

    let json = app.json;
    let blocks = tokio::task::spawn_blocking(move || -> Result<_> {
        let document = open_document(&app.path)?;
        let runs = if app.single_page {
            document.page_runs(app.page)?
        } else {
            document.spread_runs(app.page)?
        };
        Ok(condense(&runs, &config.style, app.beginning_properties))
    })
    .await??;

    if json {
        println!("{}", serde_json::to_string_pretty(&blocks)?);
        return Ok(());
    }

    let mut table = crate::prelude::new_table();
    table.add_row(row!["#".bold(), "Class".bold(), "Text".bold()]);
    for (i, block) in blocks.iter().enumerate() {
        table.add_row(row![
            i,
            colored_label(&block.classification),
            block.text.replace('\n', "\\n")
        ]);
    }
    table.printstd();

    Ok(())
}

fn colored_label(classification: &Classification) -> String {
    let label = classification.label();
    match classification {
        Classification::Heading => label.yellow().bold().to_string(),
        Classification::PropertyName => label.cyan().to_string(),
        Classification::PropertyValue => label.blue().to_string(),
        Classification::Basic => label.to_string(),
        Classification::Other { .. } => label.dimmed().to_string(),
    }
}
