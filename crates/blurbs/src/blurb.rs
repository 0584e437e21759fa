use std::path::PathBuf;

use blurbs_core::{extract_blurb, EntryRequest, ExtractedRecord};
use colored::Colorize;

use crate::config::Config;
use crate::library::open_document;
use crate::prelude::{println, *};

#[derive(Debug, clap::Parser)]
#[command(name = "blurb")]
#[command(about = "Extract a single blurb from a physical page")]
pub struct App {
    /// Path to the PDF file
    pub path: PathBuf,

    /// Entry name, as it appears in the heading
    pub name: String,

    /// Item type (clan, family, school, technique, ...)
    pub item_type: String,

    /// 0-based physical page index
    pub page: usize,

    /// Ignore a property label prefix, with its value (repeatable)
    #[arg(long = "ignore", value_name = "PREFIX")]
    pub ignore: Vec<String>,

    /// Drop everything before the first bulleted effect
    #[arg(long)]
    pub cut_to_list: bool,

    /// The entry opens with a property list
    #[arg(long)]
    pub beginning_properties: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let config = Config::load(global.config.as_deref())?;

    let json = app.json;
    let record = tokio::task::spawn_blocking(move || extract(&app, &config)).await??;

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        println!(
            "{} {}",
            record.name.bold().cyan(),
            f!("({} p. {})", record.item_type, record.page).dimmed()
        );
        println!("{}", record.text);
    }

    Ok(())
}

/// Configured policy for the item type, extended by the command-line flags.
fn extract(app: &App, config: &Config) -> Result<ExtractedRecord> {
    let mut policy = config.policies.get(&app.item_type);
    policy.ignored_properties.extend(app.ignore.iter().cloned());
    policy.cut_to_list |= app.cut_to_list;
    policy.beginning_properties |= app.beginning_properties;
    log::debug!("policy for {}: {:?}", app.item_type, policy);

    let document = open_document(&app.path)?;
    let book = app.path.display().to_string();
    let request = EntryRequest {
        name: &app.name,
        search_name: &app.name,
        item_type: &app.item_type,
        book: &book,
        page: app.page,
        policy: &policy,
    };
    Ok(extract_blurb(&document, &config.style, &request)?)
}
