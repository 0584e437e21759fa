use crate::prelude::*;
use clap::Parser;

mod blocks;
mod blurb;
mod config;
mod error;
mod library;
mod offset;
mod prelude;
mod scrape;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Extract catalog blurbs from styled rulebook PDFs"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Configuration file (TOML); the embedded default is used when omitted
    #[clap(long, env = "BLURBS_CONFIG", global = true)]
    config: Option<std::path::PathBuf>,

    /// Whether to display additional information.
    #[clap(long, env = "BLURBS_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Extract every catalog blurb into the user-descriptions file
    Scrape(crate::scrape::App),

    /// Extract a single blurb from a page
    Blurb(crate::blurb::App),

    /// Show the condensed blocks of a page
    Blocks(crate::blocks::App),

    /// Identify documents and resolve their page offsets
    Offset(crate::offset::App),
}

#[tokio::main]
async fn main() -> Result<()> {
    let app = App::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if app.global.verbose && std::env::var_os("RUST_LOG").is_none() {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();
    color_eyre::install()?;

    match app.command {
        SubCommands::Scrape(sub_app) => crate::scrape::run(sub_app, app.global).await,
        SubCommands::Blurb(sub_app) => crate::blurb::run(sub_app, app.global).await,
        SubCommands::Blocks(sub_app) => crate::blocks::run(sub_app, app.global).await,
        SubCommands::Offset(sub_app) => crate::offset::run(sub_app, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
