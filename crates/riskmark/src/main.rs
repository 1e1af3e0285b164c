use std::path::PathBuf;

use crate::prelude::*;
use clap::Parser;

mod analyze;
mod classifier;
mod config;
mod error;
mod highlight;
mod prelude;
mod render;
mod serve;
mod text;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Reconstruct insurance policy text from PDFs and highlight risky and favorable clauses"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Path to a TOML configuration file
    #[clap(long, env = "RISKMARK_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Whether to display additional information.
    #[clap(long, env = "RISKMARK_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Print the reconstructed text of a PDF
    Text(crate::text::Options),

    /// Highlight a PDF's text with a rules file
    Highlight(crate::highlight::Options),

    /// Classify a policy PDF with a language model and highlight it
    Analyze(crate::analyze::Options),

    /// Serve the HTTP API
    Serve(crate::serve::Options),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();
    let config = config::Config::load(app.global.config.as_deref())?;

    match app.command {
        SubCommands::Text(options) => crate::text::run(options, app.global, config).await,
        SubCommands::Highlight(options) => {
            crate::highlight::run(options, app.global, config).await
        }
        SubCommands::Analyze(options) => crate::analyze::run(options, app.global, config).await,
        SubCommands::Serve(options) => crate::serve::run(options, app.global, config).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
