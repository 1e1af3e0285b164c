use std::path::{Path, PathBuf};

use pdf::LayoutConfig;

use crate::config::Config;
use crate::prelude::{eprintln, println, *};

#[derive(Debug, clap::Args)]
pub struct Options {
    /// Path to the PDF file
    pub path: PathBuf,

    /// Print the positioned text items per page as JSON instead
    #[arg(long)]
    pub items: bool,
}

pub async fn run(options: Options, global: crate::Global, config: Config) -> Result<()> {
    let bytes = read_pdf(&options.path)?;

    if global.verbose {
        let meta = pdf::info(&bytes).with_context(|| f!("Failed to read {}", options.path.display()))?;
        eprintln!("Title: {}", meta.title.as_deref().unwrap_or("-"));
        eprintln!("Author: {}", meta.author.as_deref().unwrap_or("-"));
        eprintln!("Creator: {}", meta.creator.as_deref().unwrap_or("-"));
        eprintln!("Pages: {}", meta.page_count);
    }

    if options.items {
        let pages = pdf::extract_items(&bytes)
            .with_context(|| f!("Failed to extract {}", options.path.display()))?;
        println!("{}", serde_json::to_string_pretty(&pages)?);
        return Ok(());
    }

    let text = reconstruct(&bytes, &options.path, &config.layout)?;
    println!("{}", text);
    Ok(())
}

pub fn read_pdf(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| f!("Failed to read {}", path.display()))
}

pub fn reconstruct(bytes: &[u8], path: &Path, layout: &LayoutConfig) -> Result<String> {
    let text = pdf::extract_text(bytes, layout)
        .with_context(|| f!("Failed to extract text from {}", path.display()))?;
    log::info!("reconstructed {} characters from {}", text.chars().count(), path.display());
    Ok(text)
}

/// Read and reconstruct the PDF at `path`.
pub fn read_document(path: &Path, layout: &LayoutConfig) -> Result<String> {
    let bytes = read_pdf(path)?;
    reconstruct(&bytes, path, layout)
}
