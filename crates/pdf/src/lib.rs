//! PDF text reconstruction.
//!
//! Decodes a PDF with `lopdf`, extracts positioned text runs per page and
//! rebuilds human-readable text purely from their geometry. See
//! [`layout`] for the reconstruction rules.

use thiserror::Error;

use parser::backend::LopdfBackend;

pub mod layout;
pub mod parser;
pub mod types;

pub use layout::{reconstruct, reconstruct_page, LayoutConfig};
pub use types::*;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("PDF parsing error: {0}")]
    Parse(String),
    #[error("Document is encrypted")]
    Encrypted,
}

/// Decode PDF bytes into per-page text items, in document order.
pub fn extract_items(bytes: &[u8]) -> Result<Vec<Vec<PositionedTextItem>>, PdfError> {
    let backend = LopdfBackend::load_bytes(bytes)?;
    parser::extract::extract_document_items(&backend)
}

/// Decode PDF bytes and reconstruct the document text.
pub fn extract_text(bytes: &[u8], config: &LayoutConfig) -> Result<String, PdfError> {
    let pages = extract_items(bytes)?;
    Ok(reconstruct(&pages, config))
}

/// Read document metadata without extracting any text.
pub fn info(bytes: &[u8]) -> Result<DocumentMetadata, PdfError> {
    let backend = LopdfBackend::load_bytes(bytes)?;
    let raw = backend.metadata();
    Ok(DocumentMetadata {
        title: raw.get("Title").cloned(),
        author: raw.get("Author").cloned(),
        page_count: backend.page_count(),
        creator: raw.get("Creator").cloned(),
    })
}
