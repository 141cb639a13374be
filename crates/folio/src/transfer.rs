//! Import/export gateway.
//!
//! Translates between the live document and a portable JSON file. Export is
//! human-readable (2-space indentation) and deterministic for an unchanged
//! document; import accepts any valid JSON shaped loosely like a portfolio
//! document (absent fields default, see [`crate::document`]).

use std::path::Path;

use tracing::info;

use crate::document::PortfolioDocument;
use crate::error::{Error, Result};

/// Default name for exported files.
pub const EXPORT_FILE_NAME: &str = "portfolio.json";

/// Serialize the document to pretty-printed JSON text.
///
/// # Errors
///
/// Returns an error if serialization fails, which would indicate a bug in
/// the document model (it holds no non-serializable values).
pub fn export_json(document: &PortfolioDocument) -> Result<String> {
    Ok(serde_json::to_string_pretty(document)?)
}

/// Write the document to a file as pretty-printed UTF-8 JSON.
///
/// # Errors
///
/// Returns an error if serialization or the file write fails.
pub fn export_to_file(document: &PortfolioDocument, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let json = export_json(document)?;
    std::fs::write(path, json)?;
    info!("exported document to {}", path.display());
    Ok(())
}

/// Parse JSON text into a document.
///
/// # Errors
///
/// Fails with [`Error::Parse`] if the text is not valid JSON. No schema
/// validation beyond that is performed.
pub fn import_json(text: &str) -> Result<PortfolioDocument> {
    serde_json::from_str(text).map_err(|err| Error::parse(err.to_string()))
}

/// Read and parse a JSON file into a document.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be read, or [`Error::Parse`] if
/// its contents are not valid JSON.
pub fn import_from_file(path: impl AsRef<Path>) -> Result<PortfolioDocument> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let document = import_json(&text)?;
    info!("imported document from {}", path.display());
    Ok(document)
}
