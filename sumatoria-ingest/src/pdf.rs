//! Loading statement documents from disk.
//!
//! PDFs go through `pdf-extract`; anything else is taken as text that was
//! already extracted (handy for statements exported as `.txt`).

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::parsers::settlement::parse_settlement_text;
use crate::types::{DocumentKind, StatementDocument};

/// Extract the text layer of an in-memory PDF.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String> {
    let text = pdf_extract::extract_text_from_mem(bytes).context("pdf text extraction failed")?;
    Ok(text)
}

fn detect_kind(path: &Path, bytes: &[u8]) -> DocumentKind {
    let is_pdf_ext = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));

    if bytes.starts_with(b"%PDF") || is_pdf_ext {
        DocumentKind::Pdf
    } else {
        DocumentKind::Text
    }
}

/// Read one statement and parse its line items.
///
/// Any failure reading or extracting the file surfaces as a single
/// `could not process file` error with the cause chained underneath.
pub fn load_document(path: impl AsRef<Path>) -> Result<StatementDocument> {
    let path = path.as_ref();
    load(path).with_context(|| format!("could not process file {}", path.display()))
}

fn load(path: &Path) -> Result<StatementDocument> {
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let kind = detect_kind(path, &bytes);

    let text = match kind {
        DocumentKind::Pdf => extract_pdf_text(&bytes)?,
        DocumentKind::Text => String::from_utf8_lossy(&bytes).into_owned(),
    };

    let lines = parse_settlement_text(&text)?;
    if lines.is_empty() {
        warn!(file = %path.display(), "no line items found");
    } else {
        info!(file = %path.display(), ?kind, lines = lines.len(), "parsed statement");
    }

    Ok(StatementDocument {
        source: path.display().to_string(),
        kind,
        lines,
    })
}

/// Load several statements, keeping input order.
pub fn load_documents<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<StatementDocument>> {
    paths.iter().map(load_document).collect()
}
