//! sumatoria-ingest: statement loading (PDF/text) and the settlement line parser.

pub mod parsers;
pub mod pdf;
pub mod types;

pub use parsers::parse_settlement_text;
pub use pdf::{extract_pdf_text, load_document, load_documents};
pub use types::{DocumentKind, StatementDocument, all_lines};
