use serde::{Deserialize, Serialize};
use sumatoria_core::StatementLine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    Pdf,
    Text,
}

/// Normalized output of loading one statement (issuer-agnostic)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementDocument {
    /// Where the statement came from (file path as given)
    pub source: String,
    pub kind: DocumentKind,
    pub lines: Vec<StatementLine>,
}

/// Concatenate the lines of several documents, in input order.
pub fn all_lines(docs: &[StatementDocument]) -> Vec<StatementLine> {
    docs.iter().flat_map(|d| d.lines.iter().cloned()).collect()
}
