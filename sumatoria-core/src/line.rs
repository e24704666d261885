//! Statement line items as extracted from settlement text

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One `(label, amount)` pair read from a settlement statement.
///
/// Lines only live for one processing pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatementLine {
    /// Concept text as printed, whitespace collapsed
    pub label: String,
    /// Signed amount; a missing amount is stored as zero
    pub amount: Decimal,
}

impl StatementLine {
    pub fn new(label: impl Into<String>, amount: Decimal) -> Self {
        Self {
            label: label.into(),
            amount,
        }
    }
}
