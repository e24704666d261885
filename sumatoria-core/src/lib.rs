//! sumatoria-core: domain types for settlement-statement summaries

pub mod amount;
pub mod category;
pub mod line;
pub mod text;

pub use amount::{AMOUNT_PATTERN, format_amount, parse_amount, parse_amount_or_zero};
pub use category::{Category, VatRate};
pub use line::StatementLine;
pub use text::{normalize_label, percentages, strip_percentages};
