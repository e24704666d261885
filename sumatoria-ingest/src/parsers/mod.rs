//! Statement-text parsers.

pub mod settlement;

pub use settlement::parse_settlement_text;
