//! Card settlement (liquidación) statement parser (text)
//!
//! Works on any issuer: Cabal, Visa, Mastercard, Maestro, Fiserv.
//! Expected rows after PDF-to-text look like:
//!   ARANCEL                                         1.234,56
//!   IVA 21,00% S/ARANC                                259,26
//!   L.25063 S/DTO F.OTOR 10,50%                        52,50
//!   RETENCION IIBB                                   1.000,00-
//!
//! Anything that does not end in an amount is skipped.

use anyhow::Result;
use regex::Regex;
use sumatoria_core::{AMOUNT_PATTERN, StatementLine, parse_amount_or_zero};

/// Parse extracted statement text into `(label, amount)` lines, in order.
pub fn parse_settlement_text(text: &str) -> Result<Vec<StatementLine>> {
    let row_re = Regex::new(&format!(
        r"^(?P<label>.+?)\s+(?P<amount>{AMOUNT_PATTERN})\s*$"
    ))?;
    let ws_re = Regex::new(r"\s+")?;

    let mut out = Vec::new();

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let Some(caps) = row_re.captures(line) else {
            continue;
        };

        let label = clean_label(&caps["label"]);
        if label.is_empty() {
            continue;
        }

        out.push(StatementLine {
            label: ws_re.replace_all(&label, " ").into_owned(),
            amount: parse_amount_or_zero(&caps["amount"]),
        });
    }

    Ok(out)
}

/// Trailing dot leaders and dashes go; a leading `-` is part of the concept.
fn clean_label(raw: &str) -> String {
    raw.trim_start()
        .trim_end_matches([' ', '.', '-', '—', '\t'])
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parses_basic_rows() {
        let text = r#"
LIQUIDACION VISA N° 0001234
FECHA DE PAGO 15/10/2025
ARANCEL                                         1.234,56
IVA 21,00% S/ARANC                                259,26
L.25063 S/DTO F.OTOR 10,50%                        52,50
RETENCION IIBB                                   1.000,00-
"#;

        let lines = parse_settlement_text(text).unwrap();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], StatementLine::new("ARANCEL", dec!(1234.56)));
        assert_eq!(lines[1].label, "IVA 21,00% S/ARANC");
        assert_eq!(lines[2].amount, dec!(52.50));
        assert_eq!(lines[3].amount, dec!(-1000.00));
    }

    #[test]
    fn test_keeps_leading_dash_and_trims_leaders() {
        let text = "-IVA (21% en Débitos al Comercio)        150,00\nCARGO TERMINAL FISERV ......  1.500,00";
        let lines = parse_settlement_text(text).unwrap();
        assert_eq!(lines[0].label, "-IVA (21% en Débitos al Comercio)");
        assert_eq!(lines[1].label, "CARGO TERMINAL FISERV");
        assert_eq!(lines[1].amount, dec!(1500.00));
    }

    #[test]
    fn test_label_whitespace_is_collapsed() {
        let lines = parse_settlement_text("PERCEPCION   IVA  RG 2408   3,00%    12,00").unwrap();
        assert_eq!(lines[0].label, "PERCEPCION IVA RG 2408 3,00%");
        assert_eq!(lines[0].amount, dec!(12.00));
    }

    #[test]
    fn test_skips_lines_without_amounts() {
        let text = "TOTAL A COBRAR\n   \n1.234,56\nNRO. COMERCIO 12345678";
        let lines = parse_settlement_text(text).unwrap();
        assert!(lines.is_empty());
    }
}
