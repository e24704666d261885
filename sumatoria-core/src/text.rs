//! Label normalization shared by the rule table and the suppression list.
//!
//! Labels and rule patterns go through the same pipeline so that
//! comparisons are insensitive to case, accents and spacing, and so that
//! percentage annotations (`21,00%`) can be looked at separately from the
//! text around them.

use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::OnceLock;

fn percentage_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(^|[^\d.,])(\d{1,3}(?:[.,]\d{1,2})?)\s*%").expect("percentage regex")
    })
}

/// `R. G.`, `SERV. OPER.`: a dot followed by spacing and a letter.
fn dot_space_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\.\s+(\p{L})").expect("dot-space regex"))
}

/// Resolution prefix (`RG`, `R.G.`) glued to or spaced from its number.
fn resolution_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\bR\.?G\.?\s*(\d)").expect("resolution regex"))
}

fn ws_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("ws regex"))
}

/// Uppercase, fold accents, collapse whitespace.
///
/// Abbreviations are tightened (`SERV. OPER.` becomes `SERV.OPER.`) and
/// resolution numbers are spelled one way (`R. G. 2408`, `RG2408` and
/// `R.G. 2408` all become `RG 2408`).
pub fn normalize_label(raw: &str) -> String {
    let folded: String = raw
        .chars()
        .map(|c| match c {
            'á' | 'Á' | 'à' | 'À' => 'A',
            'é' | 'É' | 'è' | 'È' => 'E',
            'í' | 'Í' | 'ì' | 'Ì' => 'I',
            'ó' | 'Ó' | 'ò' | 'Ò' => 'O',
            'ú' | 'Ú' | 'ù' | 'Ù' | 'ü' | 'Ü' => 'U',
            '−' | '–' => '-',
            '\u{a0}' => ' ',
            other => other,
        })
        .flat_map(char::to_uppercase)
        .collect();

    let tightened = dot_space_re().replace_all(&folded, ".${1}");
    let resolutions = resolution_re().replace_all(&tightened, "RG ${1}");
    collapse_ws(&resolutions)
}

/// Every percentage annotation in the label, in order of appearance.
pub fn percentages(label: &str) -> Vec<Decimal> {
    percentage_re()
        .captures_iter(label)
        .filter_map(|caps| Decimal::from_str(&caps[2].replace(',', ".")).ok())
        .map(|d| d.normalize())
        .collect()
}

/// The label with all percentage annotations removed.
pub fn strip_percentages(label: &str) -> String {
    let stripped = percentage_re().replace_all(label, "${1}");
    collapse_ws(&stripped)
}

fn collapse_ws(s: &str) -> String {
    ws_re().replace_all(s.trim(), " ").into_owned()
}
