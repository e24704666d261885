//! Argentine-format amounts: `.` groups thousands, `,` separates decimals.
//!
//! Statements print the sign in several ways: `-1.234,56`, `−1.234,56`,
//! `1.234,56-`, sometimes with a `$` in front.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Regex fragment matching one amount token as printed on a settlement.
pub const AMOUNT_PATTERN: &str = r"[-−]?\s?\$?\s?\d{1,3}(?:\.\d{3})*,\d{2}-?";

/// Parse an amount like `1.234,56` into a `Decimal`.
///
/// Returns `None` when the text is not a number; callers treat that as zero.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    let mut negative = false;
    let mut body = s;
    if let Some(rest) = body.strip_prefix('-').or_else(|| body.strip_prefix('−')) {
        negative = true;
        body = rest;
    }
    if let Some(rest) = body.strip_suffix('-') {
        negative = !negative;
        body = rest;
    }

    let digits: String = body
        .chars()
        .filter(|c| !matches!(c, '$' | ' ' | '.'))
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }

    let value = Decimal::from_str(&digits).ok()?;
    Some(if negative { -value } else { value })
}

/// Like [`parse_amount`], but a missing or broken amount counts as zero.
pub fn parse_amount_or_zero(raw: &str) -> Decimal {
    parse_amount(raw).unwrap_or(Decimal::ZERO)
}

/// Format with two decimals in Argentine style: `-1.234,56`.
pub fn format_amount(value: Decimal) -> String {
    let rounded = value.round_dp(2);
    let fixed = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{sign}{grouped},{frac_part}")
}
