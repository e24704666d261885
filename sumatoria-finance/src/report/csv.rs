//! CSV exports: the summary grid and the raw line listing.
//!
//! Files start with a UTF-8 BOM so spreadsheet tools pick up the accents.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use super::Summary;
use crate::classifier::ClassifiedLine;

const BOM: &[u8] = b"\xEF\xBB\xBF";

fn plain(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}

/// `Concepto,Monto Total` for every summary row.
pub fn summary_csv<W: Write>(mut out: W, summary: &Summary) -> Result<()> {
    out.write_all(BOM)?;
    let mut wtr = ::csv::Writer::from_writer(out);
    wtr.write_record(["Concepto", "Monto Total"])?;
    for row in &summary.rows {
        wtr.write_record([row.concept.as_str(), plain(row.amount).as_str()])?;
    }
    wtr.flush()?;
    Ok(())
}

/// `Concepto,Monto Total,Categoria`; unmatched lines get an empty category.
pub fn detail_csv<W: Write>(mut out: W, listing: &[ClassifiedLine]) -> Result<()> {
    out.write_all(BOM)?;
    let mut wtr = ::csv::Writer::from_writer(out);
    wtr.write_record(["Concepto", "Monto Total", "Categoria"])?;
    for item in listing {
        let category = item.target.map(|t| t.label()).unwrap_or("");
        wtr.write_record([
            item.line.label.as_str(),
            plain(item.line.amount).as_str(),
            category,
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_summary_csv(path: &Path, summary: &Summary) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    summary_csv(file, summary).with_context(|| format!("write {}", path.display()))
}

pub fn write_detail_csv(path: &Path, listing: &[ClassifiedLine]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    detail_csv(file, listing).with_context(|| format!("write {}", path.display()))
}
