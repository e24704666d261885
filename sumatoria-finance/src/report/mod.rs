//! Report emitter: lays category totals out as fixed rows and writes them
//! to PDF and CSV. Nothing is computed here beyond picking rows.

pub mod csv;
pub mod pdf;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::fs;
use std::path::{Path, PathBuf};
use sumatoria_core::{Category, VatRate, format_amount};
use tracing::info;

use crate::classifier::{CategoryTotals, Classification};

pub const PDF_FILE_NAME: &str = "informe_sumatoria.pdf";
pub const SUMMARY_CSV_FILE_NAME: &str = "resumen_importes.csv";
pub const DETAIL_CSV_FILE_NAME: &str = "detalle_movimientos.csv";

pub const TOTAL_LABEL: &str = "TOTAL GENERAL";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Category(Category),
    NetBase(VatRate),
    Total,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub concept: String,
    pub amount: Decimal,
    pub kind: RowKind,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SummaryOptions {
    /// Add a net base row above each VAT row
    pub net_base: bool,
}

/// Fixed-order rows: one per category, then TOTAL GENERAL.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub rows: Vec<SummaryRow>,
}

impl Summary {
    pub fn from_totals(totals: &CategoryTotals, opts: SummaryOptions) -> Self {
        let mut rows = Vec::with_capacity(Category::ALL.len() + 3);

        for (category, amount) in totals.iter() {
            if opts.net_base {
                if let Some(rate) = category.vat_rate() {
                    rows.push(SummaryRow {
                        concept: rate.net_base_label().to_string(),
                        amount: totals.net_base(rate),
                        kind: RowKind::NetBase(rate),
                    });
                }
            }
            rows.push(SummaryRow {
                concept: category.label().to_string(),
                amount,
                kind: RowKind::Category(category),
            });
        }

        rows.push(SummaryRow {
            concept: TOTAL_LABEL.to_string(),
            amount: totals.total_general(),
            kind: RowKind::Total,
        });

        Self { rows }
    }

    pub fn total_general(&self) -> Decimal {
        self.rows
            .iter()
            .find(|r| r.kind == RowKind::Total)
            .map(|r| r.amount)
            .unwrap_or(Decimal::ZERO)
    }

    /// Plain-text table for terminals.
    pub fn render_table(&self) -> String {
        let concept_w = self
            .rows
            .iter()
            .map(|r| r.concept.chars().count())
            .max()
            .unwrap_or(0)
            .max("Concepto".len());
        let amounts: Vec<String> = self.rows.iter().map(|r| format_amount(r.amount)).collect();
        let amount_w = amounts
            .iter()
            .map(String::len)
            .max()
            .unwrap_or(0)
            .max("Monto Total".len());

        let mut out = String::new();
        out.push_str(&format!("{:<concept_w$}  {:>amount_w$}\n", "Concepto", "Monto Total"));
        out.push_str(&format!("{}\n", "-".repeat(concept_w + 2 + amount_w)));
        for (row, amount) in self.rows.iter().zip(&amounts) {
            if row.kind == RowKind::Total {
                out.push_str(&format!("{}\n", "-".repeat(concept_w + 2 + amount_w)));
            }
            let pad = concept_w - row.concept.chars().count();
            out.push_str(&format!(
                "{}{}  {:>amount_w$}\n",
                row.concept,
                " ".repeat(pad),
                amount
            ));
        }
        out
    }
}

/// Which files to write and how to title them.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub write_pdf: bool,
    pub write_csv: bool,
    pub pdf: pdf::PdfOptions,
}

/// Write the enabled report files into `out_dir`, returning their paths.
pub fn write_reports(
    out_dir: &Path,
    summary: &Summary,
    classification: &Classification,
    opts: &ReportOptions,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir).with_context(|| format!("create {}", out_dir.display()))?;
    let mut written = Vec::new();

    if opts.write_pdf {
        let path = out_dir.join(PDF_FILE_NAME);
        pdf::write_pdf(&path, summary, &opts.pdf)?;
        written.push(path);
    }

    if opts.write_csv {
        let path = out_dir.join(SUMMARY_CSV_FILE_NAME);
        csv::write_summary_csv(&path, summary)?;
        written.push(path);

        let path = out_dir.join(DETAIL_CSV_FILE_NAME);
        csv::write_detail_csv(&path, &classification.listing)?;
        written.push(path);
    }

    for path in &written {
        info!(file = %path.display(), "wrote report");
    }
    Ok(written)
}
