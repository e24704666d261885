use anyhow::{Context, Result, bail};
use std::path::PathBuf;
use sumatoria_core::format_amount;
use sumatoria_finance::report::pdf::PdfOptions;
use sumatoria_finance::{ReportOptions, Summary, SummaryOptions, write_reports};
use sumatoria_ingest::{all_lines, load_documents};
use tracing::info;

use crate::config::Config;

#[derive(Debug, Clone, Default)]
pub struct ProcessArgs {
    pub files: Vec<PathBuf>,
    pub out_dir: Option<PathBuf>,
    pub no_pdf: bool,
    pub no_csv: bool,
    pub net_base: bool,
    pub detail: bool,
}

pub fn run_process(cfg: &Config, args: ProcessArgs) -> Result<()> {
    if args.files.is_empty() {
        bail!("no input files");
    }

    let classifier = cfg.classifier()?;
    let docs = load_documents(&args.files)?;
    let lines = all_lines(&docs);
    let classification = classifier.classify(&lines);

    let summary = Summary::from_totals(
        &classification.totals,
        SummaryOptions {
            net_base: args.net_base || cfg.report.net_base,
        },
    );

    println!(
        "Processed {} file(s): {} lines, {} matched, {} suppressed\n",
        docs.len(),
        lines.len(),
        classification.matched(),
        classification.suppressed
    );
    print!("{}", summary.render_table());

    if args.detail {
        println!("\nDetalle de movimientos:");
        for item in &classification.listing {
            let category = item.target.map(|t| t.label()).unwrap_or("-");
            println!(
                "  {} | {} | {}",
                item.line.label,
                format_amount(item.line.amount),
                category
            );
        }
    }

    let opts = ReportOptions {
        write_pdf: cfg.report.pdf && !args.no_pdf,
        write_csv: cfg.report.csv && !args.no_csv,
        pdf: PdfOptions {
            title: cfg.report.title.clone(),
            generated_at: Some(chrono::Local::now().naive_local()),
        },
    };
    if !opts.write_pdf && !opts.write_csv {
        info!("report files disabled");
        return Ok(());
    }

    let out_dir = args
        .out_dir
        .unwrap_or_else(|| cfg.report.output_dir.clone());
    let written = write_reports(&out_dir, &summary, &classification, &opts)
        .with_context(|| format!("writing reports to {}", out_dir.display()))?;

    println!();
    for path in written {
        println!("Wrote {}", path.display());
    }
    Ok(())
}
