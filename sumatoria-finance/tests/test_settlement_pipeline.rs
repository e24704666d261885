use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::path::PathBuf;
use sumatoria_core::{Category, VatRate};
use sumatoria_finance::report::{self, RowKind, pdf::PdfOptions};
use sumatoria_finance::{Classifier, ReportOptions, Summary, SummaryOptions};
use sumatoria_ingest::{all_lines, load_document, load_documents};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("fixtures")
        .join(name)
}

/// Real-layout regression: one Visa settlement, text layer as extracted.
#[test]
fn test_visa_settlement_totals() {
    let doc = load_document(fixture("liquidacion_visa.txt")).unwrap();
    assert_eq!(doc.lines.len(), 11);

    let c = Classifier::builtin().unwrap().classify(&doc.lines);
    assert_eq!(c.suppressed, 1);
    assert_eq!(c.listing.len(), 10);

    let t = &c.totals;
    assert_eq!(t.get(Category::Vat21), dec!(474.01));
    assert_eq!(t.get(Category::Vat10_5), dec!(96.60));
    assert_eq!(t.get(Category::VatPerception3), dec!(3762.00));
    assert_eq!(t.get(Category::VatPerception1_5), Decimal::ZERO);
    assert_eq!(t.get(Category::IibbWithholding), dec!(1254.00));
    assert_eq!(t.get(Category::VatWithholding), dec!(900.00));
    assert_eq!(t.get(Category::IncomeTaxWithholding), dec!(250.80));
    assert_eq!(t.total_general(), dec!(6737.41));
}

/// Several statements in one run are summed together, in input order.
#[test]
fn test_multiple_settlements_aggregate() {
    let docs = load_documents(&[
        fixture("liquidacion_visa.txt"),
        fixture("liquidacion_fiserv.txt"),
    ])
    .unwrap();
    let lines = all_lines(&docs);
    assert_eq!(lines.len(), 19);
    assert_eq!(lines[0].label, "VENTAS CTDO");

    let c = Classifier::builtin().unwrap().classify(&lines);
    let t = &c.totals;
    assert_eq!(t.get(Category::Vat21), dec!(826.81));
    assert_eq!(t.get(Category::VatPerception1_5), dec!(720.00));
    assert_eq!(t.get(Category::OtherVatPerception), dec!(480.00));
    assert_eq!(t.get(Category::ExemptExpenses), dec!(1500.00));
    assert_eq!(t.get(Category::IibbWithholding), dec!(1734.00));
    assert_eq!(t.total_general(), dec!(10270.21));

    let by_hand: Decimal = t.iter().map(|(_, v)| v).sum();
    assert_eq!(t.total_general(), by_hand);

    assert_eq!(t.net_base(VatRate::General), dec!(1680.00));
    assert_eq!(t.net_base(VatRate::Reduced), dec!(920.00));
}

#[test]
fn test_report_files_from_statements() {
    let doc = load_document(fixture("liquidacion_visa.txt")).unwrap();
    let c = Classifier::builtin().unwrap().classify(&doc.lines);
    let summary = Summary::from_totals(&c.totals, SummaryOptions { net_base: true });

    let total = summary.rows.last().unwrap();
    assert_eq!(total.kind, RowKind::Total);
    assert_eq!(total.amount, dec!(6737.41));

    let dir = tempfile::tempdir().unwrap();
    let opts = ReportOptions {
        write_pdf: true,
        write_csv: true,
        pdf: PdfOptions::default(),
    };
    let written = report::write_reports(dir.path(), &summary, &c, &opts).unwrap();
    assert_eq!(written.len(), 3);

    let pdf = std::fs::read(dir.path().join(report::PDF_FILE_NAME)).unwrap();
    assert!(pdf.starts_with(b"%PDF"));

    let detail = std::fs::read_to_string(dir.path().join(report::DETAIL_CSV_FILE_NAME)).unwrap();
    assert!(!detail.contains("Débitos al Comercio"));
    assert!(detail.contains("RETENCION IVA,900.00,Retenciones IVA"));
}
