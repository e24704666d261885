use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../fixtures")
        .join(name)
}

/// `sumatoria` with HOME pointed at a scratch dir so no real config leaks in.
fn sumatoria(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("sumatoria").unwrap();
    cmd.env("HOME", home.path()).env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_commands() {
    let home = TempDir::new().unwrap();
    sumatoria(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("process"))
        .stdout(predicate::str::contains("rules"));
}

#[test]
fn version_flag() {
    let home = TempDir::new().unwrap();
    sumatoria(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sumatoria"));
}

#[test]
fn process_writes_all_reports() {
    let home = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    sumatoria(&home)
        .arg("process")
        .arg(fixture("liquidacion_visa.txt"))
        .arg(fixture("liquidacion_fiserv.txt"))
        .arg("--out-dir")
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("TOTAL GENERAL"))
        .stdout(predicate::str::contains("10.270,21"))
        .stdout(predicate::str::contains("informe_sumatoria.pdf"));

    let pdf = fs::read(out.path().join("informe_sumatoria.pdf")).unwrap();
    assert!(pdf.starts_with(b"%PDF"));

    let summary = fs::read_to_string(out.path().join("resumen_importes.csv")).unwrap();
    assert!(summary.contains("TOTAL GENERAL,10270.21"));
    assert!(out.path().join("detalle_movimientos.csv").exists());
}

#[test]
fn process_without_reports_only_prints() {
    let home = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    sumatoria(&home)
        .arg("process")
        .arg(fixture("liquidacion_visa.txt"))
        .args(["--no-pdf", "--no-csv", "--detail", "--net-base"])
        .arg("--out-dir")
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("6.737,41"))
        .stdout(predicate::str::contains("Base Neto 21%"))
        .stdout(predicate::str::contains("Detalle de movimientos"));

    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
}

#[test]
fn process_requires_files() {
    let home = TempDir::new().unwrap();
    sumatoria(&home)
        .arg("process")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no input files"));
}

#[test]
fn broken_pdf_is_reported() {
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();
    let bad = dir.path().join("roto.pdf");
    fs::write(&bad, b"%PDF-1.4\nnot really a pdf").unwrap();

    sumatoria(&home)
        .arg("process")
        .arg(&bad)
        .arg("--out-dir")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not process file"));
}

#[test]
fn rules_lists_builtin_table() {
    let home = TempDir::new().unwrap();
    sumatoria(&home)
        .arg("rules")
        .assert()
        .success()
        .stdout(predicate::str::contains("S/ARANC"))
        .stdout(predicate::str::contains("Retenciones Ganancias"));
}

#[test]
fn overlapping_config_rule_is_rejected() {
    let home = TempDir::new().unwrap();
    let cfg = home.path().join("custom.toml");
    fs::write(
        &cfg,
        r#"
[[rules]]
pattern = "RETENCION"
category = "vat-withholding"
"#,
    )
    .unwrap();

    sumatoria(&home)
        .arg("rules")
        .arg("--config")
        .arg(&cfg)
        .assert()
        .failure()
        .stderr(predicate::str::contains("rules overlap"));
}

#[test]
fn config_init_then_show() {
    let home = TempDir::new().unwrap();

    sumatoria(&home)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));

    let path = home.path().join(".sumatoria/config.toml");
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("net_base = false"));

    sumatoria(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Resumen de importes"));
}

#[test]
fn missing_explicit_config_is_an_error() {
    let home = TempDir::new().unwrap();
    let typo = home.path().join("confg.toml");

    sumatoria(&home)
        .arg("process")
        .arg(fixture("liquidacion_visa.txt"))
        .arg("--no-pdf")
        .arg("--no-csv")
        .arg("--config")
        .arg(&typo)
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}
