use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use sumatoria_finance::{
    Classifier, MatchKind, Rule, RuleTable, Suppression, Target, builtin_rules,
};

use crate::state::{ensure_sumatoria_home, sumatoria_home};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Use only `[[rules]]` from this file, dropping the built-in table
    pub replace_builtin_rules: bool,
    /// Extra concepts to drop, on top of the built-in one
    pub suppress: Vec<String>,
    pub report: ReportSection,
    pub rules: Vec<RuleEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportSection {
    pub output_dir: PathBuf,
    pub pdf: bool,
    pub csv: bool,
    pub net_base: bool,
    pub title: String,
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            pdf: true,
            csv: true,
            net_base: false,
            title: "Resumen de importes".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuleEntry {
    pub pattern: String,
    /// Category key (`vat-21`, `iibb-withholding`, ...) or `net-base-21` / `net-base-10.5`
    pub category: String,
    #[serde(rename = "match", default)]
    pub kind: MatchKind,
    /// Only consulted when no regular rule matches
    #[serde(default)]
    pub fallback: bool,
}

impl Config {
    /// Built-in rules (unless replaced) followed by the configured ones,
    /// checked for overlaps.
    pub fn rule_table(&self) -> Result<RuleTable> {
        let mut rules = if self.replace_builtin_rules {
            Vec::new()
        } else {
            builtin_rules()?
        };

        for entry in &self.rules {
            let target: Target = entry
                .category
                .parse()
                .with_context(|| format!("rule {:?}", entry.pattern))?;
            let rule = Rule::new(&entry.pattern, entry.kind, target)?;
            rules.push(if entry.fallback { rule.into_fallback() } else { rule });
        }

        RuleTable::new(rules).context("invalid rule table")
    }

    pub fn suppression(&self) -> Suppression {
        self.suppress
            .iter()
            .fold(Suppression::default(), |s, p| s.with(p))
    }

    pub fn classifier(&self) -> Result<Classifier> {
        Ok(Classifier::new(self.rule_table()?, self.suppression()))
    }
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(sumatoria_home()?.join("config.toml"))
}

/// `--config` wins; otherwise `~/.sumatoria/config.toml`.
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(p) => Ok(p.to_path_buf()),
        None => default_config_path(),
    }
}

/// A missing file means defaults.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

/// Config for a command: a `--config` path must exist, the default one
/// may be absent.
pub fn load_effective_config(explicit: Option<&Path>) -> Result<(PathBuf, Config)> {
    let path = resolve_config_path(explicit)?;
    if explicit.is_some() && !path.exists() {
        bail!("config file not found: {}", path.display());
    }
    let cfg = load_config(&path)?;
    Ok((path, cfg))
}

pub fn save_config(path: &Path, cfg: &Config) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config(explicit: Option<&Path>) -> Result<()> {
    let p = match explicit {
        Some(p) => p.to_path_buf(),
        None => ensure_sumatoria_home()?.join("config.toml"),
    };
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&p, &Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sumatoria_core::Category;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(cfg.report.pdf);
        assert!(!cfg.report.net_base);
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("typo.toml");
        let err = load_effective_config(Some(&missing)).unwrap_err();
        assert!(err.to_string().contains("config file not found"));

        let present = dir.path().join("config.toml");
        save_config(&present, &Config::default()).unwrap();
        let (path, cfg) = load_effective_config(Some(&present)).unwrap();
        assert_eq!(path, present);
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn test_fallback_entry() {
        let cfg: Config = toml::from_str(
            r#"
[[rules]]
pattern = "IVA 27%"
category = "vat-21"
fallback = true
"#,
        )
        .unwrap();
        let table = cfg.rule_table().unwrap();
        let hit = table.classify("IVA 27% S/SERVICIO").unwrap();
        assert!(hit.is_fallback());
        assert_eq!(hit.target(), Target::Category(Category::Vat21));
    }

    #[test]
    fn test_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.suppress.push("TOTAL DESCUENTOS".to_string());
        cfg.rules.push(RuleEntry {
            pattern: "RETENCION SIRTAC".to_string(),
            category: "iibb-withholding".to_string(),
            kind: MatchKind::Contains,
            fallback: false,
        });
        save_config(&path, &cfg).unwrap();
        assert_eq!(load_config(&path).unwrap(), cfg);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let cfg: Config = toml::from_str(
            r#"
[report]
net_base = true

[[rules]]
pattern = "DEB. IVA 21%"
category = "vat-21"
match = "exact"
"#,
        )
        .unwrap();
        assert!(cfg.report.net_base);
        assert!(cfg.report.csv);
        assert_eq!(cfg.rules[0].kind, MatchKind::Exact);
    }

    #[test]
    fn test_extra_rules_extend_builtin_table() {
        let mut cfg = Config::default();
        cfg.rules.push(RuleEntry {
            pattern: "RETENCION SIRTAC".to_string(),
            category: "iibb-withholding".to_string(),
            kind: MatchKind::Contains,
            fallback: false,
        });
        let table = cfg.rule_table().unwrap();
        assert_eq!(table.len(), builtin_rules().unwrap().len() + 1);
        let hit = table.classify("RETENCION SIRTAC CORDOBA").unwrap();
        assert_eq!(hit.target(), Target::Category(Category::IibbWithholding));
    }

    #[test]
    fn test_overlapping_extra_rule_is_rejected() {
        let mut cfg = Config::default();
        cfg.rules.push(RuleEntry {
            pattern: "RETENCION".to_string(),
            category: "vat-withholding".to_string(),
            kind: MatchKind::Contains,
            fallback: false,
        });
        let err = cfg.rule_table().unwrap_err();
        assert!(format!("{err:#}").contains("rules overlap"));
    }

    #[test]
    fn test_unknown_category_is_an_error() {
        let mut cfg = Config::default();
        cfg.replace_builtin_rules = true;
        cfg.rules.push(RuleEntry {
            pattern: "X".to_string(),
            category: "vat-27".to_string(),
            kind: MatchKind::Contains,
            fallback: false,
        });
        assert!(cfg.rule_table().is_err());
    }

    #[test]
    fn test_extra_suppression() {
        let mut cfg = Config::default();
        cfg.suppress.push("Total Descuentos".to_string());
        let s = cfg.suppression();
        assert!(s.is_suppressed("TOTAL DESCUENTOS"));
        assert!(s.is_suppressed("-IVA (21% en Débitos al Comercio)"));
    }
}
