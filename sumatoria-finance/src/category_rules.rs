//! Deterministic label rules mapping settlement concepts to summary
//! categories.
//!
//! The table is an ordered list of `(pattern, target, match kind)` rules.
//! Patterns are written the way they appear on statements, percentage
//! included when the percentage is what tells two concepts apart
//! (`PERCEPCION IVA RG 2408 3,00%` vs `... 1,50%`). A rule whose pattern has
//! no percentage matches whether or not the statement prints one, so
//! `S/ARANC` catches `IVA 21,00% S/ARANC` as well as a bare `S/ARANC`.
//!
//! Rules come in two tiers. Primary rules are tried first, in order;
//! fallback rules (the catch-all `IVA ... 21%` kind) only see labels no
//! primary rule claimed. Within a tier, rules for different targets whose
//! texts nest inside one another are rejected by [`RuleTable::new`].

use anyhow::{Result, bail};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use sumatoria_core::{Category, VatRate, normalize_label, percentages, strip_percentages};
use tracing::debug;

/// Literal concept that never reaches the listing or the totals.
pub const SUPPRESSED_PATTERN: &str = "-IVA (21% en Débitos al Comercio)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    /// Label (percentages stripped) equals the pattern text
    Exact,
    /// Label (percentages stripped) contains the pattern text
    #[default]
    Contains,
}

/// What a rule feeds: a category total, or a printed net base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Category(Category),
    /// `BASE NETO` lines; shown next to the VAT rows, never summed into the total
    NetBase(VatRate),
}

impl Target {
    pub fn key(&self) -> &'static str {
        match self {
            Target::Category(c) => c.key(),
            Target::NetBase(VatRate::General) => "net-base-21",
            Target::NetBase(VatRate::Reduced) => "net-base-10.5",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Target::Category(c) => c.label(),
            Target::NetBase(rate) => rate.net_base_label(),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Target {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "net-base-21" => Ok(Target::NetBase(VatRate::General)),
            "net-base-10.5" => Ok(Target::NetBase(VatRate::Reduced)),
            other => Ok(Target::Category(other.parse()?)),
        }
    }
}

/// A statement label prepared for matching.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedLabel {
    text: String,
    rates: Vec<Decimal>,
}

impl PreparedLabel {
    pub fn new(raw: &str) -> Self {
        let normalized = normalize_label(raw);
        Self {
            rates: percentages(&normalized),
            text: strip_percentages(&normalized),
        }
    }
}

/// One entry of the rule table
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pattern: String,
    kind: MatchKind,
    target: Target,
    base: String,
    rate: Option<Decimal>,
    fallback: bool,
}

impl Rule {
    pub fn new(pattern: &str, kind: MatchKind, target: Target) -> Result<Self> {
        let normalized = normalize_label(pattern);
        let rates = percentages(&normalized);
        let base = strip_percentages(&normalized);

        if base.is_empty() {
            bail!("rule pattern {pattern:?} has no text besides percentages");
        }
        if rates.len() > 1 {
            bail!("rule pattern {pattern:?} carries more than one percentage");
        }

        Ok(Self {
            pattern: pattern.to_string(),
            kind,
            target,
            base,
            rate: rates.first().copied(),
            fallback: false,
        })
    }

    /// Move the rule to the fallback tier.
    pub fn into_fallback(mut self) -> Self {
        self.fallback = true;
        self
    }

    pub fn contains(pattern: &str, target: Target) -> Result<Self> {
        Self::new(pattern, MatchKind::Contains, target)
    }

    pub fn exact(pattern: &str, target: Target) -> Result<Self> {
        Self::new(pattern, MatchKind::Exact, target)
    }

    /// Pattern as authored
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn kind(&self) -> MatchKind {
        self.kind
    }

    pub fn target(&self) -> Target {
        self.target
    }

    /// Percentage the label must carry, if any
    pub fn rate(&self) -> Option<Decimal> {
        self.rate
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    pub fn matches(&self, label: &PreparedLabel) -> bool {
        let text_ok = match self.kind {
            MatchKind::Exact => label.text == self.base,
            MatchKind::Contains => label.text.contains(&self.base),
        };
        text_ok && self.rate.is_none_or(|r| label.rates.contains(&r))
    }

    /// True if some label could satisfy both rules.
    fn overlaps(&self, other: &Rule) -> bool {
        let texts = match (self.kind, other.kind) {
            (MatchKind::Contains, MatchKind::Contains) => {
                self.base.contains(&other.base) || other.base.contains(&self.base)
            }
            (MatchKind::Exact, MatchKind::Contains) => self.base.contains(&other.base),
            (MatchKind::Contains, MatchKind::Exact) => other.base.contains(&self.base),
            (MatchKind::Exact, MatchKind::Exact) => self.base == other.base,
        };
        let rates = match (self.rate, other.rate) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        };
        texts && rates
    }
}

const fn cat(c: Category) -> Target {
    Target::Category(c)
}

/// Built-in table for Argentine card settlements.
const BUILTIN_RULES: &[(&str, MatchKind, Target)] = &[
    // IVA 21%
    ("S/ARANC", MatchKind::Contains, cat(Category::Vat21)),
    ("IVA RI SERV.OPER. INT", MatchKind::Contains, cat(Category::Vat21)),
    ("IVA RI SIST CUOTAS", MatchKind::Contains, cat(Category::Vat21)),
    // IVA 10,5% (Ley 25.063, financial discount)
    ("L.25063 S/DTO F.OTOR 10,50%", MatchKind::Contains, cat(Category::Vat10_5)),
    // Percepciones RG 2408
    ("PERCEPCION IVA RG 2408 3,00%", MatchKind::Contains, cat(Category::VatPerception3)),
    ("PERCEPCION IVA RG 2408 1,50%", MatchKind::Contains, cat(Category::VatPerception1_5)),
    ("QR PERCEPCION IVA 3337", MatchKind::Contains, cat(Category::OtherVatPerception)),
    ("CARGO TERMINAL FISERV", MatchKind::Contains, cat(Category::ExemptExpenses)),
    // Retenciones
    ("RETENCION INGRESOS BRUTOS", MatchKind::Contains, cat(Category::IibbWithholding)),
    ("RETENCION ING. BRUTOS", MatchKind::Contains, cat(Category::IibbWithholding)),
    ("RETENCION IIBB", MatchKind::Contains, cat(Category::IibbWithholding)),
    ("RETENCION IBB", MatchKind::Contains, cat(Category::IibbWithholding)),
    ("RETENCIONES INGRESOS BRUTOS", MatchKind::Contains, cat(Category::IibbWithholding)),
    ("RETENCIONES ING. BRUTOS", MatchKind::Contains, cat(Category::IibbWithholding)),
    ("RETENCIONES IIBB", MatchKind::Contains, cat(Category::IibbWithholding)),
    ("RETENCIONES IBB", MatchKind::Contains, cat(Category::IibbWithholding)),
    ("RETENCION IVA", MatchKind::Contains, cat(Category::VatWithholding)),
    ("RETENCIONES IVA", MatchKind::Contains, cat(Category::VatWithholding)),
    ("RETENCION GANANCIAS", MatchKind::Contains, cat(Category::IncomeTaxWithholding)),
    ("RETENCIONES GANANCIAS", MatchKind::Contains, cat(Category::IncomeTaxWithholding)),
    ("RETENCION IMP. GANANCIAS", MatchKind::Contains, cat(Category::IncomeTaxWithholding)),
    // Printed net bases
    ("BASE NETO 21%", MatchKind::Contains, Target::NetBase(VatRate::General)),
    ("BASE NETO 10,5%", MatchKind::Contains, Target::NetBase(VatRate::Reduced)),
];

/// Any other VAT line carrying the rate, e.g. `IVA 21,00% S/COSTO FINANCIERO`.
const BUILTIN_FALLBACK_RULES: &[(&str, Target)] = &[
    ("IVA 21%", cat(Category::Vat21)),
    ("IVA 10,5%", cat(Category::Vat10_5)),
];

/// The built-in rules, primary tier first.
pub fn builtin_rules() -> Result<Vec<Rule>> {
    let primary = BUILTIN_RULES
        .iter()
        .map(|(pattern, kind, target)| Rule::new(pattern, *kind, *target));
    let fallback = BUILTIN_FALLBACK_RULES
        .iter()
        .map(|(pattern, target)| Rule::contains(pattern, *target).map(Rule::into_fallback));
    primary.chain(fallback).collect()
}

/// Ordered, validated rule table. Built once, read-only afterwards.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    /// Build a table, rejecting same-tier rules for different targets
    /// where one rule's text sits inside the other's (`RETENCION` vs
    /// `RETENCION IVA`).
    ///
    /// Unrelated `Contains` texts can still meet on one label
    /// (`RETENCION IVA S/ARANC`); there the earlier rule wins, so a label
    /// is still counted under one category only.
    pub fn new(rules: Vec<Rule>) -> Result<Self> {
        for (i, a) in rules.iter().enumerate() {
            for b in &rules[i + 1..] {
                if a.fallback == b.fallback && a.target != b.target && a.overlaps(b) {
                    bail!(
                        "rules overlap: {:?} ({}) and {:?} ({}) can match the same line",
                        a.pattern,
                        a.target,
                        b.pattern,
                        b.target
                    );
                }
            }
        }
        Ok(Self { rules })
    }

    pub fn builtin() -> Result<Self> {
        Self::new(builtin_rules()?)
    }

    /// First rule matching the label, if any.
    pub fn classify(&self, label: &str) -> Option<&Rule> {
        let prepared = PreparedLabel::new(label);
        let hit = self
            .rules
            .iter()
            .find(|r| !r.fallback && r.matches(&prepared))
            .or_else(|| self.rules.iter().find(|r| r.fallback && r.matches(&prepared)));
        if let Some(rule) = hit {
            debug!(label, rule = rule.pattern(), target = %rule.target(), "matched");
        }
        hit
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Concepts dropped before matching. Comparison is exact on the
/// normalized label (case, accents and spacing do not matter).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suppression {
    patterns: Vec<String>,
}

impl Suppression {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            patterns: patterns
                .into_iter()
                .map(|p| normalize_label(p.as_ref()))
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    /// Add one more suppressed literal.
    pub fn with(mut self, pattern: &str) -> Self {
        let normalized = normalize_label(pattern);
        if !normalized.is_empty() && !self.patterns.contains(&normalized) {
            self.patterns.push(normalized);
        }
        self
    }

    pub fn is_suppressed(&self, label: &str) -> bool {
        let normalized = normalize_label(label);
        self.patterns.iter().any(|p| *p == normalized)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl Default for Suppression {
    fn default() -> Self {
        Self::new([SUPPRESSED_PATTERN])
    }
}
