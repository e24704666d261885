//! Classifier: runs statement lines through the rule table and sums the
//! amounts per category.

use anyhow::Result;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use sumatoria_core::{Category, StatementLine, VatRate};
use tracing::{info, warn};

use crate::category_rules::{RuleTable, Suppression, Target};

/// Per-category running totals, plus any printed net bases.
///
/// Every category is present from the start with a zero total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotals {
    categories: BTreeMap<Category, Decimal>,
    printed_net_base: HashMap<VatRate, Decimal>,
}

impl CategoryTotals {
    pub fn new() -> Self {
        Self {
            categories: Category::ALL.into_iter().map(|c| (c, Decimal::ZERO)).collect(),
            printed_net_base: HashMap::new(),
        }
    }

    /// Add to a running total. Totals saturate instead of overflowing.
    pub fn add(&mut self, target: Target, amount: Decimal) {
        let slot = match target {
            Target::Category(c) => self.categories.entry(c).or_insert(Decimal::ZERO),
            Target::NetBase(rate) => self.printed_net_base.entry(rate).or_default(),
        };
        *slot = accumulate(*slot, amount, target);
    }

    pub fn get(&self, category: Category) -> Decimal {
        self.categories.get(&category).copied().unwrap_or(Decimal::ZERO)
    }

    /// `(category, total)` in report display order
    pub fn iter(&self) -> impl Iterator<Item = (Category, Decimal)> + '_ {
        Category::ALL.into_iter().map(|c| (c, self.get(c)))
    }

    /// TOTAL GENERAL: the sum of every category total
    pub fn total_general(&self) -> Decimal {
        self.categories
            .values()
            .fold(Decimal::ZERO, |acc, &t| accumulate(acc, t, "total general"))
    }

    /// Net base as printed on the statements (`BASE NETO ...` lines)
    pub fn printed_net_base(&self, rate: VatRate) -> Decimal {
        self.printed_net_base.get(&rate).copied().unwrap_or(Decimal::ZERO)
    }

    /// Net base for a VAT rate: the printed figure when there is one,
    /// otherwise derived from the VAT collected at that rate.
    pub fn net_base(&self, rate: VatRate) -> Decimal {
        let printed = self.printed_net_base(rate);
        if !printed.is_zero() {
            return printed;
        }
        let vat = self.get(rate.category());
        match vat.checked_div(rate.fraction()) {
            Some(base) => base.round_dp(2),
            None => {
                warn!(?rate, %vat, "net base out of range, saturating");
                if vat.is_sign_negative() { Decimal::MIN } else { Decimal::MAX }
            }
        }
    }
}

fn accumulate(total: Decimal, amount: Decimal, what: impl std::fmt::Display) -> Decimal {
    total.checked_add(amount).unwrap_or_else(|| {
        warn!(%what, %total, %amount, "total out of range, saturating");
        total.saturating_add(amount)
    })
}

impl Default for CategoryTotals {
    fn default() -> Self {
        Self::new()
    }
}

/// A line that survived suppression, with whatever it matched
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedLine {
    pub line: StatementLine,
    pub target: Option<Target>,
}

/// Result of one classification pass
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Raw listing in input order, suppressed lines excluded
    pub listing: Vec<ClassifiedLine>,
    pub totals: CategoryTotals,
    /// How many lines the suppression list dropped
    pub suppressed: usize,
}

impl Classification {
    pub fn matched(&self) -> usize {
        self.listing.iter().filter(|l| l.target.is_some()).count()
    }
}

/// Rule table plus suppression list. Holds no per-run state.
#[derive(Debug, Clone)]
pub struct Classifier {
    table: RuleTable,
    suppression: Suppression,
}

impl Classifier {
    pub fn new(table: RuleTable, suppression: Suppression) -> Self {
        Self { table, suppression }
    }

    /// Built-in rules and the default suppressed concept
    pub fn builtin() -> Result<Self> {
        Ok(Self::new(RuleTable::builtin()?, Suppression::default()))
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    pub fn suppression(&self) -> &Suppression {
        &self.suppression
    }

    /// Single pass over the lines; the same input always gives the same totals.
    pub fn classify(&self, lines: &[StatementLine]) -> Classification {
        let mut totals = CategoryTotals::new();
        let mut listing = Vec::with_capacity(lines.len());
        let mut suppressed = 0;

        for line in lines {
            if self.suppression.is_suppressed(&line.label) {
                suppressed += 1;
                continue;
            }

            let target = self.table.classify(&line.label).map(|r| r.target());
            if let Some(t) = target {
                totals.add(t, line.amount);
            }
            listing.push(ClassifiedLine {
                line: line.clone(),
                target,
            });
        }

        let result = Classification {
            listing,
            totals,
            suppressed,
        };
        info!(
            lines = lines.len(),
            matched = result.matched(),
            suppressed,
            "classified statement lines"
        );
        result
    }
}
