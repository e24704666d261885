//! Tax and withholding categories that settlement line items are summed into

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Summary categories, matched deterministically from line labels
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    #[serde(rename = "vat-21")]
    Vat21,
    #[serde(rename = "vat-10.5")]
    Vat10_5,
    #[serde(rename = "vat-perception-3")]
    VatPerception3,
    #[serde(rename = "vat-perception-1.5")]
    VatPerception1_5,
    /// QR payments perception (RG 3337)
    #[serde(rename = "other-vat-perception")]
    OtherVatPerception,
    /// Non-taxed charges such as the Fiserv terminal fee
    #[serde(rename = "exempt-expenses")]
    ExemptExpenses,
    #[serde(rename = "iibb-withholding")]
    IibbWithholding,
    #[serde(rename = "vat-withholding")]
    VatWithholding,
    #[serde(rename = "income-tax-withholding")]
    IncomeTaxWithholding,
}

impl Category {
    /// Every category, in report display order
    pub const ALL: [Category; 9] = [
        Category::Vat21,
        Category::Vat10_5,
        Category::VatPerception3,
        Category::VatPerception1_5,
        Category::OtherVatPerception,
        Category::ExemptExpenses,
        Category::IibbWithholding,
        Category::VatWithholding,
        Category::IncomeTaxWithholding,
    ];

    /// Row title used in reports
    pub fn label(&self) -> &'static str {
        match self {
            Category::Vat21 => "IVA 21%",
            Category::Vat10_5 => "IVA 10,5%",
            Category::VatPerception3 => "Percepción IVA 3%",
            Category::VatPerception1_5 => "Percepción IVA 1,5%",
            Category::OtherVatPerception => "Otras percepciones de IVA",
            Category::ExemptExpenses => "Gastos exentos",
            Category::IibbWithholding => "Retenciones IIBB",
            Category::VatWithholding => "Retenciones IVA",
            Category::IncomeTaxWithholding => "Retenciones Ganancias",
        }
    }

    /// Stable kebab-case key, the same one used in config files
    pub fn key(&self) -> &'static str {
        match self {
            Category::Vat21 => "vat-21",
            Category::Vat10_5 => "vat-10.5",
            Category::VatPerception3 => "vat-perception-3",
            Category::VatPerception1_5 => "vat-perception-1.5",
            Category::OtherVatPerception => "other-vat-perception",
            Category::ExemptExpenses => "exempt-expenses",
            Category::IibbWithholding => "iibb-withholding",
            Category::VatWithholding => "vat-withholding",
            Category::IncomeTaxWithholding => "income-tax-withholding",
        }
    }

    /// The VAT rate this category collects, if it is a plain VAT bucket
    pub fn vat_rate(&self) -> Option<VatRate> {
        match self {
            Category::Vat21 => Some(VatRate::General),
            Category::Vat10_5 => Some(VatRate::Reduced),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.key() == s.trim())
            .ok_or_else(|| anyhow::anyhow!("unknown category: {s}"))
    }
}

/// VAT rates that carry a net base row
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum VatRate {
    /// 21%
    #[serde(rename = "21")]
    General,
    /// 10.5%
    #[serde(rename = "10.5")]
    Reduced,
}

impl VatRate {
    /// Rate as a fraction (0.21, 0.105)
    pub fn fraction(&self) -> Decimal {
        match self {
            VatRate::General => Decimal::new(21, 2),
            VatRate::Reduced => Decimal::new(105, 3),
        }
    }

    /// Category holding the tax amount at this rate
    pub fn category(&self) -> Category {
        match self {
            VatRate::General => Category::Vat21,
            VatRate::Reduced => Category::Vat10_5,
        }
    }

    pub fn net_base_label(&self) -> &'static str {
        match self {
            VatRate::General => "Base Neto 21%",
            VatRate::Reduced => "Base Neto 10,5%",
        }
    }
}
