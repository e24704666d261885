//! sumatoria-finance: label rules, the classifier and the report emitter

pub mod category_rules;
pub mod classifier;
pub mod report;

pub use category_rules::{
    MatchKind, Rule, RuleTable, SUPPRESSED_PATTERN, Suppression, Target, builtin_rules,
};
pub use classifier::{CategoryTotals, Classification, ClassifiedLine, Classifier};
pub use report::{ReportOptions, Summary, SummaryOptions, SummaryRow, write_reports};
