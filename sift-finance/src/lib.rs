//! sift-finance: categorization, totals, reconciliation and export

pub mod calculator;
pub mod categorizer;
pub mod export;
pub mod reconcile;
pub mod stats;

pub use calculator::{NOT_A_STATEMENT, aggregate, calculate_financials};
pub use categorizer::{
    CategorizeError, CategoryRequest, Categorizer, DefaultCategorizer, RuleCategorizer,
    apply_categories,
};
pub use export::write_csv;
pub use reconcile::{Check, Reconciliation, reconcile};
pub use stats::{SummaryStats, summary_stats};
