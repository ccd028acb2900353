//! Cross-checks between computed totals and the statement's own figures.

use serde::Serialize;
use sift_core::{FinancialSummary, ParsedStatement, approx_eq, round2};
use tracing::{debug, warn};

/// One failed comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Check {
    pub name: &'static str,
    pub expected: f64,
    pub actual: f64,
    pub difference: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Reconciliation {
    /// Every comparison that could be made agreed within a cent.
    Balanced { checked: usize },
    Discrepancy { checked: usize, checks: Vec<Check> },
    /// The statement disclosed nothing to compare against.
    Unverifiable,
}

impl Reconciliation {
    pub fn is_balanced(&self) -> bool {
        matches!(self, Reconciliation::Balanced { .. })
    }

    /// Largest absolute difference among failed checks.
    pub fn worst_difference(&self) -> f64 {
        match self {
            Reconciliation::Discrepancy { checks, .. } => checks
                .iter()
                .map(|c| c.difference.abs())
                .fold(0.0, f64::max),
            _ => 0.0,
        }
    }
}

/// Compare `summary` against what `parsed` says about itself:
/// `opening + income - expenses` against the last running balance and the
/// printed closing balance, and computed income/expenses against the
/// statement's printed credit/debit totals.
///
/// Without an opening balance, the last running balance stands in for the
/// computed closing when checking the printed one.
pub fn reconcile(parsed: &ParsedStatement, summary: &FinancialSummary) -> Reconciliation {
    let mut pairs: Vec<(&'static str, f64, f64)> = Vec::new();

    let computed = parsed
        .opening_balance
        .map(|opening| round2(opening + summary.total_income - summary.total_expenses));

    if let (Some(expected), Some(closing)) = (computed, parsed.closing_balance) {
        pairs.push(("closing_balance", expected, round2(closing)));
    }
    if let Some(printed) = parsed.statement_closing_balance {
        if let Some(expected) = computed.or(parsed.closing_balance.map(round2)) {
            pairs.push(("statement_closing_balance", expected, round2(printed)));
        }
    }
    if let Some(total) = parsed.total_debits {
        pairs.push(("total_debits", round2(total), summary.total_expenses));
    }
    if let Some(total) = parsed.total_credits {
        pairs.push(("total_credits", round2(total), summary.total_income));
    }

    if pairs.is_empty() {
        debug!("nothing to reconcile against");
        return Reconciliation::Unverifiable;
    }

    let checked = pairs.len();
    let checks: Vec<Check> = pairs
        .into_iter()
        .filter(|(_, expected, actual)| !approx_eq(*expected, *actual))
        .map(|(name, expected, actual)| Check {
            name,
            expected,
            actual,
            difference: round2(actual - expected),
        })
        .collect();

    if checks.is_empty() {
        Reconciliation::Balanced { checked }
    } else {
        for c in &checks {
            warn!(
                check = c.name,
                expected = c.expected,
                actual = c.actual,
                "reconciliation mismatch"
            );
        }
        Reconciliation::Discrepancy { checked, checks }
    }
}
