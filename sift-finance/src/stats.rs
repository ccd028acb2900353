//! Descriptive statistics over a summary's transactions.

use chrono::NaiveDate;
use serde::Serialize;
use sift_core::{Direction, FinancialSummary, Transaction};
use std::cmp::Ordering;

/// Descriptive figures over a summary's transactions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    pub credit_count: usize,
    pub debit_count: usize,
    pub unknown_count: usize,
    pub largest_credit: Option<Transaction>,
    pub largest_debit: Option<Transaction>,
    /// Earliest/latest date that parses; rows with odd dates are ignored
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

pub fn summary_stats(summary: &FinancialSummary) -> SummaryStats {
    let txns = &summary.transactions;
    let count = |d: Direction| txns.iter().filter(|t| t.direction == d).count();
    let dates: Vec<NaiveDate> = txns.iter().filter_map(Transaction::parsed_date).collect();

    SummaryStats {
        credit_count: count(Direction::Credit),
        debit_count: count(Direction::Debit),
        unknown_count: count(Direction::Unknown),
        largest_credit: largest(txns, Direction::Credit),
        largest_debit: largest(txns, Direction::Debit),
        first_date: dates.iter().min().copied(),
        last_date: dates.iter().max().copied(),
    }
}

fn largest(txns: &[Transaction], direction: Direction) -> Option<Transaction> {
    txns.iter()
        .filter(|t| t.direction == direction)
        .filter_map(|t| t.amount.filter(|a| a.is_finite()).map(|a| (a, t)))
        .max_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal))
        .map(|(_, t)| t.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::aggregate;

    #[test]
    fn test_counts_and_extremes() {
        let summary = aggregate(
            vec![
                Transaction::new(
                    "03/11/2025",
                    "SALARY",
                    Some(50000.0),
                    150000.0,
                    Direction::Credit,
                ),
                Transaction::new("01/11/2025", "ATM", Some(2000.0), 148000.0, Direction::Debit),
                Transaction::new("28/11/2025", "RENT", Some(15000.0), 133000.0, Direction::Debit),
                Transaction::new("garbled", "ODD", None, 133000.0, Direction::Unknown),
            ],
            None,
            None,
        );
        let stats = summary_stats(&summary);
        assert_eq!(stats.credit_count, 1);
        assert_eq!(stats.debit_count, 2);
        assert_eq!(stats.unknown_count, 1);
        assert_eq!(stats.largest_debit.unwrap().description, "RENT");
        assert_eq!(stats.largest_credit.unwrap().amount, Some(50000.0));
        assert_eq!(stats.first_date, NaiveDate::from_ymd_opt(2025, 11, 1));
        assert_eq!(stats.last_date, NaiveDate::from_ymd_opt(2025, 11, 28));
    }

    #[test]
    fn test_empty() {
        let stats = summary_stats(&aggregate(Vec::new(), None, None));
        assert_eq!(stats.credit_count, 0);
        assert!(stats.largest_credit.is_none());
        assert!(stats.first_date.is_none());
    }
}
