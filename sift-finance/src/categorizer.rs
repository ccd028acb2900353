//! Categorization boundary.
//!
//! A categorizer only ever fills `Transaction::category`. Whatever it
//! returns (or fails to return) is normalized against the transaction's
//! direction, and anything missing falls back to `income` / `other`.

use serde::Serialize;
use sift_core::categorizer::{self, normalize_label};
use sift_core::{Direction, Transaction};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, warn};

/// One transaction as presented to a categorizer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRequest {
    pub index: usize,
    pub direction: Direction,
    pub description: String,
}

#[derive(Debug, Error)]
pub enum CategorizeError {
    #[error("categorizer request failed: {0}")]
    Transport(String),
    #[error("categorizer returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("categorizer returned malformed output: {0}")]
    Malformed(String),
    #[error("missing API key (set {env})")]
    MissingApiKey { env: String },
}

/// Assigns a category label per request index.
///
/// Implementations may leave indexes out; they get the default label.
pub trait Categorizer {
    fn name(&self) -> &'static str;

    fn categorize(
        &self,
        requests: &[CategoryRequest],
    ) -> Result<HashMap<usize, String>, CategorizeError>;
}

/// Deterministic keyword rules from `sift_core::categorizer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleCategorizer;

impl Categorizer for RuleCategorizer {
    fn name(&self) -> &'static str {
        "rules"
    }

    fn categorize(
        &self,
        requests: &[CategoryRequest],
    ) -> Result<HashMap<usize, String>, CategorizeError> {
        Ok(requests
            .iter()
            .map(|r| {
                let label = categorizer::categorize(&r.description, r.direction);
                (r.index, label.to_string())
            })
            .collect())
    }
}

/// Assigns nothing, so every transaction takes its direction's default.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCategorizer;

impl Categorizer for DefaultCategorizer {
    fn name(&self) -> &'static str {
        "defaults"
    }

    fn categorize(
        &self,
        _requests: &[CategoryRequest],
    ) -> Result<HashMap<usize, String>, CategorizeError> {
        Ok(HashMap::new())
    }
}

/// Requests for every transaction, indexed by position.
pub fn requests_for(transactions: &[Transaction]) -> Vec<CategoryRequest> {
    transactions
        .iter()
        .enumerate()
        .map(|(index, t)| CategoryRequest {
            index,
            direction: t.direction,
            description: t.description.clone(),
        })
        .collect()
}

/// Run `categorizer` and fill in each transaction's category.
///
/// A failing categorizer never blocks the summary: all transactions then
/// take their default label.
pub fn apply_categories(
    transactions: Vec<Transaction>,
    categorizer: &dyn Categorizer,
) -> Vec<Transaction> {
    let requests = requests_for(&transactions);
    let labels = match categorizer.categorize(&requests) {
        Ok(labels) => labels,
        Err(e) => {
            warn!(
                categorizer = categorizer.name(),
                error = %e,
                "categorization failed; using defaults"
            );
            HashMap::new()
        }
    };

    let mut defaulted = 0usize;
    let out: Vec<Transaction> = transactions
        .into_iter()
        .enumerate()
        .map(|(i, mut t)| {
            let category = match labels.get(&i) {
                Some(label) => normalize_label(label, t.direction),
                None => {
                    defaulted += 1;
                    t.direction.default_category().to_string()
                }
            };
            t.category = Some(category);
            t
        })
        .collect();

    debug!(
        categorizer = categorizer.name(),
        total = out.len(),
        defaulted,
        "applied categories"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn txns() -> Vec<Transaction> {
        vec![
            Transaction::new(
                "01/11/2025",
                "NEFT SALARY",
                Some(50000.0),
                150000.0,
                Direction::Credit,
            ),
            Transaction::new("02/11/2025", "UPI/SWIGGY/1", Some(450.0), 149550.0, Direction::Debit),
            Transaction::new("03/11/2025", "CHQ 42", Some(10.0), 149540.0, Direction::Debit),
        ]
    }

    struct Failing;

    impl Categorizer for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn categorize(
            &self,
            _requests: &[CategoryRequest],
        ) -> Result<HashMap<usize, String>, CategorizeError> {
            Err(CategorizeError::Transport("connection refused".to_string()))
        }
    }

    struct Partial;

    impl Categorizer for Partial {
        fn name(&self) -> &'static str {
            "partial"
        }

        fn categorize(
            &self,
            _requests: &[CategoryRequest],
        ) -> Result<HashMap<usize, String>, CategorizeError> {
            // index 0 gets a debit-only label, index 2 is missing
            Ok(HashMap::from([
                (0, "shopping".to_string()),
                (1, "Food".to_string()),
            ]))
        }
    }

    fn categories(txns: &[Transaction]) -> Vec<&str> {
        txns.iter().map(|t| t.category.as_deref().unwrap_or("")).collect()
    }

    #[test]
    fn test_rule_categorizer() {
        let out = apply_categories(txns(), &RuleCategorizer);
        assert_eq!(categories(&out), vec!["income", "food", "other"]);
    }

    #[test]
    fn test_failure_falls_back_to_defaults() {
        let out = apply_categories(txns(), &Failing);
        assert_eq!(categories(&out), vec!["income", "other", "other"]);
    }

    #[test]
    fn test_missing_and_invalid_labels_are_defaulted() {
        let out = apply_categories(txns(), &Partial);
        assert_eq!(categories(&out), vec!["income", "food", "other"]);
    }

    #[test]
    fn test_structural_fields_untouched() {
        let before = txns();
        let after = apply_categories(before.clone(), &RuleCategorizer);
        for (b, a) in before.iter().zip(&after) {
            assert_eq!(b.amount, a.amount);
            assert_eq!(b.direction, a.direction);
            assert_eq!(b.running_balance, a.running_balance);
            assert_eq!(b.description, a.description);
        }
    }

    #[test]
    fn test_requests_carry_direction() {
        let reqs = requests_for(&txns());
        assert_eq!(reqs.len(), 3);
        assert_eq!(reqs[0].index, 0);
        assert_eq!(reqs[0].direction, Direction::Credit);
    }
}
