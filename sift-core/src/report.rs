//! Aggregated report types.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;

use crate::finance::Transaction;
use crate::money::round2;

/// Category totals with a deterministic, insertion-ordered iteration.
///
/// Serializes as a JSON object whose keys keep the current order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Breakdown {
    entries: Vec<(String, f64)>,
}

impl Breakdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to `category`, appending the category on first sight.
    pub fn add(&mut self, category: &str, amount: f64) {
        match self.entries.iter_mut().find(|(c, _)| c == category) {
            Some((_, total)) => *total += amount,
            None => self.entries.push((category.to_string(), amount)),
        }
    }

    pub fn get(&self, category: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, v)| *v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(c, v)| (c.as_str(), *v))
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(c, _)| c.as_str())
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, v)| v).sum()
    }

    /// Round every value to cents.
    pub fn rounded(mut self) -> Self {
        for (_, v) in &mut self.entries {
            *v = round2(*v);
        }
        self
    }

    /// Highest total first. Stable: ties keep first-seen order.
    pub fn sorted_descending(mut self) -> Self {
        self.entries
            .sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        self
    }
}

impl FromIterator<(String, f64)> for Breakdown {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        let mut out = Breakdown::new();
        for (category, amount) in iter {
            out.add(&category, amount);
        }
        out
    }
}

impl Serialize for Breakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (category, total) in &self.entries {
            map.serialize_entry(category, total)?;
        }
        map.end()
    }
}

/// Final financial report for one statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub opening_balance: f64,
    pub closing_balance: f64,
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_change: f64,
    pub transactions: Vec<Transaction>,
    /// Expenses by category, highest first
    pub category_breakdown: Breakdown,
    /// Income by category, highest first
    pub income_breakdown: Breakdown,
    pub transaction_count: usize,
}

impl FinancialSummary {
    /// A report for a document that could not be summarized.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            opening_balance: 0.0,
            closing_balance: 0.0,
            total_income: 0.0,
            total_expenses: 0.0,
            net_change: 0.0,
            transactions: Vec::new(),
            category_breakdown: Breakdown::new(),
            income_breakdown: Breakdown::new(),
            transaction_count: 0,
        }
    }
}
