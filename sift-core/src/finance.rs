//! Statement and transaction types produced by the parser.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::time::parse_statement_date;

/// Whether a transaction moved money into or out of the account.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Direction {
    #[serde(rename = "credit")]
    Credit,
    #[serde(rename = "debit")]
    Debit,
    /// Not yet resolved, or genuinely ambiguous after resolution.
    #[serde(rename = "unknown")]
    #[default]
    Unknown,
}

impl Direction {
    /// Map a printed `Cr`/`Dr` marker (any case) to a direction.
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker.to_ascii_lowercase().as_str() {
            "cr" => Some(Direction::Credit),
            "dr" => Some(Direction::Debit),
            _ => None,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Direction::Unknown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Credit => "credit",
            Direction::Debit => "debit",
            Direction::Unknown => "unknown",
        }
    }

    /// Category used when no categorizer supplied one.
    pub fn default_category(&self) -> &'static str {
        match self {
            Direction::Credit => "income",
            _ => "other",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parsed statement row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    /// Issuer's date text with separators normalized to `/`
    pub date: String,
    pub description: String,
    /// `None` while unresolved; never negative
    pub amount: Option<f64>,
    /// Balance printed on the row after the transaction posted
    pub running_balance: f64,
    pub direction: Direction,
    /// Filled only by categorization
    pub category: Option<String>,
}

impl Transaction {
    pub fn new(
        date: impl Into<String>,
        description: impl Into<String>,
        amount: Option<f64>,
        running_balance: f64,
        direction: Direction,
    ) -> Self {
        Self {
            date: date.into(),
            description: description.into(),
            amount,
            running_balance,
            direction,
            category: None,
        }
    }

    /// Direction and amount are both known.
    pub fn is_resolved(&self) -> bool {
        self.direction.is_known() && self.amount.is_some()
    }

    /// Amount signed by direction (credit positive). `None` unless resolved.
    pub fn signed_amount(&self) -> Option<f64> {
        let amount = self.amount?;
        match self.direction {
            Direction::Credit => Some(amount),
            Direction::Debit => Some(-amount),
            Direction::Unknown => None,
        }
    }

    /// Calendar date, if the date text is a well-formed day-first date.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_statement_date(&self.date)
    }

    /// Lowercased category, or the direction's default.
    pub fn category_or_default(&self) -> String {
        match &self.category {
            Some(c) if !c.trim().is_empty() => c.trim().to_lowercase(),
            _ => self.direction.default_category().to_string(),
        }
    }
}

/// Figures a statement discloses about itself. Any of them may be missing.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct StatementSummary {
    pub opening_balance: Option<f64>,
    pub closing_balance: Option<f64>,
    pub total_debits: Option<f64>,
    pub total_credits: Option<f64>,
}

impl StatementSummary {
    pub fn is_empty(&self) -> bool {
        self.opening_balance.is_none()
            && self.closing_balance.is_none()
            && self.total_debits.is_none()
            && self.total_credits.is_none()
    }
}

/// Output of the parsing engine for one document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParsedStatement {
    pub is_financial_statement: bool,
    pub opening_balance: Option<f64>,
    /// Last running balance, else the printed closing balance
    pub closing_balance: Option<f64>,
    /// Closing balance as printed in the statement's summary block
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statement_closing_balance: Option<f64>,
    pub total_debits: Option<f64>,
    pub total_credits: Option<f64>,
    pub transactions: Vec<Transaction>,
    /// Transactions left ambiguous, in document order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    /// Why the document was not judged a statement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ParsedStatement {
    /// A document with no usable transactions.
    pub fn not_financial(message: impl Into<String>, summary: &StatementSummary) -> Self {
        Self {
            is_financial_statement: false,
            opening_balance: summary.opening_balance,
            closing_balance: summary.closing_balance,
            statement_closing_balance: summary.closing_balance,
            total_debits: summary.total_debits,
            total_credits: summary.total_credits,
            transactions: Vec::new(),
            warnings: Vec::new(),
            message: Some(message.into()),
        }
    }

    /// The figures the statement printed about itself.
    pub fn summary(&self) -> StatementSummary {
        StatementSummary {
            opening_balance: self.opening_balance,
            closing_balance: self.statement_closing_balance,
            total_debits: self.total_debits,
            total_credits: self.total_credits,
        }
    }

    /// Transactions whose direction or amount could not be resolved.
    pub fn unresolved(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter().filter(|t| !t.is_resolved())
    }
}
