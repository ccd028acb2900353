//! End-to-end parse of one statement's text.

use sift_core::{ParsedStatement, StatementSummary};
use tracing::{info, warn};

use crate::resolve::{Resolved, resolve};
use crate::segment::segment;
use crate::summary::extract_summary;

/// Parse extracted statement text into a [`ParsedStatement`].
///
/// Never fails: text with no recognizable transactions comes back with
/// `is_financial_statement = false` and a message saying why.
pub fn parse_statement(text: &str) -> ParsedStatement {
    if text.trim().is_empty() {
        warn!("empty statement text");
        return ParsedStatement::not_financial("no text extracted", &StatementSummary::default());
    }

    let summary = extract_summary(text);
    let rows = segment(text);
    if rows.is_empty() {
        warn!("no transaction lines found");
        return ParsedStatement::not_financial("no transaction lines found", &summary);
    }

    let Resolved {
        transactions,
        warnings,
    } = resolve(rows, summary.opening_balance);

    // The last printed running balance is closer to the truth than a
    // summary block that may belong to another period on the page.
    let closing_balance = transactions
        .last()
        .map(|t| t.running_balance)
        .or(summary.closing_balance);

    info!(
        transactions = transactions.len(),
        ambiguous = warnings.len(),
        opening = ?summary.opening_balance,
        closing = ?closing_balance,
        "parsed statement"
    );

    ParsedStatement {
        is_financial_statement: true,
        opening_balance: summary.opening_balance,
        closing_balance,
        statement_closing_balance: summary.closing_balance,
        total_debits: summary.total_debits,
        total_credits: summary.total_credits,
        transactions,
        warnings,
        message: None,
    }
}
