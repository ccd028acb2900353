//! Income/expense totals and per-category breakdowns.

use sift_core::{Breakdown, Direction, FinancialSummary, ParsedStatement, Transaction, round2};
use tracing::{info, warn};

pub const NOT_A_STATEMENT: &str =
    "The uploaded document is not a valid bank statement. Please upload a bank statement PDF.";

/// Summarize a parsed statement, or report that it is not one.
pub fn calculate_financials(parsed: ParsedStatement) -> FinancialSummary {
    if !parsed.is_financial_statement {
        warn!(reason = ?parsed.message, "document is not a bank statement");
        return FinancialSummary::failure(NOT_A_STATEMENT);
    }
    aggregate(
        parsed.transactions,
        parsed.opening_balance,
        parsed.closing_balance,
    )
}

/// Totals over `transactions`.
///
/// Rows with an unknown direction or an unusable amount stay in the
/// transaction list but are left out of every total. When no closing
/// balance is known it is derived from the opening balance and net change;
/// balances that are still unknown report as zero.
pub fn aggregate(
    transactions: Vec<Transaction>,
    opening_balance: Option<f64>,
    closing_balance: Option<f64>,
) -> FinancialSummary {
    let mut income = 0.0;
    let mut expenses = 0.0;
    let mut category_breakdown = Breakdown::new();
    let mut income_breakdown = Breakdown::new();
    let mut skipped = 0usize;

    for (i, t) in transactions.iter().enumerate() {
        let Some(amount) = t.amount.filter(|a| a.is_finite()) else {
            warn!(position = i + 1, date = %t.date, "amount unresolved; excluded from totals");
            skipped += 1;
            continue;
        };
        let amount = amount.abs();
        match t.direction {
            Direction::Credit => {
                income += amount;
                income_breakdown.add(&t.category_or_default(), amount);
            }
            Direction::Debit => {
                expenses += amount;
                category_breakdown.add(&t.category_or_default(), amount);
            }
            Direction::Unknown => {
                warn!(position = i + 1, date = %t.date, "direction unknown; excluded from totals");
                skipped += 1;
            }
        }
    }

    let total_income = round2(income);
    let total_expenses = round2(expenses);
    let net_change = round2(total_income - total_expenses);

    let opening = opening_balance.filter(|b| b.is_finite()).map(round2);
    let closing = closing_balance
        .filter(|b| b.is_finite())
        .map(round2)
        .or_else(|| opening.map(|o| round2(o + net_change)));

    info!(
        transactions = transactions.len(),
        skipped,
        total_income,
        total_expenses,
        "calculated financials"
    );

    FinancialSummary {
        success: true,
        error: None,
        opening_balance: opening.unwrap_or(0.0),
        closing_balance: closing.unwrap_or(0.0),
        total_income,
        total_expenses,
        net_change,
        transaction_count: transactions.len(),
        transactions,
        category_breakdown: category_breakdown.rounded().sorted_descending(),
        income_breakdown: income_breakdown.rounded().sorted_descending(),
    }
}
