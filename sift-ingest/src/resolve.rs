//! Balance-delta resolution.
//!
//! Walks the transactions in statement order, comparing each running
//! balance with the one before it to fill in missing directions and amounts.

use sift_core::{Direction, Transaction, approx_eq, round2};
use tracing::warn;

/// Transactions after resolution, plus a note for each one left ambiguous.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub transactions: Vec<Transaction>,
    pub warnings: Vec<String>,
}

/// Fill unresolved direction/amount from balance movement.
///
/// `opening_balance` seeds the comparison for the first row. The previous
/// balance always advances to the current row's balance, so a bad row
/// cannot skew the rows after it.
pub fn resolve(transactions: Vec<Transaction>, opening_balance: Option<f64>) -> Resolved {
    let mut previous = opening_balance;
    let mut warnings = Vec::new();
    let mut out = Vec::with_capacity(transactions.len());

    for (i, mut txn) in transactions.into_iter().enumerate() {
        let delta = previous.map(|p| round2(txn.running_balance - p));

        if !txn.direction.is_known() {
            if let Some(d) = delta {
                txn.direction = direction_of(d);
            }
        }
        if txn.amount.is_none() {
            if let Some(d) = delta {
                txn.amount = Some(d.abs());
            }
        }

        if let Some(note) = check(i, &txn, delta) {
            warn!(position = i + 1, date = %txn.date, "{note}");
            warnings.push(note);
        }

        previous = Some(txn.running_balance);
        out.push(txn);
    }

    Resolved {
        transactions: out,
        warnings,
    }
}

fn direction_of(delta: f64) -> Direction {
    if delta > 0.0 {
        Direction::Credit
    } else if delta < 0.0 {
        Direction::Debit
    } else {
        Direction::Unknown
    }
}

/// Describe what is still wrong with a row after resolution, if anything.
fn check(i: usize, txn: &Transaction, delta: Option<f64>) -> Option<String> {
    let at = format!("transaction {} ({})", i + 1, txn.date);

    if !txn.direction.is_known() {
        return Some(match delta {
            None => format!("{at}: direction unknown, no prior balance to compare against"),
            Some(_) => format!("{at}: direction unknown, running balance did not change"),
        });
    }
    if txn.amount.is_none() {
        return Some(format!("{at}: amount unresolved"));
    }

    // Row-level figures that disagree with the balance movement are kept
    // as printed, but reported.
    if let (Some(d), Some(signed)) = (delta, txn.signed_amount()) {
        if !approx_eq(d, signed) {
            return Some(format!(
                "{at}: balance moved by {d:.2} but row shows {signed:.2}"
            ));
        }
    }
    None
}
