//! CSV export of the transaction list.

use anyhow::Result;
use serde::Serialize;
use sift_core::Transaction;
use std::io::Write;

#[derive(Serialize)]
struct CsvRow<'a> {
    date: &'a str,
    description: &'a str,
    amount: Option<f64>,
    direction: &'static str,
    category: String,
    running_balance: f64,
}

/// Write `transactions` with a header row; unresolved amounts are empty cells.
pub fn write_csv<W: Write>(writer: W, transactions: &[Transaction]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for t in transactions {
        wtr.serialize(CsvRow {
            date: &t.date,
            description: &t.description,
            amount: t.amount,
            direction: t.direction.as_str(),
            category: t.category_or_default(),
            running_balance: t.running_balance,
        })?;
    }
    wtr.flush()?;
    Ok(())
}
