//! Transaction segmentation and per-line field parsing.
//!
//! Expected row shapes after text extraction (column order varies):
//!   01/11/2025 SALARY CREDIT                50000.00 Cr   150000.00
//!   02/11/2025 ATM WDL            2000.00      0.00       148000.00
//!   1 03-11-2025 UPI/SWIGGY/ref                           147550.00
//!     SWIGGY BANGALORE          <- continuation of the row above

use regex::Regex;
use sift_core::{Direction, Transaction};
use std::collections::HashSet;
use std::ops::Range;
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::classify::{LineKind, classify};
use crate::patterns::{self, AmountToken};

static SERIAL_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\s+").expect("serial prefix pattern"));

/// Descriptions shorter than this borrow the preceding line.
const MIN_DESCRIPTION_LEN: usize = 3;

/// A line of the document with its 0-based position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawLine<'a> {
    pub index: usize,
    pub text: &'a str,
}

/// A parsed row still tied to the line it came from.
#[derive(Debug, Clone, PartialEq)]
struct Row {
    line: usize,
    txn: Transaction,
}

/// Split statement text into transactions in document order.
///
/// Directions/amounts that need the previous balance are left for
/// [`crate::resolve::resolve`].
pub fn segment(text: &str) -> Vec<Transaction> {
    let lines: Vec<RawLine<'_>> = text
        .lines()
        .enumerate()
        .map(|(index, text)| RawLine { index, text })
        .collect();
    let kinds: Vec<LineKind> = lines.iter().map(|l| classify(l.text)).collect();

    let candidates = collect_candidates(&lines, &kinds);
    let mut rows: Vec<Row> = candidates
        .iter()
        .filter_map(|l| {
            parse_line(l.text).map(|txn| Row {
                line: l.index,
                txn,
            })
        })
        .collect();

    stitch_descriptions(&mut rows, &lines, &kinds);
    rows.into_iter().map(|r| r.txn).collect()
}

/// Lines classified as candidates; if there are none, any line with a date
/// and an amount.
pub fn collect_candidates<'a>(lines: &[RawLine<'a>], kinds: &[LineKind]) -> Vec<RawLine<'a>> {
    let strict: Vec<RawLine<'a>> = lines
        .iter()
        .zip(kinds)
        .filter(|(_, kind)| **kind == LineKind::Candidate)
        .map(|(l, _)| *l)
        .collect();
    if !strict.is_empty() {
        return strict;
    }

    let relaxed: Vec<RawLine<'a>> = lines
        .iter()
        .filter(|l| {
            patterns::first_date(l.text).is_some()
                && !patterns::find_amount_columns(l.text).is_empty()
        })
        .copied()
        .collect();
    if !relaxed.is_empty() {
        warn!(
            lines = relaxed.len(),
            "no classified transaction lines; using relaxed date+amount filter"
        );
    }
    relaxed
}

/// Parse one candidate line into a transaction with its date, description,
/// trailing balance and, where the line itself says so, amount and direction.
pub fn parse_line(line: &str) -> Option<Transaction> {
    let line = line.trim();
    let date = patterns::first_date(line)?;
    let columns = patterns::find_amount_columns(line);

    // The trailing balance is the last non-zero figure; zeros before it are
    // empty withdrawal/deposit cells.
    let balance_at = columns.iter().rposition(|t| !t.is_zero())?;
    let balance = columns[balance_at].value;
    let (amount, direction) = interpret_columns(&columns[..balance_at]);

    let description = clean_description(line, &columns);
    debug!(%line, ?amount, %direction, balance, "parsed row");

    Some(Transaction::new(
        patterns::normalize_date(&date.text),
        description,
        amount,
        balance,
        direction,
    ))
}

/// Amount and direction from the figures preceding the balance.
fn interpret_columns(before_balance: &[AmountToken]) -> (Option<f64>, Direction) {
    match before_balance {
        [] => (None, Direction::Unknown),
        [single] if single.is_zero() => (None, Direction::Unknown),
        [single] => (
            Some(single.value),
            single.marker.unwrap_or(Direction::Unknown),
        ),
        [.., withdrawal, deposit] => match (withdrawal.is_zero(), deposit.is_zero()) {
            (false, true) => (Some(withdrawal.value), Direction::Debit),
            (true, false) => (Some(deposit.value), Direction::Credit),
            // both empty or both filled: leave it to the balance delta
            _ => (None, Direction::Unknown),
        },
    }
}

/// Line text minus dates, amounts and a leading serial number.
fn clean_description(line: &str, columns: &[AmountToken]) -> String {
    let mut cut: Vec<Range<usize>> = patterns::find_dates(line)
        .into_iter()
        .map(|d| d.span)
        .chain(columns.iter().map(|t| t.span.clone()))
        .collect();
    cut.sort_by_key(|r| r.start);

    let mut kept = String::with_capacity(line.len());
    let mut pos = 0;
    for range in cut {
        if range.start > pos {
            kept.push_str(&line[pos..range.start]);
        }
        kept.push(' ');
        pos = pos.max(range.end);
    }
    kept.push_str(&line[pos.min(line.len())..]);

    let trimmed = kept.trim_start();
    let without_serial = SERIAL_PREFIX_RE.replace(trimmed, "");
    without_serial.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Attach wrapped description lines: a too-short description takes the
/// line above; any row takes an unclassified line directly below. Each
/// line is used at most once, and a short row's claim on the line above
/// wins over the previous row's claim on the line below.
fn stitch_descriptions(rows: &mut [Row], lines: &[RawLine<'_>], kinds: &[LineKind]) {
    let is_prose = |i: usize| kinds.get(i) == Some(&LineKind::Other);
    let mut used: HashSet<usize> = HashSet::new();

    for row in rows.iter_mut() {
        if row.txn.description.chars().count() >= MIN_DESCRIPTION_LEN || row.line == 0 {
            continue;
        }
        let above = row.line - 1;
        if is_prose(above) && used.insert(above) {
            let prefix = lines[above].text.trim();
            row.txn.description = format!("{} {}", prefix, row.txn.description)
                .trim()
                .to_string();
        }
    }

    for row in rows.iter_mut() {
        let below = row.line + 1;
        if is_prose(below) && used.insert(below) {
            let suffix = lines[below].text.trim();
            row.txn.description = format!("{} {}", row.txn.description, suffix)
                .trim()
                .to_string();
        }
    }
}
