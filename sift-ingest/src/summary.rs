//! Statement summary extraction: opening/closing balance and period totals.
//!
//! Runs independently of transaction segmentation. A field, once found, is
//! never overwritten. Nothing here fails; missing figures stay `None`.

use regex::Regex;
use sift_core::StatementSummary;
use std::sync::LazyLock;
use tracing::debug;

use crate::patterns::{self, AMOUNT};

static OPENING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)opening\s*balance\s*[:\-]?\s*({AMOUNT})")).expect("opening pattern")
});

static CLOSING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)closing\s*balance\s*[:\-]?\s*({AMOUNT})")).expect("closing pattern")
});

/// One dense summary row: opening, debit count, credit count, total debits,
/// total credits, closing. The column order is fixed; issuers that print the
/// same six figures in another order will be misread.
static SIX_FIELD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"({AMOUNT})\s+(\d+)\s+(\d+)\s+({AMOUNT})\s+({AMOUNT})\s+({AMOUNT})"
    ))
    .expect("six-field summary pattern")
});

/// Extract whatever summary figures the text discloses.
pub fn extract_summary(text: &str) -> StatementSummary {
    let lines: Vec<&str> = text.lines().collect();
    let mut summary = StatementSummary::default();

    for (i, line) in lines.iter().enumerate() {
        let lower = line.to_lowercase();
        // A column header's next line is the first transaction, not its value.
        let next = if is_column_header(&lower) {
            None
        } else {
            lines.get(i + 1).copied()
        };
        for rule in KEYWORD_RULES {
            rule(&mut summary, line, &lower, next);
        }
    }

    fill_from_labelled(&mut summary, text);
    fill_from_six_field_row(&mut summary, text);

    debug!(?summary, "statement summary");
    summary
}

type KeywordRule = fn(&mut StatementSummary, &str, &str, Option<&str>);

/// Per-line rules, in priority order. Totals go first so that a line such as
/// "Total Debits ... Opening Balance ..." is read as a totals row.
const KEYWORD_RULES: &[KeywordRule] = &[
    total_debits_rule,
    total_credits_rule,
    opening_balance_rule,
    closing_balance_rule,
];

fn amounts(line: &str) -> Vec<f64> {
    patterns::find_amounts(line).iter().map(|t| t.value).collect()
}

fn total_debits_rule(s: &mut StatementSummary, line: &str, lower: &str, _next: Option<&str>) {
    if s.total_debits.is_some() || !(lower.contains("total") && lower.contains("debit")) {
        return;
    }
    let found = amounts(line);
    let Some(&first) = found.first() else {
        return;
    };
    s.total_debits = Some(first);
    if s.opening_balance.is_none() && lower.contains("opening") && found.len() >= 2 {
        s.opening_balance = Some(found[1]);
    }
}

fn total_credits_rule(s: &mut StatementSummary, line: &str, lower: &str, _next: Option<&str>) {
    if s.total_credits.is_some() || !(lower.contains("total") && lower.contains("credit")) {
        return;
    }
    let found = amounts(line);
    let Some(&first) = found.first() else {
        return;
    };
    s.total_credits = Some(first);
    if s.closing_balance.is_none() && lower.contains("closing") && found.len() >= 2 {
        s.closing_balance = Some(found[1]);
    }
}

fn opening_balance_rule(s: &mut StatementSummary, line: &str, lower: &str, next: Option<&str>) {
    if s.opening_balance.is_some() || !is_balance_label(lower, "opening") {
        return;
    }
    s.opening_balance = amounts(line)
        .last()
        .copied()
        .or_else(|| next.and_then(|n| amounts(n).first().copied()));
}

fn closing_balance_rule(s: &mut StatementSummary, line: &str, lower: &str, next: Option<&str>) {
    if s.closing_balance.is_some() || !is_balance_label(lower, "closing") {
        return;
    }
    s.closing_balance = amounts(line)
        .last()
        .copied()
        .or_else(|| next.and_then(|n| amounts(n).last().copied()));
}

/// `opening`/`closing` + `balance`, but not a totals row.
fn is_balance_label(lower: &str, which: &str) -> bool {
    lower.contains(which) && lower.contains("balance") && !lower.contains("total")
}

fn is_column_header(lower: &str) -> bool {
    lower.contains("date") || lower.contains("narration")
}

/// "Opening Balance : 2,89,846.56" anywhere in the text.
fn fill_from_labelled(s: &mut StatementSummary, text: &str) {
    if s.opening_balance.is_none() {
        s.opening_balance = capture_amount(&OPENING_RE, text);
    }
    if s.closing_balance.is_none() {
        s.closing_balance = capture_amount(&CLOSING_RE, text);
    }
}

fn capture_amount(re: &Regex, text: &str) -> Option<f64> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| patterns::parse_amount(m.as_str()))
}

fn fill_from_six_field_row(s: &mut StatementSummary, text: &str) {
    if s.opening_balance.is_some()
        && s.closing_balance.is_some()
        && s.total_debits.is_some()
        && s.total_credits.is_some()
    {
        return;
    }
    let Some(caps) = text.lines().find_map(|line| SIX_FIELD_RE.captures(line)) else {
        return;
    };
    let field = |i: usize| caps.get(i).and_then(|m| patterns::parse_amount(m.as_str()));

    debug!(row = &caps[0], "six-field summary row");
    s.opening_balance = s.opening_balance.or_else(|| field(1));
    s.total_debits = s.total_debits.or_else(|| field(4));
    s.total_credits = s.total_credits.or_else(|| field(5));
    s.closing_balance = s.closing_balance.or_else(|| field(6));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lines() {
        let text = "\
Opening Balance 1,00,000.00
Total Debits 5,000.00
Total Credits 20,000.00
Closing Balance 1,15,000.00";
        let s = extract_summary(text);
        assert_eq!(s.opening_balance, Some(100000.0));
        assert_eq!(s.total_debits, Some(5000.0));
        assert_eq!(s.total_credits, Some(20000.0));
        assert_eq!(s.closing_balance, Some(115000.0));
    }

    #[test]
    fn test_amount_on_next_line() {
        let text = "Opening Balance\n  2,89,846.56\nClosing Balance\n 1.00  3,00,000.00";
        let s = extract_summary(text);
        assert_eq!(s.opening_balance, Some(289846.56));
        assert_eq!(s.closing_balance, Some(300000.0));
    }

    #[test]
    fn test_combined_totals_and_balance_line() {
        let text = "Total Debit 4,000.00 Opening Balance 10,000.00\n\
                    Total Credit 1,000.00 Closing Balance 7,000.00";
        let s = extract_summary(text);
        assert_eq!(s.total_debits, Some(4000.0));
        assert_eq!(s.opening_balance, Some(10000.0));
        assert_eq!(s.total_credits, Some(1000.0));
        assert_eq!(s.closing_balance, Some(7000.0));
    }

    #[test]
    fn test_dated_value_on_next_line() {
        let text = "Opening Balance\n31/10/2025 1,00,000.00\nsomething";
        assert_eq!(extract_summary(text).opening_balance, Some(100000.0));
    }

    #[test]
    fn test_column_header_does_not_read_next_line() {
        let text = "Date Narration Closing Balance\n01/11/2025 SALARY 500.00 Cr 1500.00";
        assert_eq!(extract_summary(text).closing_balance, None);
    }

    #[test]
    fn test_first_match_wins() {
        let text = "Opening Balance 10.00\nOpening Balance 99.00";
        assert_eq!(extract_summary(text).opening_balance, Some(10.0));
    }

    #[test]
    fn test_six_field_row() {
        let text = "\
STATEMENT SUMMARY
Opening Balance Dr Count Cr Count Debits Credits Closing Bal
2,89,846.56 12 3 45,000.00 60,000.00 3,04,846.56";
        let s = extract_summary(text);
        assert_eq!(s.opening_balance, Some(289846.56));
        assert_eq!(s.total_debits, Some(45000.0));
        assert_eq!(s.total_credits, Some(60000.0));
        assert_eq!(s.closing_balance, Some(304846.56));
    }

    #[test]
    fn test_no_summary_is_empty() {
        let s = extract_summary("01/11/2025 TEA 45.00 955.00");
        assert!(s.is_empty());
    }
}
