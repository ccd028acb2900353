//! Date and amount recognizers shared by every stage of the parser.
//!
//! Matches carry their byte span so later stages can cut them out of the
//! line to recover the description.

use regex::Regex;
use sift_core::Direction;
use std::ops::Range;
use std::sync::LazyLock;

/// Day/month/year with `/`, `-` or `.`, or a day with a month name.
static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)\b(?:\d{1,2}[-/.]\d{1,2}[-/.]\d{2,4}",
        r"|\d{1,2}[-\s](?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*[-\s]\d{2,4})\b"
    ))
    .expect("date pattern")
});

/// Grouped (Indian `1,23,456.78` or Western `1,234,567.89`) or plain
/// two-decimal number, then an optional `Cr`/`Dr` marker.
pub(crate) const AMOUNT: &str = r"\d{1,3}(?:,\d{2,3})*\.\d{2}|\d+\.\d{2}";

static AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)({AMOUNT})(?:\s*\b(cr|dr)\b)?")).expect("amount pattern")
});

/// Minimum trimmed length of a candidate transaction line.
const MIN_CANDIDATE_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct DateToken {
    pub text: String,
    pub span: Range<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AmountToken {
    pub value: f64,
    /// Direction printed next to the number, if any
    pub marker: Option<Direction>,
    pub span: Range<usize>,
}

impl AmountToken {
    pub fn is_zero(&self) -> bool {
        self.value == 0.0
    }
}

/// All dates in the line, left to right. No calendar validation.
pub fn find_dates(line: &str) -> Vec<DateToken> {
    DATE_RE
        .find_iter(line)
        .map(|m| DateToken {
            text: m.as_str().to_string(),
            span: m.range(),
        })
        .collect()
}

pub fn first_date(line: &str) -> Option<DateToken> {
    DATE_RE.find(line).map(|m| DateToken {
        text: m.as_str().to_string(),
        span: m.range(),
    })
}

/// Every amount outside a date, zeros included, left to right.
///
/// Zeros are kept so withdrawal/deposit columns can be read positionally.
pub fn find_amount_columns(line: &str) -> Vec<AmountToken> {
    let dates = find_dates(line);
    let mut out = Vec::new();

    for caps in AMOUNT_RE.captures_iter(line) {
        let (Some(whole), Some(number)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if line[number.end()..].starts_with(|c: char| c.is_ascii_digit()) {
            continue;
        }
        if dates.iter().any(|d| overlaps(&d.span, &whole.range())) {
            continue;
        }
        let Some(value) = parse_amount(number.as_str()) else {
            continue;
        };
        out.push(AmountToken {
            value,
            marker: caps.get(2).and_then(|m| Direction::from_marker(m.as_str())),
            span: whole.range(),
        });
    }

    out
}

/// Non-zero amounts only. `0.00` never counts as a real amount.
pub fn find_amounts(line: &str) -> Vec<AmountToken> {
    find_amount_columns(line)
        .into_iter()
        .filter(|t| !t.is_zero())
        .collect()
}

/// Parse `1,23,456.78` / `1,234,567.89` / `1234.56`.
pub fn parse_amount(text: &str) -> Option<f64> {
    let cleaned: String = text.chars().filter(|c| *c != ',').collect();
    let value: f64 = cleaned.trim().parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

/// `01-11-2025` and `01.11.2025` become `01/11/2025`.
pub fn normalize_date(date: &str) -> String {
    date.replace(['-', '.'], "/")
}

/// At least one date, one non-zero amount, and some length.
pub fn is_candidate_line(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.chars().count() < MIN_CANDIDATE_LEN {
        return false;
    }
    first_date(trimmed).is_some() && !find_amounts(trimmed).is_empty()
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}
