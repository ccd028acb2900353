//! Line classification: noise, summary, or transaction candidate.
//!
//! The rules form an ordered table evaluated top to bottom; the first
//! predicate that holds decides the line. Ambiguous lines go to noise, since a
//! false transaction corrupts totals while a missed one only lowers recall.

use regex::Regex;
use std::sync::LazyLock;

use crate::patterns;

/// Outcome of classifying one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    /// Header, footer, account metadata, separators
    Noise,
    /// Opening/closing balance, totals
    Summary,
    /// Looks like one transaction row
    Candidate,
    /// Unclassified prose; may continue a description
    Other,
}

impl LineKind {
    /// Lines that never contribute to a description.
    pub fn is_noise(&self) -> bool {
        matches!(self, LineKind::Blank | LineKind::Noise | LineKind::Summary)
    }
}

/// Account metadata that often carries a date or amount of its own.
const ACCOUNT_METADATA: &[&str] = &[
    "a/c open date",
    "open date",
    "expected amb",
    "joint holders",
    "account status",
    "account number",
    "cust id",
    "pr.code",
    "br.code",
    "od limit",
    "limit :",
    "currency :",
    "account open",
    "not applicable",
];

const SUMMARY_KEYWORDS: &[&str] = &[
    "opening balance",
    "closing balance",
    "total debit",
    "total credit",
    "total withdrawal",
    "total deposit",
    "statement summary",
    "account summary",
];

/// Column headers and page furniture seen across issuers.
const HEADER_FOOTER_KEYWORDS: &[&str] = &[
    "page", "account", "a/c", "branch", "address", "city", "state", "phone", "email", "ifsc",
    "micr", "nomination", "customer", "statement", "generated", "registered", "disclaimer",
    "contents", "gstin", "linked", "deposits", "loan", "locker", "facility", "scheme",
    "no records", "si ", "sl ", "particulars", "narration", "chq", "withdrawal", "deposit",
    "balance", "date", "ref", "details of", "name &", "summary", "total", "opening", "closing",
    "end of",
];

/// Header keywords only count anywhere in the line when the line is short.
const SHORT_LINE: usize = 50;

static SERIAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\s*(?:of\s*\d+)?$").expect("serial pattern"));

static RULE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[=\-_*#]+$").expect("rule pattern"));

/// A trimmed line with its lowercase form computed once.
struct Line<'a> {
    text: &'a str,
    lower: String,
}

type Rule = (LineKind, fn(&Line<'_>) -> bool);

const RULES: &[Rule] = &[
    (LineKind::Blank, is_blank),
    (LineKind::Noise, has_account_metadata),
    (LineKind::Summary, has_summary_keyword),
    (LineKind::Noise, is_header_or_footer),
    (LineKind::Noise, is_separator),
    (LineKind::Candidate, is_candidate),
];

/// Classify one line of statement text.
pub fn classify(line: &str) -> LineKind {
    let text = line.trim();
    let line = Line {
        text,
        lower: text.to_lowercase(),
    };

    RULES
        .iter()
        .find(|(_, applies)| applies(&line))
        .map(|(kind, _)| *kind)
        .unwrap_or(LineKind::Other)
}

fn is_blank(line: &Line<'_>) -> bool {
    line.text.is_empty()
}

fn has_account_metadata(line: &Line<'_>) -> bool {
    ACCOUNT_METADATA.iter().any(|p| line.lower.contains(p))
}

fn has_summary_keyword(line: &Line<'_>) -> bool {
    SUMMARY_KEYWORDS.iter().any(|k| line.lower.contains(k))
}

fn is_header_or_footer(line: &Line<'_>) -> bool {
    let lower = line.lower.as_str();
    let short = line.text.chars().count() < SHORT_LINE;
    let keyword = HEADER_FOOTER_KEYWORDS
        .iter()
        .any(|k| lower.starts_with(k) || (short && lower.contains(k)));
    if !keyword {
        return false;
    }

    // Data rows may mention a keyword; keep them unless they talk about totals.
    patterns::find_amount_columns(line.text).is_empty()
        || lower.contains("total")
        || lower.contains("balance")
}

fn is_separator(line: &Line<'_>) -> bool {
    SERIAL_RE.is_match(&line.lower) || RULE_RE.is_match(&line.lower)
}

fn is_candidate(line: &Line<'_>) -> bool {
    patterns::is_candidate_line(line.text)
}
