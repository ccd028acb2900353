//! Best-effort parsing of statement dates.
//!
//! Transaction dates stay strings in the issuer's order; this is only used
//! where a real calendar date is useful (ranges, stats). Malformed dates such
//! as day 32 simply yield `None`.

use chrono::NaiveDate;

const LONG_YEAR_FORMATS: &[&str] = &["%d/%m/%Y", "%d/%B/%Y", "%d %B %Y", "%d-%B-%Y"];
const SHORT_YEAR_FORMATS: &[&str] = &["%d/%m/%y", "%d/%B/%y", "%d %B %y", "%d-%B-%y"];

/// Parse a day-first statement date (`01/11/2025`, `01/11/25`, `01/Nov/2025`, `01 Nov 2025`).
pub fn parse_statement_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let year = s.rsplit(['/', '-', '.', ' ']).next()?;
    let formats = if year.len() == 2 {
        SHORT_YEAR_FORMATS
    } else {
        LONG_YEAR_FORMATS
    };
    let normalized = s.replace('.', "/");
    formats
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(&normalized, f).ok())
}
