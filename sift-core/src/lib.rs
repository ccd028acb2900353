//! sift-core: statement, transaction and report types for the sift engine

pub mod finance;
pub mod money;
pub mod report;
pub mod time;

pub use finance::{Direction, ParsedStatement, StatementSummary, Transaction};
pub use money::{approx_eq, round2};
pub use report::{Breakdown, FinancialSummary};

/// Keyword categorization of transaction descriptions
pub mod categorizer {
    use super::Direction;

    /// Labels a credit may carry.
    pub const CREDIT_CATEGORIES: &[&str] = &["income", "dividend"];

    /// Labels a debit may carry.
    pub const DEBIT_CATEGORIES: &[&str] = &[
        "food",
        "bills",
        "shopping",
        "transport",
        "health",
        "entertainment",
        "investment",
        "transfer",
        "emi",
        "other",
    ];

    /// Ordered debit rules; first matching keyword wins. `transfer` is last
    /// because UPI/IMPS narrations usually also carry the merchant name.
    const DEBIT_RULES: &[(&str, &[&str])] = &[
        ("emi", &[" emi", "emi ", "loan", "bajaj finance"]),
        (
            "investment",
            &["groww", "zerodha", "mutual fund", "nextbillion", "sip ", "upstox", "kuvera"],
        ),
        (
            "food",
            &[
                "grocer", "dmart", "avenue supermarts", "bigbasket", "blinkit", "zepto",
                "restaurant", "zomato", "swiggy", "cafe", "food",
            ],
        ),
        (
            "bills",
            &[
                "electricity", "recharge", "jio prepaid", "airtel", "broadband", " rent",
                "claude.ai", "google one", "subscription", "utility", "gas bill",
            ],
        ),
        (
            "entertainment",
            &["netflix", "prime video", "hotstar", "spotify", "bookmyshow", "movie", "steam"],
        ),
        (
            "transport",
            &[
                "uber", "ola ", "rapido", "metro", "indian railways", "irctc", "fuel", "petrol",
                "fastag",
            ],
        ),
        (
            "health",
            &["hospital", "pharmacy", "apollo", "medical", "clinic", "diagnostic"],
        ),
        (
            "shopping",
            &["amazon", "flipkart", "myntra", "ajio", "meesho", "retail", "store"],
        ),
        ("transfer", &["upi", "imps", "neft", "rtgs", "transfer"]),
    ];

    /// Categorize a description given its already-known direction.
    pub fn categorize(description: &str, direction: Direction) -> &'static str {
        let desc = description.to_lowercase();

        if direction == Direction::Credit {
            if desc.contains("dividend") {
                return "dividend";
            }
            return "income";
        }

        for &(category, keywords) in DEBIT_RULES {
            if keywords.iter().any(|k| desc.contains(k)) {
                return category;
            }
        }

        "other"
    }

    /// Accept a label for a direction, or fall back to the direction's default.
    pub fn normalize_label(label: &str, direction: Direction) -> String {
        let label = label.trim().to_lowercase();
        let allowed = match direction {
            Direction::Credit => CREDIT_CATEGORIES,
            _ => DEBIT_CATEGORIES,
        };
        if allowed.contains(&label.as_str()) {
            label
        } else {
            direction.default_category().to_string()
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_credit_is_income_unless_dividend() {
            assert_eq!(categorize("NEFT SALARY ACME", Direction::Credit), "income");
            assert_eq!(categorize("ACH DIVIDEND INFY", Direction::Credit), "dividend");
        }

        #[test]
        fn test_debit_keywords() {
            assert_eq!(categorize("UPI/SWIGGY/order", Direction::Debit), "food");
            assert_eq!(categorize("JIO PREPAID RECHARGE", Direction::Debit), "bills");
            assert_eq!(categorize("UPI-GROWW-INVEST", Direction::Debit), "investment");
            assert_eq!(categorize("BAJAJ FINANCE EMI 12", Direction::Debit), "emi");
            assert_eq!(categorize("UPI/RAMESH K/pay", Direction::Debit), "transfer");
            assert_eq!(categorize("CHQ 000123", Direction::Debit), "other");
        }

        #[test]
        fn test_unknown_direction_uses_debit_rules() {
            assert_eq!(categorize("AMAZON PAY", Direction::Unknown), "shopping");
        }

        #[test]
        fn test_normalize_label() {
            assert_eq!(normalize_label("Food", Direction::Debit), "food");
            assert_eq!(normalize_label("food", Direction::Credit), "income");
            assert_eq!(normalize_label("dividend", Direction::Credit), "dividend");
            assert_eq!(normalize_label("groceries", Direction::Debit), "other");
        }
    }
}

pub use categorizer::categorize;
