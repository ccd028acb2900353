use sift_core::{Direction, FinancialSummary, ParsedStatement, approx_eq};
use sift_finance::{
    NOT_A_STATEMENT, Reconciliation, RuleCategorizer, apply_categories, calculate_financials,
    reconcile, summary_stats, write_csv,
};
use sift_ingest::parse_statement;

/// Marker/column mix with a wrapped narration and a balance-only row.
const MIXED: &str = "\
HDFC BANK LTD
Page 1 of 1
Account Number 50100123456789
Statement of account from 01/11/2025 to 30/11/2025
Opening Balance : 1,00,000.00
Date Narration Withdrawal Deposit Closing Balance
01/11/2025 SALARY CREDIT 50000.00 Cr 150000.00
02/11/2025 ATM WDL 2000.00 0.00 148000.00
03/11/2025 UPI/SWIGGY/998877 450.00 147550.00
SWIGGY BANGALORE
04/11/2025 UPI/JIO PREPAID 147251.00
Closing Balance : 1,47,251.00
";

/// Withdrawal/deposit columns with printed totals.
const COLUMNAR: &str = "\
STATEMENT OF ACCOUNT
Opening Balance 1,00,000.00
Date Description Withdrawal Deposit Balance
01/11/2025 NEFT ACME PAYROLL 0.00 20,000.00 1,20,000.00
05/11/2025 HOUSE RENT NOVEMBER 5,000.00 0.00 1,15,000.00
Total Debits 5,000.00
Total Credits 20,000.00
Closing Balance 1,15,000.00
";

/// Date and balance only; everything else comes from balance movement.
const BALANCE_ONLY: &str = "\
Opening Balance : 1,00,000.00
01/11/2025 UPI/ZOMATO/5521 95,000.00
02/11/2025 NEFT FROM RAVI 1,15,000.00
";

/// The printed closing balance is 500.00 short of what the rows add up to.
const MISSING_ROW: &str = "\
Opening Balance : 1,00,000.00
01/11/2025 SALARY CREDIT 50000.00 Cr 150000.00
02/11/2025 ATM WDL 2000.00 Dr 148000.00
Closing Balance : 1,47,500.00
";

fn analyze(text: &str) -> (ParsedStatement, FinancialSummary) {
    let mut parsed = parse_statement(text);
    parsed.transactions = apply_categories(parsed.transactions, &RuleCategorizer);
    let summary = calculate_financials(parsed.clone());
    (parsed, summary)
}

fn assert_invariants(parsed: &ParsedStatement, summary: &FinancialSummary) {
    for t in &parsed.transactions {
        if let Some(a) = t.amount {
            assert!(a >= 0.0, "negative amount on {}", t.date);
        }
    }

    let mut previous = parsed.opening_balance;
    for t in &parsed.transactions {
        if let (Some(p), Some(signed)) = (previous, t.signed_amount()) {
            assert!(
                approx_eq(t.running_balance - p, signed),
                "balance moved by {} but row shows {} on {}",
                t.running_balance - p,
                signed,
                t.date
            );
        }
        previous = Some(t.running_balance);
    }

    assert!(approx_eq(summary.category_breakdown.total(), summary.total_expenses));
    assert!(approx_eq(summary.income_breakdown.total(), summary.total_income));
    for breakdown in [&summary.category_breakdown, &summary.income_breakdown] {
        let values: Vec<f64> = breakdown.iter().map(|(_, v)| v).collect();
        assert!(values.windows(2).all(|w| w[0] >= w[1]), "{values:?}");
    }
}

#[test]
fn test_mixed_statement() {
    let (parsed, summary) = analyze(MIXED);
    assert_invariants(&parsed, &summary);

    assert!(summary.success);
    assert_eq!(summary.opening_balance, 100000.0);
    assert_eq!(summary.closing_balance, 147251.0);
    assert_eq!(summary.total_income, 50000.0);
    assert_eq!(summary.total_expenses, 2749.0);
    assert_eq!(summary.net_change, 47251.0);
    assert_eq!(summary.transaction_count, 4);
    assert_eq!(
        summary.category_breakdown.iter().collect::<Vec<_>>(),
        vec![("other", 2000.0), ("food", 450.0), ("bills", 299.0)]
    );
    assert_eq!(summary.income_breakdown.get("income"), Some(50000.0));
    assert_eq!(
        reconcile(&parsed, &summary),
        Reconciliation::Balanced { checked: 2 }
    );
}

#[test]
fn test_columnar_statement_reconciles_against_printed_totals() {
    let (parsed, summary) = analyze(COLUMNAR);
    assert_invariants(&parsed, &summary);

    let t = &summary.transactions;
    assert_eq!(t.len(), 2);
    assert_eq!((t[0].amount, t[0].direction), (Some(20000.0), Direction::Credit));
    assert_eq!((t[1].amount, t[1].direction), (Some(5000.0), Direction::Debit));
    assert_eq!(t[1].category.as_deref(), Some("bills"));

    assert_eq!(summary.closing_balance, 115000.0);
    assert_eq!(
        reconcile(&parsed, &summary),
        Reconciliation::Balanced { checked: 4 }
    );
}

#[test]
fn test_printed_closing_exposes_missing_rows() {
    let (parsed, summary) = analyze(MISSING_ROW);
    assert_invariants(&parsed, &summary);

    assert_eq!(parsed.closing_balance, Some(148000.0));
    assert_eq!(parsed.statement_closing_balance, Some(147500.0));

    let r = reconcile(&parsed, &summary);
    let Reconciliation::Discrepancy { checked, checks } = &r else {
        panic!("expected discrepancy, got {r:?}");
    };
    assert_eq!(*checked, 2);
    assert_eq!(checks.len(), 1);
    assert_eq!(checks[0].name, "statement_closing_balance");
    assert_eq!(checks[0].difference, -500.0);
}

#[test]
fn test_balance_only_rows_are_inferred() {
    let (parsed, summary) = analyze(BALANCE_ONLY);
    assert_invariants(&parsed, &summary);
    assert!(parsed.warnings.is_empty(), "{:?}", parsed.warnings);

    let t = &summary.transactions;
    assert_eq!((t[0].amount, t[0].direction), (Some(5000.0), Direction::Debit));
    assert_eq!(t[0].category.as_deref(), Some("food"));
    assert_eq!((t[1].amount, t[1].direction), (Some(20000.0), Direction::Credit));
    assert_eq!(summary.total_income, 20000.0);
    assert_eq!(summary.total_expenses, 5000.0);
    assert_eq!(summary.closing_balance, 115000.0);
}

#[test]
fn test_not_a_statement() {
    let (parsed, summary) = analyze("Dear customer,\nThank you for banking with us.");
    assert!(!parsed.is_financial_statement);
    assert!(!summary.success);
    assert_eq!(summary.error.as_deref(), Some(NOT_A_STATEMENT));
    assert!(summary.transactions.is_empty());
}

#[test]
fn test_analysis_is_repeatable() {
    assert_eq!(analyze(MIXED), analyze(MIXED));
}

#[test]
fn test_summary_json_shape() {
    let (_, summary) = analyze(MIXED);
    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["success"], true);
    assert!(json.get("error").is_none());
    assert_eq!(json["openingBalance"], 100000.0);
    assert_eq!(json["totalExpenses"], 2749.0);
    assert_eq!(json["transactionCount"], 4);
    assert_eq!(json["categoryBreakdown"]["food"], 450.0);
    assert_eq!(json["transactions"][0]["direction"], "credit");
    assert_eq!(json["transactions"][0]["running_balance"], 150000.0);
}

#[test]
fn test_stats_and_export() {
    let (_, summary) = analyze(MIXED);
    let stats = summary_stats(&summary);
    assert_eq!(stats.credit_count, 1);
    assert_eq!(stats.debit_count, 3);
    assert_eq!(stats.largest_debit.unwrap().description, "ATM WDL");

    let mut buf = Vec::new();
    write_csv(&mut buf, &summary.transactions).unwrap();
    let csv = String::from_utf8(buf).unwrap();
    assert_eq!(csv.lines().count(), 5);
    assert!(csv.contains("UPI/SWIGGY/998877 SWIGGY BANGALORE,450.0,debit,food,147550.0"));
}
