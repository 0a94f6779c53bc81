//! Most-recent-payment reconciliation.
//!
//! The payment ledger is append-only and may hold several entries per bill
//! number; the latest one carries the current paid/balance figures. There
//! is no index — a reverse linear scan realizes "most recent wins".

use chrono::NaiveDate;

use crate::model::{
    BillRow, OutstandingBill, OutstandingSummary, OutstandingView, PaymentEntry,
};

/// Most recent ledger entry for `bill_no`, scanning from the tail.
pub fn latest_payment<'a>(payments: &'a [PaymentEntry], bill_no: &str) -> Option<&'a PaymentEntry> {
    let bill_no = bill_no.trim();
    if bill_no.is_empty() {
        return None;
    }
    payments.iter().rev().find(|p| p.bill_no.trim() == bill_no)
}

/// Tolerant amount parse: trims, drops thousands separators and a leading
/// currency marker. `None` for anything else.
pub fn parse_amount(value: &str) -> Option<f64> {
    let cleaned: String = value
        .trim()
        .trim_start_matches('₹')
        .replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.trim().parse::<f64>().ok()
}

/// Join bills against the payment ledger and keep the ones still open.
///
/// A bill is hidden only when its reconciled balance parses to exactly
/// zero. A blank balance means "not yet evaluated" and a non-numeric one
/// is treated the same way — both stay visible. That mirrors the ledger's
/// historical behavior and is deliberate; do not drop rows on parse
/// failure.
pub fn reconcile_outstanding(
    bills: &[BillRow],
    payments: &[PaymentEntry],
    as_of: NaiveDate,
) -> OutstandingView {
    let mut out: Vec<OutstandingBill> = Vec::new();
    let mut total_balance = 0.0;
    let mut unparsed = 0;

    for bill in bills {
        if bill.bill_no.trim().is_empty() {
            continue;
        }

        let (paid_amount, balance_amount) = match latest_payment(payments, &bill.bill_no) {
            Some(entry) => (entry.paid_amount.clone(), entry.balance_amount.clone()),
            None => ("0".to_string(), "0".to_string()),
        };

        let parsed = if balance_amount.trim().is_empty() {
            None
        } else {
            parse_amount(&balance_amount)
        };
        if parsed == Some(0.0) {
            continue; // settled
        }

        match parsed {
            Some(balance) => total_balance += balance,
            None => unparsed += 1,
        }

        let days_outstanding = parse_bill_date(&bill.bill_date)
            .map(|d| (as_of - d).num_days());

        out.push(OutstandingBill {
            bill: bill.clone(),
            paid_amount,
            balance_amount,
            days_outstanding,
        });
    }

    OutstandingView {
        as_of,
        summary: OutstandingSummary {
            bill_count: out.len(),
            total_balance,
            unparsed_balances: unparsed,
        },
        bills: out,
    }
}

/// Bill dates appear as dd/mm/yyyy or yyyy-mm-dd depending on who typed
/// them. Anything else ages as `None`.
fn parse_bill_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y-%m-%d"))
        .ok()
}
