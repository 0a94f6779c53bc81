use chrono::NaiveDate;
use serde::Serialize;

use sheetfms_schema::MappedRow;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One row of the billing sheet, as far as reconciliation cares.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillRow {
    pub bill_no: String,
    pub party: String,
    pub site: String,
    pub bill_date: String,
    pub bill_amount: String,
    /// Absolute sheet row, so follow-up writes can address the bill.
    pub sheet_row: usize,
}

impl BillRow {
    /// Build from a projected billing-sheet row. Field names follow the
    /// billing schema (`bill_no`, `party`, `site`, `bill_date`, `bill_amount`).
    pub fn from_mapped(row: &MappedRow) -> Self {
        Self {
            bill_no: row.get("bill_no").to_string(),
            party: row.get("party").to_string(),
            site: row.get("site").to_string(),
            bill_date: row.get("bill_date").to_string(),
            bill_amount: row.get("bill_amount").to_string(),
            sheet_row: row.sheet_row,
        }
    }
}

/// One append-only payment-ledger entry. Entries are ordered; the last
/// entry for a bill number is authoritative.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentEntry {
    pub bill_no: String,
    pub paid_amount: String,
    pub balance_amount: String,
    pub payment_date: String,
}

impl PaymentEntry {
    pub fn from_mapped(row: &MappedRow) -> Self {
        Self {
            bill_no: row.get("bill_no").to_string(),
            paid_amount: row.get("paid_amount").to_string(),
            balance_amount: row.get("balance_amount").to_string(),
            payment_date: row.get("payment_date").to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// A bill still carrying an outstanding balance (or never evaluated).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutstandingBill {
    #[serde(flatten)]
    pub bill: BillRow,
    /// From the most recent ledger entry, verbatim.
    pub paid_amount: String,
    /// May be blank or non-numeric when the ledger holds such a value
    /// (kept verbatim).
    pub balance_amount: String,
    /// Days since the bill date, when the bill date parses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_outstanding: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutstandingSummary {
    pub bill_count: usize,
    /// Sum of the balances that parse numerically.
    pub total_balance: f64,
    /// Bills whose balance did not parse (visible, unevaluated).
    pub unparsed_balances: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutstandingView {
    pub as_of: NaiveDate,
    pub summary: OutstandingSummary,
    pub bills: Vec<OutstandingBill>,
}
