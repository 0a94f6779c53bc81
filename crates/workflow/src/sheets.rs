//! Production sheet layouts.
//!
//! Column indices for every tab live here and only here. Data starts at
//! row 7 on the requirement tabs and row 8 on the expense/ledger tabs;
//! the rows above are headers and spacer rows owned by the spreadsheet.

use sheetfms_schema::SheetSchema;

/// Material requirement tab: core request fields, then nine workflow
/// stages as planned/actual/status triples from column M onward.
pub fn requirement() -> SheetSchema {
    let mut schema = SheetSchema::new("FMS", 7)
        .field("uid", 0)
        .field("req_no", 1)
        .field("date", 2)
        .field("site", 3)
        .field("supervisor", 4)
        .field("material_type", 5)
        .field("material_name", 6)
        .field("sku", 7)
        .field("unit", 8)
        .field("qty", 9)
        .field("purpose", 10)
        .field("photo_url", 11);
    for n in 1..=9 {
        schema = schema.stage_triple(n, 12 + 3 * (n - 1));
    }
    schema
}

/// Contractor material purchase tab. One row per line item; a submission
/// block shares a req_no and a single photo URL.
pub fn contractor_purchase() -> SheetSchema {
    let mut schema = SheetSchema::new("Contractor_FMS", 7)
        .field("uid", 0)
        .field("req_no", 1)
        .field("date", 2)
        .field("contractor_name", 3)
        .field("contractor_firm", 4)
        .field("site", 5)
        .field("material_name", 6)
        .field("sku", 7)
        .field("unit", 8)
        .field("qty", 9)
        .field("rate", 10)
        .field("purpose", 11)
        .field("photo_url", 12);
    for n in 1..=5 {
        schema = schema.stage_triple(n, 13 + 3 * (n - 1));
    }
    schema
}

/// Shared layout of the three expense tabs (debit / labour / site expense):
/// core fields, then `steps` approval stages with revision fields, then a
/// payment stage carrying mode/date/voucher.
fn expense(sheet: &str, steps: usize) -> SheetSchema {
    let mut schema = SheetSchema::new(sheet, 8)
        .field("uid", 0)
        .field("date", 1)
        .field("site", 2)
        .field("supervisor", 3)
        .field("expense_head", 4)
        .field("amount", 5)
        .field("reason", 6);
    let mut col = 7;
    for n in 1..=steps {
        schema = schema
            .stage_triple(n, col)
            .field(format!("revised_amount_{n}"), col + 3)
            .field(format!("remark_{n}"), col + 4);
        col += 5;
    }
    // terminal payment stage
    let n = steps + 1;
    schema
        .stage_triple(n, col)
        .field("payment_mode", col + 3)
        .field("payment_date", col + 4)
        .field("voucher_no", col + 5)
}

pub fn debit() -> SheetSchema {
    expense("Debit_FMS", 1)
}

pub fn labour() -> SheetSchema {
    expense("Labour_FMS", 2)
}

pub fn site_expense() -> SheetSchema {
    expense("Site_Expense_FMS", 3)
}

/// Billing ledger tab (primary side of the outstanding view).
pub fn billing() -> SheetSchema {
    SheetSchema::new("Billing_FMS", 8)
        .field("bill_no", 0)
        .field("party", 1)
        .field("site", 2)
        .field("bill_date", 3)
        .field("bill_amount", 4)
        .field("po_no", 5)
        .field("planned_payment", 6)
        .field("actual_payment", 7)
}

/// Append-only payment ledger (secondary side). Tab name carries a space
/// on the production document, so ranges come out quoted.
pub fn payment_ledger() -> SheetSchema {
    SheetSchema::new("Payment Sheet", 8)
        .field("bill_no", 0)
        .field("payment_date", 1)
        .field("paid_amount", 2)
        .field("balance_amount", 3)
        .field("payment_mode", 4)
        .field("voucher_no", 5)
}

/// Reference lists consumed by the frontend forms. Data starts right
/// under the single header row.
pub fn project_data() -> SheetSchema {
    SheetSchema::new("Project_Data", 2)
        .field("site", 0)
        .field("supervisor", 1)
        .field("material_type", 2)
        .field("material_name", 3)
        .field("unit", 4)
        .field("sku", 5)
        .field("contractor_name", 6)
        .field("contractor_firm", 7)
        .field("remark", 8)
        .field("auto_fill", 9)
}
