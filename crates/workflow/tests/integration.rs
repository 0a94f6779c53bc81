//! End-to-end service tests over the in-memory gateway.

use chrono::NaiveDate;
use sheetfms_gateway::{MemoryGateway, MemoryUploader};
use sheetfms_workflow::{FmsService, LineItem, StageUpdate, Submission};

fn empty_requirement_doc() -> MemoryGateway {
    let gateway = MemoryGateway::new();
    gateway.insert_tab("FMS", vec![Vec::new(); 6]); // rows 1-6 are headers
    gateway
}

fn item(name: &str, qty: &str) -> LineItem {
    LineItem {
        material_type: "Steel".into(),
        material_name: name.into(),
        sku: String::new(),
        unit: "kg".into(),
        qty: qty.into(),
        purpose: "slab work".into(),
        rate: String::new(),
    }
}

fn submission(items: Vec<LineItem>) -> Submission {
    Submission {
        date: "01/02/2026".into(),
        site: "Site A".into(),
        supervisor: "Asha".into(),
        contractor_name: String::new(),
        contractor_firm: String::new(),
        items,
        photo: None,
    }
}

#[test]
fn three_item_submission_fills_the_first_block() {
    let svc = FmsService::new(empty_requirement_doc());
    let receipt = svc
        .submit_requirement(
            &submission(vec![item("TMT Bar", "100"), item("Cement", "50"), item("Sand", "2")]),
            None,
        )
        .unwrap();

    assert_eq!(receipt.rows_written, 3);
    assert_eq!(receipt.starting_row, 7); // header offset + 0
    assert_eq!(receipt.req_no, "req_01");

    let view = svc.pending("requirement", "approval").unwrap();
    assert_eq!(view.data.len(), 3);
    // gap-filled UIDs from an empty sheet are 1..=3
    let uids: Vec<&str> = view.data.iter().map(|r| r["uid"].as_str().unwrap()).collect();
    assert_eq!(uids, vec!["1", "2", "3"]);
}

#[test]
fn sequential_submissions_get_disjoint_blocks_and_consecutive_req_nos() {
    let svc = FmsService::new(empty_requirement_doc());

    let first = svc
        .submit_requirement(&submission(vec![item("TMT Bar", "100")]), None)
        .unwrap();
    let second = svc
        .submit_requirement(&submission(vec![item("Cement", "50")]), None)
        .unwrap();

    assert_eq!(first.req_no, "req_01");
    assert_eq!(second.req_no, "req_02");
    assert_eq!(first.starting_row, 7);
    assert_eq!(second.starting_row, 8);
    assert_ne!(first.starting_row, second.starting_row);
}

#[test]
fn submission_reuses_a_cleared_row_gap() {
    let svc = FmsService::new(empty_requirement_doc());
    for _ in 0..3 {
        svc.submit_requirement(&submission(vec![item("TMT Bar", "1")]), None)
            .unwrap();
    }
    // clear the middle row, as a manual spreadsheet edit would
    let mut tab = svc_tab(&svc);
    tab[7] = Vec::new();
    reload(&svc, tab);

    let receipt = svc
        .submit_requirement(&submission(vec![item("Gravel", "4")]), None)
        .unwrap();
    assert_eq!(receipt.starting_row, 8, "first-fit should reuse the hole");

    // the cleared row's UID (2) is reclaimed by gap-filling
    let view = svc.pending("requirement", "approval").unwrap();
    let row = view
        .data
        .iter()
        .find(|r| r["material_name"] == "Gravel")
        .unwrap();
    assert_eq!(row["uid"], "2");
}

#[test]
fn photo_url_is_shared_across_the_block() {
    let svc = FmsService::new(empty_requirement_doc());
    let uploader = MemoryUploader::new();
    let mut sub = submission(vec![item("TMT Bar", "1"), item("Cement", "2")]);
    sub.photo = Some(("slab.jpg".into(), vec![0xff, 0xd8]));

    let receipt = svc.submit_requirement(&sub, Some(&uploader)).unwrap();
    assert_eq!(receipt.photo_url.as_deref(), Some("memory://slab.jpg"));
    assert_eq!(uploader.uploaded_names(), vec!["slab.jpg"]);

    let view = svc.pending("requirement", "approval").unwrap();
    for row in &view.data {
        assert_eq!(row["photo_url"], "memory://slab.jpg");
    }
}

#[test]
fn photo_without_uploader_fails_before_any_write() {
    let svc = FmsService::new(empty_requirement_doc());
    let mut sub = submission(vec![item("TMT Bar", "1")]);
    sub.photo = Some(("slab.jpg".into(), vec![1, 2, 3]));

    assert!(svc.submit_requirement(&sub, None).is_err());
    let view = svc.pending("requirement", "approval").unwrap();
    assert!(view.data.is_empty(), "failed submission must not write rows");
}

#[test]
fn stage_completion_walks_the_chain() {
    let svc = FmsService::new(empty_requirement_doc());
    svc.submit_requirement(&submission(vec![item("TMT Bar", "1")]), None)
        .unwrap();

    let updates = vec![StageUpdate {
        key: "1".into(),
        fields: vec![
            ("actual_1".into(), "02/02/2026".into()),
            ("status_1".into(), "Approved".into()),
        ],
    }];
    let outcome = svc.update_stage("requirement", "approval", &updates).unwrap();
    assert_eq!(outcome.updated.len(), 1);
    assert!(outcome.missing.is_empty());

    // approval no longer pending, indent now is
    assert!(svc.pending("requirement", "approval").unwrap().data.is_empty());
    let indent = svc.pending("requirement", "indent").unwrap();
    assert_eq!(indent.data.len(), 1);
    assert_eq!(indent.data[0]["planned_2"], "02/02/2026");
}

#[test]
fn contractor_submission_uses_its_own_sheet() {
    let gateway = empty_requirement_doc();
    gateway.insert_tab("Contractor_FMS", vec![Vec::new(); 6]);
    let svc = FmsService::new(gateway);

    let mut sub = submission(vec![item("Bricks", "500")]);
    sub.contractor_name = "BuildCo".into();
    sub.contractor_firm = "BuildCo Pvt Ltd".into();

    let receipt = svc.submit_contractor_purchase(&sub, None).unwrap();
    assert_eq!(receipt.rows_written, 1);

    let view = svc.pending("contractor", "approval").unwrap();
    assert_eq!(view.data[0]["contractor_name"], "BuildCo");
    // the requirement tab is untouched
    assert!(svc.pending("requirement", "approval").unwrap().data.is_empty());
}

#[test]
fn outstanding_view_joins_billing_and_payment_tabs() {
    let gateway = MemoryGateway::new();
    let mut billing = vec![Vec::new(); 7]; // data from row 8
    billing.push(cells(&["INV1", "Acme", "Site A", "25/01/2026", "10000"]));
    billing.push(cells(&["INV2", "Zeta", "Site B", "26/01/2026", "5000"]));
    gateway.insert_tab("Billing_FMS", billing);

    let mut payments = vec![Vec::new(); 7];
    payments.push(cells(&["INV1", "28/01/2026", "4000", "6000"]));
    payments.push(cells(&["INV2", "29/01/2026", "5000", "0"]));
    payments.push(cells(&["INV1", "30/01/2026", "5000", "1000"])); // most recent wins
    gateway.insert_tab("Payment Sheet", payments);

    let svc = FmsService::new(gateway);
    let view = svc
        .outstanding_bills(NaiveDate::from_ymd_opt(2026, 2, 1).unwrap())
        .unwrap();

    assert_eq!(view.bills.len(), 1, "settled INV2 must drop out");
    assert_eq!(view.bills[0].bill.bill_no, "INV1");
    assert_eq!(view.bills[0].balance_amount, "1000");
    assert_eq!(view.bills[0].days_outstanding, Some(7));
}

#[test]
fn dropdowns_come_from_the_reference_tab() {
    let gateway = empty_requirement_doc();
    let mut reference = vec![Vec::new()]; // row 1 header
    reference.push(cells(&["Site A", "Asha", "Steel", "TMT Bar", "kg", "SKU-1"]));
    reference.push(cells(&["Site A", "Ravi", "Steel", "Binding Wire", "kg", "SKU-2"]));
    gateway.insert_tab("Project_Data", reference);

    let svc = FmsService::new(gateway);
    let d = svc.dropdowns().unwrap();
    assert_eq!(d.sites, vec!["Site A"]);
    assert_eq!(d.site_supervisor_map["Site A"], vec!["Asha", "Ravi"]);
    assert_eq!(d.material_map["Steel"], vec!["TMT Bar", "Binding Wire"]);
    assert_eq!(d.unit_map["TMT Bar"].sku, "SKU-1");
}

// ── helpers ─────────────────────────────────────────────────────────

fn cells(row: &[&str]) -> Vec<String> {
    row.iter().map(|c| c.to_string()).collect()
}

fn svc_tab(svc: &FmsService<MemoryGateway>) -> Vec<Vec<String>> {
    // reach through to the fixture tab for surgical edits
    svc_gateway(svc).tab("FMS")
}

fn reload(svc: &FmsService<MemoryGateway>, tab: Vec<Vec<String>>) {
    svc_gateway(svc).insert_tab("FMS", tab);
}

fn svc_gateway(svc: &FmsService<MemoryGateway>) -> &MemoryGateway {
    svc.gateway_ref()
}
