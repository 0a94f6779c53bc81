//! Service operations: the old route handlers, minus the HTTP plumbing.
//!
//! Every operation is one fresh read from the gateway, pure computation in
//! sheet space, and at most one batched write back. Errors surface once;
//! nothing is retried.

use serde::{Deserialize, Serialize};

use sheetfms_gateway::{RangeWrite, SheetsGateway, Uploader};
use sheetfms_ledger::{reconcile_outstanding, BillRow, OutstandingView, PaymentEntry};
use sheetfms_schema::{
    allocate_uids, first_fit, is_blank, next_in_series, pending_rows, resolve_key, MappedRow,
    ResolveError,
};

use crate::dropdowns::{build_dropdowns, Dropdowns};
use crate::error::FmsError;
use crate::sheets;
use crate::workflow::{Stage, WorkflowConfig, WorkflowSet};

const REQ_PREFIX: &str = "req";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Pending rows of one stage, in wire shape.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingView {
    pub workflow: String,
    pub stage: String,
    pub data: Vec<serde_json::Value>,
}

/// One item of a stage update: the row's business key plus the field
/// values to write (restricted to the stage's writable fields).
#[derive(Debug, Clone, Deserialize)]
pub struct StageUpdate {
    pub key: String,
    pub fields: Vec<(String, String)>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedRow {
    pub key: String,
    pub row_number: usize,
    pub updated_columns: Vec<String>,
}

/// Batch result. Missing keys are reported, never fatal: partial success
/// is the contract of every batch endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    pub updated: Vec<UpdatedRow>,
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LineItem {
    #[serde(default)]
    pub material_type: String,
    pub material_name: String,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub unit: String,
    pub qty: String,
    #[serde(default)]
    pub purpose: String,
    #[serde(default)]
    pub rate: String,
}

/// A multi-row form submission. `date` doubles as the first stage's
/// planned sentinel, so a fresh submission immediately shows as pending
/// approval.
#[derive(Debug, Clone, Deserialize)]
pub struct Submission {
    pub date: String,
    #[serde(default)]
    pub site: String,
    #[serde(default)]
    pub supervisor: String,
    #[serde(default)]
    pub contractor_name: String,
    #[serde(default)]
    pub contractor_firm: String,
    pub items: Vec<LineItem>,
    /// (file name, raw bytes) of an attached material photo.
    #[serde(skip)]
    pub photo: Option<(String, Vec<u8>)>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReceipt {
    pub req_no: String,
    pub rows_written: usize,
    pub starting_row: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// The FMS service: every operation the old route handlers exposed, bound
/// to one spreadsheet document through a gateway.
pub struct FmsService<G: SheetsGateway> {
    gateway: G,
    workflows: WorkflowSet,
}

impl<G: SheetsGateway> FmsService<G> {
    /// Service over the production workflow set.
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            workflows: WorkflowSet::production(),
        }
    }

    pub fn with_workflows(gateway: G, workflows: WorkflowSet) -> Self {
        Self { gateway, workflows }
    }

    pub fn workflows(&self) -> &WorkflowSet {
        &self.workflows
    }

    pub fn gateway_ref(&self) -> &G {
        &self.gateway
    }

    // ── Pending views ───────────────────────────────────────────────

    /// Rows queued at `stage` but not yet completed.
    pub fn pending(&self, workflow: &str, stage: &str) -> Result<PendingView, FmsError> {
        let wf = self.workflows.get(workflow)?;
        let st = stage_of(wf, stage)?;

        let values = self.gateway.read(&wf.schema.data_range())?;
        let rows = wf.schema.project(&values);
        let data = pending_rows(&rows, &st.planned, &st.actual)
            .into_iter()
            .map(row_json)
            .collect();

        Ok(PendingView {
            workflow: wf.name.clone(),
            stage: st.key.clone(),
            data,
        })
    }

    // ── Stage updates ───────────────────────────────────────────────

    /// Resolve each key and write its stage fields. In a batch, unknown
    /// keys land in `missing` without aborting; a single-item update with
    /// an unknown key is a typed `KeyNotFound` instead. An empty sheet is
    /// always `NoData`.
    pub fn update_stage(
        &self,
        workflow: &str,
        stage: &str,
        updates: &[StageUpdate],
    ) -> Result<BatchOutcome, FmsError> {
        let wf = self.workflows.get(workflow)?;
        let st = stage_of(wf, stage)?;

        if updates.is_empty() {
            return Err(FmsError::Validation("no updates provided".into()));
        }
        let writable = st.writable_fields();
        for update in updates {
            if is_blank(&update.key) {
                return Err(FmsError::Validation("update with blank key".into()));
            }
            if update.fields.is_empty() {
                return Err(FmsError::Validation(format!(
                    "update for '{}' writes no fields",
                    update.key
                )));
            }
            for (field, _) in &update.fields {
                if !writable.contains(&field.as_str()) {
                    return Err(FmsError::Validation(format!(
                        "field '{}' is not writable at stage '{}'",
                        field, st.key
                    )));
                }
            }
        }

        let key_col = wf
            .schema
            .col_of(&wf.key.field)
            .expect("validated key field");
        let values = self.gateway.read(&wf.schema.data_range())?;

        let mut writes: Vec<RangeWrite> = Vec::new();
        let mut updated: Vec<UpdatedRow> = Vec::new();
        let mut missing: Vec<String> = Vec::new();

        for update in updates {
            let hit = match resolve_key(
                &values,
                key_col,
                &update.key,
                wf.key.policy,
                wf.schema.header_offset,
            ) {
                Ok(hit) => hit,
                Err(ResolveError::NoData) => {
                    return Err(FmsError::NoData {
                        sheet: wf.schema.sheet.clone(),
                    })
                }
                Err(ResolveError::KeyNotFound { key }) => {
                    if updates.len() == 1 {
                        return Err(FmsError::KeyNotFound {
                            sheet: wf.schema.sheet.clone(),
                            key,
                        });
                    }
                    missing.push(key);
                    continue;
                }
            };

            let mut columns = Vec::with_capacity(update.fields.len());
            for (field, value) in &update.fields {
                let range = wf
                    .schema
                    .cell_range(hit.index, field)
                    .expect("validated stage field");
                writes.push(RangeWrite {
                    range,
                    values: vec![vec![value.clone()]],
                });
                columns.push(field.clone());
            }

            // Completing a stage queues the next one, unless the sheet
            // already carries a planned value there.
            if let Some(next) = wf.next_stage(&st.key) {
                let wrote_actual = update.fields.iter().any(|(f, v)| f == &st.actual && !is_blank(v));
                let next_col = wf.schema.col_of(&next.planned).expect("validated field");
                let already_queued = values
                    .get(hit.index)
                    .and_then(|row| row.get(next_col))
                    .is_some_and(|v| !is_blank(v));
                if wrote_actual && !already_queued {
                    let value = update
                        .fields
                        .iter()
                        .find(|(f, _)| f == &st.actual)
                        .map(|(_, v)| v.clone())
                        .unwrap_or_default();
                    let range = wf
                        .schema
                        .cell_range(hit.index, &next.planned)
                        .expect("validated stage field");
                    writes.push(RangeWrite {
                        range,
                        values: vec![vec![value]],
                    });
                    columns.push(next.planned.clone());
                }
            }

            updated.push(UpdatedRow {
                key: update.key.trim().to_string(),
                row_number: hit.sheet_row,
                updated_columns: columns,
            });
        }

        self.gateway.batch_write(&writes)?;
        Ok(BatchOutcome { updated, missing })
    }

    // ── Submissions ─────────────────────────────────────────────────

    /// Submit a material requirement: one row per line item, a shared
    /// `req_NN`, gap-filled UIDs, first-fit block placement.
    pub fn submit_requirement(
        &self,
        submission: &Submission,
        uploader: Option<&dyn Uploader>,
    ) -> Result<SubmitReceipt, FmsError> {
        require_field("site", &submission.site)?;
        require_field("supervisor", &submission.supervisor)?;
        let header = vec![
            ("site", submission.site.as_str()),
            ("supervisor", submission.supervisor.as_str()),
        ];
        self.submit_block("requirement", submission, &header, uploader)
    }

    /// Contractor variant: same skeleton, contractor header fields.
    pub fn submit_contractor_purchase(
        &self,
        submission: &Submission,
        uploader: Option<&dyn Uploader>,
    ) -> Result<SubmitReceipt, FmsError> {
        require_field("contractor_name", &submission.contractor_name)?;
        require_field("site", &submission.site)?;
        let header = vec![
            ("contractor_name", submission.contractor_name.as_str()),
            ("contractor_firm", submission.contractor_firm.as_str()),
            ("site", submission.site.as_str()),
        ];
        self.submit_block("contractor", submission, &header, uploader)
    }

    fn submit_block(
        &self,
        workflow: &str,
        submission: &Submission,
        header: &[(&str, &str)],
        uploader: Option<&dyn Uploader>,
    ) -> Result<SubmitReceipt, FmsError> {
        let wf = self.workflows.get(workflow)?;
        require_field("date", &submission.date)?;
        if submission.items.is_empty() {
            return Err(FmsError::Validation(
                "at least one material line item is required".into(),
            ));
        }
        for (i, item) in submission.items.iter().enumerate() {
            if is_blank(&item.material_name) {
                return Err(FmsError::Validation(format!(
                    "item {}: material name is required",
                    i + 1
                )));
            }
            if is_blank(&item.qty) {
                return Err(FmsError::Validation(format!(
                    "item {}: quantity is required",
                    i + 1
                )));
            }
        }

        // Photo first: if the upload fails nothing has been written yet.
        let photo_url = match &submission.photo {
            Some((name, bytes)) => {
                let uploader = uploader
                    .ok_or_else(|| FmsError::Upload("no upload client configured".into()))?;
                Some(
                    uploader
                        .upload_public(name, bytes)
                        .map_err(|e| FmsError::Upload(e.to_string()))?,
                )
            }
            None => None,
        };

        let values = self.gateway.read(&wf.schema.data_range())?;

        let uid_col = wf.schema.col_of("uid").ok_or_else(|| {
            FmsError::Config(format!("workflow '{}' has no uid field", wf.name))
        })?;
        let req_col = wf.schema.col_of("req_no").ok_or_else(|| {
            FmsError::Config(format!("workflow '{}' has no req_no field", wf.name))
        })?;

        let column = |col: usize| -> Vec<&str> {
            values
                .iter()
                .map(|row| row.get(col).map(String::as_str).unwrap_or(""))
                .collect()
        };
        let uids = allocate_uids(column(uid_col), submission.items.len());
        let req_no = next_in_series(column(req_col), REQ_PREFIX);

        let first_stage = &wf.stages[0];
        let width = wf.schema.row_width();
        let rows: Vec<Vec<String>> = submission
            .items
            .iter()
            .zip(&uids)
            .map(|(item, uid)| {
                let mut row = vec![String::new(); width];
                let mut set = |field: &str, value: &str| {
                    if let Some(col) = wf.schema.col_of(field) {
                        row[col] = value.trim().to_string();
                    }
                };
                set("uid", &uid.to_string());
                set("req_no", &req_no);
                set("date", &submission.date);
                for (field, value) in header {
                    set(field, value);
                }
                set("material_type", &item.material_type);
                set("material_name", &item.material_name);
                set("sku", &item.sku);
                set("unit", &item.unit);
                set("qty", &item.qty);
                set("purpose", &item.purpose);
                set("rate", &item.rate);
                if let Some(url) = &photo_url {
                    set("photo_url", url);
                }
                // queue the first stage
                set(&first_stage.planned, &submission.date);
                row
            })
            .collect();

        let start = first_fit(&values, rows.len());
        let range = wf.schema.block_range(start, rows.len());
        self.gateway.write(&range, &rows)?;

        Ok(SubmitReceipt {
            req_no,
            rows_written: rows.len(),
            starting_row: wf.schema.sheet_row(start),
            photo_url,
        })
    }

    // ── Reference data ──────────────────────────────────────────────

    /// Dropdown lists and derived lookup maps from the reference tab.
    pub fn dropdowns(&self) -> Result<Dropdowns, FmsError> {
        let schema = sheets::project_data();
        let values = self.gateway.read(&schema.data_range())?;
        Ok(build_dropdowns(&schema.project(&values)))
    }

    // ── Outstanding bills ───────────────────────────────────────────

    /// Billing rows joined against the payment ledger; settled bills
    /// (balance exactly zero) drop out.
    pub fn outstanding_bills(
        &self,
        as_of: chrono::NaiveDate,
    ) -> Result<OutstandingView, FmsError> {
        let billing = sheets::billing();
        let ledger = sheets::payment_ledger();
        let ranges = vec![billing.data_range(), ledger.data_range()];
        let mut grids = self.gateway.batch_read(&ranges)?;
        let payments_grid = grids.pop().unwrap_or_default();
        let bills_grid = grids.pop().unwrap_or_default();

        let bills: Vec<BillRow> = billing
            .project(&bills_grid)
            .iter()
            .map(BillRow::from_mapped)
            .collect();
        let payments: Vec<PaymentEntry> = ledger
            .project(&payments_grid)
            .iter()
            .map(PaymentEntry::from_mapped)
            .collect();

        Ok(reconcile_outstanding(&bills, &payments, as_of))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn stage_of<'a>(wf: &'a WorkflowConfig, stage: &str) -> Result<&'a Stage, FmsError> {
    wf.stage(stage).ok_or_else(|| FmsError::UnknownStage {
        workflow: wf.name.clone(),
        stage: stage.to_string(),
    })
}

fn require_field(name: &str, value: &str) -> Result<(), FmsError> {
    if is_blank(value) {
        return Err(FmsError::Validation(format!("{name} is required")));
    }
    Ok(())
}

/// Wire shape of one row: its fields plus the sheet row number the
/// frontend sends back with updates.
fn row_json(row: &MappedRow) -> serde_json::Value {
    let mut obj = serde_json::Map::new();
    for (name, value) in &row.fields {
        obj.insert(name.clone(), serde_json::Value::String(value.clone()));
    }
    obj.insert("sheetRow".into(), serde_json::Value::from(row.sheet_row));
    serde_json::Value::Object(obj)
}
