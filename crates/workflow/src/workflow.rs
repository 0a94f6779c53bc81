//! Workflow configuration.
//!
//! A workflow is one sheet plus an ordered stage chain. The production
//! chains are built in code from the layouts in [`crate::sheets`]; a
//! deployment can also load a chain from TOML to track a resized sheet
//! without a rebuild.

use serde::Deserialize;

use sheetfms_schema::{MatchPolicy, SheetSchema};

use crate::error::FmsError;
use crate::sheets;

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

/// One workflow stage: a planned/actual sentinel pair, an optional status
/// column, and the extra fields written when the stage completes.
#[derive(Debug, Clone, Deserialize)]
pub struct Stage {
    pub key: String,
    pub label: String,
    /// Field name of the "stage queued" sentinel.
    pub planned: String,
    /// Field name of the "stage completed" sentinel.
    pub actual: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub extra_fields: Vec<String>,
}

impl Stage {
    fn triple(key: &str, label: &str, n: usize) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            planned: format!("planned_{n}"),
            actual: format!("actual_{n}"),
            status: Some(format!("status_{n}")),
            extra_fields: Vec::new(),
        }
    }

    fn with_extras(mut self, extras: &[String]) -> Self {
        self.extra_fields = extras.to_vec();
        self
    }

    /// Fields a stage update may write: actual, status, extras. `planned`
    /// is owned by the previous stage's completion (or the submission).
    pub fn writable_fields(&self) -> Vec<&str> {
        let mut out = vec![self.actual.as_str()];
        if let Some(status) = &self.status {
            out.push(status.as_str());
        }
        out.extend(self.extra_fields.iter().map(String::as_str));
        out
    }
}

// ---------------------------------------------------------------------------
// Workflow
// ---------------------------------------------------------------------------

/// Which field identifies a row, and which occurrence of it wins.
#[derive(Debug, Clone, Deserialize)]
pub struct KeySpec {
    pub field: String,
    pub policy: MatchPolicy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowConfig {
    pub name: String,
    pub schema: SheetSchema,
    pub key: KeySpec,
    pub stages: Vec<Stage>,
}

impl WorkflowConfig {
    pub fn from_toml(input: &str) -> Result<Self, FmsError> {
        let config: WorkflowConfig =
            toml::from_str(input).map_err(|e| FmsError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), FmsError> {
        if self.stages.is_empty() {
            return Err(FmsError::Config(format!(
                "workflow '{}' has no stages",
                self.name
            )));
        }
        if !self.schema.has_field(&self.key.field) {
            return Err(FmsError::Config(format!(
                "workflow '{}': key field '{}' not in schema",
                self.name, self.key.field
            )));
        }
        let mut seen = std::collections::HashSet::new();
        for stage in &self.stages {
            if !seen.insert(stage.key.as_str()) {
                return Err(FmsError::Config(format!(
                    "workflow '{}': duplicate stage key '{}'",
                    self.name, stage.key
                )));
            }
            if stage.planned == stage.actual {
                return Err(FmsError::Config(format!(
                    "workflow '{}', stage '{}': planned and actual are the same field",
                    self.name, stage.key
                )));
            }
            let mut referenced: Vec<&String> = vec![&stage.planned, &stage.actual];
            if let Some(status) = &stage.status {
                referenced.push(status);
            }
            referenced.extend(stage.extra_fields.iter());
            for field in referenced {
                if !self.schema.has_field(field) {
                    return Err(FmsError::Config(format!(
                        "workflow '{}', stage '{}': field '{}' not in schema",
                        self.name, stage.key, field
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn stage(&self, key: &str) -> Option<&Stage> {
        self.stages.iter().find(|s| s.key == key)
    }

    /// Stage after `key` in chain order, if any.
    pub fn next_stage(&self, key: &str) -> Option<&Stage> {
        let pos = self.stages.iter().position(|s| s.key == key)?;
        self.stages.get(pos + 1)
    }

    // ── Production chains ───────────────────────────────────────────

    /// The nine-stage material requirement chain.
    pub fn requirement() -> Self {
        let stages = [
            ("approval", "Approval"),
            ("indent", "Indent"),
            ("quotation", "Quotation"),
            ("po", "Purchase Order"),
            ("vendor_followup", "Vendor Follow-up"),
            ("receipt", "Material Receipt"),
            ("mrn", "MRN"),
            ("billing", "Billing"),
            ("payment", "Payment"),
        ];
        Self {
            name: "requirement".to_string(),
            schema: sheets::requirement(),
            key: KeySpec {
                field: "uid".to_string(),
                policy: MatchPolicy::First,
            },
            stages: stages
                .iter()
                .enumerate()
                .map(|(i, (key, label))| Stage::triple(key, label, i + 1))
                .collect(),
        }
    }

    /// Contractor purchase chain.
    pub fn contractor_purchase() -> Self {
        let stages = [
            ("approval", "Approval"),
            ("po", "Purchase Order"),
            ("receipt", "Material Receipt"),
            ("billing", "Billing"),
            ("payment", "Payment"),
        ];
        Self {
            name: "contractor".to_string(),
            schema: sheets::contractor_purchase(),
            key: KeySpec {
                field: "uid".to_string(),
                policy: MatchPolicy::First,
            },
            stages: stages
                .iter()
                .enumerate()
                .map(|(i, (key, label))| Stage::triple(key, label, i + 1))
                .collect(),
        }
    }

    fn expense(name: &str, schema: SheetSchema, steps: usize) -> Self {
        let mut stages: Vec<Stage> = (1..=steps)
            .map(|n| {
                Stage::triple(&format!("approval_{n}"), &format!("Approval {n}"), n)
                    .with_extras(&[format!("revised_amount_{n}"), format!("remark_{n}")])
            })
            .collect();
        stages.push(
            Stage::triple("payment", "Payment", steps + 1).with_extras(&[
                "payment_mode".to_string(),
                "payment_date".to_string(),
                "voucher_no".to_string(),
            ]),
        );
        Self {
            name: name.to_string(),
            schema,
            key: KeySpec {
                field: "uid".to_string(),
                policy: MatchPolicy::First,
            },
            stages,
        }
    }

    /// One-step debit approval plus payment.
    pub fn debit() -> Self {
        Self::expense("debit", sheets::debit(), 1)
    }

    /// Two-step labour approval plus payment.
    pub fn labour() -> Self {
        Self::expense("labour", sheets::labour(), 2)
    }

    /// Three-step site-expense approval plus payment.
    pub fn site_expense() -> Self {
        Self::expense("site_expense", sheets::site_expense(), 3)
    }
}

// ---------------------------------------------------------------------------
// Workflow set
// ---------------------------------------------------------------------------

/// All workflows a service instance serves, addressed by name.
#[derive(Debug, Clone)]
pub struct WorkflowSet {
    workflows: Vec<WorkflowConfig>,
}

impl WorkflowSet {
    pub fn new(workflows: Vec<WorkflowConfig>) -> Result<Self, FmsError> {
        let mut seen = std::collections::HashSet::new();
        for wf in &workflows {
            wf.validate()?;
            if !seen.insert(wf.name.as_str()) {
                return Err(FmsError::Config(format!(
                    "duplicate workflow name '{}'",
                    wf.name
                )));
            }
        }
        Ok(Self { workflows })
    }

    /// The five production workflows.
    pub fn production() -> Self {
        Self::new(vec![
            WorkflowConfig::requirement(),
            WorkflowConfig::contractor_purchase(),
            WorkflowConfig::debit(),
            WorkflowConfig::labour(),
            WorkflowConfig::site_expense(),
        ])
        .expect("production workflows are valid")
    }

    pub fn get(&self, name: &str) -> Result<&WorkflowConfig, FmsError> {
        self.workflows
            .iter()
            .find(|w| w.name == name)
            .ok_or_else(|| FmsError::UnknownWorkflow(name.to_string()))
    }

    pub fn names(&self) -> Vec<&str> {
        self.workflows.iter().map(|w| w.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn production_set_validates() {
        let set = WorkflowSet::production();
        assert_eq!(set.names().len(), 5);
        let req = set.get("requirement").unwrap();
        assert_eq!(req.stages.len(), 9);
        assert_eq!(req.stages[0].key, "approval");
        assert_eq!(req.stages[8].key, "payment");
    }

    #[test]
    fn next_stage_walks_the_chain() {
        let wf = WorkflowConfig::requirement();
        assert_eq!(wf.next_stage("approval").unwrap().key, "indent");
        assert!(wf.next_stage("payment").is_none());
        assert!(wf.next_stage("nope").is_none());
    }

    #[test]
    fn expense_payment_stage_writes_voucher_fields() {
        let wf = WorkflowConfig::site_expense();
        let payment = wf.stage("payment").unwrap();
        let writable = payment.writable_fields();
        assert!(writable.contains(&"payment_mode"));
        assert!(writable.contains(&"voucher_no"));
        assert!(writable.contains(&"actual_4"));
    }

    #[test]
    fn from_toml_round_trip() {
        let input = r#"
name = "mini"

[schema]
sheet = "Mini"
header_offset = 7
fields = [
    { name = "uid", col = 0 },
    { name = "planned_1", col = 1 },
    { name = "actual_1", col = 2 },
]

[key]
field = "uid"
policy = "first"

[[stages]]
key = "approval"
label = "Approval"
planned = "planned_1"
actual = "actual_1"
"#;
        let wf = WorkflowConfig::from_toml(input).unwrap();
        assert_eq!(wf.name, "mini");
        assert_eq!(wf.schema.header_offset, 7);
        assert_eq!(wf.stages[0].status, None);
    }

    #[test]
    fn reject_stage_referencing_unknown_field() {
        let input = r#"
name = "bad"

[schema]
sheet = "Bad"
header_offset = 7
fields = [ { name = "uid", col = 0 }, { name = "planned_1", col = 1 } ]

[key]
field = "uid"
policy = "first"

[[stages]]
key = "approval"
label = "Approval"
planned = "planned_1"
actual = "actual_1"
"#;
        let err = WorkflowConfig::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("actual_1"));
    }

    #[test]
    fn reject_duplicate_stage_keys() {
        let mut wf = WorkflowConfig::requirement();
        let dup = wf.stages[0].clone();
        wf.stages.push(dup);
        let err = wf.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate stage key"));
    }

    #[test]
    fn reject_bad_key_field() {
        let mut wf = WorkflowConfig::requirement();
        wf.key.field = "nope".to_string();
        assert!(wf.validate().is_err());
    }
}
