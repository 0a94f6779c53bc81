//! `sheetfms-workflow` — the FMS workflow engine.
//!
//! Each procurement/expense workflow is a sheet plus an ordered chain of
//! stages; a stage is a planned/actual sentinel pair with an optional
//! status column and extra writable fields. The service operations read a
//! fresh grid from the gateway, compute in sheet space, and write back by
//! range — there is no cache, no lock, and no version check between the
//! read and the write. Two concurrent submissions can race on the same
//! UID or row block; callers that care must serialize submissions.

pub mod dropdowns;
pub mod error;
pub mod service;
pub mod sheets;
pub mod workflow;

pub use dropdowns::{build_dropdowns, Dropdowns};
pub use error::FmsError;
pub use service::{
    BatchOutcome, FmsService, LineItem, PendingView, StageUpdate, SubmitReceipt, Submission,
    UpdatedRow,
};
pub use workflow::{KeySpec, Stage, WorkflowConfig, WorkflowSet};
