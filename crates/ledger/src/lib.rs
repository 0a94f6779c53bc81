//! `sheetfms-ledger` — Billing ↔ payment-ledger reconciliation.
//!
//! Pure crate: receives projected billing rows and payment-ledger entries,
//! returns the outstanding-bill view. No IO dependencies.

pub mod model;
pub mod reconcile;

pub use model::{BillRow, OutstandingBill, OutstandingSummary, OutstandingView, PaymentEntry};
pub use reconcile::{latest_payment, parse_amount, reconcile_outstanding};
