//! `sheetfms-config` — settings persistence.

pub mod settings;

pub use settings::{Settings, SheetOverride};
