//! `sheetfms-schema` — Sheet-space engine for the FMS spreadsheet.
//!
//! Pure crate: receives raw cell grids (`Vec<Vec<String>>` as fetched from
//! the spreadsheet gateway), returns typed projections, row matches, and
//! write addresses. No IO or HTTP dependencies.
//!
//! The spreadsheet is the system of record. Everything here is a pure
//! function of a freshly fetched grid; nothing is cached between calls.

pub mod alloc;
pub mod filter;
pub mod project;
pub mod range;
pub mod resolve;
pub mod schema;
pub mod seq;

pub use alloc::first_fit;
pub use filter::{is_blank, pending_rows};
pub use project::MappedRow;
pub use range::{col_to_letters, A1Range};
pub use resolve::{resolve_key, MatchPolicy, ResolveError, RowMatch};
pub use schema::{FieldSpec, SheetSchema};
pub use seq::{allocate_uids, next_in_series};
