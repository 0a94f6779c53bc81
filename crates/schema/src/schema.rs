//! Declarative sheet schemas.
//!
//! A `SheetSchema` is the single place a sheet's column layout is written
//! down: an ordered list of named fields, each bound to a 0-based column
//! index, plus the header offset at which data rows begin. Every projection
//! and write address is derived from it — handlers never hardcode indices.

use serde::Deserialize;

/// One named column binding.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    /// 0-based column index in the sheet.
    pub col: usize,
}

/// Column layout of one spreadsheet tab.
#[derive(Debug, Clone, Deserialize)]
pub struct SheetSchema {
    /// Tab name as it appears in the spreadsheet (may contain spaces).
    pub sheet: String,
    /// 1-based sheet row of the first data row (7 or 8 in production tabs).
    pub header_offset: usize,
    pub fields: Vec<FieldSpec>,
}

impl SheetSchema {
    pub fn new(sheet: impl Into<String>, header_offset: usize) -> Self {
        Self {
            sheet: sheet.into(),
            header_offset,
            fields: Vec::new(),
        }
    }

    /// Bind the next field. Columns do not need to be contiguous or ordered.
    pub fn field(mut self, name: impl Into<String>, col: usize) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            col,
        });
        self
    }

    /// Append a numbered planned/actual/status triple for a workflow stage.
    /// Field names follow the sheet convention: `planned_3`, `actual_3`, `status_3`.
    pub fn stage_triple(self, n: usize, planned_col: usize) -> Self {
        self.field(format!("planned_{n}"), planned_col)
            .field(format!("actual_{n}"), planned_col + 1)
            .field(format!("status_{n}"), planned_col + 2)
    }

    /// Column index of a named field.
    pub fn col_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().find(|f| f.name == name).map(|f| f.col)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.col_of(name).is_some()
    }

    /// Highest bound column index, or None for an empty schema.
    pub fn max_col(&self) -> Option<usize> {
        self.fields.iter().map(|f| f.col).max()
    }

    /// Width of a freshly built row for this schema (max col + 1).
    pub fn row_width(&self) -> usize {
        self.max_col().map_or(0, |c| c + 1)
    }

    /// Convert a 0-based in-memory row index to the absolute sheet row number.
    pub fn sheet_row(&self, index: usize) -> usize {
        self.header_offset + index
    }

    /// A1 range covering the whole data region, open-ended downward
    /// (e.g. `Billing_FMS!A8:CK`).
    pub fn data_range(&self) -> String {
        let last = crate::range::col_to_letters(self.max_col().unwrap_or(0));
        format!(
            "{}!A{}:{}",
            crate::range::quote_sheet(&self.sheet),
            self.header_offset,
            last
        )
    }

    /// A1 range for `count` rows starting at 0-based data index `start`,
    /// spanning the full schema width.
    pub fn block_range(&self, start: usize, count: usize) -> String {
        let first_row = self.sheet_row(start);
        let last_row = self.sheet_row(start + count.saturating_sub(1));
        let last_col = crate::range::col_to_letters(self.max_col().unwrap_or(0));
        format!(
            "{}!A{}:{}{}",
            crate::range::quote_sheet(&self.sheet),
            first_row,
            last_col,
            last_row
        )
    }

    /// A1 address of a single cell by data index and field name.
    pub fn cell_range(&self, index: usize, field: &str) -> Option<String> {
        let col = self.col_of(field)?;
        let letters = crate::range::col_to_letters(col);
        let row = self.sheet_row(index);
        Some(format!(
            "{}!{}{}",
            crate::range::quote_sheet(&self.sheet),
            letters,
            row
        ))
    }
}
