//! In-memory gateway: a tab map behind the same trait as the remote API.
//!
//! Backs the crate tests, the workflow integration tests, and the CLI
//! `--fixture` mode. Read semantics mimic the remote API: trailing blank
//! rows and trailing blank cells are trimmed from responses.

use std::collections::HashMap;
use std::sync::Mutex;

use sheetfms_schema::range::A1Range;

use crate::{GatewayError, RangeWrite, SheetsGateway, Uploader};

/// Tab-map gateway. Grids are 0-based from sheet row 1, so header rows
/// occupy the leading indices just like the real document.
#[derive(Default)]
pub struct MemoryGateway {
    tabs: Mutex<HashMap<String, Vec<Vec<String>>>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a fixture: `{ "TabName": [["cell", ...], ...], ... }`.
    pub fn from_json(input: &str) -> Result<Self, GatewayError> {
        let value: serde_json::Value =
            serde_json::from_str(input).map_err(|e| GatewayError::Parse(e.to_string()))?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &serde_json::Value) -> Result<Self, GatewayError> {
        let obj = value
            .as_object()
            .ok_or_else(|| GatewayError::Parse("fixture root must be an object".into()))?;
        let gw = Self::new();
        for (tab, rows) in obj {
            let rows = rows
                .as_array()
                .ok_or_else(|| GatewayError::Parse(format!("tab '{tab}' must be an array")))?;
            let grid: Vec<Vec<String>> = rows
                .iter()
                .map(|row| {
                    row.as_array()
                        .map(|cells| {
                            cells
                                .iter()
                                .map(|c| match c {
                                    serde_json::Value::String(s) => s.clone(),
                                    serde_json::Value::Null => String::new(),
                                    other => other.to_string(),
                                })
                                .collect()
                        })
                        .unwrap_or_default()
                })
                .collect();
            gw.insert_tab(tab, grid);
        }
        Ok(gw)
    }

    /// Install or replace a whole tab (1-based sheet row 1 = index 0).
    pub fn insert_tab(&self, name: &str, grid: Vec<Vec<String>>) {
        self.tabs.lock().unwrap().insert(name.to_string(), grid);
    }

    /// Snapshot of a tab for assertions. Empty if absent.
    pub fn tab(&self, name: &str) -> Vec<Vec<String>> {
        self.tabs.lock().unwrap().get(name).cloned().unwrap_or_default()
    }

    fn parse(range: &str) -> Result<A1Range, GatewayError> {
        A1Range::parse(range).map_err(|e| GatewayError::BadRange(e.to_string()))
    }
}

impl SheetsGateway for MemoryGateway {
    fn read(&self, range: &str) -> Result<Vec<Vec<String>>, GatewayError> {
        let r = Self::parse(range)?;
        let tabs = self.tabs.lock().unwrap();
        let grid = tabs
            .get(&r.sheet)
            .ok_or_else(|| GatewayError::BadRange(format!("unknown sheet '{}'", r.sheet)))?;

        let last_row = match r.end_row {
            Some(end) => end.min(grid.len().saturating_sub(1)),
            None => grid.len().saturating_sub(1),
        };
        if grid.is_empty() || r.start_row > last_row {
            return Ok(Vec::new());
        }

        let mut out: Vec<Vec<String>> = Vec::new();
        for row in &grid[r.start_row..=last_row] {
            let mut cells: Vec<String> = (r.start_col..=r.end_col)
                .map(|c| row.get(c).cloned().unwrap_or_default())
                .collect();
            while cells.last().is_some_and(|c| c.is_empty()) {
                cells.pop();
            }
            out.push(cells);
        }
        while out.last().is_some_and(|r| r.is_empty()) {
            out.pop();
        }
        Ok(out)
    }

    fn batch_read(&self, ranges: &[String]) -> Result<Vec<Vec<Vec<String>>>, GatewayError> {
        ranges.iter().map(|r| self.read(r)).collect()
    }

    fn write(&self, range: &str, values: &[Vec<String>]) -> Result<(), GatewayError> {
        let r = Self::parse(range)?;
        let mut tabs = self.tabs.lock().unwrap();
        let grid = tabs.entry(r.sheet.clone()).or_default();

        for (i, row) in values.iter().enumerate() {
            let target_row = r.start_row + i;
            if grid.len() <= target_row {
                grid.resize(target_row + 1, Vec::new());
            }
            for (j, cell) in row.iter().enumerate() {
                let target_col = r.start_col + j;
                if target_col > r.end_col {
                    return Err(GatewayError::BadRange(format!(
                        "write wider than range '{range}'"
                    )));
                }
                let target = &mut grid[target_row];
                if target.len() <= target_col {
                    target.resize(target_col + 1, String::new());
                }
                target[target_col] = cell.clone();
            }
        }
        Ok(())
    }

    fn batch_write(&self, writes: &[RangeWrite]) -> Result<(), GatewayError> {
        for w in writes {
            self.write(&w.range, &w.values)?;
        }
        Ok(())
    }

    fn append(&self, range: &str, values: &[Vec<String>]) -> Result<(), GatewayError> {
        let r = Self::parse(range)?;
        let next_row = {
            let tabs = self.tabs.lock().unwrap();
            let grid = tabs.get(&r.sheet).cloned().unwrap_or_default();
            grid.iter()
                .rposition(|row| row.iter().any(|c| !c.trim().is_empty()))
                .map(|i| i + 1)
                .unwrap_or(r.start_row)
        };
        let letters_start = sheetfms_schema::col_to_letters(r.start_col);
        let letters_end = sheetfms_schema::col_to_letters(r.end_col);
        let target = format!(
            "{}!{}{}:{}{}",
            sheetfms_schema::range::quote_sheet(&r.sheet),
            letters_start,
            next_row + 1,
            letters_end,
            next_row + values.len(),
        );
        self.write(&target, values)
    }
}

/// Recording uploader for tests and fixture mode. Returns `memory://`
/// URLs and remembers what was uploaded.
#[derive(Default)]
pub struct MemoryUploader {
    uploads: Mutex<Vec<String>>,
}

impl MemoryUploader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn uploaded_names(&self) -> Vec<String> {
        self.uploads.lock().unwrap().clone()
    }
}

impl Uploader for MemoryUploader {
    fn upload_public(&self, name: &str, _bytes: &[u8]) -> Result<String, GatewayError> {
        self.uploads.lock().unwrap().push(name.to_string());
        Ok(format!("memory://{}", name))
    }
}
