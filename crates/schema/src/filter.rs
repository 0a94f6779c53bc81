//! Sentinel filter: the universal "pending work item" predicate.
//!
//! A row is pending at a stage when its `planned` sentinel is populated
//! and its `actual` sentinel is still empty. Each call is scoped to
//! exactly one stage's sentinel pair; successive stages are separate calls.

use crate::project::MappedRow;

/// Blank after trimming. Whitespace-only cells count as blank.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Select rows where `planned_field` is populated and `actual_field` is not.
pub fn pending_rows<'a>(
    rows: &'a [MappedRow],
    planned_field: &str,
    actual_field: &str,
) -> Vec<&'a MappedRow> {
    rows.iter()
        .filter(|r| !is_blank(r.get(planned_field)) && is_blank(r.get(actual_field)))
        .collect()
}

/// Raw-grid variant: indices of rows where column `planned_col` is
/// populated and column `actual_col` is blank.
pub fn pending_indices(values: &[Vec<String>], planned_col: usize, actual_col: usize) -> Vec<usize> {
    values
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            let planned = row.get(planned_col).map(String::as_str).unwrap_or("");
            let actual = row.get(actual_col).map(String::as_str).unwrap_or("");
            !is_blank(planned) && is_blank(actual)
        })
        .map(|(i, _)| i)
        .collect()
}
