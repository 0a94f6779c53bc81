//! Key resolution: locate the sheet row behind a business key.
//!
//! Two policies exist in the workflow and both are load-bearing:
//! UID lookups take the first match; bill numbers may legitimately repeat,
//! and there the last (most recent) row is authoritative.

use std::fmt;

use crate::filter::is_blank;

/// Which occurrence wins when a key appears more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    First,
    Last,
}

/// A resolved row: in-memory index plus the absolute sheet row number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowMatch {
    pub index: usize,
    pub sheet_row: usize,
}

/// Lookup failure. `NoData` (nothing fetched at all) is distinct from
/// `KeyNotFound` so batch callers can tell "sheet empty" apart from
/// "this key skipped" when building their report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    NoData,
    KeyNotFound { key: String },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoData => write!(f, "sheet has no data rows"),
            Self::KeyNotFound { key } => write!(f, "key '{key}' not found"),
        }
    }
}

impl std::error::Error for ResolveError {}

/// Linear scan of `key_col` for `target` (trimmed string comparison).
/// `header_offset` is the 1-based sheet row of index 0.
pub fn resolve_key(
    values: &[Vec<String>],
    key_col: usize,
    target: &str,
    policy: MatchPolicy,
    header_offset: usize,
) -> Result<RowMatch, ResolveError> {
    if values.is_empty() {
        return Err(ResolveError::NoData);
    }
    let target = target.trim();
    if is_blank(target) {
        return Err(ResolveError::KeyNotFound {
            key: target.to_string(),
        });
    }

    let mut found: Option<usize> = None;
    for (i, row) in values.iter().enumerate() {
        let cell = row.get(key_col).map(String::as_str).unwrap_or("");
        if cell.trim() == target {
            found = Some(i);
            if policy == MatchPolicy::First {
                break;
            }
            // Last: keep overwriting; the final hit wins.
        }
    }

    match found {
        Some(index) => Ok(RowMatch {
            index,
            sheet_row: header_offset + index,
        }),
        None => Err(ResolveError::KeyNotFound {
            key: target.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(keys: &[&str]) -> Vec<Vec<String>> {
        keys.iter().map(|k| vec![k.to_string()]).collect()
    }

    #[test]
    fn first_match_returns_earliest() {
        let values = col(&["5", "7", "5"]);
        let m = resolve_key(&values, 0, "5", MatchPolicy::First, 7).unwrap();
        assert_eq!(m.index, 0);
        assert_eq!(m.sheet_row, 7);
    }

    #[test]
    fn last_match_returns_latest() {
        let values = col(&["B1", "B2", "B1"]);
        let m = resolve_key(&values, 0, "B1", MatchPolicy::Last, 8).unwrap();
        assert_eq!(m.index, 2);
        assert_eq!(m.sheet_row, 10);
    }

    #[test]
    fn not_found_vs_no_data() {
        let empty: Vec<Vec<String>> = vec![];
        assert_eq!(
            resolve_key(&empty, 0, "5", MatchPolicy::First, 7),
            Err(ResolveError::NoData)
        );
        let values = col(&["1"]);
        assert_eq!(
            resolve_key(&values, 0, "5", MatchPolicy::First, 7),
            Err(ResolveError::KeyNotFound { key: "5".into() })
        );
    }

    #[test]
    fn comparison_trims_both_sides() {
        let values = col(&[" 42 "]);
        let m = resolve_key(&values, 0, "42 ", MatchPolicy::First, 7).unwrap();
        assert_eq!(m.index, 0);
    }

    #[test]
    fn blank_target_never_matches_blank_cells() {
        let values = col(&["", "x"]);
        assert!(resolve_key(&values, 0, "  ", MatchPolicy::First, 7).is_err());
    }

    #[test]
    fn key_column_beyond_row_length_is_blank() {
        let values = vec![vec!["a".to_string()]];
        assert!(resolve_key(&values, 5, "a", MatchPolicy::First, 7).is_err());
    }
}
