//! Block allocation for multi-row inserts.
//!
//! First-fit, not best-fit: the scan takes the earliest run of fully blank
//! rows long enough for the batch, so gaps left by manual deletions in the
//! spreadsheet get reused instead of overwritten around. O(rows × N), fine
//! at the low-thousands row counts this system sees.

use crate::filter::is_blank;

/// Every cell blank (or the row absent entirely).
pub fn row_is_blank(row: &[String]) -> bool {
    row.iter().all(|c| is_blank(c))
}

/// Smallest 0-based start index `i` such that rows `[i, i+len)` are all
/// blank or beyond the fetched range. When no in-range gap fits, this is
/// `values.len()` — append past the last fetched row.
pub fn first_fit(values: &[Vec<String>], len: usize) -> usize {
    if len == 0 {
        return values.len();
    }
    for start in 0..values.len() {
        let fits = (start..start + len).all(|i| match values.get(i) {
            Some(row) => row_is_blank(row),
            None => true, // beyond the fetch = blank
        });
        if fits {
            return start;
        }
    }
    values.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn takes_first_gap_that_fits() {
        let values = grid(&[&["x"], &[], &[], &[], &["y"]]);
        assert_eq!(first_fit(&values, 2), 1);
    }

    #[test]
    fn full_range_appends() {
        let values = grid(&[&["a"], &["b"], &["c"], &["d"], &["e"]]);
        assert_eq!(first_fit(&values, 3), 5);
    }

    #[test]
    fn gap_too_small_is_skipped() {
        // one-row hole at 1, three-row batch must go past the end
        let values = grid(&[&["a"], &[], &["b"], &["c"]]);
        assert_eq!(first_fit(&values, 3), 4);
    }

    #[test]
    fn tail_gap_extends_past_fetch() {
        // last fetched row is blank; a 3-row batch starts there and runs over
        let values = grid(&[&["a"], &["b"], &[]]);
        assert_eq!(first_fit(&values, 3), 2);
    }

    #[test]
    fn whitespace_rows_count_as_blank() {
        let values = grid(&[&["  ", "\t"], &["x"]]);
        assert_eq!(first_fit(&values, 1), 0);
    }

    #[test]
    fn empty_fetch_starts_at_zero() {
        assert_eq!(first_fit(&[], 4), 0);
    }

    proptest! {
        // The chosen block never overlaps a non-blank fetched row.
        #[test]
        fn never_overwrites_data(
            rows in proptest::collection::vec(
                proptest::collection::vec("[ a]{0,3}", 0..4), 0..40),
            len in 1usize..6,
        ) {
            let start = first_fit(&rows, len);
            for i in start..start + len {
                if let Some(row) = rows.get(i) {
                    prop_assert!(row_is_blank(row));
                }
            }
        }

        // First-fit: no earlier start would also have fit.
        #[test]
        fn start_is_minimal(
            rows in proptest::collection::vec(
                proptest::collection::vec("[ a]{0,3}", 0..4), 0..40),
            len in 1usize..6,
        ) {
            let start = first_fit(&rows, len);
            for earlier in 0..start {
                let fits = (earlier..earlier + len)
                    .all(|i| rows.get(i).map_or(true, |r| row_is_blank(r)));
                prop_assert!(!fits, "start {start} but {earlier} also fits");
            }
        }
    }
}
