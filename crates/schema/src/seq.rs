//! Sequence issuers for request numbers and line-item UIDs.
//!
//! Both issuers are pure functions of the column contents as fetched.
//! There is no lock and no version check between the read and the write
//! that follows it: two concurrent submissions can observe the same state
//! and issue the same id. That race exists in the production workflow and
//! is preserved here; callers serialize submissions if they care.

use std::collections::HashSet;

/// Next id in a `prefix_NN` series: max numeric suffix + 1, zero-padded to
/// two digits (wider suffixes keep their width: `req_99` → `req_100`).
/// Cells that don't match the pattern are ignored.
pub fn next_in_series<I, S>(ids: I, prefix: &str) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut max: u32 = 0;
    for id in ids {
        let id = id.as_ref().trim();
        if let Some(suffix) = id.strip_prefix(prefix).and_then(|s| s.strip_prefix('_')) {
            if let Ok(n) = suffix.parse::<u32>() {
                max = max.max(n);
            }
        }
    }
    format!("{prefix}_{:02}", max + 1)
}

/// Gap-filling UID allocation: the `count` smallest positive integers not
/// already present anywhere in the column. Holes left by cleared rows are
/// reclaimed; non-numeric cells are ignored.
pub fn allocate_uids<I, S>(existing: I, count: usize) -> Vec<u32>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let taken: HashSet<u32> = existing
        .into_iter()
        .filter_map(|s| s.as_ref().trim().parse::<u32>().ok())
        .collect();

    let mut out = Vec::with_capacity(count);
    let mut candidate = 1u32;
    while out.len() < count {
        if !taken.contains(&candidate) {
            out.push(candidate);
        }
        candidate += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_takes_max_not_last() {
        assert_eq!(next_in_series(["req_01", "req_03", "req_02"], "req"), "req_04");
    }

    #[test]
    fn series_starts_at_one() {
        let empty: [&str; 0] = [];
        assert_eq!(next_in_series(empty, "req"), "req_01");
    }

    #[test]
    fn series_ignores_malformed_cells() {
        assert_eq!(
            next_in_series(["req_05", "garbage", "req_x", "ind_99", ""], "req"),
            "req_06"
        );
    }

    #[test]
    fn series_widens_past_two_digits() {
        assert_eq!(next_in_series(["req_99"], "req"), "req_100");
        assert_eq!(next_in_series(["req_100"], "req"), "req_101");
    }

    #[test]
    fn uids_fill_gaps_then_extend() {
        assert_eq!(allocate_uids(["1", "2", "4"], 2), vec![3, 5]);
    }

    #[test]
    fn uids_skip_non_contiguous_holes() {
        // 7 is taken even though everything between 3 and 7 is free
        assert_eq!(allocate_uids(["1", "7", "2"], 3), vec![3, 4, 5]);
    }

    #[test]
    fn uids_ignore_non_numeric_cells() {
        assert_eq!(allocate_uids(["x", "", "1"], 1), vec![2]);
    }

    #[test]
    fn uids_from_empty_column_start_at_one() {
        let empty: [&str; 0] = [];
        assert_eq!(allocate_uids(empty, 3), vec![1, 2, 3]);
    }
}
