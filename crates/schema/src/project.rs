//! Row Mapper: positional cells → named records.

use std::collections::HashMap;

use crate::schema::SheetSchema;

/// One data row projected through a schema. Every declared field is
/// present; cells beyond the row's length come back as `""`.
#[derive(Debug, Clone)]
pub struct MappedRow {
    /// 0-based index within the fetched data region.
    pub index: usize,
    /// Absolute sheet row number (header offset applied).
    pub sheet_row: usize,
    pub fields: HashMap<String, String>,
}

impl MappedRow {
    /// Field value, `""` for anything unknown. Never panics.
    pub fn get(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }
}

impl SheetSchema {
    /// Project a raw grid into named records. Short rows are tolerated:
    /// any column index beyond a row's length maps to the empty string.
    /// Values are trimmed; no other coercion.
    pub fn project(&self, values: &[Vec<String>]) -> Vec<MappedRow> {
        values
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let mut fields = HashMap::with_capacity(self.fields.len());
                for spec in &self.fields {
                    let value = row
                        .get(spec.col)
                        .map(|c| c.trim().to_string())
                        .unwrap_or_default();
                    fields.insert(spec.name.clone(), value);
                }
                MappedRow {
                    index,
                    sheet_row: self.sheet_row(index),
                    fields,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    fn schema() -> SheetSchema {
        SheetSchema::new("FMS", 7)
            .field("uid", 0)
            .field("site", 1)
            .field("qty", 3)
    }

    #[test]
    fn short_rows_map_to_empty_strings() {
        let rows = schema().project(&grid(&[&["1"], &[]]));
        assert_eq!(rows[0].get("uid"), "1");
        assert_eq!(rows[0].get("site"), "");
        assert_eq!(rows[0].get("qty"), "");
        assert_eq!(rows[1].get("uid"), "");
    }

    #[test]
    fn every_declared_field_is_present() {
        let rows = schema().project(&grid(&[&["1", "Site A", "skip", "12"]]));
        for name in ["uid", "site", "qty"] {
            assert!(rows[0].fields.contains_key(name), "missing {name}");
        }
        assert_eq!(rows[0].get("qty"), "12");
    }

    #[test]
    fn values_are_trimmed() {
        let rows = schema().project(&grid(&[&[" 5 ", "  Site B "]]));
        assert_eq!(rows[0].get("uid"), "5");
        assert_eq!(rows[0].get("site"), "Site B");
    }

    #[test]
    fn sheet_rows_track_header_offset() {
        let rows = schema().project(&grid(&[&["a"], &["b"], &["c"]]));
        assert_eq!(rows[0].sheet_row, 7);
        assert_eq!(rows[2].sheet_row, 9);
    }

    #[test]
    fn unknown_field_reads_empty() {
        let rows = schema().project(&grid(&[&["1"]]));
        assert_eq!(rows[0].get("does_not_exist"), "");
    }
}
