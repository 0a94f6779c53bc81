//! Table / JSON / CSV rendering of row sets.

use std::collections::BTreeSet;
use std::io;

use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Table,
    Json,
    Csv,
}

/// Column order: keys with at least one non-empty value, alphabetical,
/// `sheetRow` pinned first.
fn columns(rows: &[serde_json::Value]) -> Vec<String> {
    let mut keys: BTreeSet<String> = BTreeSet::new();
    for row in rows {
        if let Some(obj) = row.as_object() {
            for (k, v) in obj {
                let populated = match v {
                    serde_json::Value::String(s) => !s.trim().is_empty(),
                    serde_json::Value::Null => false,
                    _ => true,
                };
                if populated {
                    keys.insert(k.clone());
                }
            }
        }
    }
    let mut out: Vec<String> = Vec::new();
    if keys.remove("sheetRow") {
        out.push("sheetRow".to_string());
    }
    out.extend(keys);
    out
}

fn cell(row: &serde_json::Value, key: &str) -> String {
    match &row[key] {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

pub fn print_rows(rows: &[serde_json::Value], format: Format) -> io::Result<()> {
    match format {
        Format::Json => {
            println!("{}", serde_json::to_string_pretty(rows)?);
            Ok(())
        }
        Format::Csv => print_csv(rows),
        Format::Table => {
            print_table(rows);
            Ok(())
        }
    }
}

fn print_csv(rows: &[serde_json::Value]) -> io::Result<()> {
    let cols = columns(rows);
    let mut writer = csv::Writer::from_writer(io::stdout());
    writer.write_record(&cols)?;
    for row in rows {
        let record: Vec<String> = cols.iter().map(|c| cell(row, c)).collect();
        writer.write_record(&record)?;
    }
    writer.flush()
}

fn print_table(rows: &[serde_json::Value]) {
    if rows.is_empty() {
        println!("(no rows)");
        return;
    }
    let cols = columns(rows);
    let mut widths: Vec<usize> = cols.iter().map(String::len).collect();
    let grid: Vec<Vec<String>> = rows
        .iter()
        .map(|row| cols.iter().map(|c| cell(row, c)).collect())
        .collect();
    for row in &grid {
        for (i, value) in row.iter().enumerate() {
            widths[i] = widths[i].max(value.len());
        }
    }
    let header: Vec<String> = cols
        .iter()
        .zip(&widths)
        .map(|(c, w)| format!("{c:<w$}"))
        .collect();
    println!("{}", header.join("  "));
    for row in &grid {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!("{v:<w$}"))
            .collect();
        println!("{}", line.join("  "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_skip_fully_empty_fields_and_pin_sheet_row() {
        let rows = vec![
            serde_json::json!({ "uid": "1", "qty": "", "sheetRow": 7 }),
            serde_json::json!({ "uid": "2", "qty": "", "sheetRow": 8 }),
        ];
        assert_eq!(columns(&rows), vec!["sheetRow", "uid"]);
    }

    #[test]
    fn cell_stringifies_numbers() {
        let row = serde_json::json!({ "sheetRow": 9 });
        assert_eq!(cell(&row, "sheetRow"), "9");
        assert_eq!(cell(&row, "missing"), "");
    }
}
