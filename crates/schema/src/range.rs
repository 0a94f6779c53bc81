//! A1-notation range addressing.
//!
//! The gateway speaks 1-based, column-letter addresses (`Sheet!A8:CK`);
//! everything in memory is 0-based. Conversion lives here and nowhere else.

use std::fmt;

/// Convert 0-based column index to letter(s): 0=A, 25=Z, 26=AA, ...
pub fn col_to_letters(col: usize) -> String {
    let mut result = String::new();
    let mut n = col;
    loop {
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    result
}

/// Convert column letters back to a 0-based index. Returns None for
/// anything that is not pure ASCII uppercase letters.
pub fn letters_to_col(letters: &str) -> Option<usize> {
    if letters.is_empty() {
        return None;
    }
    let mut n: usize = 0;
    for c in letters.chars() {
        if !c.is_ascii_uppercase() {
            return None;
        }
        n = n * 26 + (c as usize - 'A' as usize + 1);
    }
    Some(n - 1)
}

/// Quote a sheet name for A1 notation when it needs it.
pub fn quote_sheet(name: &str) -> String {
    if name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        name.to_string()
    } else {
        format!("'{}'", name.replace('\'', "''"))
    }
}

/// A parsed A1 range. Rows/cols are 0-based; `end_row == None` means the
/// range is open-ended downward (`A8:CK`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct A1Range {
    pub sheet: String,
    pub start_row: usize,
    pub start_col: usize,
    pub end_row: Option<usize>,
    pub end_col: usize,
}

/// Range string that could not be parsed.
#[derive(Debug)]
pub struct RangeParseError(pub String);

impl fmt::Display for RangeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot parse A1 range '{}'", self.0)
    }
}

impl std::error::Error for RangeParseError {}

impl A1Range {
    /// Parse the subset of A1 syntax this system emits:
    /// `Sheet!A8`, `Sheet!A8:CK`, `Sheet!A8:CK12`, `'Two Words'!B7:D9`.
    pub fn parse(input: &str) -> Result<Self, RangeParseError> {
        let err = || RangeParseError(input.to_string());

        let (sheet, cells) = match input.rsplit_once('!') {
            Some((s, c)) => (unquote_sheet(s), c),
            None => return Err(err()),
        };

        let (start, end) = match cells.split_once(':') {
            Some((a, b)) => (a, Some(b)),
            None => (cells, None),
        };

        let (start_col, start_row) = split_cell(start).ok_or_else(err)?;
        let start_row = start_row.ok_or_else(err)?;

        let (end_col, end_row) = match end {
            Some(e) => {
                let (c, r) = split_cell(e).ok_or_else(err)?;
                (c, r)
            }
            None => (start_col, Some(start_row)),
        };

        Ok(Self {
            sheet,
            start_row: start_row - 1,
            start_col,
            end_row: end_row.map(|r| r - 1),
            end_col,
        })
    }

    /// Number of columns the range spans.
    pub fn width(&self) -> usize {
        self.end_col - self.start_col + 1
    }
}

fn unquote_sheet(s: &str) -> String {
    if s.starts_with('\'') && s.ends_with('\'') && s.len() >= 2 {
        s[1..s.len() - 1].replace("''", "'")
    } else {
        s.to_string()
    }
}

/// Split `CK12` into (col index, Some(1-based row)); `CK` into (col, None).
fn split_cell(cell: &str) -> Option<(usize, Option<usize>)> {
    let letters: String = cell.chars().take_while(|c| c.is_ascii_uppercase()).collect();
    let digits = &cell[letters.len()..];
    let col = letters_to_col(&letters)?;
    if digits.is_empty() {
        return Some((col, None));
    }
    let row: usize = digits.parse().ok()?;
    if row == 0 {
        return None;
    }
    Some((col, Some(row)))
}
