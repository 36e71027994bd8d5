//! Abstract view of an inventory sheet.
//!
//! The engine only reads cells; all writes are returned as instructions. Rows
//! and columns are zero-based (`A1` is `(0, 0)`).

use serde::Serialize;
use std::fmt;

pub trait Grid {
    fn name(&self) -> &str;

    /// Number of rows, including leading empty ones.
    fn row_count(&self) -> usize;

    fn cell(&self, row: usize, col: usize) -> Option<&str>;

    /// Trimmed cell content, `None` for missing or blank cells.
    fn text(&self, row: usize, col: usize) -> Option<&str> {
        self.cell(row, col).map(str::trim).filter(|s| !s.is_empty())
    }
}

/// In-memory sheet, used by the workbook loader and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryGrid {
    name: String,
    rows: Vec<Vec<Option<String>>>,
}

impl MemoryGrid {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    /// Build from row literals; empty strings become empty cells.
    pub fn from_rows<R, C>(name: impl Into<String>, rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        let rows = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| {
                        let cell = cell.as_ref();
                        (!cell.is_empty()).then(|| cell.to_string())
                    })
                    .collect()
            })
            .collect();
        Self {
            name: name.into(),
            rows,
        }
    }

    pub fn set(&mut self, row: usize, col: usize, value: impl Into<String>) {
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.rows[row];
        if cells.len() <= col {
            cells.resize(col + 1, None);
        }
        cells[col] = Some(value.into());
    }
}

impl Grid for MemoryGrid {
    fn name(&self) -> &str {
        &self.name
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col)?.as_deref()
    }
}

/// Sheet families of the inventory workbook, told apart by sheet name suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetFamily {
    /// `*WAS`: WebSphere keystores, one section per server.
    Was,
    /// `*AIPAC`: DS/SSL keystores.
    Aipac,
    /// `*PLUG.WAS` and `*COMP.PLUG.WAS`: plugin files checked by hash.
    Manifest,
}

impl fmt::Display for SheetFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetFamily::Was => write!(f, "WAS"),
            SheetFamily::Aipac => write!(f, "AIPAC"),
            SheetFamily::Manifest => write!(f, "PLUG.WAS"),
        }
    }
}

impl SheetFamily {
    pub fn detect(sheet_name: &str) -> Option<SheetFamily> {
        let name = sheet_name.trim().to_uppercase();
        if name.contains("PLUG.WAS") {
            Some(SheetFamily::Manifest)
        } else if name.ends_with("WAS") {
            Some(SheetFamily::Was)
        } else if name.ends_with("AIPAC") {
            Some(SheetFamily::Aipac)
        } else {
            None
        }
    }
}

/// First environment whose name appears (case-insensitively) in the sheet name.
pub fn detect_environment<'a, S: AsRef<str>>(sheet_name: &str, environments: &'a [S]) -> Option<&'a str> {
    let name = sheet_name.to_uppercase();
    environments
        .iter()
        .map(AsRef::as_ref)
        .find(|env| !env.is_empty() && name.contains(&env.to_uppercase()))
}

/// Spreadsheet column letters for a zero-based index (0 → `A`, 26 → `AA`).
pub fn column_letter(col: usize) -> String {
    let mut n = col + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(char::from(b'A' + rem as u8));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_grid_from_rows() {
        let grid = MemoryGrid::from_rows("S", vec![vec!["a", "", " b "], vec![]]);
        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.cell(0, 0), Some("a"));
        assert_eq!(grid.cell(0, 1), None);
        assert_eq!(grid.text(0, 2), Some("b"));
        assert_eq!(grid.cell(1, 5), None);
        assert_eq!(grid.cell(9, 0), None);
    }

    #[test]
    fn test_memory_grid_set_grows() {
        let mut grid = MemoryGrid::new("S");
        grid.set(3, 6, "x");
        assert_eq!(grid.row_count(), 4);
        assert_eq!(grid.cell(3, 6), Some("x"));
        assert_eq!(grid.cell(3, 5), None);
    }

    #[test]
    fn test_detect_family() {
        assert_eq!(SheetFamily::detect("CAMARAPROD-WAS"), Some(SheetFamily::Was));
        assert_eq!(SheetFamily::detect("camaraprod-aipac"), Some(SheetFamily::Aipac));
        assert_eq!(SheetFamily::detect("CAMARAPROD-PLUG.WAS"), Some(SheetFamily::Manifest));
        assert_eq!(
            SheetFamily::detect("CAMARAPROD-COMP.PLUG.WAS"),
            Some(SheetFamily::Manifest)
        );
        assert_eq!(SheetFamily::detect("Resumen"), None);
    }

    #[test]
    fn test_detect_environment() {
        let envs = vec!["CAMARAPROD".to_string(), "CAMARATEST".to_string()];
        assert_eq!(detect_environment("camaratest-WAS", &envs), Some("CAMARATEST"));
        assert_eq!(detect_environment("Resumen", &envs), None);
    }

    #[test]
    fn test_column_letter() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(6), "G");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
    }
}
