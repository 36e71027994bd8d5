//! Loading the inventory workbook (xlsx, xls, xlsb, ods) into in-memory grids.
//!
//! Every cell is reduced to text: whole floats lose their decimals, date
//! cells become ISO dates so the expiry parser can read them.

use crate::grid::MemoryGrid;
use calamine::{open_workbook_auto, Data, Reader};
use chrono::{Days, NaiveDate};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum WorkbookError {
    #[error("Workbook not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to open workbook {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        source: calamine::Error,
    },

    #[error("Failed to read sheet '{sheet}': {source}")]
    Sheet {
        sheet: String,
        source: calamine::Error,
    },

    #[error("Workbook {} contains no sheets", .0.display())]
    Empty(PathBuf),
}

/// Read every sheet of the workbook, in workbook order.
pub fn load_workbook(path: &Path) -> Result<Vec<MemoryGrid>, WorkbookError> {
    if !path.is_file() {
        return Err(WorkbookError::NotFound(path.to_path_buf()));
    }

    let mut workbook = open_workbook_auto(path).map_err(|source| WorkbookError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    if sheet_names.is_empty() {
        return Err(WorkbookError::Empty(path.to_path_buf()));
    }

    let mut grids = Vec::with_capacity(sheet_names.len());
    for name in &sheet_names {
        let range = workbook
            .worksheet_range(name)
            .map_err(|source| WorkbookError::Sheet {
                sheet: name.clone(),
                source,
            })?;

        // Range start offset (data may not begin at A1)
        let (start_row, start_col) = range.start().unwrap_or((0, 0));
        let mut grid = MemoryGrid::new(name.as_str());
        let mut cells = 0usize;
        for (row_idx, row) in range.rows().enumerate() {
            for (col_idx, cell) in row.iter().enumerate() {
                if let Some(text) = cell_text(cell) {
                    grid.set(
                        start_row as usize + row_idx,
                        start_col as usize + col_idx,
                        text,
                    );
                    cells += 1;
                }
            }
        }
        debug!(sheet = %name, cells, "Sheet loaded");
        grids.push(grid);
    }

    info!(workbook = %path.display(), sheets = grids.len(), "Workbook loaded");
    Ok(grids)
}

/// Text form of a cell; `None` for empty cells.
pub fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
            (!s.is_empty()).then(|| s.clone())
        }
        Data::Float(n) => Some(format_number(*n)),
        Data::Int(n) => Some(n.to_string()),
        Data::Bool(b) => Some(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::Error(e) => Some(format!("#{:?}", e)),
        Data::DateTime(dt) => {
            let serial = dt.as_f64();
            Some(
                serial_to_date(serial)
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| format_number(serial)),
            )
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Excel 1900 date system serial → calendar date (time of day dropped).
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_days(Days::new(serial.floor() as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&Data::Empty), None);
        assert_eq!(cell_text(&Data::String(String::new())), None);
        assert_eq!(cell_text(&Data::String("mysite".into())), Some("mysite".into()));
        assert_eq!(cell_text(&Data::Float(1234.0)), Some("1234".into()));
        assert_eq!(cell_text(&Data::Float(1.5)), Some("1.5".into()));
        assert_eq!(cell_text(&Data::Int(7)), Some("7".into()));
        assert_eq!(cell_text(&Data::Bool(true)), Some("TRUE".into()));
    }

    #[test]
    fn test_serial_to_date() {
        assert_eq!(
            serial_to_date(45658.0),
            NaiveDate::from_ymd_opt(2025, 1, 1)
        );
        assert_eq!(
            serial_to_date(45658.75),
            NaiveDate::from_ymd_opt(2025, 1, 1)
        );
        assert_eq!(serial_to_date(0.5), None);
    }

    #[test]
    fn test_load_workbook_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_workbook(&dir.path().join("REPORTE.xlsx"));
        assert!(matches!(result, Err(WorkbookError::NotFound(_))));
    }
}
