use super::context::{CoverageStats, Diagnostic};
use super::diff::{DiffEntry, DiffKind};
use crate::expiry::ExpiryStatus;
use crate::grid::column_letter;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// A cell of the inventory workbook (zero-based row and column).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellRef {
    pub sheet: String,
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    pub fn new(sheet: impl Into<String>, row: usize, col: usize) -> Self {
        Self {
            sheet: sheet.into(),
            row,
            col,
        }
    }

    /// Spreadsheet notation, e.g. `F12`.
    pub fn a1(&self) -> String {
        format!("{}{}", column_letter(self.col), self.row + 1)
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}!{}", self.sheet, self.a1())
    }
}

/// Fields the engine may overwrite with the export's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Fingerprint,
    Serial,
    Hash,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Fingerprint => write!(f, "FP"),
            Field::Serial => write!(f, "Serial"),
            Field::Hash => write!(f, "hash"),
        }
    }
}

/// A change to apply to the workbook. The engine never writes cells itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Instruction {
    /// Color the expiry cell according to its status.
    Fill { cell: CellRef, status: ExpiryStatus },
    /// Replace a stale value with the export's.
    Overwrite {
        cell: CellRef,
        field: Field,
        value: String,
    },
}

impl Instruction {
    pub fn cell(&self) -> &CellRef {
        match self {
            Instruction::Fill { cell, .. } | Instruction::Overwrite { cell, .. } => cell,
        }
    }
}

/// Everything a run produced, written to disk as the audit plan.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationReport {
    pub today: NaiveDate,
    pub alert_threshold_days: i64,
    pub sheets_processed: usize,
    pub instructions: Vec<Instruction>,
    pub diffs: Vec<DiffEntry>,
    pub coverage: CoverageStats,
    pub coverage_percentage: f64,
    pub diagnostics: Vec<Diagnostic>,
}

impl ReconciliationReport {
    pub fn alerts(&self) -> impl Iterator<Item = &DiffEntry> {
        self.diffs.iter().filter(|d| d.kind == DiffKind::ExpiryAlert)
    }

    pub fn updates(&self) -> impl Iterator<Item = &DiffEntry> {
        self.diffs.iter().filter(|d| d.kind == DiffKind::FieldUpdate)
    }

    pub fn fills(&self) -> impl Iterator<Item = (&CellRef, ExpiryStatus)> {
        self.instructions.iter().filter_map(|i| match i {
            Instruction::Fill { cell, status } => Some((cell, *status)),
            _ => None,
        })
    }

    pub fn overwrites(&self) -> impl Iterator<Item = (&CellRef, Field, &str)> {
        self.instructions.iter().filter_map(|i| match i {
            Instruction::Overwrite { cell, field, value } => Some((cell, *field, value.as_str())),
            _ => None,
        })
    }

    pub fn has_differences(&self) -> bool {
        !self.diffs.is_empty()
    }
}
