use super::diff::DiffLog;
use super::plan::Instruction;
use crate::dates::DateMemo;
use crate::export::ExportIndex;
use serde::Serialize;
use tracing::warn;

/// How many alias rows were matched to an export file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageStats {
    pub resolved: usize,
    pub not_found: usize,
    pub total: usize,
}

impl CoverageStats {
    pub fn record_resolved(&mut self) {
        self.resolved += 1;
        self.total += 1;
    }

    pub fn record_not_found(&mut self) {
        self.not_found += 1;
        self.total += 1;
    }

    /// Share of resolved lookups, 0..=100. Zero when nothing was looked up.
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.resolved as f64 * 100.0 / self.total as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A date or export could not be parsed.
    ParseFailure,
    /// An alias or path has no counterpart in the exports.
    ResolutionGap,
    /// An export folder or keystore/manifest file is missing.
    InputMissing,
    /// A sheet could not be routed (unknown environment or family).
    StructuralFailure,
}

/// A recoverable problem met during the run. Never aborts processing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub sheet: String,
    pub message: String,
}

/// Mutable state shared by every sheet of one run.
#[derive(Debug, Default)]
pub struct RunContext {
    pub exports: ExportIndex,
    pub dates: DateMemo,
    pub diffs: DiffLog,
    pub coverage: CoverageStats,
    pub diagnostics: Vec<Diagnostic>,
    pub instructions: Vec<Instruction>,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnose(&mut self, kind: DiagnosticKind, sheet: &str, message: impl Into<String>) {
        let message = message.into();
        warn!(kind = ?kind, sheet = %sheet, "{}", message);
        self.diagnostics.push(Diagnostic {
            kind,
            sheet: sheet.to_string(),
            message,
        });
    }
}
