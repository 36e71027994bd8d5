use super::context::{DiagnosticKind, RunContext};
use super::diff::DiffEntry;
use super::plan::{CellRef, Field, Instruction, ReconciliationReport};
use crate::config::AuditConfig;
use crate::expiry::{evaluate, Evaluation, ExpiryStatus};
use crate::grid::{detect_environment, Grid, SheetFamily};
use crate::normalize::{normalize_fingerprint, normalize_serial};
use crate::utils::environment_dir;
use chrono::NaiveDate;
use std::path::Path;
use tracing::{debug, info, warn};

/// Reconciles inventory sheets against the environment export folders.
///
/// One engine is one run: the export index, date memo and diff log live for
/// as long as the engine and are shared by every sheet passed to
/// [`process_sheet`](Self::process_sheet). Sheets are processed one at a
/// time, in the order given.
pub struct ReconciliationEngine {
    pub(super) config: AuditConfig,
    pub(super) today: NaiveDate,
    pub(super) ctx: RunContext,
    sheets_processed: usize,
}

impl ReconciliationEngine {
    pub fn new(config: AuditConfig, today: NaiveDate) -> Self {
        Self {
            config,
            today,
            ctx: RunContext::new(),
            sheets_processed: 0,
        }
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    pub fn context(&self) -> &RunContext {
        &self.ctx
    }

    /// Route a sheet to its family processor. Sheets without a known
    /// environment or family are skipped with a diagnostic.
    pub fn process_sheet(&mut self, grid: &dyn Grid) {
        let sheet = grid.name();
        let Some(environment) = detect_environment(sheet, &self.config.environments) else {
            self.ctx.diagnose(
                DiagnosticKind::StructuralFailure,
                sheet,
                "No environment found in sheet name, skipping",
            );
            return;
        };
        let Some(family) = SheetFamily::detect(sheet) else {
            self.ctx.diagnose(
                DiagnosticKind::StructuralFailure,
                sheet,
                "Unrecognized sheet family, skipping",
            );
            return;
        };

        let environment = environment.to_string();
        let dir = environment_dir(&self.config.processed_root(), &environment);
        info!(sheet = %sheet, environment = %environment, family = %family, "Processing sheet");

        match family {
            SheetFamily::Was => self.process_was_sheet(grid, &environment, &dir),
            SheetFamily::Aipac => self.process_aipac_sheet(grid, &environment, &dir),
            SheetFamily::Manifest => self.process_manifest_sheet(grid, &environment, &dir),
        }
        self.sheets_processed += 1;
    }

    /// Consume the engine and hand back everything the run produced.
    pub fn finish(self) -> ReconciliationReport {
        let coverage_percentage = self.ctx.coverage.percentage();
        ReconciliationReport {
            today: self.today,
            alert_threshold_days: self.config.alert_threshold_days,
            sheets_processed: self.sheets_processed,
            instructions: self.ctx.instructions,
            diffs: self.ctx.diffs.into_entries(),
            coverage: self.ctx.coverage,
            coverage_percentage,
            diagnostics: self.ctx.diagnostics,
        }
    }

    /// Whether the environment's export folder exists. A missing folder is
    /// reported once per sheet; expiry checks still run without it.
    pub(super) fn exports_available(&mut self, sheet: &str, dir: &Path) -> bool {
        if self.ctx.exports.directory(dir).exists() {
            return true;
        }
        self.ctx.diagnose(
            DiagnosticKind::InputMissing,
            sheet,
            format!("Export folder not found: {}", dir.display()),
        );
        false
    }

    /// Classify one expiry cell, emit its fill instruction and, for
    /// alerting statuses, a diff entry.
    pub(super) fn classify_expiry(
        &mut self,
        sheet: &str,
        alias: &str,
        cell: CellRef,
        text: Option<&str>,
    ) -> Evaluation {
        let parsed = self.ctx.dates.extract(text);
        let evaluation = evaluate(parsed, self.today, self.config.alert_threshold_days);

        match evaluation.status {
            ExpiryStatus::Vencido | ExpiryStatus::ProximoAVencer => {
                warn!(sheet = %sheet, alias = %alias, cell = %cell.a1(), "{}", evaluation.describe());
            }
            ExpiryStatus::Vigente => {
                debug!(sheet = %sheet, alias = %alias, "{}", evaluation.describe());
            }
            ExpiryStatus::Indeterminado => match text {
                Some(raw) => self.ctx.diagnose(
                    DiagnosticKind::ParseFailure,
                    sheet,
                    format!("'{}': unparseable expiry date '{}'", alias, raw),
                ),
                None => debug!(sheet = %sheet, alias = %alias, "No expiry date"),
            },
        }

        self.ctx.instructions.push(Instruction::Fill {
            cell,
            status: evaluation.status,
        });
        if evaluation.status.is_alert() {
            self.ctx
                .diffs
                .record(DiffEntry::expiry_alert(sheet, alias, &evaluation));
        }
        evaluation
    }

    /// Compare a workbook value with the export's; on mismatch emit an
    /// overwrite with the export's raw value and a diff entry.
    ///
    /// Returns whether the cell is stale. An empty authoritative value never
    /// overwrites anything.
    pub(super) fn compare_field(
        &mut self,
        sheet: &str,
        subject: &str,
        cell: CellRef,
        field: Field,
        current: &str,
        authoritative: &str,
    ) -> bool {
        let (current_norm, authoritative_norm) = match field {
            Field::Fingerprint => (
                normalize_fingerprint(Some(current)),
                normalize_fingerprint(Some(authoritative)),
            ),
            Field::Serial => (
                normalize_serial(Some(current)),
                normalize_serial(Some(authoritative)),
            ),
            Field::Hash => (
                current.trim().to_lowercase(),
                authoritative.trim().to_lowercase(),
            ),
        };

        if authoritative_norm.is_empty() {
            debug!(sheet = %sheet, subject = %subject, field = %field, "No authoritative value");
            return false;
        }
        if current_norm == authoritative_norm {
            debug!(sheet = %sheet, subject = %subject, field = %field, "Up to date");
            return false;
        }

        info!(
            sheet = %sheet,
            subject = %subject,
            field = %field,
            cell = %cell.a1(),
            "Stale value, updating"
        );
        self.ctx.instructions.push(Instruction::Overwrite {
            cell,
            field,
            value: authoritative.trim().to_string(),
        });
        self.ctx
            .diffs
            .record(DiffEntry::field_update(sheet, subject, field));
        true
    }
}

/// Process `sheets` in order with a fresh engine.
pub fn run<'a, I>(config: AuditConfig, today: NaiveDate, sheets: I) -> ReconciliationReport
where
    I: IntoIterator<Item = &'a dyn Grid>,
{
    let mut engine = ReconciliationEngine::new(config, today);
    for sheet in sheets {
        engine.process_sheet(sheet);
    }
    engine.finish()
}
