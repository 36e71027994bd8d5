//! `*PLUG.WAS` sheets: plugin file paths (A) with their expected hash (B),
//! checked against the environment's path → hash manifest.

use super::context::DiagnosticKind;
use super::engine::ReconciliationEngine;
use super::plan::{CellRef, Field};
use crate::export::parse_path_hash_manifest;
use crate::grid::Grid;
use std::path::Path;
use tracing::info;

const COL_PATH: usize = 0;
const COL_HASH: usize = 1;
/// Row 1 is the header.
const FIRST_DATA_ROW: usize = 1;

impl ReconciliationEngine {
    pub(super) fn process_manifest_sheet(
        &mut self,
        grid: &dyn Grid,
        environment: &str,
        dir: &Path,
    ) {
        let sheet = grid.name();
        if !self.exports_available(sheet, dir) {
            return;
        }

        let env_prefix = environment.to_lowercase();
        let marker = self.config.manifest_marker.to_lowercase();
        let found = self
            .ctx
            .exports
            .directory(dir)
            .find(|name| name.starts_with(&env_prefix) && name.contains(&marker));
        let Some(manifest_path) = found else {
            self.ctx.diagnose(
                DiagnosticKind::InputMissing,
                sheet,
                format!("No '{}' manifest found in {}", marker, dir.display()),
            );
            return;
        };

        let hashes = parse_path_hash_manifest(&manifest_path);
        info!(
            sheet = %sheet,
            file = %manifest_path.display(),
            paths = hashes.len(),
            "Manifest loaded"
        );

        for row in FIRST_DATA_ROW..grid.row_count() {
            let Some(path) = grid.text(row, COL_PATH).filter(|p| p.starts_with('/')) else {
                continue;
            };
            let Some(expected) = hashes.get(path) else {
                self.ctx.diagnose(
                    DiagnosticKind::ResolutionGap,
                    sheet,
                    format!("'{}': not in manifest", path),
                );
                continue;
            };
            let current = grid.text(row, COL_HASH).unwrap_or("");
            self.compare_field(
                sheet,
                path,
                CellRef::new(sheet, row, COL_HASH),
                Field::Hash,
                current,
                expected,
            );
        }
    }
}
