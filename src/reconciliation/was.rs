//! `*WAS` sheets: one numbered section per server, signer certificates
//! followed by personal certificates.
//!
//! | col | signer rows | personal rows |
//! |-----|-------------|---------------|
//! | A   | `N.-` section header | |
//! | B   | | `# personal certificates` marker |
//! | C   | alias | alias |
//! | E   | fingerprint | |
//! | F   | serial, expiry | serial |
//! | G   | | expiry |

use super::context::DiagnosticKind;
use super::engine::ReconciliationEngine;
use super::plan::{CellRef, Field};
use crate::grid::Grid;
use crate::normalize::{looks_like_fingerprint, looks_like_serial};
use crate::resolver::{resolve, AliasQuery};
use crate::utils::is_certificate_alias;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tracing::{debug, info};

const COL_SECTION: usize = 0;
const COL_MARKER: usize = 1;
const COL_ALIAS: usize = 2;
const COL_FINGERPRINT: usize = 4;
const COL_SERIAL: usize = 5;
const COL_SIGNER_EXPIRY: usize = 5;
const COL_PERSONAL_EXPIRY: usize = 6;

const PERSONAL_MARKER: &str = "# personal certificates";

static SECTION_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)\.-").unwrap());

/// Section number of an `N.- server name` header cell.
pub fn section_number(cell: &str) -> Option<u32> {
    SECTION_HEADER
        .captures(cell.trim())
        .and_then(|c| c[1].parse().ok())
}

impl ReconciliationEngine {
    pub(super) fn process_was_sheet(&mut self, grid: &dyn Grid, environment: &str, dir: &Path) {
        let sheet = grid.name();
        let exports_available = self.exports_available(sheet, dir);
        let mut section: Option<u32> = None;
        let mut personal = false;

        for row in 0..grid.row_count() {
            if let Some(number) = grid.text(row, COL_SECTION).and_then(section_number) {
                info!(sheet = %sheet, section = number, "Section");
                section = Some(number);
                personal = false;
                continue;
            }
            if grid
                .text(row, COL_MARKER)
                .is_some_and(|b| b.to_lowercase().contains(PERSONAL_MARKER))
            {
                personal = true;
                continue;
            }

            let Some(alias) = grid
                .text(row, COL_ALIAS)
                .filter(|cell| is_certificate_alias(Some(cell)))
            else {
                continue;
            };

            let expiry_col = if personal {
                COL_PERSONAL_EXPIRY
            } else {
                COL_SIGNER_EXPIRY
            };
            self.classify_expiry(
                sheet,
                alias,
                CellRef::new(sheet, row, expiry_col),
                grid.text(row, expiry_col),
            );

            let Some(section) = section else {
                debug!(sheet = %sheet, alias = %alias, "Alias outside any section, not resolved");
                continue;
            };
            if !exports_available {
                continue;
            }

            let query = AliasQuery::new(environment, section, alias);
            let resolved = {
                let index = self.ctx.exports.directory(dir);
                resolve(&query, index, &self.config.similarity)
            };
            let Some(resolved) = resolved else {
                self.ctx.coverage.record_not_found();
                self.ctx.diagnose(
                    DiagnosticKind::ResolutionGap,
                    sheet,
                    format!("#{} '{}': no export file found", section, alias),
                );
                continue;
            };
            self.ctx.coverage.record_resolved();
            debug!(
                sheet = %sheet,
                alias = %alias,
                kind = ?resolved.kind,
                file = %resolved.path.display(),
                "Export resolved"
            );

            let subject = format!("#{} {}", section, alias);
            if !personal {
                if let Some(current) = grid
                    .text(row, COL_FINGERPRINT)
                    .filter(|cell| looks_like_fingerprint(cell))
                {
                    self.compare_field(
                        sheet,
                        &subject,
                        CellRef::new(sheet, row, COL_FINGERPRINT),
                        Field::Fingerprint,
                        current,
                        &resolved.record.fingerprint,
                    );
                }
            }
            if let Some(current) = grid
                .text(row, COL_SERIAL)
                .filter(|cell| looks_like_serial(cell))
            {
                self.compare_field(
                    sheet,
                    &subject,
                    CellRef::new(sheet, row, COL_SERIAL),
                    Field::Serial,
                    current,
                    &resolved.record.serial,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_number() {
        assert_eq!(section_number("3.- SERVIDOR APP01"), Some(3));
        assert_eq!(section_number(" 12.-"), Some(12));
        assert_eq!(section_number("3. SERVIDOR"), None);
        assert_eq!(section_number("Alias"), None);
    }
}
