//! `*AIPAC` sheets: one section per keystore, serials checked against a
//! multi-alias dump of that keystore.

use super::context::DiagnosticKind;
use super::engine::ReconciliationEngine;
use super::plan::{CellRef, Field};
use crate::export::{parse_multi_alias_block, KeystoreEntry};
use crate::grid::Grid;
use crate::utils::is_certificate_alias;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::info;

const COL_MARKER: usize = 1;
const COL_ALIAS: usize = 2;
const COL_SERIAL: usize = 9;
const COL_EXPIRY: usize = 10;

type KeystoreDump = BTreeMap<String, KeystoreEntry>;

impl ReconciliationEngine {
    pub(super) fn process_aipac_sheet(&mut self, grid: &dyn Grid, environment: &str, dir: &Path) {
        let sheet = grid.name();
        let exports_available = self.exports_available(sheet, dir);
        let dumps = if exports_available {
            self.load_keystore_dumps(sheet, environment, dir)
        } else {
            HashMap::new()
        };

        let keystores: Vec<String> = self.config.keystores.clone();
        let mut keystore: Option<&str> = None;

        for row in 0..grid.row_count() {
            if let Some(marker) = grid.text(row, COL_MARKER).map(str::to_lowercase) {
                if let Some(found) = keystores
                    .iter()
                    .find(|k| marker.contains(&k.to_lowercase()))
                {
                    info!(sheet = %sheet, keystore = %found, "Keystore section");
                    keystore = Some(found.as_str());
                    continue;
                }
            }

            let Some(alias) = grid
                .text(row, COL_ALIAS)
                .filter(|cell| is_certificate_alias(Some(cell)))
            else {
                continue;
            };

            self.classify_expiry(
                sheet,
                alias,
                CellRef::new(sheet, row, COL_EXPIRY),
                grid.text(row, COL_EXPIRY),
            );

            let (Some(current), Some(keystore)) = (grid.text(row, COL_SERIAL), keystore) else {
                continue;
            };
            if !exports_available {
                continue;
            }

            let entry = dumps
                .get(&keystore.to_lowercase())
                .and_then(|dump| dump.get(&alias.to_lowercase()));
            match entry {
                Some(entry) => {
                    self.ctx.coverage.record_resolved();
                    self.compare_field(
                        sheet,
                        &format!("{} | {}", keystore, alias),
                        CellRef::new(sheet, row, COL_SERIAL),
                        Field::Serial,
                        current,
                        &entry.serial,
                    );
                }
                None => {
                    self.ctx.coverage.record_not_found();
                    self.ctx.diagnose(
                        DiagnosticKind::ResolutionGap,
                        sheet,
                        format!("[{}] '{}': alias not in keystore dump", keystore, alias),
                    );
                }
            }
        }
    }

    /// Parse every configured keystore's dump for `environment`, keyed by
    /// lower-cased keystore name. The dump is the first export whose name
    /// starts with the environment and contains the keystore name.
    fn load_keystore_dumps(
        &mut self,
        sheet: &str,
        environment: &str,
        dir: &Path,
    ) -> HashMap<String, KeystoreDump> {
        let env_prefix = environment.to_lowercase();
        let keystores = self.config.keystores.clone();
        let mut dumps = HashMap::new();

        for keystore in keystores {
            let needle = keystore.to_lowercase();
            let found = self
                .ctx
                .exports
                .directory(dir)
                .find(|name| name.starts_with(&env_prefix) && name.contains(&needle));

            match found {
                Some(path) => {
                    let dump = parse_multi_alias_block(&path);
                    info!(
                        sheet = %sheet,
                        keystore = %keystore,
                        file = %path.display(),
                        aliases = dump.len(),
                        "Keystore dump loaded"
                    );
                    dumps.insert(needle, dump);
                }
                None => {
                    self.ctx.diagnose(
                        DiagnosticKind::InputMissing,
                        sheet,
                        format!("No dump found for keystore {}", keystore),
                    );
                    dumps.insert(needle, KeystoreDump::new());
                }
            }
        }
        dumps
    }
}
