pub mod config;
pub mod dates;
pub mod expiry;
pub mod export;
pub mod grid;
pub mod normalize;
pub mod reconciliation;
pub mod resolver;
pub mod utils;
pub mod workbook;

// Re-export commonly used types
pub use config::{read_config, AuditConfig, ConfigError};
pub use dates::{extract_expiry_date, DateGrammar, DateMemo, ParsedDate};
pub use expiry::{evaluate, Evaluation, ExpiryStatus};
pub use export::{
    parse_export_block, parse_multi_alias_block, parse_path_hash_manifest, DirectoryIndex,
    ExportError, ExportIndex, ExportRecord, KeystoreEntry,
};
pub use grid::{Grid, MemoryGrid, SheetFamily};
pub use normalize::{normalize_fingerprint, normalize_serial};
pub use reconciliation::{
    run, CellRef, CoverageStats, Diagnostic, DiagnosticKind, DiffEntry, Field, Instruction,
    ReconciliationEngine, ReconciliationReport,
};
pub use resolver::{resolve, AliasQuery, MatchKind, MatchResult, ResolvedExport, SimilarityRules};
pub use workbook::{load_workbook, WorkbookError};
