mod aipac;
mod context;
mod diff;
mod engine;
mod hashes;
mod plan;
mod was;

pub use context::{CoverageStats, Diagnostic, DiagnosticKind, RunContext};
pub use diff::{DiffEntry, DiffKey, DiffKind, DiffLog};
pub use engine::{run, ReconciliationEngine};
pub use plan::{CellRef, Field, Instruction, ReconciliationReport};
pub use was::section_number;
