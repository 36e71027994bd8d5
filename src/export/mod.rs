//! Certificate export dumps: directory indexing and parsing.
//!
//! Three kinds of export live in an environment folder:
//! - single-alias `.out` files with `Label`, `Serial` and a SHA1 block
//! - multi-alias keystore dumps (`Alias name:` blocks)
//! - path → hash manifests (`<hash> <path>` per line)
//!
//! Parsers never fail: unreadable or incomplete input degrades to `None` or
//! an empty map, with a warning logged.

mod index;
mod parse;
mod types;

pub use index::{build_index, DirectoryIndex, ExportIndex};
pub use parse::{
    parse_export_block, parse_export_text, parse_multi_alias_block, parse_multi_alias_text,
    parse_path_hash_manifest, parse_path_hash_text, read_export_text,
};
pub use types::{ExportRecord, KeystoreEntry};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to read export file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}
