use crate::utils::EXPORT_EXTENSION;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Shortest normalized name allowed to match by containment.
pub const DEFAULT_MIN_CONTAINED_LEN: usize = 4;

/// How many extra trailing characters a name may carry and still match.
pub const DEFAULT_TRAILING_TOLERANCE: usize = 1;

static ROLE_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^(SC_|PC_)").unwrap());

static NAME_SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s\-_=,.]+").unwrap());

/// Thresholds for fuzzy alias ↔ file name matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimilarityRules {
    /// Containment only counts when the shorter name has at least this many
    /// characters; short names like "ca" would otherwise match everything.
    pub min_contained_len: usize,
    /// One name may extend the other by at most this many trailing characters.
    pub trailing_tolerance: usize,
}

impl Default for SimilarityRules {
    fn default() -> Self {
        Self {
            min_contained_len: DEFAULT_MIN_CONTAINED_LEN,
            trailing_tolerance: DEFAULT_TRAILING_TOLERANCE,
        }
    }
}

impl SimilarityRules {
    /// Compare an inventory alias with an export file name.
    ///
    /// Both sides are normalized with [`normalize_name`]; the file name is
    /// first reduced to its alias part (`{env}_{section}_{role}_{alias}.out`).
    pub fn is_similar(&self, alias: &str, file_name: &str) -> bool {
        let a = normalize_name(alias);
        let b = normalize_name(alias_part_of_file_name(file_name));
        self.names_match(&a, &b)
    }

    /// Compare two already-normalized names; `a` is the alias side, whose
    /// length gates both the containment and the trailing-character rules.
    pub fn names_match(&self, a: &str, b: &str) -> bool {
        if a.is_empty() || b.is_empty() {
            return false;
        }
        if a == b {
            return true;
        }

        let (shorter, longer) = if a.chars().count() <= b.chars().count() {
            (a, b)
        } else {
            (b, a)
        };
        let shorter_len = shorter.chars().count();
        let longer_len = longer.chars().count();

        if shorter_len >= self.min_contained_len && longer.contains(shorter) {
            return true;
        }

        a.chars().count() >= self.min_contained_len
            && longer_len - shorter_len <= self.trailing_tolerance
            && longer.starts_with(shorter)
    }
}

/// Lower-case a name and drop the role prefix and separator characters
/// (whitespace, `-`, `_`, `=`, `,`, `.`).
pub fn normalize_name(name: &str) -> String {
    let without_role = ROLE_PREFIX.replace(name.trim(), "");
    NAME_SEPARATORS.replace_all(&without_role, "").to_lowercase()
}

/// Strip a role prefix (`SC_`, `PC_`) from an alias, keeping its case.
pub fn strip_role_prefix(alias: &str) -> String {
    ROLE_PREFIX.replace(alias.trim(), "").into_owned()
}

/// The alias part of `{env}_{section}_{role}_{alias}.out`; the whole stem
/// when the name does not have four `_`-separated parts.
pub fn alias_part_of_file_name(file_name: &str) -> &str {
    let stem = strip_suffix_ignore_case(file_name, EXPORT_EXTENSION);
    let parts: Vec<&str> = stem.splitn(4, '_').collect();
    if parts.len() == 4 {
        parts[3]
    } else {
        stem
    }
}

fn strip_suffix_ignore_case<'a>(name: &'a str, suffix: &str) -> &'a str {
    if name.len() >= suffix.len()
        && name.is_char_boundary(name.len() - suffix.len())
        && name[name.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
    {
        &name[..name.len() - suffix.len()]
    } else {
        name
    }
}
