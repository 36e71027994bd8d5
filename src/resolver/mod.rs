//! Alias → export file resolution.
//!
//! Inventory aliases are typed by hand and rarely match export file names
//! exactly. Resolution is layered and stops at the first hit:
//! 1. exact file name built from the alias (both role tags, with and without
//!    the last character)
//! 2. the `Label` declared inside each candidate export of the section
//! 3. fuzzy name similarity ([`SimilarityRules`])

mod similarity;

pub use similarity::{
    alias_part_of_file_name, normalize_name, strip_role_prefix, SimilarityRules,
    DEFAULT_MIN_CONTAINED_LEN, DEFAULT_TRAILING_TOLERANCE,
};

use crate::export::{parse_export_block, DirectoryIndex, ExportRecord};
use crate::utils::{EXPORT_EXTENSION, ROLE_TAGS};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, warn};

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static LABEL_NOISE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s\-_]+").unwrap());

/// The lookup key an inventory row supplies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasQuery {
    pub environment: String,
    pub section: u32,
    pub alias: String,
}

impl AliasQuery {
    pub fn new(environment: impl Into<String>, section: u32, alias: impl Into<String>) -> Self {
        Self {
            environment: environment.into(),
            section,
            alias: alias.into(),
        }
    }

    /// `{env}_{section}_`, lower-cased: the prefix shared by every export of
    /// this section.
    pub fn section_prefix(&self) -> String {
        format!("{}_{}_", self.environment.to_lowercase(), self.section)
    }
}

/// Which resolution layer produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    FileName,
    Label,
    Similarity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedExport {
    pub path: PathBuf,
    pub record: ExportRecord,
    pub kind: MatchKind,
}

/// A resolved export, or `None` when no layer matched.
pub type MatchResult = Option<ResolvedExport>;

/// Resolve an inventory alias against one environment's export directory.
pub fn resolve(query: &AliasQuery, index: &DirectoryIndex, rules: &SimilarityRules) -> MatchResult {
    if let Some(found) = resolve_by_file_name(query, index) {
        return Some(found);
    }

    let prefix = query.section_prefix();
    let candidates: Vec<(PathBuf, ExportRecord)> = index
        .matching(move |name| name.starts_with(&prefix) && name.ends_with(EXPORT_EXTENSION))
        .filter_map(|path| parse_export_block(&path).map(|record| (path, record)))
        .collect();

    if let Some((path, record)) = candidates
        .iter()
        .find(|(_, record)| labels_match(&record.label, &query.alias))
    {
        debug!(alias = %query.alias, file = %path.display(), "Resolved by label");
        return Some(ResolvedExport {
            path: path.clone(),
            record: record.clone(),
            kind: MatchKind::Label,
        });
    }

    candidates
        .into_iter()
        .find(|(path, _)| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|name| rules.is_similar(&query.alias, name))
        })
        .map(|(path, record)| {
            debug!(alias = %query.alias, file = %path.display(), "Resolved by name similarity");
            ResolvedExport {
                path,
                record,
                kind: MatchKind::Similarity,
            }
        })
}

fn resolve_by_file_name(query: &AliasQuery, index: &DirectoryIndex) -> MatchResult {
    for name in candidate_file_names(query) {
        let Some(path) = index.lookup(&name) else {
            continue;
        };
        match parse_export_block(&path) {
            Some(record) => {
                debug!(alias = %query.alias, file = %path.display(), "Resolved by file name");
                return Some(ResolvedExport {
                    path,
                    record,
                    kind: MatchKind::FileName,
                });
            }
            None => warn!(file = %path.display(), "Export lacks Label, Serial or SHA1 block"),
        }
    }
    None
}

/// File names an export for this alias would have under the naming
/// convention, in lookup order: each role tag, alias as given then with its
/// last character dropped.
pub fn candidate_file_names(query: &AliasQuery) -> Vec<String> {
    let slug = alias_to_file_slug(&strip_role_prefix(&query.alias));
    if slug.is_empty() {
        return Vec::new();
    }

    let mut variants = vec![slug.clone()];
    if slug.chars().count() > 3 {
        let mut shortened = slug.clone();
        shortened.pop();
        variants.push(shortened);
    }

    let environment = query.environment.to_lowercase();
    let mut names = Vec::with_capacity(ROLE_TAGS.len() * variants.len());
    for tag in ROLE_TAGS {
        for variant in &variants {
            names.push(format!(
                "{}_{}_{}_{}{}",
                environment, query.section, tag, variant, EXPORT_EXTENSION
            ));
        }
    }
    names
}

/// Whitespace runs become `-`, leading/trailing `-` removed.
pub fn alias_to_file_slug(alias: &str) -> String {
    WHITESPACE_RUN
        .replace_all(alias.trim(), "-")
        .trim_matches('-')
        .to_string()
}

/// Case-insensitive label comparison that also ignores whitespace, `-` and
/// `_` (an inventory "My-Site" matches a declared label "mysite").
pub fn labels_match(label: &str, alias: &str) -> bool {
    let label = label.trim().to_lowercase();
    let alias = alias.trim().to_lowercase();
    if label.is_empty() || alias.is_empty() {
        return false;
    }
    if label == alias {
        return true;
    }
    let compact_label = LABEL_NOISE.replace_all(&label, "");
    let compact_alias = LABEL_NOISE.replace_all(&alias, "");
    !compact_label.is_empty() && compact_label == compact_alias
}
