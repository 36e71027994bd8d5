use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// List a directory once: lower-cased entry name → real entry name.
///
/// A directory that does not exist (or cannot be read) yields an empty map.
pub fn build_index(dir: &Path) -> BTreeMap<String, String> {
    let mut entries = BTreeMap::new();

    if !dir.is_dir() {
        return entries;
    }

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if let Some(name) = entry.file_name().to_str() {
            entries.insert(name.to_lowercase(), name.to_string());
        }
    }

    entries
}

/// Case-insensitive view of one export directory.
///
/// Iteration is in lower-cased name order so candidate scans are reproducible.
#[derive(Debug, Clone)]
pub struct DirectoryIndex {
    root: PathBuf,
    exists: bool,
    entries: BTreeMap<String, String>,
}

impl DirectoryIndex {
    pub fn build(dir: &Path) -> Self {
        let entries = build_index(dir);
        debug!(directory = %dir.display(), entries = entries.len(), "Indexed export directory");
        Self {
            root: dir.to_path_buf(),
            exists: dir.is_dir(),
            entries,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether the directory existed when it was indexed.
    pub fn exists(&self) -> bool {
        self.exists
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Full path of the entry whose name equals `name` ignoring case.
    pub fn lookup(&self, name: &str) -> Option<PathBuf> {
        self.entries
            .get(&name.to_lowercase())
            .map(|real| self.root.join(real))
    }

    /// Real entry names, in lower-cased order.
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(String::as_str)
    }

    /// Entries whose lower-cased name satisfies `predicate`, as full paths.
    pub fn matching<'a, F>(&'a self, predicate: F) -> impl Iterator<Item = PathBuf> + 'a
    where
        F: Fn(&str) -> bool + 'a,
    {
        self.entries
            .iter()
            .filter(move |(lower, _)| predicate(lower))
            .map(move |(_, real)| self.root.join(real))
    }

    /// First entry (in index order) whose lower-cased name satisfies `predicate`.
    pub fn find<F>(&self, predicate: F) -> Option<PathBuf>
    where
        F: Fn(&str) -> bool,
    {
        self.entries
            .iter()
            .find(|(lower, _)| predicate(lower))
            .map(|(_, real)| self.root.join(real))
    }
}

/// Per-run cache of directory indexes, keyed by absolute path.
///
/// Each directory is listed at most once; entries are never refreshed, the
/// export folders are treated as static for the duration of a run.
#[derive(Debug, Default)]
pub struct ExportIndex {
    directories: HashMap<PathBuf, DirectoryIndex>,
}

impl ExportIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index for `dir`, building it on first access.
    pub fn directory(&mut self, dir: &Path) -> &DirectoryIndex {
        let key = absolute_path(dir);
        self.directories
            .entry(key)
            .or_insert_with_key(|key| DirectoryIndex::build(key))
    }

    /// Number of directories indexed so far in this run.
    pub fn cached_directories(&self) -> usize {
        self.directories.len()
    }
}

fn absolute_path(dir: &Path) -> PathBuf {
    dir.canonicalize()
        .or_else(|_| std::path::absolute(dir))
        .unwrap_or_else(|_| dir.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_build_index_lowercases_keys() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("CamaraProd_3_SC_MySite.out"), "x").unwrap();

        let index = build_index(dir.path());
        assert_eq!(
            index.get("camaraprod_3_sc_mysite.out").map(String::as_str),
            Some("CamaraProd_3_SC_MySite.out")
        );
    }

    #[test]
    fn test_build_index_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(build_index(&dir.path().join("nope")).is_empty());

        let index = DirectoryIndex::build(&dir.path().join("nope"));
        assert!(!index.exists());
        assert!(index.is_empty());
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Keystore.OUT"), "x").unwrap();

        let index = DirectoryIndex::build(dir.path());
        assert_eq!(index.lookup("keystore.out"), Some(dir.path().join("Keystore.OUT")));
        assert_eq!(index.lookup("other.out"), None);
    }

    #[test]
    fn test_export_index_lists_directory_once() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.out"), "x").unwrap();

        let mut cache = ExportIndex::new();
        assert_eq!(cache.directory(dir.path()).len(), 1);

        // Files added mid-run are not picked up: the listing is memoized.
        fs::write(dir.path().join("b.out"), "x").unwrap();
        assert_eq!(cache.directory(dir.path()).len(), 1);
        assert_eq!(cache.cached_directories(), 1);

        // A fresh cache sees the new state.
        let mut fresh = ExportIndex::new();
        assert_eq!(fresh.directory(dir.path()).len(), 2);
    }
}
