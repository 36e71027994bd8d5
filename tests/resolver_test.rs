mod common;

use cert_audit::export::{DirectoryIndex, ExportIndex};
use cert_audit::resolver::{resolve, AliasQuery, MatchKind, SimilarityRules};
use common::{create_env_dir, create_test_dir, write_export};

/// Resolve `alias` and report the match kind with the bare file name
fn lookup(index: &DirectoryIndex, section: u32, alias: &str) -> Option<(MatchKind, String)> {
    let query = AliasQuery::new("CAMARAPROD", section, alias);
    resolve(&query, index, &SimilarityRules::default()).map(|found| {
        let name = found
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        (found.kind, name)
    })
}

// ============ Precedence Tests ============

#[test]
fn test_file_name_match_wins_over_label() {
    let temp_dir = create_test_dir();
    let dir = create_env_dir(temp_dir.path(), "CAMARAPROD");
    // Declares the alias as its label, but the exact file name exists too.
    write_export(&dir, "camaraprod_1_PC_aaa-other.out", "web-front", "01", "AA:BB");
    write_export(&dir, "camaraprod_1_SC_web-front.out", "something-else", "02", "CC:DD");

    let index = DirectoryIndex::build(&dir);
    assert_eq!(
        lookup(&index, 1, "web front"),
        Some((MatchKind::FileName, "camaraprod_1_SC_web-front.out".to_string()))
    );
}

#[test]
fn test_file_name_match_tolerates_dropped_last_character() {
    let temp_dir = create_test_dir();
    let dir = create_env_dir(temp_dir.path(), "CAMARAPROD");
    write_export(&dir, "camaraprod_1_PC_backen.out", "other", "01", "AA:BB");

    let index = DirectoryIndex::build(&dir);
    assert_eq!(
        lookup(&index, 1, "BACKEND"),
        Some((MatchKind::FileName, "camaraprod_1_PC_backen.out".to_string()))
    );
}

#[test]
fn test_label_match_wins_over_similarity() {
    let temp_dir = create_test_dir();
    let dir = create_env_dir(temp_dir.path(), "CAMARAPROD");
    write_export(&dir, "camaraprod_3_SC_mysite2024.out", "legacy", "01", "AA:BB");
    write_export(&dir, "camaraprod_3_SC_zz.out", "mysite", "02", "CC:DD");

    let index = DirectoryIndex::build(&dir);
    assert_eq!(
        lookup(&index, 3, "My-Site"),
        Some((MatchKind::Label, "camaraprod_3_SC_zz.out".to_string()))
    );
}

#[test]
fn test_similarity_is_last_resort() {
    let temp_dir = create_test_dir();
    let dir = create_env_dir(temp_dir.path(), "CAMARAPROD");
    write_export(&dir, "camaraprod_5_SC_api_gateway.out", "gw", "01", "AA:BB");

    let index = DirectoryIndex::build(&dir);
    assert_eq!(
        lookup(&index, 5, "Gateway"),
        Some((MatchKind::Similarity, "camaraprod_5_SC_api_gateway.out".to_string()))
    );
}

#[test]
fn test_candidates_scoped_to_section() {
    let temp_dir = create_test_dir();
    let dir = create_env_dir(temp_dir.path(), "CAMARAPROD");
    write_export(&dir, "camaraprod_2_SC_mysite.out", "mysite", "01", "AA:BB");

    let index = DirectoryIndex::build(&dir);
    assert_eq!(lookup(&index, 3, "mysite"), None);
    assert!(lookup(&index, 2, "mysite").is_some());
}

#[test]
fn test_incomplete_export_is_not_a_match() {
    let temp_dir = create_test_dir();
    let dir = create_env_dir(temp_dir.path(), "CAMARAPROD");
    std::fs::write(dir.join("camaraprod_1_SC_mysite.out"), "Label: mysite\n")
        .expect("Failed to write export");

    let index = DirectoryIndex::build(&dir);
    assert_eq!(lookup(&index, 1, "mysite"), None);
}

// ============ Cache Tests ============

#[test]
fn test_export_index_lists_each_directory_once() {
    let temp_dir = create_test_dir();
    let dir = create_env_dir(temp_dir.path(), "CAMARAPROD");
    write_export(&dir, "camaraprod_1_SC_a.out", "a", "01", "AA:BB");

    let mut exports = ExportIndex::new();
    assert_eq!(exports.directory(&dir).len(), 1);

    // Files added after the first listing are not seen during the run.
    write_export(&dir, "camaraprod_1_SC_b.out", "b", "02", "CC:DD");
    assert_eq!(exports.directory(&dir).len(), 1);
    assert_eq!(exports.cached_directories(), 1);

    let mut fresh = ExportIndex::new();
    assert_eq!(fresh.directory(&dir).len(), 2);
}
