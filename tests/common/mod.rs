#![allow(dead_code)]

use cert_audit::config::AuditConfig;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Create a temporary project root
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Reference date used across the integration tests
pub fn test_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).expect("Valid date")
}

/// Default configuration rooted at `root`
pub fn test_config(root: &Path) -> AuditConfig {
    AuditConfig {
        root: root.to_path_buf(),
        ..Default::default()
    }
}

/// Create `<root>/PROCESADOS/<folder>` and return it
pub fn create_env_dir(root: &Path, folder: &str) -> PathBuf {
    let dir = root.join("PROCESADOS").join(folder);
    fs::create_dir_all(&dir).expect("Failed to create environment folder");
    dir
}

/// Write a single-alias export file
pub fn write_export(dir: &Path, file_name: &str, label: &str, serial: &str, sha1: &str) -> PathBuf {
    let content = format!(
        "Label : {label}\n\
         Serial : {serial}\n\
         Issued to: CN={label}.example.com\n\
         Fingerprint : SHA1 :\n    {sha1}\n\
         Fingerprint : SHA256 :\n    00:11:22:33\n"
    );
    let path = dir.join(file_name);
    fs::write(&path, content).expect("Failed to write export");
    path
}

/// Write a multi-alias keystore dump from `(alias, serial)` pairs
pub fn write_keystore_dump(dir: &Path, file_name: &str, entries: &[(&str, &str)]) -> PathBuf {
    let mut content = format!("Keystore type: jks\nYour keystore contains {} entries\n", entries.len());
    for (alias, serial) in entries {
        content.push_str(&format!(
            "\nAlias name: {alias}\nCreation date: Jan 1, 2024\nSerial number: {serial}\n\
             Certificate fingerprints:\n\t SHA1: AA:BB:CC\n"
        ));
    }
    let path = dir.join(file_name);
    fs::write(&path, content).expect("Failed to write keystore dump");
    path
}

/// Write a `sha256sum`-style manifest from `(path, hash)` pairs
pub fn write_hash_manifest(dir: &Path, file_name: &str, entries: &[(&str, &str)]) -> PathBuf {
    let content: String = entries
        .iter()
        .map(|(path, hash)| format!("{hash}  {path}\n"))
        .collect();
    let path = dir.join(file_name);
    fs::write(&path, content).expect("Failed to write manifest");
    path
}
