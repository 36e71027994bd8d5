use super::types::{ExportRecord, KeystoreEntry};
use super::ExportError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::warn;

static LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^Label\s*:\s*(.+)$").unwrap());

static SERIAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^Serial\s*:\s*(.+)$").unwrap());

static SHA1_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Fingerprint\s*:\s*SHA1\s*:[ \t\r]*\n").unwrap());

static FINGERPRINT_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"Fingerprint\s*:").unwrap());

static HEX_BYTE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9A-Fa-f]{2}").unwrap());

static ALIAS_BOUNDARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^Alias name:").unwrap());

static ALIAS_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^Alias name:\s*(.+)$").unwrap());

static SERIAL_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^Serial number:\s*([0-9a-fA-F]+)").unwrap());

static KEYSTORE_SHA1: Lazy<Regex> = Lazy::new(|| Regex::new(r"SHA1:\s*([0-9A-Fa-f:]+)").unwrap());

/// Read an export file, replacing invalid UTF-8 instead of failing.
pub fn read_export_text(path: &Path) -> Result<String, ExportError> {
    let bytes = fs::read(path).map_err(|source| ExportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Parse a single-alias export file. `None` when the file cannot be read or
/// lacks any of `Label`, `Serial` or the SHA1 fingerprint block.
pub fn parse_export_block(path: &Path) -> Option<ExportRecord> {
    match read_export_text(path) {
        Ok(text) => parse_export_text(&text),
        Err(e) => {
            warn!("{}", e);
            None
        }
    }
}

/// Parse the text of a single-alias export.
///
/// The fingerprint is the byte dump after `Fingerprint: SHA1:` up to the next
/// `Fingerprint:` marker (usually SHA256) or the end of the text.
pub fn parse_export_text(text: &str) -> Option<ExportRecord> {
    let label = LABEL.captures(text)?[1].trim().to_lowercase();
    let serial = SERIAL.captures(text)?[1].trim().to_lowercase();

    let header = SHA1_HEADER.find(text)?;
    let rest = &text[header.end()..];
    let block = match FINGERPRINT_MARKER.find(rest) {
        Some(next) => &rest[..next.start()],
        None => rest,
    };

    let fingerprint = HEX_BYTE
        .find_iter(block)
        .map(|m| m.as_str().to_uppercase())
        .collect::<Vec<_>>()
        .join(" ");

    Some(ExportRecord {
        label,
        serial,
        fingerprint,
    })
}

/// Parse a multi-alias keystore dump (`keytool -list -v` style) into
/// alias → entry. Blocks without an alias or a serial are skipped.
pub fn parse_multi_alias_block(path: &Path) -> BTreeMap<String, KeystoreEntry> {
    match read_export_text(path) {
        Ok(text) => parse_multi_alias_text(&text),
        Err(e) => {
            warn!("{}", e);
            BTreeMap::new()
        }
    }
}

pub fn parse_multi_alias_text(text: &str) -> BTreeMap<String, KeystoreEntry> {
    let mut starts: Vec<usize> = ALIAS_BOUNDARY.find_iter(text).map(|m| m.start()).collect();
    starts.insert(0, 0);
    starts.push(text.len());

    let mut entries = BTreeMap::new();
    for window in starts.windows(2) {
        let block = &text[window[0]..window[1]];

        let alias = match ALIAS_NAME.captures(block) {
            Some(c) => c[1].trim().to_lowercase(),
            None => continue,
        };
        let serial = match SERIAL_NUMBER.captures(block) {
            Some(c) => c[1].trim().to_lowercase(),
            None => continue,
        };
        let fingerprint = KEYSTORE_SHA1
            .captures(block)
            .map(|c| c[1].trim().to_string())
            .unwrap_or_default();

        entries.insert(alias, KeystoreEntry { serial, fingerprint });
    }

    entries
}

/// Parse a `sha256sum`-style manifest into path → hash. Lines without both
/// a hash and a path are skipped.
pub fn parse_path_hash_manifest(path: &Path) -> BTreeMap<String, String> {
    match read_export_text(path) {
        Ok(text) => parse_path_hash_text(&text),
        Err(e) => {
            warn!("{}", e);
            BTreeMap::new()
        }
    }
}

pub fn parse_path_hash_text(text: &str) -> BTreeMap<String, String> {
    text.lines()
        .filter_map(|line| {
            let line = line.trim();
            let (hash, path) = line.split_once(char::is_whitespace)?;
            let path = path.trim();
            if hash.is_empty() || path.is_empty() {
                return None;
            }
            Some((path.to_string(), hash.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SINGLE_EXPORT: &str = "\
Label : MySite
Serial : 0A 1B 2C
Issued to: CN=mysite.example.com
Fingerprint : SHA1 :
    AA:BB:CC:DD
    EE:FF
Fingerprint : SHA256 :
    11:22:33:44
";

    #[test]
    fn test_parse_export_text() {
        let record = parse_export_text(SINGLE_EXPORT).expect("Should parse");
        assert_eq!(record.label, "mysite");
        assert_eq!(record.serial, "0a 1b 2c");
        assert_eq!(record.fingerprint, "AA BB CC DD EE FF");
    }

    #[test]
    fn test_parse_export_text_sha1_until_end() {
        let text = "Label: a\nSerial: 01\nFingerprint: SHA1:\n  01:02\n";
        let record = parse_export_text(text).expect("Should parse");
        assert_eq!(record.fingerprint, "01 02");
    }

    #[test]
    fn test_parse_export_text_missing_fields() {
        assert!(parse_export_text("Serial: 01\nFingerprint: SHA1:\n 01:02\n").is_none());
        assert!(parse_export_text("Label: a\nFingerprint: SHA1:\n 01:02\n").is_none());
        assert!(parse_export_text("Label: a\nSerial: 01\n").is_none());
    }

    #[test]
    fn test_parse_multi_alias_text() {
        let text = "\
Keystore type: jks
Your keystore contains 3 entries

Alias name: signer-one
Creation date: Jan 1, 2024
Serial number: 1a2b3c
Certificate fingerprints:
	 SHA1: AA:BB:CC
	 SHA256: 11:22

Alias name: Broken
Creation date: Jan 1, 2024

Alias name: SSL-Main
Serial number: 0f0f
";
        let entries = parse_multi_alias_text(text);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries["signer-one"].serial, "1a2b3c");
        assert_eq!(entries["signer-one"].fingerprint, "AA:BB:CC");
        assert_eq!(entries["ssl-main"].serial, "0f0f");
        assert_eq!(entries["ssl-main"].fingerprint, "");
        assert!(!entries.contains_key("broken"));
    }

    #[test]
    fn test_parse_path_hash_text() {
        let text = "\
abc123  /opt/IBM/plugin/plugin-cfg.xml

def456 /opt/IBM/plugin/key.kdb
malformed
";
        let map = parse_path_hash_text(text);
        assert_eq!(map.len(), 2);
        assert_eq!(map["/opt/IBM/plugin/plugin-cfg.xml"], "abc123");
        assert_eq!(map["/opt/IBM/plugin/key.kdb"], "def456");
    }

    #[test]
    fn test_parse_export_block_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(parse_export_block(&dir.path().join("missing.out")).is_none());
        assert!(parse_multi_alias_block(&dir.path().join("missing.out")).is_empty());
        assert!(parse_path_hash_manifest(&dir.path().join("missing.sha256")).is_empty());
    }
}
