//! Canonical forms for fingerprint and serial-number comparison.

use once_cell::sync::Lazy;
use regex::Regex;

static ALGORITHM_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\s*SHA\d+\s*:\s*").unwrap());

static HEX_BYTE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9A-Fa-f]{2}").unwrap());

static SERIAL_NOISE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s\-:]").unwrap());

/// A hex byte followed by a separator, e.g. `AB:` or `ab `.
static SEPARATED_HEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9A-Fa-f]{2}[\s:]").unwrap());

static SERIAL_CELL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9a-fA-F\s]{4,}$").unwrap());

/// Normalize a fingerprint: drop a leading `SHA<n>:` label, keep the hex
/// byte pairs, join them with single spaces, upper-cased.
///
/// `"SHA1: aa:bb:cc"`, `"aabbcc"` and `"AA BB CC"` all become `"AA BB CC"`.
pub fn normalize_fingerprint(raw: Option<&str>) -> String {
    let raw = match raw {
        Some(r) if !r.is_empty() => r,
        _ => return String::new(),
    };

    let body = ALGORITHM_PREFIX.replace(raw, "");
    HEX_BYTE
        .find_iter(&body)
        .map(|m| m.as_str().to_uppercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalize a serial number: drop whitespace, hyphens and colons, lower-case.
pub fn normalize_serial(raw: Option<&str>) -> String {
    match raw {
        Some(r) if !r.is_empty() => SERIAL_NOISE.replace_all(r, "").to_lowercase(),
        _ => String::new(),
    }
}

/// Whether a spreadsheet cell holds something shaped like a fingerprint
/// (hex bytes with separators) rather than prose or a placeholder.
pub fn looks_like_fingerprint(cell: &str) -> bool {
    SEPARATED_HEX.is_match(cell)
}

/// Whether a spreadsheet cell holds something shaped like a serial number
/// (at least four hex digits, spaces allowed).
pub fn looks_like_serial(cell: &str) -> bool {
    SERIAL_CELL.is_match(cell.trim())
}
