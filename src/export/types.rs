use serde::Serialize;

/// Authoritative data for one certificate, taken from a single-alias export
/// file (`{env}_{section}_{role}_{alias}.out`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRecord {
    /// Alias declared inside the export, lower-cased.
    pub label: String,
    /// Serial as written in the export (trimmed, lower-cased).
    pub serial: String,
    /// SHA1 fingerprint bytes, upper-case, space separated.
    pub fingerprint: String,
}

/// One alias block of a multi-alias keystore dump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeystoreEntry {
    pub serial: String,
    /// Raw colon-separated SHA1, empty when the block had none.
    pub fingerprint: String,
}
