use super::plan::Field;
use crate::expiry::Evaluation;
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffKind {
    ExpiryAlert,
    FieldUpdate,
}

/// Identity of a diff: the same condition on the same subject is reported once.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffKey {
    pub sheet: String,
    /// Alias, `#section alias`, `keystore | alias` or manifest path.
    pub subject: String,
    /// Expiry status or field name.
    pub condition: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffEntry {
    pub kind: DiffKind,
    pub key: DiffKey,
    pub text: String,
}

impl DiffEntry {
    /// `[<sheet>] '<alias>': VENCIDO hace N dias (<date>)`
    pub fn expiry_alert(sheet: &str, alias: &str, evaluation: &Evaluation) -> Self {
        Self {
            kind: DiffKind::ExpiryAlert,
            key: DiffKey {
                sheet: sheet.to_string(),
                subject: alias.to_string(),
                condition: evaluation.status.to_string(),
            },
            text: format!("[{}] '{}': {}", sheet, alias, evaluation.describe()),
        }
    }

    /// `<sheet> | <subject> | <field> actualizado`
    pub fn field_update(sheet: &str, subject: &str, field: Field) -> Self {
        Self {
            kind: DiffKind::FieldUpdate,
            key: DiffKey {
                sheet: sheet.to_string(),
                subject: subject.to_string(),
                condition: field.to_string(),
            },
            text: format!("{} | {} | {} actualizado", sheet, subject, field),
        }
    }
}

/// Ordered, de-duplicated list of differences found during a run.
#[derive(Debug, Default)]
pub struct DiffLog {
    seen: HashSet<DiffKey>,
    entries: Vec<DiffEntry>,
}

impl DiffLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `entry` unless an entry with the same key was already recorded.
    /// Returns whether it was added.
    pub fn record(&mut self, entry: DiffEntry) -> bool {
        if !self.seen.insert(entry.key.clone()) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    pub fn entries(&self) -> &[DiffEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<DiffEntry> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expiry::evaluate;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_expiry_alert_text() {
        let evaluation = evaluate(Some(date(2024, 12, 29)), date(2025, 1, 1), 90);
        let entry = DiffEntry::expiry_alert("CAMARAPROD-WAS", "mysite", &evaluation);
        assert_eq!(
            entry.text,
            "[CAMARAPROD-WAS] 'mysite': VENCIDO hace 3 dias (2024-12-29)"
        );
        assert_eq!(entry.key.condition, "VENCIDO");
    }

    #[test]
    fn test_field_update_text() {
        let entry = DiffEntry::field_update("CAMARAPROD-WAS", "#3 mysite", Field::Serial);
        assert_eq!(entry.text, "CAMARAPROD-WAS | #3 mysite | Serial actualizado");
    }

    #[test]
    fn test_record_deduplicates() {
        let mut log = DiffLog::new();
        assert!(log.record(DiffEntry::field_update("S", "#1 a", Field::Fingerprint)));
        assert!(!log.record(DiffEntry::field_update("S", "#1 a", Field::Fingerprint)));
        assert!(log.record(DiffEntry::field_update("S", "#1 a", Field::Serial)));
        assert!(log.record(DiffEntry::field_update("T", "#1 a", Field::Serial)));
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_record_keeps_insertion_order() {
        let mut log = DiffLog::new();
        log.record(DiffEntry::field_update("S", "b", Field::Hash));
        log.record(DiffEntry::field_update("S", "a", Field::Hash));
        let subjects: Vec<&str> = log.entries().iter().map(|e| e.key.subject.as_str()).collect();
        assert_eq!(subjects, vec!["b", "a"]);
    }
}
