use once_cell::sync::Lazy;
use std::collections::HashMap;

const SPANISH_MONTHS: [(&str, u32); 12] = [
    ("enero", 1),
    ("febrero", 2),
    ("marzo", 3),
    ("abril", 4),
    ("mayo", 5),
    ("junio", 6),
    ("julio", 7),
    ("agosto", 8),
    ("septiembre", 9),
    ("octubre", 10),
    ("noviembre", 11),
    ("diciembre", 12),
];

const ENGLISH_MONTHS: [(&str, u32); 12] = [
    ("january", 1),
    ("february", 2),
    ("march", 3),
    ("april", 4),
    ("may", 5),
    ("june", 6),
    ("july", 7),
    ("august", 8),
    ("september", 9),
    ("october", 10),
    ("november", 11),
    ("december", 12),
];

/// "may" is already a full name above.
const ENGLISH_ABBREVIATIONS: [(&str, u32); 11] = [
    ("jan", 1),
    ("feb", 2),
    ("mar", 3),
    ("apr", 4),
    ("jun", 6),
    ("jul", 7),
    ("aug", 8),
    ("sep", 9),
    ("oct", 10),
    ("nov", 11),
    ("dec", 12),
];

/// Misspellings found in real inventories, mapped to the month they mean.
const TOLERATED_TYPOS: [(&str, u32); 1] = [("mary", 5)];

static MONTHS: Lazy<HashMap<&'static str, u32>> = Lazy::new(|| {
    SPANISH_MONTHS
        .iter()
        .chain(ENGLISH_MONTHS.iter())
        .chain(ENGLISH_ABBREVIATIONS.iter())
        .chain(TOLERATED_TYPOS.iter())
        .copied()
        .collect()
});

/// Look up a month name (English, Spanish, abbreviation or known typo),
/// ignoring case. Returns the month number 1-12.
pub fn month_number(name: &str) -> Option<u32> {
    MONTHS.get(name.trim().to_lowercase().as_str()).copied()
}
