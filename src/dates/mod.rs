//! Expiry date extraction from free-text validity strings.
//!
//! Inventory cells are written by hand, in English or Spanish, with several
//! phrasings ("Valid from May 18, 2025 to May 18, 2026.", "until: 10/21/27",
//! "to 18 Mayo 2026", plain ISO dates...). Each phrasing is a [`DateGrammar`];
//! extraction tries them in a fixed order and never guesses a default date.

mod grammar;
mod months;

pub use grammar::DateGrammar;
pub use months::month_number;

use chrono::NaiveDate;
use std::collections::HashMap;

/// A calendar date, or `None` when the text could not be parsed.
pub type ParsedDate = Option<NaiveDate>;

/// Extract the expiry date from a validity string.
pub fn extract_expiry_date(text: Option<&str>) -> ParsedDate {
    extract_with_grammar(text).map(|(_, date)| date)
}

/// Like [`extract_expiry_date`], also reporting which grammar matched.
pub fn extract_with_grammar(text: Option<&str>) -> Option<(DateGrammar, NaiveDate)> {
    let text = text?.trim();
    if text.is_empty() {
        return None;
    }

    DateGrammar::ORDERED
        .iter()
        .find_map(|grammar| grammar.parse(text).map(|date| (*grammar, date)))
}

/// Per-run memo so the same expiry text is parsed at most once.
#[derive(Debug, Default)]
pub struct DateMemo {
    parsed: HashMap<String, ParsedDate>,
}

impl DateMemo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extract(&mut self, text: Option<&str>) -> ParsedDate {
        let key = match text.map(str::trim) {
            Some(t) if !t.is_empty() => t,
            _ => return None,
        };

        if let Some(parsed) = self.parsed.get(key) {
            return *parsed;
        }

        let parsed = extract_expiry_date(Some(key));
        self.parsed.insert(key.to_string(), parsed);
        parsed
    }

    /// Number of distinct texts parsed so far.
    pub fn len(&self) -> usize {
        self.parsed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_extract_empty_and_none() {
        assert_eq!(extract_expiry_date(None), None);
        assert_eq!(extract_expiry_date(Some("")), None);
        assert_eq!(extract_expiry_date(Some("   ")), None);
    }

    #[test]
    fn test_extract_iso() {
        assert_eq!(extract_expiry_date(Some(" 2026-05-18 ")), Some(date(2026, 5, 18)));
    }

    #[test]
    fn test_extract_reports_grammar() {
        let (grammar, parsed) =
            extract_with_grammar(Some("Valid from 18 Mayo 2025, to  18 Mayo 2026")).unwrap();
        assert_eq!(grammar, DateGrammar::ToDayMonthYear);
        assert_eq!(parsed, date(2026, 5, 18));
    }

    #[test]
    fn test_extract_priority_until_before_to() {
        // Both grammars appear; "until:" is tried first.
        let text = "valid to May 1, 2030 until: 01/02/29";
        assert_eq!(extract_expiry_date(Some(text)), Some(date(2029, 1, 2)));
    }

    #[test]
    fn test_extract_invalid_day_is_unparseable() {
        assert_eq!(extract_expiry_date(Some("Valid from May 1, 2024 to April 31, 2025")), None);
        assert_eq!(extract_expiry_date(Some("2025-04-31")), None);
    }

    #[test]
    fn test_extract_typo_month() {
        assert_eq!(
            extract_expiry_date(Some("Valid from Mary 3, 2024 to Mary 3, 2026")),
            Some(date(2026, 5, 3))
        );
    }

    #[test]
    fn test_extract_garbage() {
        assert_eq!(extract_expiry_date(Some("N/A")), None);
        assert_eq!(extract_expiry_date(Some("pendiente de renovar")), None);
    }

    #[test]
    fn test_date_memo_parses_each_text_once() {
        let mut memo = DateMemo::new();
        let first = memo.extract(Some("2026-05-18"));
        let second = memo.extract(Some("  2026-05-18"));
        assert_eq!(first, second);
        assert_eq!(memo.len(), 1);

        assert_eq!(memo.extract(Some("nonsense")), None);
        assert_eq!(memo.len(), 2);
        assert_eq!(memo.extract(None), None);
        assert_eq!(memo.len(), 2);
    }
}
