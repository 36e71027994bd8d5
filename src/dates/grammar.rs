use super::months::month_number;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;

static ISO: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2})$").unwrap());

static UNTIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)until:\s*([0-9]{1,2})/([0-9]{1,2})/([0-9]{2,4})").unwrap());

static TO_MONTH_DAY_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bto\s+(\w+)\s+([0-9]{1,2}),?\s+([0-9]{4})").unwrap());

static TO_DAY_MONTH_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bto\s+([0-9]{1,2})\s+(\w+),?\s+([0-9]{4})").unwrap());

static TO_MONTH_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bto\s+(\w+),?\s+([0-9]{4})").unwrap());

static TRAILING_MONTH_DAY_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\w+)\s+([0-9]{1,2}),?\s+([0-9]{4})[\s.]*$").unwrap());

/// One recognized way of writing an expiry date.
///
/// Grammars are independent and side-effect free. [`DateGrammar::ORDERED`]
/// fixes the order in which they are tried; the first one that yields a valid
/// calendar date wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DateGrammar {
    /// `2026-05-18`
    Iso,
    /// `10/26/07 7:42 AM until: 10/21/27 7:42 AM`
    Until,
    /// `... to May 18, 2026`
    ToMonthDayYear,
    /// `... to 18 Mayo 2026`
    ToDayMonthYear,
    /// `... to May 2040` (resolves to the last day of that month)
    ToMonthYear,
    /// `... December 31, 2028.` at the end of the text
    TrailingMonthDayYear,
}

impl DateGrammar {
    pub const ORDERED: [DateGrammar; 6] = [
        DateGrammar::Iso,
        DateGrammar::Until,
        DateGrammar::ToMonthDayYear,
        DateGrammar::ToDayMonthYear,
        DateGrammar::ToMonthYear,
        DateGrammar::TrailingMonthDayYear,
    ];

    /// Try this grammar alone against already-trimmed text.
    pub fn parse(self, text: &str) -> Option<NaiveDate> {
        match self {
            DateGrammar::Iso => ISO
                .captures(text)
                .and_then(|c| ymd(number(&c, 1)?, number(&c, 2)?, number(&c, 3)?)),
            DateGrammar::Until => UNTIL.captures_iter(text).find_map(|c| {
                let mut year = number(&c, 3)?;
                if year < 100 {
                    year += 2000;
                }
                ymd(year, number(&c, 1)?, number(&c, 2)?)
            }),
            DateGrammar::ToMonthDayYear => TO_MONTH_DAY_YEAR.captures_iter(text).find_map(|c| {
                ymd(number(&c, 3)?, month_number(&c[1])?, number(&c, 2)?)
            }),
            DateGrammar::ToDayMonthYear => TO_DAY_MONTH_YEAR.captures_iter(text).find_map(|c| {
                ymd(number(&c, 3)?, month_number(&c[2])?, number(&c, 1)?)
            }),
            DateGrammar::ToMonthYear => TO_MONTH_YEAR
                .captures_iter(text)
                .find_map(|c| last_day_of_month(number(&c, 2)?, month_number(&c[1])?)),
            DateGrammar::TrailingMonthDayYear => TRAILING_MONTH_DAY_YEAR
                .captures(text)
                .and_then(|c| ymd(number(&c, 3)?, month_number(&c[1])?, number(&c, 2)?)),
        }
    }
}

fn number(captures: &Captures<'_>, group: usize) -> Option<u32> {
    captures.get(group)?.as_str().parse().ok()
}

fn ymd(year: u32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, day)
}

fn last_day_of_month(year: u32, month: u32) -> Option<NaiveDate> {
    let year = i32::try_from(year).ok()?;
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    // Rejects month 0 and 13+ as well.
    NaiveDate::from_ymd_opt(year, month, 1)?;
    first_of_next.pred_opt()
}
