//! Date slot normalization.
//!
//! Turns a raw `Date` slot value into a canonical calendar key plus the long
//! spoken form used in responses. "Now" is always passed in by the caller so
//! the defaulting logic stays deterministic under test.

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Canonical key format, zero-padded. Used both as the remote API path
/// parameter and as the school-calendar lookup key.
pub const CALENDAR_KEY_FORMAT: &str = "%Y-%m-%d";

/// The date slot was present but could not be parsed. Callers reprompt for a
/// new date; this never reaches the platform boundary.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("could not parse date slot value '{raw}'")]
pub struct InvalidDate {
    pub raw: String,
}

/// A resolved date slot.
///
/// The calendar key and display string always describe the same day;
/// construct one only through [`normalize`] or [`MenuDate::from_naive`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MenuDate {
    pub calendar_date: String,
    pub display_date: String,
}

impl MenuDate {
    pub fn from_naive(date: NaiveDate) -> Self {
        Self {
            calendar_date: date.format(CALENDAR_KEY_FORMAT).to_string(),
            display_date: display_date(date),
        }
    }
}

/// Resolves a raw date slot into a [`MenuDate`].
///
/// An absent or empty slot defaults to today, or to tomorrow once the
/// wall-clock hour reaches `cutoff_hour`. A present slot is parsed verbatim
/// as `YYYY-MM-DD` with no fuzzy correction.
pub fn normalize(
    raw: Option<&str>,
    now: NaiveDateTime,
    cutoff_hour: u32,
) -> Result<MenuDate, InvalidDate> {
    let date = match raw.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => NaiveDate::parse_from_str(value, CALENDAR_KEY_FORMAT)
            .map_err(|_| InvalidDate {
                raw: value.to_string(),
            })?,
        None => default_date(now, cutoff_hour),
    };
    Ok(MenuDate::from_naive(date))
}

/// Today's date, or tomorrow's once the cutoff hour has passed. The advance
/// is a real calendar increment and carries across month and year ends.
fn default_date(now: NaiveDateTime, cutoff_hour: u32) -> NaiveDate {
    let today = now.date();
    if now.hour() >= cutoff_hour {
        today.succ_opt().unwrap_or(today)
    } else {
        today
    }
}

/// Long spoken form, e.g. "Saturday June 20th".
fn display_date(date: NaiveDate) -> String {
    use chrono::Datelike;
    format!(
        "{} {} {}",
        date.format("%A"),
        date.format("%B"),
        ordinal(date.day())
    )
}

fn ordinal(day: u32) -> String {
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{day}{suffix}")
}
