//! School calendar lookups.
//!
//! The calendar is a static mapping from calendar key to a day-number label
//! (e.g. `"Day 3"`), shipped with the deployment as a JSON file and loaded
//! once at startup. An absent key means the day is not a school day.

use anyhow::{Context, Result};
use chrono::{Datelike, Days, NaiveDate};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::dates::{CALENDAR_KEY_FORMAT, MenuDate};

#[derive(Debug, Clone)]
pub struct SchoolCalendar {
    days: HashMap<String, String>,
}

impl SchoolCalendar {
    pub fn new(days: HashMap<String, String>) -> Self {
        Self { days }
    }

    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let days = serde_json::from_reader(reader)
            .context("school calendar must be a JSON object of date keys to day labels")?;
        Ok(Self { days })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open school calendar at {}", path.display()))?;
        Self::from_reader(BufReader::new(file))
    }

    /// Exact membership, no fuzzy matching.
    pub fn is_school_day(&self, key: &str) -> bool {
        self.days.contains_key(key)
    }

    /// The day-number label for a school day, if the key is one.
    pub fn day_label(&self, key: &str) -> Option<&str> {
        self.days.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// True iff the date falls within Monday through Friday of the week
/// containing `today`. Takes a normalized [`MenuDate`], never a raw slot
/// string.
pub fn is_current_week(date: &MenuDate, today: NaiveDate) -> bool {
    let Ok(parsed) = NaiveDate::parse_from_str(&date.calendar_date, CALENDAR_KEY_FORMAT) else {
        return false;
    };
    let offset = u64::from(today.weekday().num_days_from_monday());
    let Some(monday) = today.checked_sub_days(Days::new(offset)) else {
        return false;
    };
    let Some(friday) = monday.checked_add_days(Days::new(4)) else {
        return false;
    };
    parsed >= monday && parsed <= friday
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calendar() -> SchoolCalendar {
        let mut days = HashMap::new();
        days.insert("2016-11-14".to_string(), "Day 1".to_string());
        days.insert("2016-11-15".to_string(), "Day 2".to_string());
        SchoolCalendar::new(days)
    }

    fn menu_date(key: &str) -> MenuDate {
        let parsed = NaiveDate::parse_from_str(key, CALENDAR_KEY_FORMAT).unwrap();
        MenuDate::from_naive(parsed)
    }

    #[test]
    fn membership_is_exact() {
        let calendar = calendar();
        assert!(calendar.is_school_day("2016-11-14"));
        assert!(calendar.is_school_day("2016-11-15"));
        assert!(!calendar.is_school_day("2016-11-16"));
        // No fuzzy matching on formatting variants.
        assert!(!calendar.is_school_day("2016-11-4"));
    }

    #[test]
    fn day_label_lookup() {
        let calendar = calendar();
        assert_eq!(calendar.day_label("2016-11-14"), Some("Day 1"));
        assert_eq!(calendar.day_label("2016-11-19"), None);
    }

    #[test]
    fn loads_from_json() {
        let json = r#"{"2016-11-14": "Day 1", "2016-11-15": "Day 2"}"#;
        let calendar = SchoolCalendar::from_reader(json.as_bytes()).unwrap();
        assert_eq!(calendar.len(), 2);
        assert_eq!(calendar.day_label("2016-11-15"), Some("Day 2"));
    }

    #[test]
    fn rejects_malformed_json() {
        let json = r#"["2016-11-14"]"#;
        assert!(SchoolCalendar::from_reader(json.as_bytes()).is_err());
    }

    #[test]
    fn week_includes_monday_through_friday() {
        // 2016-11-16 was a Wednesday.
        let today = NaiveDate::from_ymd_opt(2016, 11, 16).unwrap();
        assert!(is_current_week(&menu_date("2016-11-14"), today));
        assert!(is_current_week(&menu_date("2016-11-16"), today));
        assert!(is_current_week(&menu_date("2016-11-18"), today));
    }

    #[test]
    fn week_excludes_weekend_and_other_weeks() {
        let today = NaiveDate::from_ymd_opt(2016, 11, 16).unwrap();
        assert!(!is_current_week(&menu_date("2016-11-12"), today));
        assert!(!is_current_week(&menu_date("2016-11-19"), today));
        assert!(!is_current_week(&menu_date("2016-11-21"), today));
        assert!(!is_current_week(&menu_date("2016-11-11"), today));
    }

    #[test]
    fn weekend_now_still_anchors_to_its_own_week() {
        // On a Sunday, the menu week that just ended is still "current".
        let today = NaiveDate::from_ymd_opt(2016, 11, 20).unwrap();
        assert!(is_current_week(&menu_date("2016-11-14"), today));
        assert!(!is_current_week(&menu_date("2016-11-21"), today));
    }
}
