//! Calendar-day helpers.
//!
//! Everything in the schedule engine works on whole days (`NaiveDate`), never
//! on instants. Time-of-day is truncated before it reaches this module.

use chrono::{Days, NaiveDate};

use crate::error::ValidationError;

/// ISO 8601 calendar date format used for keys and display.
pub const ISO_DATE: &str = "%Y-%m-%d";

/// Format a date as `YYYY-MM-DD`.
pub fn to_iso(date: NaiveDate) -> String {
    date.format(ISO_DATE).to_string()
}

/// Parse a `YYYY-MM-DD` string.
pub fn parse_iso(s: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(s.trim(), ISO_DATE)
        .map_err(|_| ValidationError::InvalidDate(s.to_string()))
}

/// Number of days in `[start, end]`. Zero or negative when `end < start`.
pub fn day_count(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// `date + n` days, saturating at the calendar's upper bound.
pub fn add_days(date: NaiveDate, n: u64) -> NaiveDate {
    date.checked_add_days(Days::new(n)).unwrap_or(NaiveDate::MAX)
}

/// `date - n` days, saturating at the calendar's lower bound.
pub fn sub_days(date: NaiveDate, n: u64) -> NaiveDate {
    date.checked_sub_days(Days::new(n)).unwrap_or(NaiveDate::MIN)
}

/// Iterate every day in `[start, end]`. Empty when `end < start`.
pub fn days_inclusive(start: NaiveDate, end: NaiveDate) -> DayRange {
    DayRange {
        next: Some(start).filter(|s| *s <= end),
        end,
    }
}

/// Iterator returned by [`days_inclusive`].
#[derive(Debug, Clone)]
pub struct DayRange {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl Iterator for DayRange {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next?;
        self.next = current.succ_opt().filter(|d| *d <= self.end);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self
            .next
            .map(|d| day_count(d, self.end).max(0) as usize)
            .unwrap_or(0);
        (n, Some(n))
    }
}

impl ExactSizeIterator for DayRange {}
