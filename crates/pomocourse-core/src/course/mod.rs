//! Course definition: the calendar window, the total study budget, and the
//! weekly focus blocks that partition it.
//!
//! A block only names its first day. Unless it carries an explicit
//! `end_date`, it runs through the day before the next block starts, and the
//! last block runs to the end of the course. Days that fall outside every
//! block are review days with nothing planned.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::{self, days_inclusive, sub_days};
use crate::error::ConfigError;

/// Topic given to course days not covered by any focus block.
pub const REVIEW_TOPIC: &str = "Review";

/// A named, dated, topic-labelled slice of the course budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyFocusBlock {
    pub name: String,
    pub start_date: NaiveDate,
    pub hours: f64,
    pub topic: String,
    /// Last day of the block. Derived from the next block when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl WeeklyFocusBlock {
    pub fn new(name: &str, start_date: NaiveDate, hours: f64, topic: &str) -> Self {
        Self {
            name: name.to_string(),
            start_date,
            hours,
            topic: topic.to_string(),
            end_date: None,
        }
    }

    /// Nominal whole minutes for the block.
    pub fn minutes(&self) -> i64 {
        hours_to_minutes(self.hours)
    }
}

/// A block together with the concrete days it covers inside the course.
#[derive(Debug, Clone, Copy)]
pub struct BlockSpan<'a> {
    pub block: &'a WeeklyFocusBlock,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl BlockSpan<'_> {
    pub fn days(&self) -> calendar::DayRange {
        days_inclusive(self.start, self.end)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// The fixed course the schedule is generated for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseConfig {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_hours: f64,
    #[serde(default)]
    pub weekly_focus: Vec<WeeklyFocusBlock>,
}

impl Default for CourseConfig {
    fn default() -> Self {
        let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default();
        Self {
            start_date: date(2025, 11, 6),
            end_date: date(2026, 1, 1),
            total_hours: 64.0,
            weekly_focus: vec![
                WeeklyFocusBlock::new("Nov 6–12", date(2025, 11, 6), 6.5, "HTML & CSS"),
                WeeklyFocusBlock::new("Nov 13–26", date(2025, 11, 13), 22.0, "JavaScript"),
                WeeklyFocusBlock::new("Nov 27–Dec 9", date(2025, 11, 27), 15.5, "React"),
                WeeklyFocusBlock::new("Dec 10–13", date(2025, 12, 10), 0.9, "Tailwind CSS"),
                WeeklyFocusBlock::new(
                    "Dec 14–22",
                    date(2025, 12, 14),
                    10.0,
                    "Backend (ChaiAurCode)",
                ),
                WeeklyFocusBlock::new("Dec 23–28", date(2025, 12, 23), 6.2, "Backend (Auth)"),
                WeeklyFocusBlock::new(
                    "Dec 29–31",
                    date(2025, 12, 29),
                    2.25,
                    "Git & System Design",
                ),
            ],
        }
    }
}

impl CourseConfig {
    /// Total course budget in whole minutes.
    pub fn total_minutes(&self) -> i64 {
        hours_to_minutes(self.total_hours)
    }

    /// Number of days in the course window.
    pub fn day_count(&self) -> i64 {
        calendar::day_count(self.start_date, self.end_date)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Concrete spans of every block, clipped to the course window.
    ///
    /// A span whose `end` precedes its `start` covers no days.
    pub fn spans(&self) -> Vec<BlockSpan<'_>> {
        self.weekly_focus
            .iter()
            .enumerate()
            .map(|(i, block)| {
                let implied_end = self
                    .weekly_focus
                    .get(i + 1)
                    .map(|next| sub_days(next.start_date, 1))
                    .unwrap_or(self.end_date);
                let end = block.end_date.unwrap_or(implied_end).min(self.end_date);
                let start = block.start_date.max(self.start_date);
                BlockSpan { block, start, end }
            })
            .collect()
    }

    /// Check the window and blocks for consistency.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidValue` naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.end_date < self.start_date {
            return Err(invalid(
                "course.end_date",
                format!(
                    "{} is before start_date {}",
                    self.end_date, self.start_date
                ),
            ));
        }
        if !self.total_hours.is_finite() || self.total_hours < 0.0 {
            return Err(invalid(
                "course.total_hours",
                format!("{} is not a non-negative number", self.total_hours),
            ));
        }

        for (i, block) in self.weekly_focus.iter().enumerate() {
            let key = format!("course.weekly_focus[{i}]");
            if !block.hours.is_finite() || block.hours < 0.0 {
                return Err(invalid(
                    &format!("{key}.hours"),
                    format!("{} is not a non-negative number", block.hours),
                ));
            }
            if let Some(end) = block.end_date {
                if end < block.start_date {
                    return Err(invalid(
                        &format!("{key}.end_date"),
                        format!("{end} is before start_date {}", block.start_date),
                    ));
                }
            }
            if let Some(next) = self.weekly_focus.get(i + 1) {
                if next.start_date <= block.start_date {
                    return Err(invalid(
                        &format!("course.weekly_focus[{}].start_date", i + 1),
                        "blocks must be listed in ascending start_date order".to_string(),
                    ));
                }
                if block.end_date.is_some_and(|end| end >= next.start_date) {
                    return Err(invalid(
                        &format!("{key}.end_date"),
                        format!("overlaps block starting {}", next.start_date),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Convert fractional hours to whole minutes, rounding half away from zero.
pub fn hours_to_minutes(hours: f64) -> i64 {
    (hours * 60.0).round() as i64
}

fn invalid(key: &str, message: String) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message,
    }
}
