//! Day-by-day study plan.
//!
//! The plan is an ordered `Vec<ScheduleEntry>`, one entry per course day.
//! [`generate`] builds or repairs it from the course definition and
//! [`redistribute`] moves unmet minutes from past days onto today and later.

mod generator;
mod redistribute;

pub use generator::generate;
pub use redistribute::{redistribute, redistribute_with_summary, RedistributionSummary};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One calendar day of the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub date: NaiveDate,
    pub topic: String,
    pub planned_minutes: u32,
    /// May exceed `planned_minutes`; overwork is kept as recorded.
    pub completed_minutes: u32,
}

impl ScheduleEntry {
    pub fn new(date: NaiveDate, topic: &str, planned_minutes: u32) -> Self {
        Self {
            date,
            topic: topic.to_string(),
            planned_minutes,
            completed_minutes: 0,
        }
    }

    /// Minutes still owed for this day, if any.
    pub fn deficit(&self) -> Option<u32> {
        self.planned_minutes
            .checked_sub(self.completed_minutes)
            .filter(|d| *d > 0)
    }

    pub fn goal_met(&self) -> bool {
        self.completed_minutes >= self.planned_minutes
    }
}

/// Sum of planned minutes across the plan.
pub fn total_planned(schedule: &[ScheduleEntry]) -> u64 {
    schedule.iter().map(|e| u64::from(e.planned_minutes)).sum()
}

/// Sum of completed minutes across the plan.
pub fn total_completed(schedule: &[ScheduleEntry]) -> u64 {
    schedule.iter().map(|e| u64::from(e.completed_minutes)).sum()
}

/// Entry for an exact date.
pub fn entry_for(schedule: &[ScheduleEntry], date: NaiveDate) -> Option<&ScheduleEntry> {
    schedule.iter().find(|e| e.date == date)
}

/// Split `total` into `parts` integers that differ by at most one.
///
/// The remainder goes one unit at a time to the earliest parts, so the
/// result always sums back to `total`.
pub(crate) fn split_evenly(total: u64, parts: usize) -> Vec<u64> {
    if parts == 0 {
        return Vec::new();
    }
    let n = parts as u64;
    let base = total / n;
    let remainder = (total % n) as usize;
    (0..parts)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect()
}
