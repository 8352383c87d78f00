//! Missed-minutes redistribution.
//!
//! Past days never display outstanding debt: a past deficit is cleared on
//! the record and the same number of minutes is spread over today and the
//! remaining days.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{split_evenly, ScheduleEntry};

/// What a redistribution pass moved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedistributionSummary {
    /// Deficit cleared from days before today.
    pub forgiven_minutes: u64,
    /// Portion of the deficit re-planned onto today and later.
    pub carried_minutes: u64,
    /// Number of days that were eligible to receive minutes.
    pub future_days: usize,
}

impl RedistributionSummary {
    /// Minutes cleared with no future day left to carry them.
    pub fn stranded_minutes(&self) -> u64 {
        self.forgiven_minutes - self.carried_minutes
    }
}

/// Move past deficits onto today and later days.
///
/// `today` is a calendar date; entries strictly before it are past.
pub fn redistribute(schedule: Vec<ScheduleEntry>, today: NaiveDate) -> Vec<ScheduleEntry> {
    redistribute_with_summary(schedule, today).0
}

/// [`redistribute`], also reporting how many minutes moved.
pub fn redistribute_with_summary(
    mut schedule: Vec<ScheduleEntry>,
    today: NaiveDate,
) -> (Vec<ScheduleEntry>, RedistributionSummary) {
    let mut missed: u64 = 0;
    let mut future = Vec::new();

    for (index, entry) in schedule.iter_mut().enumerate() {
        if entry.date < today {
            if let Some(deficit) = entry.deficit() {
                missed += u64::from(deficit);
                entry.planned_minutes = entry.completed_minutes;
            }
        } else {
            future.push(index);
        }
    }

    let mut summary = RedistributionSummary {
        forgiven_minutes: missed,
        carried_minutes: 0,
        future_days: future.len(),
    };

    if missed == 0 {
        debug!(%today, "no missed minutes to redistribute");
        return (schedule, summary);
    }

    if future.is_empty() {
        warn!(%today, missed, "missed minutes have no remaining day to move to");
        return (schedule, summary);
    }

    for (index, extra) in future.iter().zip(split_evenly(missed, future.len())) {
        let entry = &mut schedule[*index];
        let extra = u32::try_from(extra).unwrap_or(u32::MAX);
        entry.planned_minutes = entry.planned_minutes.saturating_add(extra);
    }
    summary.carried_minutes = missed;

    info!(
        %today,
        missed,
        future_days = future.len(),
        "redistributed missed minutes"
    );
    (schedule, summary)
}
