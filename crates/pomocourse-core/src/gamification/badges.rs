//! Badge definitions and unlock rules.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::course::CourseConfig;
use crate::schedule::{total_completed, ScheduleEntry};

/// A badge as stored in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Set once, when the badge is first earned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub achieved_on: Option<NaiveDate>,
}

impl Badge {
    pub fn is_achieved(&self) -> bool {
        self.achieved_on.is_some()
    }

    /// Stamp the badge. Returns `false` if it was already achieved.
    fn achieve(&mut self, date: NaiveDate) -> bool {
        if self.achieved_on.is_some() {
            return false;
        }
        self.achieved_on = Some(date);
        true
    }
}

/// The fixed badge set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BadgeKind {
    Streak3,
    Streak7,
    Streak14,
    Week1,
    PerfectWeek,
    CourseComplete,
}

impl BadgeKind {
    pub const ALL: [BadgeKind; 6] = [
        BadgeKind::Streak3,
        BadgeKind::Streak7,
        BadgeKind::Streak14,
        BadgeKind::Week1,
        BadgeKind::PerfectWeek,
        BadgeKind::CourseComplete,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            BadgeKind::Streak3 => "streak3",
            BadgeKind::Streak7 => "streak7",
            BadgeKind::Streak14 => "streak14",
            BadgeKind::Week1 => "week1",
            BadgeKind::PerfectWeek => "perfectWeek",
            BadgeKind::CourseComplete => "courseComplete",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.id() == id)
    }

    pub fn name(&self) -> &'static str {
        match self {
            BadgeKind::Streak3 => "3-Day Streak",
            BadgeKind::Streak7 => "7-Day Streak",
            BadgeKind::Streak14 => "14-Day Streak",
            BadgeKind::Week1 => "Week 1 Complete",
            BadgeKind::PerfectWeek => "Perfect Week",
            BadgeKind::CourseComplete => "Course Complete!",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            BadgeKind::Streak3 => "Complete your daily goal 3 days in a row.",
            BadgeKind::Streak7 => "Complete your daily goal 7 days in a row.",
            BadgeKind::Streak14 => "Complete your daily goal 14 days in a row.",
            BadgeKind::Week1 => "Finish all Pomodoros for the first week.",
            BadgeKind::PerfectWeek => "Complete 100% of a weekly target.",
            BadgeKind::CourseComplete => "Finish every hour of the course.",
        }
    }

    /// Whether `progress` satisfies this badge.
    pub fn is_unlocked(&self, progress: &BadgeProgress) -> bool {
        match self {
            BadgeKind::Streak3 => progress.streak >= 3,
            BadgeKind::Streak7 => progress.streak >= 7,
            BadgeKind::Streak14 => progress.streak >= 14,
            BadgeKind::Week1 => progress.first_block_done,
            BadgeKind::PerfectWeek => progress.any_block_done,
            BadgeKind::CourseComplete => progress.course_done,
        }
    }

    pub fn to_badge(self) -> Badge {
        Badge {
            id: self.id().to_string(),
            name: self.name().to_string(),
            description: self.description().to_string(),
            achieved_on: None,
        }
    }
}

/// The badge set a fresh document starts with.
pub fn initial_badges() -> Vec<Badge> {
    BadgeKind::ALL.into_iter().map(BadgeKind::to_badge).collect()
}

/// Facts the unlock rules are tested against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BadgeProgress {
    pub streak: u32,
    /// Minutes done inside the first block reach its nominal minutes.
    pub first_block_done: bool,
    /// Same, for any block.
    pub any_block_done: bool,
    /// Minutes done across the plan reach the course total.
    pub course_done: bool,
}

impl BadgeProgress {
    /// Measure progress from the plan as it stands after an event.
    ///
    /// Block targets use nominal block minutes rather than `plannedMinutes`,
    /// because past days have their plan clamped to what was done.
    pub fn measure(schedule: &[ScheduleEntry], course: &CourseConfig, streak: u32) -> Self {
        let block_done: Vec<bool> = course
            .spans()
            .iter()
            .map(|span| {
                let target = span.block.minutes();
                let done: i64 = schedule
                    .iter()
                    .filter(|e| span.contains(e.date))
                    .map(|e| i64::from(e.completed_minutes))
                    .sum();
                target > 0 && done >= target
            })
            .collect();

        let course_minutes = course.total_minutes();
        Self {
            streak,
            first_block_done: block_done.first().copied().unwrap_or(false),
            any_block_done: block_done.iter().any(|done| *done),
            course_done: course_minutes > 0
                && total_completed(schedule) >= course_minutes as u64,
        }
    }
}

/// Stamp every not-yet-achieved badge whose rule now holds.
///
/// Returns the ids stamped by this call. Badges with unknown ids never
/// unlock; achieved badges are never touched.
pub fn evaluate_badges(
    badges: &mut [Badge],
    progress: &BadgeProgress,
    today: NaiveDate,
) -> Vec<String> {
    badges
        .iter_mut()
        .filter(|b| !b.is_achieved())
        .filter(|b| BadgeKind::from_id(&b.id).is_some_and(|k| k.is_unlocked(progress)))
        .filter_map(|b| b.achieve(today).then(|| b.id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::parse_iso;

    fn d(s: &str) -> NaiveDate {
        parse_iso(s).unwrap()
    }

    #[test]
    fn initial_set_has_six_unachieved_badges() {
        let badges = initial_badges();
        assert_eq!(badges.len(), 6);
        assert!(badges.iter().all(|b| !b.is_achieved()));
        assert_eq!(badges[0].id, "streak3");
        assert_eq!(BadgeKind::from_id("perfectWeek"), Some(BadgeKind::PerfectWeek));
        assert_eq!(BadgeKind::from_id("nope"), None);
    }

    #[test]
    fn streak_badges_unlock_at_thresholds() {
        let mut badges = initial_badges();
        let progress = BadgeProgress {
            streak: 7,
            ..BadgeProgress::default()
        };
        let stamped = evaluate_badges(&mut badges, &progress, d("2025-11-20"));
        assert_eq!(stamped, vec!["streak3", "streak7"]);
        assert_eq!(badges[2].achieved_on, None);
    }

    #[test]
    fn achieved_badges_are_never_restamped() {
        let mut badges = initial_badges();
        let progress = BadgeProgress {
            streak: 3,
            ..BadgeProgress::default()
        };
        evaluate_badges(&mut badges, &progress, d("2025-11-20"));
        let stamped = evaluate_badges(&mut badges, &progress, d("2025-11-21"));
        assert!(stamped.is_empty());
        assert_eq!(badges[0].achieved_on, Some(d("2025-11-20")));
    }

    #[test]
    fn unknown_badges_stay_locked() {
        let mut badges = vec![Badge {
            id: "mystery".to_string(),
            name: "Mystery".to_string(),
            description: String::new(),
            achieved_on: None,
        }];
        let progress = BadgeProgress {
            streak: 100,
            first_block_done: true,
            any_block_done: true,
            course_done: true,
        };
        assert!(evaluate_badges(&mut badges, &progress, d("2025-11-20")).is_empty());
    }

    #[test]
    fn block_progress_uses_nominal_minutes() {
        let course = CourseConfig::default();
        // First block is 6.5 hours over Nov 6-12.
        let mut schedule: Vec<ScheduleEntry> = crate::calendar::days_inclusive(
            d("2025-11-06"),
            d("2025-11-12"),
        )
        .map(|date| ScheduleEntry::new(date, "HTML & CSS", 0))
        .collect();

        let progress = BadgeProgress::measure(&schedule, &course, 0);
        assert!(!progress.first_block_done);

        for entry in schedule.iter_mut() {
            entry.completed_minutes = 56;
        }
        // 7 * 56 = 392 >= 390
        let progress = BadgeProgress::measure(&schedule, &course, 0);
        assert!(progress.first_block_done);
        assert!(progress.any_block_done);
        assert!(!progress.course_done);
    }
}
