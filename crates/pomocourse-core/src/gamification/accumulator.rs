//! Completion-event accumulator.
//!
//! ## Steps per event
//!
//! 1. credit today's plan entry (a missing entry is tolerated)
//! 2. award the per-pomodoro points
//! 3. on a goal crossing, award the daily bonus and extend the streak
//! 4. recompute the level from the point total
//! 5. stamp newly earned badges with today's date
//! 6. raise the max streak
//!
//! The streak counts crossings. It does not check that yesterday's goal was
//! met, so a gap day does not reset it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::debug;

use super::badges::{evaluate_badges, BadgeProgress};
use super::GamificationRules;
use crate::course::CourseConfig;
use crate::state::{ActivityKind, ActivityLogEntry, AppState};

/// What a single completion event earned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionAward {
    pub minutes: u32,
    pub points_awarded: u64,
    /// Whether today's entry was found and credited.
    pub credited_entry: bool,
    /// Whether this event moved today from below goal to at-or-above it.
    pub goal_crossed: bool,
    pub leveled_up: bool,
    pub new_badges: Vec<String>,
}

/// The new document plus what was awarded.
#[derive(Debug, Clone)]
pub struct CompletionOutcome {
    pub state: AppState,
    pub award: CompletionAward,
}

/// Apply "`minutes` of focused work completed today" to `state`.
///
/// Pure: `state` is left as it was and the updated document is returned.
/// `now` only stamps the activity-log entries.
pub fn apply_completion(
    state: &AppState,
    minutes: u32,
    today: NaiveDate,
    now: DateTime<Utc>,
    rules: &GamificationRules,
    course: &CourseConfig,
) -> CompletionOutcome {
    let mut next = state.clone();
    let mut award = CompletionAward {
        minutes,
        ..CompletionAward::default()
    };

    match next.schedule.iter_mut().find(|e| e.date == today) {
        Some(entry) => {
            let before = entry.completed_minutes;
            entry.completed_minutes = before.saturating_add(minutes);
            award.credited_entry = true;
            award.goal_crossed =
                before < entry.planned_minutes && entry.completed_minutes >= entry.planned_minutes;
        }
        None => debug!(%today, "no schedule entry for today, awarding points only"),
    }

    let g = &mut next.gamification;
    let level_before = rules.level_for(g.points);

    award.points_awarded = rules.points_per_pomodoro;
    if award.goal_crossed {
        award.points_awarded += rules.daily_target_bonus;
        g.streak_current = g.streak_current.saturating_add(1);
    }

    g.points = g.points.saturating_add(award.points_awarded);
    g.level = rules.level_for(g.points);
    award.leveled_up = g.level > level_before;

    let progress = BadgeProgress::measure(&next.schedule, course, g.streak_current);
    award.new_badges = evaluate_badges(&mut g.badges, &progress, today);

    g.streak_max = g.streak_max.max(g.streak_current);

    let log = &mut next.activity_log;
    log.push(ActivityLogEntry::new(
        now,
        ActivityKind::PomoComplete,
        format!("Completed {minutes} minutes (+{} points)", award.points_awarded),
    ));
    if award.goal_crossed {
        log.push(ActivityLogEntry::new(
            now,
            ActivityKind::StreakExtend,
            format!("Daily goal met, streak is {}", next.gamification.streak_current),
        ));
    }
    if award.leveled_up {
        log.push(ActivityLogEntry::new(
            now,
            ActivityKind::LevelUp,
            format!("Reached level {}", next.gamification.level),
        ));
    }

    debug!(
        %today,
        minutes,
        points = award.points_awarded,
        crossed = award.goal_crossed,
        streak = next.gamification.streak_current,
        "applied completion"
    );

    CompletionOutcome { state: next, award }
}
