//! Read-only summaries of the document.
//!
//! Nothing here mutates state; the CLI prints these as JSON.

use chrono::NaiveDate;
use serde::Serialize;

use crate::course::CourseConfig;
use crate::gamification::GamificationRules;
use crate::schedule::total_completed;
use crate::state::AppState;

/// Course-wide progress.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseStats {
    pub total_completed_minutes: u64,
    pub hours_studied: f64,
    /// 0.0 .. 100.0, capped.
    pub course_completion_pct: f64,
    pub streak_current: u32,
    pub streak_max: u32,
    pub points: u64,
    pub level: u32,
    pub level_progress_pct: f64,
    pub points_into_level: u64,
}

impl CourseStats {
    pub fn compute(state: &AppState, course: &CourseConfig, rules: &GamificationRules) -> Self {
        let completed = total_completed(&state.schedule);
        let g = &state.gamification;
        let into_level = rules.points_into_level(g.points);

        Self {
            total_completed_minutes: completed,
            hours_studied: round1(completed as f64 / 60.0),
            course_completion_pct: pct(completed, course.total_minutes().max(0) as u64),
            streak_current: g.streak_current,
            streak_max: g.streak_max,
            points: g.points,
            level: g.level,
            level_progress_pct: pct(into_level, rules.points_per_level),
            points_into_level: into_level,
        }
    }
}

/// Today's plan versus what has been done.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayProgress {
    pub date: NaiveDate,
    pub topic: Option<String>,
    pub planned_minutes: u32,
    pub completed_minutes: u32,
    pub progress_pct: f64,
    pub planned_pomodoros: u32,
    pub completed_pomodoros: u32,
}

impl TodayProgress {
    /// Progress for `today`. A day outside the plan reports zeros.
    pub fn compute(state: &AppState, today: NaiveDate) -> Self {
        let entry = state.entry_for(today);
        let planned = entry.map_or(0, |e| e.planned_minutes);
        let completed = entry.map_or(0, |e| e.completed_minutes);
        let work = state.settings.work_min.max(1);

        Self {
            date: today,
            topic: entry.map(|e| e.topic.clone()),
            planned_minutes: planned,
            completed_minutes: completed,
            progress_pct: pct(u64::from(completed), u64::from(planned)),
            planned_pomodoros: planned / work,
            completed_pomodoros: completed / work,
        }
    }
}

/// `part / whole` as a percentage, capped at 100. A zero whole is 0%.
fn pct(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round1((part as f64 / whole as f64 * 100.0).min(100.0))
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
