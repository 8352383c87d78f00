//! Points, levels, streaks and badges.
//!
//! All of it is driven by one event: "N minutes of focused work were
//! completed today". See [`apply_completion`].

mod accumulator;
mod badges;

pub use accumulator::{apply_completion, CompletionAward, CompletionOutcome};
pub use badges::{evaluate_badges, initial_badges, Badge, BadgeKind, BadgeProgress};

use serde::{Deserialize, Serialize};

/// Point values and level size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GamificationRules {
    #[serde(default = "default_points_per_pomodoro")]
    pub points_per_pomodoro: u64,
    #[serde(default = "default_daily_target_bonus")]
    pub daily_target_bonus: u64,
    /// Recognized for configuration compatibility; no event awards it yet.
    #[serde(default = "default_weekly_target_bonus")]
    pub weekly_target_bonus: u64,
    #[serde(default = "default_points_per_level")]
    pub points_per_level: u64,
}

fn default_points_per_pomodoro() -> u64 {
    10
}
fn default_daily_target_bonus() -> u64 {
    20
}
fn default_weekly_target_bonus() -> u64 {
    50
}
fn default_points_per_level() -> u64 {
    500
}

impl Default for GamificationRules {
    fn default() -> Self {
        Self {
            points_per_pomodoro: default_points_per_pomodoro(),
            daily_target_bonus: default_daily_target_bonus(),
            weekly_target_bonus: default_weekly_target_bonus(),
            points_per_level: default_points_per_level(),
        }
    }
}

impl GamificationRules {
    /// Level for a point total: `floor(points / points_per_level) + 1`.
    pub fn level_for(&self, points: u64) -> u32 {
        let level = points / self.points_per_level.max(1) + 1;
        u32::try_from(level).unwrap_or(u32::MAX)
    }

    /// Points earned inside the current level.
    pub fn points_into_level(&self, points: u64) -> u64 {
        points % self.points_per_level.max(1)
    }
}

/// Gamification section of the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gamification {
    pub points: u64,
    /// Always `rules.level_for(points)`; recomputed on every change.
    pub level: u32,
    pub streak_current: u32,
    pub streak_max: u32,
    pub badges: Vec<Badge>,
}

impl Default for Gamification {
    fn default() -> Self {
        Self {
            points: 0,
            level: 1,
            streak_current: 0,
            streak_max: 0,
            badges: initial_badges(),
        }
    }
}

impl Gamification {
    /// Restore the derived fields after loading or importing.
    pub fn normalize(&mut self, rules: &GamificationRules) {
        self.level = rules.level_for(self.points);
        self.streak_max = self.streak_max.max(self.streak_current);
    }

    pub fn badge(&self, kind: BadgeKind) -> Option<&Badge> {
        self.badges.iter().find(|b| b.id == kind.id())
    }
}
