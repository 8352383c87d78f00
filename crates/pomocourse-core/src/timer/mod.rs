mod engine;

pub use engine::PomodoroTimer;

use serde::{Deserialize, Serialize};

use crate::state::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PomodoroPhase {
    Work,
    ShortBreak,
    LongBreak,
}

impl PomodoroPhase {
    pub fn duration_min(self, settings: &Settings) -> u32 {
        match self {
            PomodoroPhase::Work => settings.work_min,
            PomodoroPhase::ShortBreak => settings.short_break_min,
            PomodoroPhase::LongBreak => settings.long_break_min,
        }
    }

    pub fn duration_secs(self, settings: &Settings) -> u64 {
        u64::from(self.duration_min(settings)) * 60
    }

    pub fn label(self) -> &'static str {
        match self {
            PomodoroPhase::Work => "Work",
            PomodoroPhase::ShortBreak => "Short Break",
            PomodoroPhase::LongBreak => "Long Break",
        }
    }
}
