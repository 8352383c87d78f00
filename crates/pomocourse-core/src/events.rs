use serde::{Deserialize, Serialize};

use crate::timer::PomodoroPhase;

/// Every timer state change produces an Event.
/// The CLI prints them; `WorkCompleted` is fed back into the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        phase: PomodoroPhase,
        remaining_secs: u64,
    },
    TimerPaused {
        remaining_secs: u64,
    },
    TimerReset,
    TimerSkipped {
        from: PomodoroPhase,
        to: PomodoroPhase,
    },
    PhaseCompleted {
        phase: PomodoroPhase,
    },
    PhaseStarted {
        phase: PomodoroPhase,
        duration_secs: u64,
    },
    /// A work phase ended; `minutes` of focused work should be credited.
    WorkCompleted {
        minutes: u32,
        pomodoros_completed: u32,
    },
    StateSnapshot {
        phase: PomodoroPhase,
        active: bool,
        remaining_secs: u64,
        total_secs: u64,
        pomodoros_completed: u32,
        pomodoros_in_cycle: u32,
    },
}
