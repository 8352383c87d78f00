//! Pomodoro timer state machine.
//!
//! The timer does not use internal threads or read the clock. The caller
//! feeds elapsed seconds through `tick()` or `advance_secs()`.
//!
//! ## Phase Transitions
//!
//! ```text
//! Work -> ShortBreak -> Work -> ... -> Work -> LongBreak -> Work
//! ```
//!
//! A long break follows every `longBreakAfter`-th finished work phase. The
//! timer keeps running across phase boundaries.
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = PomodoroTimer::new(settings);
//! timer.start();
//! // Once per second:
//! for event in timer.tick() { /* Event::WorkCompleted credits the day */ }
//! ```

use serde::{Deserialize, Serialize};

use super::PomodoroPhase;
use crate::events::Event;
use crate::state::Settings;

/// Work/break cycle driven by elapsed seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroTimer {
    settings: Settings,
    phase: PomodoroPhase,
    remaining_secs: u64,
    active: bool,
    /// Finished work phases since the last reset.
    pomodoros_completed: u32,
}

impl PomodoroTimer {
    /// Idle, at the start of a work phase.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            phase: PomodoroPhase::Work,
            remaining_secs: PomodoroPhase::Work.duration_secs(&settings),
            active: false,
            pomodoros_completed: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> PomodoroPhase {
        self.phase
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn pomodoros_completed(&self) -> u32 {
        self.pomodoros_completed
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Position within the current long-break cycle.
    pub fn pomodoros_in_cycle(&self) -> u32 {
        self.pomodoros_completed % self.settings.long_break_after.max(1)
    }

    /// Full length of the current phase.
    pub fn total_secs(&self) -> u64 {
        self.phase.duration_secs(&self.settings)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            phase: self.phase,
            active: self.active,
            remaining_secs: self.remaining_secs,
            total_secs: self.total_secs(),
            pomodoros_completed: self.pomodoros_completed,
            pomodoros_in_cycle: self.pomodoros_in_cycle(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        if self.active {
            return None;
        }
        self.active = true;
        Some(Event::TimerStarted {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.active {
            return None;
        }
        self.active = false;
        Some(Event::TimerPaused {
            remaining_secs: self.remaining_secs,
        })
    }

    /// Back to an idle work phase with the cycle counter cleared.
    pub fn reset(&mut self) -> Event {
        self.active = false;
        self.phase = PomodoroPhase::Work;
        self.remaining_secs = self.total_secs();
        self.pomodoros_completed = 0;
        Event::TimerReset
    }

    /// End the current phase now.
    ///
    /// Skipping a work phase counts it as finished, so the returned events
    /// include `WorkCompleted`. The timer is running afterwards.
    pub fn skip(&mut self) -> Vec<Event> {
        let from = self.phase;
        let mut events = self.finish_phase();
        events.insert(
            0,
            Event::TimerSkipped {
                from,
                to: self.phase,
            },
        );
        events
    }

    /// One second of wall-clock time.
    pub fn tick(&mut self) -> Vec<Event> {
        self.advance_secs(1)
    }

    /// `secs` seconds of wall-clock time, crossing as many phase
    /// boundaries as needed. Does nothing while paused.
    pub fn advance_secs(&mut self, mut secs: u64) -> Vec<Event> {
        let mut events = Vec::new();
        while self.active && secs > 0 {
            if secs < self.remaining_secs {
                self.remaining_secs -= secs;
                break;
            }
            secs -= self.remaining_secs;
            events.extend(self.finish_phase());
            if self.remaining_secs == 0 {
                break;
            }
        }
        events
    }

    /// Swap in new settings.
    ///
    /// While idle the remaining time is reset to the new phase length; a
    /// running phase keeps its remaining time.
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
        if !self.active {
            self.remaining_secs = self.total_secs();
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn finish_phase(&mut self) -> Vec<Event> {
        let mut events = vec![Event::PhaseCompleted { phase: self.phase }];

        let next = match self.phase {
            PomodoroPhase::Work => {
                self.pomodoros_completed = self.pomodoros_completed.saturating_add(1);
                events.push(Event::WorkCompleted {
                    minutes: self.settings.work_min,
                    pomodoros_completed: self.pomodoros_completed,
                });
                if self.pomodoros_completed % self.settings.long_break_after.max(1) == 0 {
                    PomodoroPhase::LongBreak
                } else {
                    PomodoroPhase::ShortBreak
                }
            }
            PomodoroPhase::ShortBreak | PomodoroPhase::LongBreak => PomodoroPhase::Work,
        };

        self.phase = next;
        self.remaining_secs = self.total_secs();
        self.active = true;
        events.push(Event::PhaseStarted {
            phase: next,
            duration_secs: self.remaining_secs,
        });
        events
    }
}
