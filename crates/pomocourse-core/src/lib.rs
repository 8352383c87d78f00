//! # PomoCourse Core Library
//!
//! This library provides the core logic for the PomoCourse study planner: a
//! Pomodoro timer tied to a fixed-length course with a daily minutes plan.
//! All operations are available via the standalone `pomocourse` CLI, which
//! is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Schedule**: builds the day-by-day plan from the course definition and
//!   moves missed minutes from past days onto the remaining ones
//! - **Gamification**: points, levels, streaks and badges driven by work
//!   completion events
//! - **State**: the single persisted document and its pure transitions
//! - **Timer**: a work/break state machine the caller drives with elapsed
//!   seconds
//! - **Storage**: SQLite key-value persistence and TOML configuration
//!
//! ## Key Components
//!
//! - [`StateContainer`]: owns the document, persists every change
//! - [`PomodoroTimer`]: work/short break/long break cycle
//! - [`Database`]: key-value persistence
//! - [`Config`]: course and gamification configuration

pub mod calendar;
pub mod course;
pub mod error;
pub mod events;
pub mod gamification;
pub mod schedule;
pub mod state;
pub mod stats;
pub mod storage;
pub mod timer;

pub use course::{CourseConfig, WeeklyFocusBlock};
pub use error::{ConfigError, CoreError, DatabaseError, ImportError, ValidationError};
pub use events::Event;
pub use gamification::{Badge, BadgeKind, CompletionAward, Gamification, GamificationRules};
pub use schedule::{RedistributionSummary, ScheduleEntry};
pub use state::{AppState, Settings, SettingsPatch, StateContainer};
pub use stats::{CourseStats, TodayProgress};
pub use storage::{Config, Database, MemoryStateStore, SqliteStateStore, StateStore};
pub use timer::{PomodoroPhase, PomodoroTimer};
