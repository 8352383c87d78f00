//! The application document and its pure transitions.
//!
//! [`AppState`] is the single document everything else reads and writes.
//! Every change is a function from the current document to a new one; the
//! [`StateContainer`] is the only place that swaps documents and persists
//! them.

mod container;

pub use container::StateContainer;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::course::CourseConfig;
use crate::error::{ImportError, ValidationError};
use crate::gamification::{Gamification, GamificationRules};
use crate::schedule::{self, RedistributionSummary, ScheduleEntry};

/// Keys an imported document must carry.
pub const REQUIRED_KEYS: [&str; 4] = ["profile", "settings", "schedule", "gamification"];

/// Owner of the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            name: "User".to_string(),
            created_at: now,
        }
    }
}

/// Timer lengths in minutes and the work/long-break cycle length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub work_min: u32,
    pub short_break_min: u32,
    pub long_break_min: u32,
    /// Work phases per long break.
    pub long_break_after: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            work_min: 25,
            short_break_min: 5,
            long_break_min: 15,
            long_break_after: 4,
        }
    }
}

impl Settings {
    /// Every field must be a positive integer.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let fields = [
            ("workMin", self.work_min),
            ("shortBreakMin", self.short_break_min),
            ("longBreakMin", self.long_break_min),
            ("longBreakAfter", self.long_break_after),
        ];
        match fields.iter().find(|(_, v)| *v == 0) {
            Some((field, _)) => Err(ValidationError::InvalidValue {
                field: (*field).to_string(),
                message: "must be a positive integer".to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// Partial settings update; absent fields keep their value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    pub work_min: Option<u32>,
    pub short_break_min: Option<u32>,
    pub long_break_min: Option<u32>,
    pub long_break_after: Option<u32>,
}

impl SettingsPatch {
    pub fn apply_to(&self, settings: &Settings) -> Settings {
        Settings {
            work_min: self.work_min.unwrap_or(settings.work_min),
            short_break_min: self.short_break_min.unwrap_or(settings.short_break_min),
            long_break_min: self.long_break_min.unwrap_or(settings.long_break_min),
            long_break_after: self.long_break_after.unwrap_or(settings.long_break_after),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Kinds of activity-log entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityKind {
    PomoComplete,
    StreakExtend,
    LevelUp,
}

/// One line of the activity log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityLogEntry {
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub details: String,
}

impl ActivityLogEntry {
    pub fn new(now: DateTime<Utc>, kind: ActivityKind, details: String) -> Self {
        Self {
            timestamp: now.timestamp_millis(),
            kind,
            details,
        }
    }
}

/// The whole persisted document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub profile: Profile,
    pub settings: Settings,
    pub schedule: Vec<ScheduleEntry>,
    pub gamification: Gamification,
    #[serde(default)]
    pub activity_log: Vec<ActivityLogEntry>,
}

impl AppState {
    /// A default document for a first run.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            profile: Profile::new(now),
            settings: Settings::default(),
            schedule: Vec::new(),
            gamification: Gamification::default(),
            activity_log: Vec::new(),
        }
    }

    /// Entry for `today`, if the plan has one.
    pub fn entry_for(&self, date: NaiveDate) -> Option<&ScheduleEntry> {
        schedule::entry_for(&self.schedule, date)
    }

    /// Restore invariants on a document that came from outside.
    ///
    /// The plan is sorted by date with duplicate dates dropped (first wins),
    /// and the derived gamification fields are recomputed.
    pub fn normalized(mut self, rules: &GamificationRules) -> Self {
        self.schedule.sort_by_key(|e| e.date);
        self.schedule.dedup_by_key(|e| e.date);
        self.gamification.normalize(rules);
        self
    }
}

/// Run the generator over the document's plan.
///
/// Completed minutes so far are summed from the plan itself.
pub fn regenerate_schedule(state: &AppState, course: &CourseConfig, today: NaiveDate) -> AppState {
    let completed = schedule::total_completed(&state.schedule);
    AppState {
        schedule: schedule::generate(&state.schedule, completed, course, today),
        ..state.clone()
    }
}

/// Run only the redistributor over the document's plan.
pub fn redistribute_schedule(state: &AppState, today: NaiveDate) -> (AppState, RedistributionSummary) {
    let (schedule, summary) = schedule::redistribute_with_summary(state.schedule.clone(), today);
    (
        AppState {
            schedule,
            ..state.clone()
        },
        summary,
    )
}

/// Apply a partial settings update.
///
/// # Errors
/// Returns a `ValidationError` if the merged settings contain a zero.
pub fn update_settings(state: &AppState, patch: &SettingsPatch) -> Result<AppState, ValidationError> {
    let settings = patch.apply_to(&state.settings);
    settings.validate()?;
    Ok(AppState {
        settings,
        ..state.clone()
    })
}

/// Parse and validate an imported document.
///
/// Malformed JSON, a non-object payload, a missing or null required key, or
/// values that do not fit the document shape are all rejected.
pub fn import_document(json: &str, rules: &GamificationRules) -> Result<AppState, ImportError> {
    let value: serde_json::Value = serde_json::from_str(json).map_err(ImportError::Malformed)?;
    let object = value.as_object().ok_or(ImportError::NotAnObject)?;

    if let Some(missing) = REQUIRED_KEYS
        .iter()
        .find(|key| object.get(**key).map_or(true, |v| v.is_null()))
    {
        return Err(ImportError::MissingKey(*missing));
    }

    let state: AppState = serde_json::from_value(value).map_err(ImportError::InvalidShape)?;
    state
        .settings
        .validate()
        .map_err(ImportError::InvalidSettings)?;
    info!(entries = state.schedule.len(), "imported document");
    Ok(state.normalized(rules))
}

/// The document as pretty-printed JSON.
pub fn export_document(state: &AppState) -> serde_json::Result<String> {
    serde_json::to_string_pretty(state)
}

/// Suggested file name for an export made at `now`.
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!(
        "pomo-course-backup-{}.json",
        now.format("%Y-%m-%dT%H-%M-%S%.3fZ")
    )
}
