use chrono::{DateTime, Utc};
use clap::Subcommand;
use pomocourse_core::storage::Database;
use pomocourse_core::{
    CompletionAward, Event, PomodoroTimer, Settings, SqliteStateStore, StateContainer,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use super::{open_container, print_json, Clock, CmdResult};

const TIMER_KEY: &str = "timer_state";

#[derive(Subcommand)]
pub enum TimerAction {
    /// Print current timer state as JSON
    Status,
    /// Start or resume the current phase
    Start,
    /// Pause the current phase
    Pause,
    /// Back to an idle work phase
    Reset,
    /// End the current phase now
    Skip,
}

/// Timer plus the instant it last caught up with the wall clock.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimerRecord {
    timer: PomodoroTimer,
    #[serde(default)]
    synced_at: Option<DateTime<Utc>>,
}

impl TimerRecord {
    fn new(settings: Settings) -> Self {
        Self {
            timer: PomodoroTimer::new(settings),
            synced_at: None,
        }
    }

    /// Feed the seconds elapsed since the last sync into a running timer.
    fn catch_up(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        let events = match self.synced_at {
            Some(since) if self.timer.is_active() => {
                let elapsed = (now - since).num_seconds().max(0);
                self.timer.advance_secs(elapsed.unsigned_abs())
            }
            _ => Vec::new(),
        };
        self.synced_at = self.timer.is_active().then_some(now);
        events
    }
}

fn load_record(db: &Database, settings: Settings) -> TimerRecord {
    match db.kv_get(TIMER_KEY) {
        Ok(Some(json)) => match serde_json::from_str::<TimerRecord>(&json) {
            Ok(record) => return record,
            Err(e) => warn!(error = %e, "discarding unreadable timer state"),
        },
        Ok(None) => {}
        Err(e) => warn!(error = %e, "could not read timer state"),
    }
    TimerRecord::new(settings)
}

fn save_record(db: &Database, record: &TimerRecord) -> CmdResult {
    let json = serde_json::to_string(record)?;
    db.kv_set(TIMER_KEY, &json)?;
    Ok(())
}

/// Minutes of every finished work phase in `events`.
fn finished_work(events: &[Event]) -> Vec<u32> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::WorkCompleted { minutes, .. } => Some(*minutes),
            _ => None,
        })
        .collect()
}

/// Store the advanced timer, then credit its finished work phases in one
/// document change. The timer is stored first so a rerun never replays
/// phases that were already credited.
fn settle(
    container: &mut StateContainer<SqliteStateStore>,
    record: &TimerRecord,
    events: &[Event],
    clock: &Clock,
) -> Result<Vec<CompletionAward>, Box<dyn std::error::Error>> {
    save_record(container.store().database(), record)?;
    let minutes = finished_work(events);
    if !minutes.is_empty() {
        debug!(phases = minutes.len(), "crediting finished work phases");
    }
    Ok(container.log_pomodoros(&minutes, clock.today, clock.now)?)
}

pub fn run(action: TimerAction, clock: &Clock) -> CmdResult {
    let mut container = open_container(clock)?;
    let settings = container.state().settings;
    let mut record = load_record(container.store().database(), settings);

    if *record.timer.settings() != settings {
        record.timer.set_settings(settings);
    }

    let mut events = record.catch_up(clock.now);
    match action {
        TimerAction::Status => {}
        TimerAction::Start => events.extend(record.timer.start()),
        TimerAction::Pause => events.extend(record.timer.pause()),
        TimerAction::Reset => events.push(record.timer.reset()),
        TimerAction::Skip => events.extend(record.timer.skip()),
    }
    record.synced_at = record.timer.is_active().then_some(clock.now);

    let awards = settle(&mut container, &record, &events, clock)?;
    print_json(&json!({
        "state": record.timer.snapshot(),
        "events": events,
        "awards": awards,
    }))
}
