pub mod backup;
pub mod config;
pub mod progress;
pub mod schedule;
pub mod settings;
pub mod timer;

use chrono::{DateTime, Local, NaiveDate, Utc};
use pomocourse_core::{Config, SqliteStateStore, StateContainer};
use serde::Serialize;

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// The calendar date and instant every command runs against.
pub struct Clock {
    pub today: NaiveDate,
    pub now: DateTime<Utc>,
}

impl Clock {
    /// Local date unless overridden with `--today`.
    pub fn new(today: Option<NaiveDate>) -> Self {
        Self {
            today: today.unwrap_or_else(|| Local::now().date_naive()),
            now: Utc::now(),
        }
    }
}

/// Load config and the stored document, refreshing the plan for today.
pub fn open_container(
    clock: &Clock,
) -> Result<StateContainer<SqliteStateStore>, Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let store = SqliteStateStore::open()?;
    let container = StateContainer::open(
        store,
        config.course,
        config.gamification,
        clock.today,
        clock.now,
    )?;
    Ok(container)
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
