use clap::Subcommand;
use pomocourse_core::calendar::parse_iso;
use pomocourse_core::schedule::{total_completed, total_planned};
use serde_json::json;

use super::{open_container, print_json, Clock, CmdResult};

#[derive(Subcommand)]
pub enum ScheduleAction {
    /// Show the day-by-day plan
    Show {
        /// First date to include (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// Last date to include (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },
    /// Rebuild the plan for today, keeping recorded progress
    Regenerate,
    /// Move past unmet minutes onto today and later days
    Redistribute,
}

pub fn run(action: ScheduleAction, clock: &Clock) -> CmdResult {
    match action {
        ScheduleAction::Show { from, to } => {
            let from = from.as_deref().map(parse_iso).transpose()?;
            let to = to.as_deref().map(parse_iso).transpose()?;
            let container = open_container(clock)?;
            let entries: Vec<_> = container
                .state()
                .schedule
                .iter()
                .filter(|e| from.map_or(true, |f| e.date >= f))
                .filter(|e| to.map_or(true, |t| e.date <= t))
                .collect();
            print_json(&entries)?;
        }
        ScheduleAction::Regenerate => {
            let mut container = open_container(clock)?;
            let state = container.regenerate(clock.today)?;
            print_json(&json!({
                "days": state.schedule.len(),
                "plannedMinutes": total_planned(&state.schedule),
                "completedMinutes": total_completed(&state.schedule),
            }))?;
        }
        ScheduleAction::Redistribute => {
            let mut container = open_container(clock)?;
            let summary = container.redistribute(clock.today)?;
            print_json(&summary)?;
        }
    }
    Ok(())
}
