use pomocourse_core::{CourseStats, TodayProgress};
use serde_json::json;

use super::{open_container, print_json, Clock, CmdResult};

pub fn today(clock: &Clock) -> CmdResult {
    let container = open_container(clock)?;
    print_json(&TodayProgress::compute(container.state(), clock.today))
}

pub fn log(minutes: u32, clock: &Clock) -> CmdResult {
    if minutes == 0 {
        return Err("minutes must be greater than zero".into());
    }
    let mut container = open_container(clock)?;
    let award = container.log_pomodoro(minutes, clock.today, clock.now)?;
    print_json(&json!({
        "award": award,
        "today": TodayProgress::compute(container.state(), clock.today),
    }))
}

pub fn stats(clock: &Clock) -> CmdResult {
    let container = open_container(clock)?;
    let stats = CourseStats::compute(container.state(), container.course(), container.rules());
    print_json(&stats)
}

pub fn badges(clock: &Clock) -> CmdResult {
    let container = open_container(clock)?;
    print_json(&container.state().gamification.badges)
}
