//! Points, levels, streaks and badges through the state container.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use pomocourse_core::calendar::{add_days, parse_iso};
use pomocourse_core::state::ActivityKind;
use pomocourse_core::{
    BadgeKind, CourseConfig, GamificationRules, MemoryStateStore, StateContainer,
};

fn d(s: &str) -> NaiveDate {
    parse_iso(s).unwrap()
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 11, 6, 20, 0, 0).unwrap()
}

fn container_on(today: NaiveDate) -> StateContainer<MemoryStateStore> {
    StateContainer::open(
        MemoryStateStore::new(),
        CourseConfig::default(),
        GamificationRules::default(),
        today,
        now(),
    )
    .unwrap()
}

#[test]
fn level_boundary() {
    let rules = GamificationRules::default();
    assert_eq!(rules.level_for(0), 1);
    assert_eq!(rules.level_for(499), 1);
    assert_eq!(rules.level_for(500), 2);
    assert_eq!(rules.level_for(1499), 3);
}

#[test]
fn crossing_the_goal_pays_once() {
    let today = d("2025-11-06");
    let mut container = container_on(today);
    let planned = container.state().entry_for(today).unwrap().planned_minutes;

    let first = container.log_pomodoro(planned - 5, today, now()).unwrap();
    assert!(!first.goal_crossed);
    assert_eq!(first.points_awarded, 10);

    let second = container.log_pomodoro(10, today, now()).unwrap();
    assert!(second.goal_crossed);
    assert_eq!(second.points_awarded, 30);

    let third = container.log_pomodoro(25, today, now()).unwrap();
    assert!(!third.goal_crossed);

    let g = &container.state().gamification;
    assert_eq!(g.points, 50);
    assert_eq!(g.streak_current, 1);
    assert_eq!(g.streak_max, 1);
}

#[test]
fn streak_badges_are_stamped_once() {
    let mut store = MemoryStateStore::new();
    for offset in 0..4u64 {
        let today = add_days(d("2025-11-06"), offset);
        let mut container = StateContainer::open(
            store,
            CourseConfig::default(),
            GamificationRules::default(),
            today,
            now(),
        )
        .unwrap();
        let planned = container.state().entry_for(today).unwrap().planned_minutes;
        container.log_pomodoro(planned, today, now()).unwrap();
        store = container.store().clone();
    }

    let container = StateContainer::open(
        store,
        CourseConfig::default(),
        GamificationRules::default(),
        d("2025-11-10"),
        now(),
    )
    .unwrap();
    let g = &container.state().gamification;
    assert_eq!(g.streak_current, 4);
    let streak3 = g.badge(BadgeKind::Streak3).unwrap();
    assert_eq!(streak3.achieved_on, Some(d("2025-11-08")));
    assert!(!g.badge(BadgeKind::Streak7).unwrap().is_achieved());
}

#[test]
fn finishing_the_first_block_earns_week_badges() {
    let today = d("2025-11-06");
    let mut container = container_on(today);
    // First block is 6.5 hours.
    let award = container.log_pomodoro(390, today, now()).unwrap();
    assert!(award.new_badges.contains(&"week1".to_string()));
    assert!(award.new_badges.contains(&"perfectWeek".to_string()));
    assert!(!award.new_badges.contains(&"courseComplete".to_string()));
}

#[test]
fn activity_log_records_each_event() {
    let today = d("2025-11-06");
    let mut container = container_on(today);
    let planned = container.state().entry_for(today).unwrap().planned_minutes;
    container.log_pomodoro(planned, today, now()).unwrap();
    container.log_pomodoro(25, today, now()).unwrap();

    let kinds: Vec<ActivityKind> = container
        .state()
        .activity_log
        .iter()
        .map(|e| e.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            ActivityKind::PomoComplete,
            ActivityKind::StreakExtend,
            ActivityKind::PomoComplete
        ]
    );
}
