//! Schedule generation.
//!
//! Builds the full-window plan from the course definition, reusing every
//! entry that already exists so recorded history is never rewritten.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use tracing::{debug, info};

use super::{redistribute, split_evenly, ScheduleEntry};
use crate::calendar::{self, days_inclusive, to_iso};
use crate::course::{CourseConfig, REVIEW_TOPIC};

/// Minutes planned for a not-yet-recorded day before final rounding.
#[derive(Debug, Clone, Copy)]
struct PlannedDay<'a> {
    minutes: f64,
    topic: &'a str,
}

/// Build or repair the plan for `course`.
///
/// * `existing` - the current plan, ascending by date (may be empty).
/// * `completed_so_far` - minutes already completed across the whole course.
/// * `today` - the current calendar date.
///
/// An `existing` plan that already reaches the end of the course is only
/// redistributed. A course that ended before `today` returns `existing`
/// untouched.
pub fn generate(
    existing: &[ScheduleEntry],
    completed_so_far: u64,
    course: &CourseConfig,
    today: NaiveDate,
) -> Vec<ScheduleEntry> {
    if existing
        .last()
        .is_some_and(|last| last.date >= course.end_date)
    {
        debug!(%today, "schedule already spans the course, redistributing only");
        return redistribute(existing.to_vec(), today);
    }

    let effective_start = course.start_date.max(today);
    let remaining_days = calendar::day_count(effective_start, course.end_date);
    if remaining_days <= 0 {
        info!(%today, end = %course.end_date, "course has ended, keeping existing schedule");
        return existing.to_vec();
    }

    let mut planned: BTreeMap<NaiveDate, PlannedDay<'_>> = BTreeMap::new();
    let mut planned_total: i64 = 0;

    for span in course.spans() {
        let study_days: Vec<NaiveDate> = span.days().filter(|d| *d >= effective_start).collect();
        if study_days.is_empty() {
            debug!(block = %span.block.name, "block lies entirely before the effective start");
            continue;
        }

        let block_minutes = span.block.minutes().max(0) as u64;
        for (day, share) in study_days
            .iter()
            .zip(split_evenly(block_minutes, study_days.len()))
        {
            planned.insert(
                *day,
                PlannedDay {
                    minutes: share as f64,
                    topic: &span.block.topic,
                },
            );
            planned_total += share as i64;
        }
    }

    let to_schedule = course.total_minutes() - completed_so_far as i64;
    let discrepancy = to_schedule - planned_total;
    if discrepancy != 0 && !planned.is_empty() {
        let per_day = discrepancy as f64 / planned.len() as f64;
        for day in planned.values_mut() {
            day.minutes += per_day;
        }
        debug!(discrepancy, per_day, "spread course-wide discrepancy");
    }

    let recorded: HashMap<NaiveDate, &ScheduleEntry> =
        existing.iter().map(|e| (e.date, e)).collect();

    let schedule: Vec<ScheduleEntry> = days_inclusive(course.start_date, course.end_date)
        .map(|date| match (recorded.get(&date), planned.get(&date)) {
            (Some(entry), _) => (*entry).clone(),
            (None, Some(day)) => ScheduleEntry::new(date, day.topic, round_minutes(day.minutes)),
            (None, None) => ScheduleEntry::new(date, REVIEW_TOPIC, 0),
        })
        .collect();

    info!(
        start = %to_iso(course.start_date),
        end = %to_iso(course.end_date),
        effective_start = %to_iso(effective_start),
        reused = recorded.len(),
        to_schedule,
        "generated schedule"
    );

    redistribute(schedule, today)
}

/// Round to whole minutes, half away from zero, never below zero.
fn round_minutes(minutes: f64) -> u32 {
    if !minutes.is_finite() || minutes <= 0.0 {
        return 0;
    }
    minutes.round().min(f64::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{add_days, parse_iso};
    use crate::course::WeeklyFocusBlock;
    use crate::schedule::total_planned;
    use proptest::prelude::*;

    fn d(s: &str) -> NaiveDate {
        parse_iso(s).unwrap()
    }

    fn two_week_course() -> CourseConfig {
        CourseConfig {
            start_date: d("2025-11-13"),
            end_date: d("2025-11-26"),
            total_hours: 22.0,
            weekly_focus: vec![WeeklyFocusBlock::new(
                "Nov 13–26",
                d("2025-11-13"),
                22.0,
                "JavaScript",
            )],
        }
    }

    #[test]
    fn remainder_goes_to_first_days() {
        let course = two_week_course();
        let schedule = generate(&[], 0, &course, d("2025-11-01"));

        assert_eq!(schedule.len(), 14);
        let minutes: Vec<u32> = schedule.iter().map(|e| e.planned_minutes).collect();
        assert_eq!(&minutes[..4], &[95, 95, 95, 95]);
        assert!(minutes[4..].iter().all(|m| *m == 94));
        assert_eq!(total_planned(&schedule), 1320);
        assert!(schedule.iter().all(|e| e.topic == "JavaScript"));
    }

    #[test]
    fn default_course_covers_every_day() {
        let course = CourseConfig::default();
        let schedule = generate(&[], 0, &course, d("2025-11-01"));

        assert_eq!(schedule.len(), 57);
        assert_eq!(schedule[0].date, course.start_date);
        assert_eq!(schedule.last().unwrap().date, course.end_date);
        assert!(schedule.iter().all(|e| e.topic != REVIEW_TOPIC));
        // The last block runs through the final course day.
        assert_eq!(schedule.last().unwrap().topic, "Git & System Design");
        assert_eq!(schedule.last().unwrap().planned_minutes, 34);
        // 39 minutes between block totals and the course total are spread
        // over 57 days; per-day rounding drifts by less than a minute a day.
        assert_eq!(schedule[0].planned_minutes, 57);
        assert_eq!(schedule[7].planned_minutes, 96);
        let drift = total_planned(&schedule) as i64 - 64 * 60;
        assert!(drift.abs() <= 57, "drift {drift}");
    }

    #[test]
    fn discrepancy_spreads_over_scheduled_days() {
        let mut course = two_week_course();
        course.total_hours = 22.0 + 14.0 / 60.0 * 10.0; // +140 minutes
        let schedule = generate(&[], 0, &course, d("2025-11-01"));
        assert_eq!(schedule[0].planned_minutes, 105);
        assert_eq!(schedule[13].planned_minutes, 104);
        assert_eq!(total_planned(&schedule), 1460);
    }

    #[test]
    fn completed_minutes_reduce_what_is_left() {
        let course = two_week_course();
        let schedule = generate(&[], 140, &course, d("2025-11-01"));
        assert_eq!(total_planned(&schedule), 1320 - 140);
    }

    #[test]
    fn mid_course_start_reuses_history_and_replans_rest() {
        let course = two_week_course();
        let today = d("2025-11-20");
        let history = vec![
            ScheduleEntry {
                date: d("2025-11-13"),
                topic: "JavaScript".to_string(),
                planned_minutes: 95,
                completed_minutes: 95,
            },
            ScheduleEntry {
                date: d("2025-11-14"),
                topic: "JavaScript".to_string(),
                planned_minutes: 95,
                completed_minutes: 31,
            },
        ];
        let schedule = generate(&history, 126, &course, today);

        assert_eq!(schedule.len(), 14);
        assert_eq!(schedule[0], history[0]);
        // Missed 64 minutes on day two are forgiven on the record.
        assert_eq!(schedule[1].planned_minutes, 31);
        // Never-recorded past days are review days with nothing planned.
        for entry in &schedule[2..7] {
            assert_eq!(entry.topic, REVIEW_TOPIC);
            assert_eq!(entry.planned_minutes, 0);
        }
        assert_eq!(schedule[7].topic, "JavaScript");

        let future: u64 = schedule
            .iter()
            .filter(|e| e.date >= today)
            .map(|e| u64::from(e.planned_minutes))
            .sum();
        // 1320 - 126 left for the last 7 days plus the 64 carried minutes.
        assert_eq!(future, 1194 + 64);
        assert_eq!(schedule[7].planned_minutes, 171 + 10);
        assert_eq!(schedule[13].planned_minutes, 170 + 9);
    }

    #[test]
    fn finished_course_is_left_alone() {
        let course = two_week_course();
        let history = vec![ScheduleEntry {
            date: d("2025-11-13"),
            topic: "JavaScript".to_string(),
            planned_minutes: 95,
            completed_minutes: 0,
        }];
        let schedule = generate(&history, 0, &course, d("2025-12-01"));
        assert_eq!(schedule, history);
    }

    #[test]
    fn complete_schedule_is_only_redistributed() {
        let course = two_week_course();
        let today = d("2025-11-15");
        let mut schedule = generate(&[], 0, &course, d("2025-11-01"));
        schedule[0].completed_minutes = 95;
        let again = generate(&schedule, 95, &course, today);

        assert_eq!(again.len(), 14);
        assert_eq!(again[0].planned_minutes, 95);
        assert_eq!(again[1].planned_minutes, 0);
        assert_eq!(total_planned(&again), 1320);
    }

    #[test]
    fn round_minutes_is_half_away_from_zero() {
        assert_eq!(round_minutes(94.5), 95);
        assert_eq!(round_minutes(94.49), 94);
        assert_eq!(round_minutes(-3.0), 0);
        assert_eq!(round_minutes(f64::NAN), 0);
    }

    proptest! {
        #[test]
        fn one_entry_per_day(days in 1u64..120, today_offset in 0u64..150, hours in 0.0f64..200.0) {
            let start = d("2025-11-06");
            let end = add_days(start, days - 1);
            let course = CourseConfig {
                start_date: start,
                end_date: end,
                total_hours: hours,
                weekly_focus: vec![WeeklyFocusBlock::new("All", start, hours, "Topic")],
            };
            let today = add_days(d("2025-11-01"), today_offset);
            prop_assume!(today <= end);

            let schedule = generate(&[], 0, &course, today);
            prop_assert_eq!(schedule.len() as u64, days);
            for (i, entry) in schedule.iter().enumerate() {
                prop_assert_eq!(entry.date, add_days(start, i as u64));
            }
        }

        #[test]
        fn regenerating_is_idempotent(today_offset in 0u64..70) {
            let course = CourseConfig::default();
            let today = add_days(d("2025-11-01"), today_offset);
            let first = generate(&[], 0, &course, today);
            let second = generate(&first, 0, &course, today);
            prop_assert_eq!(first, second);
        }
    }
}
