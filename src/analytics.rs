use crate::models::{Goal, Task};
use crate::store::date_str;
use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

const WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// One chart bucket of task counts for a single calendar day.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskBucket {
    pub name: String,
    pub completed: usize,
    pub total: usize,
    pub pending: usize,
}

/// One chart row of per-goal 0/1 check-in flags for a single day. `values`
/// is parallel to the goals slice the series was built from.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GoalsDayRow {
    pub name: String,
    pub values: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GoalDayState {
    Checked,
    Missed,
    Pending,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoalStats {
    pub current_day: u32,
    pub end_date: NaiveDate,
    pub progress_percent: f64,
    pub total_checked: usize,
    pub missed_days: u32,
    pub streak_percent: u32,
    pub is_checked_today: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GoalHistoryDay {
    pub date_str: String,
    pub active: bool,
    pub checked: bool,
    pub is_today: bool,
}

fn same_day(task: &Task, day: NaiveDate) -> bool {
    task.date.date_naive() == day
}

pub fn daily_task_bucket(tasks: &[Task], day: NaiveDate) -> TaskBucket {
    let total = tasks.iter().filter(|task| same_day(task, day)).count();
    let completed = tasks
        .iter()
        .filter(|task| same_day(task, day) && task.completed)
        .count();
    TaskBucket {
        name: date_str(day),
        completed,
        total,
        pending: total - completed,
    }
}

/// Seven buckets for [today-6 .. today], oldest first, labeled by weekday
/// short-name.
pub fn weekly_tasks_series(tasks: &[Task], today: NaiveDate) -> Vec<TaskBucket> {
    last_seven_days(today)
        .map(|day| {
            let mut bucket = daily_task_bucket(tasks, day);
            bucket.name = weekday_name(day).to_string();
            bucket
        })
        .collect()
}

/// One bucket per calendar day of `today`'s month, labeled 1..daysInMonth.
pub fn monthly_tasks_series(tasks: &[Task], today: NaiveDate) -> Vec<TaskBucket> {
    month_days(today)
        .map(|day| {
            let mut bucket = daily_task_bucket(tasks, day);
            bucket.name = day.day().to_string();
            bucket
        })
        .collect()
}

/// Last seven days of per-goal check-in flags. Days before a goal's start
/// date read as 0, the same as a miss; the chart draws them identically.
pub fn weekly_goals_series(goals: &[Goal], today: NaiveDate) -> Vec<GoalsDayRow> {
    last_seven_days(today)
        .map(|day| goals_day_row(goals, day, weekday_name(day).to_string()))
        .collect()
}

/// Per-goal check-in flags for every day of the month containing `month_day`.
pub fn monthly_goals_series(goals: &[Goal], month_day: NaiveDate) -> Vec<GoalsDayRow> {
    month_days(month_day)
        .map(|day| goals_day_row(goals, day, day.day().to_string()))
        .collect()
}

fn goals_day_row(goals: &[Goal], day: NaiveDate, name: String) -> GoalsDayRow {
    let key = date_str(day);
    GoalsDayRow {
        name,
        values: goals
            .iter()
            .map(|goal| u8::from(goal.progress.iter().any(|entry| entry == &key)))
            .collect(),
    }
}

/// Calendar classification for one goal/day cell. Today is never Missed,
/// whatever its check status.
pub fn classify_goal_day(goal: &Goal, day: NaiveDate, today: NaiveDate) -> GoalDayState {
    let key = date_str(day);
    if goal.progress.iter().any(|entry| entry == &key) {
        return GoalDayState::Checked;
    }
    let start = goal.start_date.date_naive();
    if day >= start && day < today {
        GoalDayState::Missed
    } else {
        GoalDayState::Pending
    }
}

pub fn goal_stats(goal: &Goal, today: NaiveDate) -> GoalStats {
    let start = goal.start_date.date_naive();
    let elapsed = (today - start).num_days().max(0);
    let current_day = (elapsed + 1).max(1) as u32;
    let duration = goal.duration_days.max(1);
    let total_checked = goal.progress.len();

    // Denominator counts calendar days elapsed including today, so a check-in
    // on the creation day already reads as 100%.
    let days_since_start = elapsed.max(1) as u32;
    let streak_percent =
        ((total_checked as f64 / f64::from(days_since_start)) * 100.0).round() as u32;

    let missed = i64::from(current_day) - 1 - total_checked as i64;
    let today_key = date_str(today);

    GoalStats {
        current_day: current_day.min(duration),
        end_date: start
            .checked_add_days(Days::new(u64::from(goal.duration_days)))
            .unwrap_or(start),
        progress_percent: (f64::from(current_day) / f64::from(duration) * 100.0).min(100.0),
        total_checked,
        missed_days: missed.max(0) as u32,
        streak_percent,
        is_checked_today: goal.progress.iter().any(|entry| entry == &today_key),
    }
}

/// Seven-day history strip for a goal card, oldest first.
pub fn goal_last7(goal: &Goal, today: NaiveDate) -> Vec<GoalHistoryDay> {
    let start = goal.start_date.date_naive();
    last_seven_days(today)
        .map(|day| {
            let key = date_str(day);
            GoalHistoryDay {
                active: day >= start,
                checked: goal.progress.iter().any(|entry| entry == &key),
                is_today: day == today,
                date_str: key,
            }
        })
        .collect()
}

fn weekday_name(day: NaiveDate) -> &'static str {
    WEEKDAY_NAMES[day.weekday().num_days_from_sunday() as usize]
}

fn last_seven_days(today: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    (0..7u64).map(move |offset| today - Days::new(6 - offset))
}

fn month_days(day: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    let first = day.with_day(1).expect("first of month");
    let next_month = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    }
    .expect("first of next month");
    let count = (next_month - first).num_days() as u32;
    (0..count).map(move |offset| first + Days::new(u64::from(offset)))
}

#[cfg(test)]
mod tests {
    use super::{
        classify_goal_day, goal_last7, goal_stats, monthly_goals_series, monthly_tasks_series,
        weekly_goals_series, weekly_tasks_series, GoalDayState,
    };
    use crate::models::{Goal, Priority, Task};
    use chrono::{NaiveDate, TimeZone, Utc};
    use uuid::Uuid;

    fn day(text: &str) -> NaiveDate {
        text.parse().expect("valid date")
    }

    fn task_on(date: &str, completed: bool) -> Task {
        let date = format!("{date}T10:00:00Z").parse().expect("valid datetime");
        Task {
            id: Uuid::new_v4().to_string(),
            title: "t".to_string(),
            date,
            completed,
            priority: Priority::Medium,
            category: "general".to_string(),
            created_at: Utc::now(),
        }
    }

    fn goal_from(start: &str, duration_days: u32, progress: &[&str]) -> Goal {
        let start = day(start);
        Goal {
            id: Uuid::new_v4().to_string(),
            title: "Read".to_string(),
            start_date: Utc
                .from_utc_datetime(&start.and_hms_opt(8, 0, 0).expect("valid time")),
            duration_days,
            progress: progress.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn weekly_series_has_seven_buckets_oldest_first() {
        let today = day("2026-08-31");
        let tasks = vec![
            task_on("2026-08-25", true),
            task_on("2026-08-31", false),
            task_on("2026-08-31", true),
            // Outside the window, must not appear anywhere.
            task_on("2026-08-20", true),
        ];
        let series = weekly_tasks_series(&tasks, today);
        assert_eq!(series.len(), 7);
        // 2026-08-25 is a Tuesday, 2026-08-31 a Monday.
        assert_eq!(series[0].name, "Tue");
        assert_eq!(series[0].total, 1);
        assert_eq!(series[0].completed, 1);
        assert_eq!(series[6].name, "Mon");
        assert_eq!(series[6].total, 2);
        assert_eq!(series[6].completed, 1);
        assert_eq!(series[6].pending, 1);
        let window_total: usize = series.iter().map(|bucket| bucket.total).sum();
        assert_eq!(window_total, 3);
    }

    #[test]
    fn weekly_series_is_seven_even_with_no_tasks() {
        let series = weekly_tasks_series(&[], day("2026-02-14"));
        assert_eq!(series.len(), 7);
        assert!(series.iter().all(|bucket| bucket.total == 0));
    }

    #[test]
    fn monthly_series_length_matches_days_in_month() {
        assert_eq!(monthly_tasks_series(&[], day("2026-08-15")).len(), 31);
        assert_eq!(monthly_tasks_series(&[], day("2026-02-01")).len(), 28);
        assert_eq!(monthly_tasks_series(&[], day("2028-02-29")).len(), 29);
        assert_eq!(monthly_tasks_series(&[], day("2026-12-31")).len(), 31);

        let series = monthly_tasks_series(&[task_on("2026-08-03", true)], day("2026-08-15"));
        assert_eq!(series[0].name, "1");
        assert_eq!(series[2].completed, 1);
    }

    #[test]
    fn goal_series_reports_pre_start_days_as_zero() {
        let goal = goal_from("2026-08-29", 10, &["2026-08-29", "2026-08-30"]);
        let rows = weekly_goals_series(std::slice::from_ref(&goal), day("2026-08-31"));
        assert_eq!(rows.len(), 7);
        // Days before the goal started still carry an explicit 0.
        assert_eq!(rows[0].values, vec![0]);
        assert_eq!(rows[4].values, vec![1]);
        assert_eq!(rows[5].values, vec![1]);
        assert_eq!(rows[6].values, vec![0]);
    }

    #[test]
    fn monthly_goal_series_covers_whole_month() {
        let goal = goal_from("2026-08-10", 30, &["2026-08-10"]);
        let rows = monthly_goals_series(std::slice::from_ref(&goal), day("2026-08-31"));
        assert_eq!(rows.len(), 31);
        assert_eq!(rows[9].values, vec![1]);
    }

    #[test]
    fn goal_day_classification_is_mutually_exclusive() {
        let today = day("2026-08-31");
        let goal = goal_from("2026-08-28", 10, &["2026-08-29"]);

        assert_eq!(classify_goal_day(&goal, day("2026-08-29"), today), GoalDayState::Checked);
        assert_eq!(classify_goal_day(&goal, day("2026-08-28"), today), GoalDayState::Missed);
        assert_eq!(classify_goal_day(&goal, day("2026-08-30"), today), GoalDayState::Missed);
        // Before start and future days are both Pending.
        assert_eq!(classify_goal_day(&goal, day("2026-08-27"), today), GoalDayState::Pending);
        assert_eq!(classify_goal_day(&goal, day("2026-09-01"), today), GoalDayState::Pending);
    }

    #[test]
    fn today_is_never_missed() {
        let today = day("2026-08-31");
        let goal = goal_from("2026-08-28", 10, &[]);
        assert_eq!(classify_goal_day(&goal, today, today), GoalDayState::Pending);
    }

    #[test]
    fn streak_percent_day_one_edge_cases() {
        let today = day("2026-08-31");
        let fresh = goal_from("2026-08-31", 10, &[]);
        assert_eq!(goal_stats(&fresh, today).streak_percent, 0);

        let checked = goal_from("2026-08-31", 10, &["2026-08-31"]);
        let stats = goal_stats(&checked, today);
        assert_eq!(stats.streak_percent, 100);
        assert!(stats.is_checked_today);
        assert_eq!(stats.total_checked, 1);
    }

    #[test]
    fn ten_day_goal_scenario() {
        // Goal "Read" with 10 days, created today, checked in today.
        let today = day("2026-08-31");
        let goal = goal_from("2026-08-31", 10, &["2026-08-31"]);
        let stats = goal_stats(&goal, today);
        assert_eq!(stats.current_day, 1);
        assert!((stats.progress_percent - 10.0).abs() < f64::EPSILON);
        assert!(stats.is_checked_today);
        assert_eq!(stats.streak_percent, 100);
    }

    #[test]
    fn current_day_is_clamped_to_duration() {
        let today = day("2026-08-31");
        let goal = goal_from("2026-08-01", 10, &["2026-08-02", "2026-08-03"]);
        let stats = goal_stats(&goal, today);
        assert_eq!(stats.current_day, 10);
        assert!((stats.progress_percent - 100.0).abs() < f64::EPSILON);
        // Elapsed day 31 of a 10-day goal: 30 countable days, 2 checked.
        assert_eq!(stats.missed_days, 28);
        assert_eq!(stats.streak_percent, 7);
    }

    #[test]
    fn last7_marks_pre_start_days_inactive() {
        let today = day("2026-08-31");
        let goal = goal_from("2026-08-29", 10, &["2026-08-30"]);
        let strip = goal_last7(&goal, today);
        assert_eq!(strip.len(), 7);
        assert!(!strip[0].active);
        assert!(strip[4].active);
        assert!(strip[5].checked);
        assert!(strip[6].is_today);
    }
}
