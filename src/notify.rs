use crate::messages::{
    completion_emoji, completion_message, pick, render, task_pool, TimeOfDay,
    GOAL_CHECK_IN, MOTIVATIONAL, ROUTINE_COMPLETION, ROUTINE_EVENING, ROUTINE_MORNING,
    TASK_COMPLETION,
};
use crate::models::{AppState, Goal, Task};
use crate::store::{date_str, Store};
use chrono::{Local, NaiveDate, Timelike};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};

const GOAL_CADENCE_HOURS: u64 = 2;
const ROUTINE_CADENCE_HOURS: u64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Tasks,
    Goals,
    Routines,
    Motivation,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tasks => "tasks",
            Self::Goals => "goals",
            Self::Routines => "routines",
            Self::Motivation => "motivation",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub tag: String,
}

/// External dispatch capability. Fire-and-forget: implementations must never
/// surface delivery failure back into the store.
pub trait NotificationSink: Send + Sync {
    fn emit(&self, title: &str, body: &str, tag: &str);
}

/// Used when no delivery capability is available (permission not granted).
#[derive(Debug, Default)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn emit(&self, _title: &str, _body: &str, _tag: &str) {}
}

#[derive(Debug, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn emit(&self, title: &str, body: &str, tag: &str) {
        tracing::info!(tag = tag, title = title, body = body, "notification emitted");
    }
}

/// One cancellable timer per enabled category. Re-arming always cancels every
/// existing timer before spawning replacements, so a settings change can never
/// leave a duplicate timer firing at the old interval.
pub struct NotificationScheduler {
    store: Store,
    sink: Arc<dyn NotificationSink>,
    timers: Mutex<HashMap<Category, JoinHandle<()>>>,
}

impl NotificationScheduler {
    pub fn new(store: Store, sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            store,
            sink,
            timers: Mutex::new(HashMap::new()),
        }
    }

    pub fn rearm(&self) {
        self.cancel_all();

        let snapshot = self.store.snapshot();
        if !snapshot.notifications_enabled {
            return;
        }
        let settings = &snapshot.notification_settings;

        let mut timers = self.timers.lock().expect("timer map lock");
        if settings.tasks.enabled {
            let minutes = u64::from(settings.tasks.interval_minutes.max(1));
            timers.insert(
                Category::Tasks,
                self.spawn_timer(Category::Tasks, Duration::from_secs(minutes * 60)),
            );
        }
        if settings.goals.enabled {
            // Fixed cadence; goals.reminderTime is stored but not consulted.
            timers.insert(
                Category::Goals,
                self.spawn_timer(Category::Goals, Duration::from_secs(GOAL_CADENCE_HOURS * 3600)),
            );
        }
        if settings.routines.enabled {
            timers.insert(
                Category::Routines,
                self.spawn_timer(
                    Category::Routines,
                    Duration::from_secs(ROUTINE_CADENCE_HOURS * 3600),
                ),
            );
        }
        if settings.motivation.enabled {
            let hours = u64::from(settings.motivation.interval_hours.max(1));
            timers.insert(
                Category::Motivation,
                self.spawn_timer(Category::Motivation, Duration::from_secs(hours * 3600)),
            );
        }
        tracing::debug!(armed = timers.len(), "notification timers re-armed");
    }

    pub fn teardown(&self) {
        self.cancel_all();
    }

    pub fn armed_categories(&self) -> usize {
        self.timers.lock().expect("timer map lock").len()
    }

    /// Synchronous on-demand preview of a category against the live snapshot.
    /// Runs once, bypassing the timers and their windows.
    pub fn test_fire(&self, category: Category) {
        let snapshot = self.store.snapshot();
        let now = Local::now();
        for notification in test_notifications(category, &snapshot, now.date_naive(), now.hour()) {
            self.sink
                .emit(&notification.title, &notification.body, &notification.tag);
        }
    }

    fn cancel_all(&self) {
        let mut timers = self.timers.lock().expect("timer map lock");
        for (_, handle) in timers.drain() {
            handle.abort();
        }
    }

    fn spawn_timer(&self, category: Category, period: Duration) -> JoinHandle<()> {
        let store = self.store.clone();
        let sink = self.sink.clone();
        tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick resolves immediately; consume it so the timer
            // fires one full period after arming.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let snapshot = store.snapshot();
                let now = Local::now();
                let notifications =
                    scheduled_notifications(category, &snapshot, now.date_naive(), now.hour());
                if !notifications.is_empty() {
                    tracing::debug!(
                        category = category.as_str(),
                        count = notifications.len(),
                        "notification timer fired"
                    );
                }
                for notification in notifications {
                    sink.emit(&notification.title, &notification.body, &notification.tag);
                }
            }
        })
    }
}

pub fn scheduled_notifications(
    category: Category,
    state: &AppState,
    today: NaiveDate,
    hour: u32,
) -> Vec<Notification> {
    match category {
        Category::Tasks => task_tick(&state.tasks, today, hour).into_iter().collect(),
        Category::Goals => goal_tick(&state.goals, today),
        Category::Routines => routine_tick(state, today, hour).into_iter().collect(),
        Category::Motivation => vec![motivation_tick()],
    }
}

// The reminder path lives in wall-clock time, so tasks bucket by the local
// calendar day here (analytics buckets by the caller-provided date instead).
fn is_on_day(task: &Task, day: NaiveDate) -> bool {
    task.date.with_timezone(&Local).date_naive() == day
}

fn task_tick(tasks: &[Task], today: NaiveDate, hour: u32) -> Option<Notification> {
    let today_total = tasks.iter().filter(|task| is_on_day(task, today)).count();
    let remaining = tasks
        .iter()
        .filter(|task| is_on_day(task, today) && !task.completed)
        .count();

    if remaining > 0 {
        let template = pick(task_pool(TimeOfDay::from_hour(hour)));
        let (title, body) = render(
            template,
            &[
                ("count", today_total.to_string()),
                ("remaining", remaining.to_string()),
            ],
        );
        Some(Notification {
            title,
            body,
            tag: "task-reminder".to_string(),
        })
    } else if today_total > 0 {
        let template = pick(&TASK_COMPLETION);
        Some(Notification {
            title: template.title.to_string(),
            body: template.body.to_string(),
            tag: "task-completion".to_string(),
        })
    } else {
        None
    }
}

fn goal_reminder(goal: &Goal, today: NaiveDate, tag: String) -> Notification {
    let elapsed = (today - goal.start_date.date_naive()).num_days() + 1;
    let day = elapsed.min(i64::from(goal.duration_days));
    let (title, body) = render(
        pick(&GOAL_CHECK_IN),
        &[
            ("title", goal.title.clone()),
            ("day", day.to_string()),
            ("total", goal.duration_days.to_string()),
            ("streak", goal.progress.len().to_string()),
        ],
    );
    Notification { title, body, tag }
}

fn goal_tick(goals: &[Goal], today: NaiveDate) -> Vec<Notification> {
    let today_key = date_str(today);
    goals
        .iter()
        .filter(|goal| !goal.progress.iter().any(|entry| entry == &today_key))
        .map(|goal| goal_reminder(goal, today, format!("goal-{}", goal.id)))
        .collect()
}

fn routine_tick(state: &AppState, today: NaiveDate, hour: u32) -> Option<Notification> {
    let total = state.routines.len();
    if total == 0 {
        return None;
    }
    let today_key = date_str(today);
    let completed = state
        .routine_checks
        .get(&today_key)
        .map_or(0, |checks| checks.len());

    if completed >= total {
        let template = pick(&ROUTINE_COMPLETION);
        return Some(Notification {
            title: template.title.to_string(),
            body: template.body.to_string(),
            tag: "routine-complete".to_string(),
        });
    }

    if (7..10).contains(&hour) {
        let (title, body) = render(pick(&ROUTINE_MORNING), &[("count", total.to_string())]);
        Some(Notification {
            title,
            body,
            tag: "routine-morning".to_string(),
        })
    } else if (19..21).contains(&hour) {
        let (title, body) = render(
            pick(&ROUTINE_EVENING),
            &[
                ("completed", completed.to_string()),
                ("total", total.to_string()),
                ("emoji", completion_emoji(completed, total).to_string()),
                ("message", completion_message(completed, total).to_string()),
            ],
        );
        Some(Notification {
            title,
            body,
            tag: "routine-evening".to_string(),
        })
    } else {
        None
    }
}

fn motivation_tick() -> Notification {
    let template = pick(&MOTIVATIONAL);
    Notification {
        title: template.title.to_string(),
        body: template.body.to_string(),
        tag: "motivation".to_string(),
    }
}

fn fixed(title: &str, body: &str, tag: &str) -> Notification {
    Notification {
        title: title.to_string(),
        body: body.to_string(),
        tag: tag.to_string(),
    }
}

/// Preview variant of each category. Empty collections get a fixed fallback
/// message, and routines reuse the morning template with the pending count
/// whatever the current hour.
pub fn test_notifications(
    category: Category,
    state: &AppState,
    today: NaiveDate,
    hour: u32,
) -> Vec<Notification> {
    match category {
        Category::Tasks => {
            let today_total = state.tasks.iter().filter(|t| is_on_day(t, today)).count();
            if today_total == 0 {
                return vec![fixed(
                    "📋 No Tasks",
                    "You have no tasks for today. Enjoy your free time! 🎉",
                    "test-task",
                )];
            }
            let mut notifications: Vec<_> =
                task_tick(&state.tasks, today, hour).into_iter().collect();
            for notification in &mut notifications {
                notification.tag = "test-task".to_string();
            }
            notifications
        }
        Category::Goals => {
            if state.goals.is_empty() {
                return vec![fixed(
                    "🎯 No Goals",
                    "Create a goal to start tracking your progress! ✨",
                    "test-goal",
                )];
            }
            let today_key = date_str(today);
            let unchecked = state
                .goals
                .iter()
                .find(|goal| !goal.progress.iter().any(|entry| entry == &today_key));
            match unchecked {
                Some(goal) => vec![goal_reminder(goal, today, "test-goal".to_string())],
                None => vec![fixed(
                    "🎯 All Checked In!",
                    "You've checked in all your goals today! Amazing! 🏆",
                    "test-goal",
                )],
            }
        }
        Category::Routines => {
            if state.routines.is_empty() {
                return vec![fixed(
                    "☀️ No Routines",
                    "Add some daily routines to build great habits! 🌱",
                    "test-routine",
                )];
            }
            let today_key = date_str(today);
            let checks = state.routine_checks.get(&today_key);
            let pending = state
                .routines
                .iter()
                .filter(|routine| {
                    !checks.is_some_and(|ids| ids.iter().any(|id| id == &routine.id))
                })
                .count();
            if pending == 0 {
                let template = pick(&ROUTINE_COMPLETION);
                vec![fixed(template.title, template.body, "test-routine")]
            } else {
                let (title, body) =
                    render(pick(&ROUTINE_MORNING), &[("count", pending.to_string())]);
                vec![Notification {
                    title,
                    body,
                    tag: "test-routine".to_string(),
                }]
            }
        }
        Category::Motivation => {
            let mut notification = motivation_tick();
            notification.tag = "test-motivation".to_string();
            vec![notification]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        scheduled_notifications, test_notifications, Category, Notification,
        NotificationScheduler, NotificationSink,
    };
    use crate::messages;
    use crate::models::{
        AppState, SettingsUpdate, TaskSettingsUpdate,
    };
    use crate::store::Store;
    use chrono::NaiveDate;
    use std::sync::{Arc, Mutex};
    use tokio::time::Duration;

    #[derive(Default)]
    struct RecordingSink {
        emitted: Mutex<Vec<Notification>>,
    }

    impl RecordingSink {
        fn count(&self) -> usize {
            self.emitted.lock().expect("sink lock").len()
        }
    }

    impl NotificationSink for RecordingSink {
        fn emit(&self, title: &str, body: &str, tag: &str) {
            self.emitted.lock().expect("sink lock").push(Notification {
                title: title.to_string(),
                body: body.to_string(),
                tag: tag.to_string(),
            });
        }
    }

    // Tasks in these tests are created "now", so the reference day has to be
    // the live local date.
    fn today() -> NaiveDate {
        chrono::Local::now().date_naive()
    }

    fn populated_store() -> Store {
        let store = Store::new();
        store.add_task("Review PR", None, crate::models::Priority::High, None);
        store.add_goal("Read", Some(10));
        store.add_routine("Stretch");
        store
    }

    #[test]
    fn task_tick_interpolates_count_and_remaining() {
        let store = populated_store();
        store.add_task("Ship release", None, crate::models::Priority::Medium, None);
        let state = store.snapshot();

        let notifications = scheduled_notifications(Category::Tasks, &state, today(), 9);
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].tag, "task-reminder");
        // Morning templates interpolate {count}; both tasks remain.
        assert!(notifications[0].body.contains('2'));
    }

    #[test]
    fn task_tick_celebrates_when_everything_is_done() {
        let store = Store::new();
        let task = store
            .add_task("Only one", None, crate::models::Priority::Low, None)
            .expect("task created");
        store.toggle_task(&task.id);

        let notifications =
            scheduled_notifications(Category::Tasks, &store.snapshot(), today(), 14);
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].tag, "task-completion");
    }

    #[test]
    fn task_tick_is_silent_with_no_tasks_today() {
        let state = AppState::default();
        assert!(scheduled_notifications(Category::Tasks, &state, today(), 9).is_empty());
    }

    #[test]
    fn goal_tick_reminds_each_unchecked_goal() {
        let store = Store::new();
        let checked = store.add_goal("Read", Some(10)).expect("goal created");
        store.add_goal("Run", Some(30));
        store.toggle_goal_day(&checked.id, today());

        let notifications = scheduled_notifications(Category::Goals, &store.snapshot(), today(), 9);
        assert_eq!(notifications.len(), 1);
        assert!(notifications[0].tag.starts_with("goal-"));
        assert!(notifications[0].body.contains("Run"));
    }

    #[test]
    fn routine_evening_summary_uses_zero_tier() {
        let store = Store::new();
        store.add_routine("A");
        store.add_routine("B");

        let notifications =
            scheduled_notifications(Category::Routines, &store.snapshot(), today(), 20);
        assert_eq!(notifications.len(), 1);
        let body = &notifications[0].body;
        assert_eq!(notifications[0].tag, "routine-evening");
        assert!(body.contains("0/2"));
        assert!(body.contains('🤗') || body.contains("Tomorrow's a new day!"));
    }

    #[test]
    fn routine_tick_outside_windows_is_silent() {
        let store = Store::new();
        store.add_routine("A");
        let state = store.snapshot();
        assert!(scheduled_notifications(Category::Routines, &state, today(), 13).is_empty());
        assert!(scheduled_notifications(Category::Routines, &state, today(), 22).is_empty());
    }

    #[test]
    fn routine_completion_ignores_the_windows() {
        let store = Store::new();
        let routine = store.add_routine("A").expect("routine created");
        store.toggle_routine_check(&routine.id, today());

        let notifications =
            scheduled_notifications(Category::Routines, &store.snapshot(), today(), 13);
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].tag, "routine-complete");
    }

    #[test]
    fn routine_morning_window_reports_total_count() {
        let store = Store::new();
        store.add_routine("A");
        store.add_routine("B");
        store.add_routine("C");

        let notifications =
            scheduled_notifications(Category::Routines, &store.snapshot(), today(), 8);
        assert_eq!(notifications[0].tag, "routine-morning");
        assert!(notifications[0].body.contains('3'));
    }

    #[test]
    fn motivation_fires_unconditionally() {
        let notifications =
            scheduled_notifications(Category::Motivation, &AppState::default(), today(), 3);
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].tag, "motivation");
        assert!(messages::MOTIVATIONAL
            .iter()
            .any(|template| template.title == notifications[0].title));
    }

    #[test]
    fn test_fire_falls_back_on_empty_collections() {
        let state = AppState::default();
        let tasks = test_notifications(Category::Tasks, &state, today(), 9);
        assert_eq!(tasks[0].title, "📋 No Tasks");
        let goals = test_notifications(Category::Goals, &state, today(), 9);
        assert_eq!(goals[0].title, "🎯 No Goals");
        let routines = test_notifications(Category::Routines, &state, today(), 9);
        assert_eq!(routines[0].title, "☀️ No Routines");
    }

    #[test]
    fn test_fire_routines_uses_morning_form_at_any_hour() {
        let store = Store::new();
        store.add_routine("A");
        store.add_routine("B");

        // 22:00 is outside both scheduled windows; the preview still fires.
        let notifications = test_notifications(Category::Routines, &store.snapshot(), today(), 22);
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].tag, "test-routine");
        assert!(notifications[0].body.contains('2'));
    }

    #[test]
    fn test_fire_goals_reports_all_checked() {
        let store = Store::new();
        let goal = store.add_goal("Read", Some(10)).expect("goal created");
        store.toggle_goal_day(&goal.id, chrono::Local::now().date_naive());
        let sink = Arc::new(RecordingSink::default());
        let scheduler = NotificationScheduler::new(store, sink.clone());

        scheduler.test_fire(Category::Goals);
        let emitted = sink.emitted.lock().expect("sink lock");
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].title, "🎯 All Checked In!");
    }

    #[tokio::test(start_paused = true)]
    async fn timers_fire_after_one_full_period() {
        let store = populated_store();
        store.set_notifications_enabled(true);
        let sink = Arc::new(RecordingSink::default());
        let scheduler = NotificationScheduler::new(store, sink.clone());

        scheduler.rearm();
        assert_eq!(scheduler.armed_categories(), 4);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(sink.count(), 0);

        // Tasks timer defaults to 60 minutes; nothing else fires within it.
        tokio::time::sleep(Duration::from_secs(60 * 60)).await;
        assert!(sink.count() >= 1);

        scheduler.teardown();
        assert_eq!(scheduler.armed_categories(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn rearm_cancels_the_old_interval() {
        let store = Store::new();
        store.add_task("Pending", None, crate::models::Priority::Medium, None);
        store.set_notifications_enabled(true);
        // Only the tasks category armed, to count its firings in isolation.
        store.update_notification_settings(SettingsUpdate::Goals(
            crate::models::GoalSettingsUpdate {
                enabled: Some(false),
                ..Default::default()
            },
        ));
        store.update_notification_settings(SettingsUpdate::Routines(
            crate::models::RoutineSettingsUpdate {
                enabled: Some(false),
                ..Default::default()
            },
        ));
        store.update_notification_settings(SettingsUpdate::Motivation(
            crate::models::MotivationSettingsUpdate {
                enabled: Some(false),
                ..Default::default()
            },
        ));

        let sink = Arc::new(RecordingSink::default());
        let scheduler = NotificationScheduler::new(store.clone(), sink.clone());
        scheduler.rearm();
        assert_eq!(scheduler.armed_categories(), 1);

        // Widen the interval and re-arm before the first firing.
        store.update_notification_settings(SettingsUpdate::Tasks(TaskSettingsUpdate {
            interval_minutes: Some(120),
            ..Default::default()
        }));
        scheduler.rearm();
        assert_eq!(scheduler.armed_categories(), 1);

        // The old 60-minute timer must not fire.
        tokio::time::sleep(Duration::from_secs(61 * 60)).await;
        assert_eq!(sink.count(), 0);

        tokio::time::sleep(Duration::from_secs(60 * 60)).await;
        assert_eq!(sink.count(), 1);

        scheduler.teardown();
    }

    #[tokio::test]
    async fn disabled_master_flag_arms_nothing() {
        let store = populated_store();
        let scheduler = NotificationScheduler::new(store, Arc::new(RecordingSink::default()));
        scheduler.rearm();
        assert_eq!(scheduler.armed_categories(), 0);
    }
}
