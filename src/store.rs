use crate::models::{
    AppState, Goal, Priority, Routine, SettingsUpdate, Task, User, UserUpdate,
};
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::{Arc, RwLock};
use uuid::Uuid;

const DEFAULT_GOAL_DURATION_DAYS: u32 = 90;
const FALLBACK_GOAL_DURATION_DAYS: u32 = 30;
const DATE_FMT: &str = "%Y-%m-%d";

pub fn date_str(date: NaiveDate) -> String {
    date.format(DATE_FMT).to_string()
}

/// In-memory domain state shared between callers and the notification timers.
/// Mutations are synchronous and total; readers take whole-state snapshots so
/// a timer firing mid-mutation never observes a torn write.
#[derive(Clone, Default)]
pub struct Store {
    state: Arc<RwLock<AppState>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> AppState {
        self.state.read().expect("store read lock").clone()
    }

    /// Bulk replace, used once at startup with the persisted blob.
    pub fn load(&self, state: AppState) {
        *self.state.write().expect("store write lock") = state;
    }

    pub fn add_task(
        &self,
        title: &str,
        date: Option<DateTime<Utc>>,
        priority: Priority,
        category: Option<&str>,
    ) -> Option<Task> {
        if title.trim().is_empty() {
            return None;
        }
        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            date: date.unwrap_or(now),
            completed: false,
            priority,
            category: category.unwrap_or("general").to_string(),
            created_at: now,
        };
        let mut state = self.state.write().expect("store write lock");
        state.tasks.push(task.clone());
        Some(task)
    }

    pub fn toggle_task(&self, id: &str) -> bool {
        let mut state = self.state.write().expect("store write lock");
        match state.tasks.iter_mut().find(|task| task.id == id) {
            Some(task) => {
                task.completed = !task.completed;
                true
            }
            None => false,
        }
    }

    pub fn delete_task(&self, id: &str) -> bool {
        let mut state = self.state.write().expect("store write lock");
        let before = state.tasks.len();
        state.tasks.retain(|task| task.id != id);
        state.tasks.len() != before
    }

    pub fn add_goal(&self, title: &str, duration_days: Option<u32>) -> Option<Goal> {
        if title.trim().is_empty() {
            return None;
        }
        let duration = match duration_days {
            Some(0) => FALLBACK_GOAL_DURATION_DAYS,
            Some(days) => days,
            None => DEFAULT_GOAL_DURATION_DAYS,
        };
        let goal = Goal {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            start_date: Utc::now(),
            duration_days: duration,
            progress: Vec::new(),
        };
        let mut state = self.state.write().expect("store write lock");
        state.goals.push(goal.clone());
        Some(goal)
    }

    pub fn delete_goal(&self, id: &str) -> bool {
        let mut state = self.state.write().expect("store write lock");
        let before = state.goals.len();
        state.goals.retain(|goal| goal.id != id);
        state.goals.len() != before
    }

    /// Toggles a goal's check-in for one calendar day. Toggling the same day
    /// twice restores the prior progress set; duplicates can never appear.
    pub fn toggle_goal_day(&self, goal_id: &str, date: NaiveDate) -> bool {
        let day = date_str(date);
        let mut state = self.state.write().expect("store write lock");
        match state.goals.iter_mut().find(|goal| goal.id == goal_id) {
            Some(goal) => {
                if goal.progress.iter().any(|entry| entry == &day) {
                    goal.progress.retain(|entry| entry != &day);
                } else {
                    goal.progress.push(day);
                }
                true
            }
            None => false,
        }
    }

    pub fn add_routine(&self, title: &str) -> Option<Routine> {
        if title.trim().is_empty() {
            return None;
        }
        let routine = Routine {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            created_at: Utc::now(),
        };
        let mut state = self.state.write().expect("store write lock");
        state.routines.push(routine.clone());
        Some(routine)
    }

    /// Historical checks for the routine are intentionally left behind; they
    /// become orphaned entries that readers ignore.
    pub fn delete_routine(&self, id: &str) -> bool {
        let mut state = self.state.write().expect("store write lock");
        let before = state.routines.len();
        state.routines.retain(|routine| routine.id != id);
        state.routines.len() != before
    }

    /// Orphan-tolerant: the routine id does not have to exist in `routines`.
    pub fn toggle_routine_check(&self, routine_id: &str, date: NaiveDate) -> bool {
        let day = date_str(date);
        let mut state = self.state.write().expect("store write lock");
        let checks = state.routine_checks.entry(day).or_default();
        if checks.iter().any(|id| id == routine_id) {
            checks.retain(|id| id != routine_id);
        } else {
            checks.push(routine_id.to_string());
        }
        true
    }

    pub fn is_routine_checked(&self, routine_id: &str, date: NaiveDate) -> bool {
        let day = date_str(date);
        let state = self.state.read().expect("store read lock");
        state
            .routine_checks
            .get(&day)
            .is_some_and(|checks| checks.iter().any(|id| id == routine_id))
    }

    pub fn update_user(&self, update: UserUpdate) -> bool {
        let mut state = self.state.write().expect("store write lock");
        let mut changed = false;
        if let Some(name) = update.name {
            if state.user.name != name {
                state.user.name = name;
                changed = true;
            }
        }
        if let Some(avatar) = update.avatar {
            if state.user.avatar != avatar {
                state.user.avatar = avatar;
                changed = true;
            }
        }
        changed
    }

    pub fn set_notifications_enabled(&self, enabled: bool) -> bool {
        let mut state = self.state.write().expect("store write lock");
        if state.notifications_enabled == enabled {
            return false;
        }
        state.notifications_enabled = enabled;
        true
    }

    pub fn update_notification_settings(&self, update: SettingsUpdate) -> bool {
        let mut state = self.state.write().expect("store write lock");
        let settings = &mut state.notification_settings;
        match update {
            SettingsUpdate::Tasks(patch) => {
                merge(&mut settings.tasks.enabled, patch.enabled);
                merge(&mut settings.tasks.interval_minutes, patch.interval_minutes);
                merge(&mut settings.tasks.reminder_time, patch.reminder_time);
            }
            SettingsUpdate::Goals(patch) => {
                merge(&mut settings.goals.enabled, patch.enabled);
                merge(&mut settings.goals.reminder_time, patch.reminder_time);
                merge(&mut settings.goals.streak_alerts, patch.streak_alerts);
            }
            SettingsUpdate::Routines(patch) => {
                merge(&mut settings.routines.enabled, patch.enabled);
                merge(&mut settings.routines.morning_time, patch.morning_time);
                merge(&mut settings.routines.evening_time, patch.evening_time);
            }
            SettingsUpdate::Motivation(patch) => {
                merge(&mut settings.motivation.enabled, patch.enabled);
                merge(&mut settings.motivation.interval_hours, patch.interval_hours);
            }
        }
        true
    }
}

fn merge<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}
