use crate::db::Database;
use crate::errors::AppResult;
use crate::models::{
    AppState, Goal, Priority, Routine, SettingsUpdate, Task, UserUpdate,
};
use crate::notify::{Category, NotificationScheduler, NotificationSink, TracingSink};
use crate::store::Store;
use chrono::{DateTime, NaiveDate, Utc};
use std::path::Path;
use std::sync::Arc;

/// Which downstream reactions a mutation triggers. Timers watch the task,
/// goal and routine collections plus the notification settings; user profile
/// edits only persist.
#[derive(Clone, Copy)]
enum Reaction {
    Persist,
    PersistAndRearm,
}

/// Owns the store, the persistence gateway and the notification timers, and
/// keeps them consistent: every mutation persists the full snapshot and
/// re-arms timers when a watched input changed. Injected explicitly instead
/// of living in a process-wide singleton.
///
/// Timers are tokio tasks, so the core must be created and mutated from
/// within a tokio runtime.
pub struct TrackerCore {
    db: Arc<Database>,
    store: Store,
    scheduler: NotificationScheduler,
}

impl TrackerCore {
    pub fn new(data_dir: &Path) -> AppResult<Arc<Self>> {
        Self::with_sink(data_dir, Arc::new(TracingSink))
    }

    pub fn with_sink(data_dir: &Path, sink: Arc<dyn NotificationSink>) -> AppResult<Arc<Self>> {
        let db = Arc::new(Database::new(&data_dir.join("state.sqlite"))?);
        let store = Store::new();
        store.load(db.load_state()?);

        let scheduler = NotificationScheduler::new(store.clone(), sink);
        let this = Arc::new(Self {
            db,
            store,
            scheduler,
        });
        this.scheduler.rearm();
        Ok(this)
    }

    pub fn snapshot(&self) -> AppState {
        self.store.snapshot()
    }

    pub fn add_task(
        &self,
        title: &str,
        date: Option<DateTime<Utc>>,
        priority: Priority,
        category: Option<&str>,
    ) -> Option<Task> {
        let task = self.store.add_task(title, date, priority, category);
        if task.is_some() {
            self.react(Reaction::PersistAndRearm);
        }
        task
    }

    pub fn toggle_task(&self, id: &str) {
        if self.store.toggle_task(id) {
            self.react(Reaction::PersistAndRearm);
        }
    }

    pub fn delete_task(&self, id: &str) {
        if self.store.delete_task(id) {
            self.react(Reaction::PersistAndRearm);
        }
    }

    pub fn add_goal(&self, title: &str, duration_days: Option<u32>) -> Option<Goal> {
        let goal = self.store.add_goal(title, duration_days);
        if goal.is_some() {
            self.react(Reaction::PersistAndRearm);
        }
        goal
    }

    pub fn delete_goal(&self, id: &str) {
        if self.store.delete_goal(id) {
            self.react(Reaction::PersistAndRearm);
        }
    }

    pub fn toggle_goal_day(&self, goal_id: &str, date: NaiveDate) {
        if self.store.toggle_goal_day(goal_id, date) {
            self.react(Reaction::PersistAndRearm);
        }
    }

    pub fn add_routine(&self, title: &str) -> Option<Routine> {
        let routine = self.store.add_routine(title);
        if routine.is_some() {
            self.react(Reaction::PersistAndRearm);
        }
        routine
    }

    pub fn delete_routine(&self, id: &str) {
        if self.store.delete_routine(id) {
            self.react(Reaction::PersistAndRearm);
        }
    }

    pub fn toggle_routine_check(&self, routine_id: &str, date: NaiveDate) {
        if self.store.toggle_routine_check(routine_id, date) {
            self.react(Reaction::PersistAndRearm);
        }
    }

    pub fn is_routine_checked(&self, routine_id: &str, date: NaiveDate) -> bool {
        self.store.is_routine_checked(routine_id, date)
    }

    pub fn update_user(&self, update: UserUpdate) {
        if self.store.update_user(update) {
            self.react(Reaction::Persist);
        }
    }

    pub fn set_notifications_enabled(&self, enabled: bool) {
        if self.store.set_notifications_enabled(enabled) {
            self.react(Reaction::PersistAndRearm);
        }
    }

    pub fn update_notification_settings(&self, update: SettingsUpdate) {
        if self.store.update_notification_settings(update) {
            self.react(Reaction::PersistAndRearm);
        }
    }

    pub fn theme(&self) -> AppResult<String> {
        self.db.theme()
    }

    pub fn toggle_theme(&self) -> AppResult<String> {
        let next = if self.db.theme()? == "dark" {
            "light"
        } else {
            "dark"
        };
        self.db.set_theme(next)?;
        Ok(next.to_string())
    }

    pub fn test_notification(&self, category: Category) {
        self.scheduler.test_fire(category);
    }

    /// Cancels all outstanding timers. Nothing fires after this returns.
    pub fn shutdown(&self) {
        self.scheduler.teardown();
    }

    fn react(&self, reaction: Reaction) {
        // A failed write never fails the mutation; the in-memory state stays
        // authoritative and the next successful write catches up.
        if let Err(err) = self.db.save_state(&self.store.snapshot()) {
            tracing::warn!(error = %err, "failed to persist state snapshot");
        }
        if matches!(reaction, Reaction::PersistAndRearm) {
            self.scheduler.rearm();
        }
    }
}

impl Drop for TrackerCore {
    fn drop(&mut self) {
        self.scheduler.teardown();
    }
}
