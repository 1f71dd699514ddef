use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub date: DateTime<Utc>,
    pub completed: bool,
    pub priority: Priority,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub title: String,
    pub start_date: DateTime<Utc>,
    pub duration_days: u32,
    /// Distinct "YYYY-MM-DD" strings, one per checked-in day.
    #[serde(default)]
    pub progress: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Routine {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub name: Option<String>,
    pub avatar: Option<Option<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct TaskNotificationSettings {
    pub enabled: bool,
    pub interval_minutes: u32,
    pub reminder_time: String,
}

impl Default for TaskNotificationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_minutes: 60,
            reminder_time: "morning".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct GoalNotificationSettings {
    pub enabled: bool,
    // Stored and surfaced in settings, but the goal timer runs on a fixed
    // two-hour cadence that ignores it (see notify.rs).
    pub reminder_time: String,
    pub streak_alerts: bool,
}

impl Default for GoalNotificationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            reminder_time: "09:00".to_string(),
            streak_alerts: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RoutineNotificationSettings {
    pub enabled: bool,
    pub morning_time: String,
    pub evening_time: String,
}

impl Default for RoutineNotificationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            morning_time: "07:00".to_string(),
            evening_time: "20:00".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct MotivationNotificationSettings {
    pub enabled: bool,
    pub interval_hours: u32,
}

impl Default for MotivationNotificationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_hours: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct NotificationSettings {
    pub tasks: TaskNotificationSettings,
    pub goals: GoalNotificationSettings,
    pub routines: RoutineNotificationSettings,
    pub motivation: MotivationNotificationSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TaskSettingsUpdate {
    pub enabled: Option<bool>,
    pub interval_minutes: Option<u32>,
    pub reminder_time: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GoalSettingsUpdate {
    pub enabled: Option<bool>,
    pub reminder_time: Option<String>,
    pub streak_alerts: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RoutineSettingsUpdate {
    pub enabled: Option<bool>,
    pub morning_time: Option<String>,
    pub evening_time: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MotivationSettingsUpdate {
    pub enabled: Option<bool>,
    pub interval_hours: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SettingsUpdate {
    Tasks(TaskSettingsUpdate),
    Goals(GoalSettingsUpdate),
    Routines(RoutineSettingsUpdate),
    Motivation(MotivationSettingsUpdate),
}

/// The full persisted blob. Every field defaults so older blobs (for example
/// ones saved before notification settings existed) load without failing.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct AppState {
    pub tasks: Vec<Task>,
    pub goals: Vec<Goal>,
    pub routines: Vec<Routine>,
    pub routine_checks: BTreeMap<String, Vec<String>>,
    pub user: User,
    pub notifications_enabled: bool,
    pub notification_settings: NotificationSettings,
}
