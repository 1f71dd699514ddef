use crate::errors::{AppError, AppResult};
use crate::models::AppState;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::fs;
use std::path::Path;
use std::sync::Mutex;

const SCHEMA_SQL: &str = include_str!("schema.sql");

const STATE_KEY: &str = "apex-data";
const THEME_KEY: &str = "apex-theme";

/// Key-value gateway over a local sqlite file. The domain state is stored as
/// one JSON blob under a stable key and always written whole.
#[derive(Debug)]
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn new(path: &Path) -> AppResult<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| AppError::Io(err.to_string()))?;
        }
        let conn = Connection::open(path).map_err(AppError::from)?;
        conn.execute_batch(SCHEMA_SQL).map_err(AppError::from)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Missing blob, or a blob that no longer parses, both load as the
    /// default empty state; startup never fails on bad data. Fields absent
    /// from an older blob fill with their defaults.
    pub fn load_state(&self) -> AppResult<AppState> {
        let Some(raw) = self.get(STATE_KEY)? else {
            return Ok(AppState::default());
        };
        match serde_json::from_str(&raw) {
            Ok(state) => Ok(state),
            Err(err) => {
                tracing::warn!(error = %err, "persisted state blob is malformed, starting empty");
                Ok(AppState::default())
            }
        }
    }

    pub fn save_state(&self, state: &AppState) -> AppResult<()> {
        let blob = serde_json::to_string(state)?;
        self.put(STATE_KEY, &blob)
    }

    pub fn theme(&self) -> AppResult<String> {
        let theme = self.get(THEME_KEY)?.unwrap_or_default();
        match theme.as_str() {
            "light" => Ok("light".to_string()),
            _ => Ok("dark".to_string()),
        }
    }

    pub fn set_theme(&self, theme: &str) -> AppResult<()> {
        self.put(THEME_KEY, theme)
    }

    fn get(&self, key: &str) -> AppResult<Option<String>> {
        let conn = self.lock()?;
        let value = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn put(&self, key: &str, value: &str) -> AppResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn lock(&self) -> AppResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| AppError::Internal("database mutex poisoned".to_string()))
    }
}
