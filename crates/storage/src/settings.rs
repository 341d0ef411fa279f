//! Key/value settings grouped by plugin name

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension};
use std::path::Path;

type DbPool = Pool<SqliteConnectionManager>;
type DbConnection = PooledConnection<SqliteConnectionManager>;

/// Errors raised by the settings store
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("database pool error: {0}")]
    Pool(#[from] r2d2::Error),
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Persistent plugin settings
#[derive(Clone)]
pub struct SettingsStore {
    pool: DbPool,
}

impl SettingsStore {
    /// Open (or create) the settings database at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let manager = SqliteConnectionManager::file(path.as_ref());
        let pool = Pool::builder().max_size(4).build(manager)?;
        let store = Self { pool };
        store.migrate()?;
        tracing::info!("Settings database opened at {}", path.as_ref().display());
        Ok(store)
    }

    /// In-memory store, every call shares the single pooled connection
    pub fn open_in_memory() -> Result<Self, SettingsError> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder().max_size(1).build(manager)?;
        let store = Self { pool };
        store.migrate()?;
        Ok(store)
    }

    fn connection(&self) -> Result<DbConnection, SettingsError> {
        Ok(self.pool.get()?)
    }

    fn migrate(&self) -> Result<(), SettingsError> {
        self.connection()?.execute_batch(
            "CREATE TABLE IF NOT EXISTS settings (
                plugin TEXT NOT NULL,
                key    TEXT NOT NULL,
                value  TEXT NOT NULL,
                PRIMARY KEY (plugin, key)
            );",
        )?;
        Ok(())
    }

    /// Insert or overwrite a setting
    pub fn set(&self, plugin: &str, key: &str, value: &str) -> Result<(), SettingsError> {
        self.connection()?.execute(
            "INSERT INTO settings (plugin, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(plugin, key) DO UPDATE SET value = excluded.value",
            params![plugin, key, value],
        )?;
        tracing::debug!("Setting updated: {}.{}", plugin, key);
        Ok(())
    }

    /// Read a stored setting
    pub fn get(&self, plugin: &str, key: &str) -> Result<Option<String>, SettingsError> {
        let value = self
            .connection()?
            .query_row(
                "SELECT value FROM settings WHERE plugin = ?1 AND key = ?2",
                params![plugin, key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Resolve a setting with fallbacks
    ///
    /// Lookup order: environment variable named after the upper-cased key
    /// (only when `use_env` is set), stored value, `default`.
    pub fn get_or(
        &self,
        plugin: &str,
        key: &str,
        default: &str,
        use_env: bool,
    ) -> Result<String, SettingsError> {
        if use_env {
            if let Ok(value) = std::env::var(key.to_uppercase()) {
                if !value.is_empty() {
                    return Ok(value);
                }
            }
        }

        Ok(self
            .get(plugin, key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// Remove a setting, returns whether it existed
    pub fn delete(&self, plugin: &str, key: &str) -> Result<bool, SettingsError> {
        let removed = self.connection()?.execute(
            "DELETE FROM settings WHERE plugin = ?1 AND key = ?2",
            params![plugin, key],
        )?;
        Ok(removed > 0)
    }

    /// All settings of a plugin ordered by key
    pub fn list(&self, plugin: &str) -> Result<Vec<(String, String)>, SettingsError> {
        let conn = self.connection()?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM settings WHERE plugin = ?1 ORDER BY key")?;
        let rows = stmt
            .query_map(params![plugin], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
