//! Plugin settings storage
//!
//! Small SQLite-backed key/value store used by plugins to keep their
//! configuration (paths, name templates, credentials) between restarts.

pub mod settings;

pub use settings::{SettingsError, SettingsStore};
