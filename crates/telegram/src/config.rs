//! Runtime configuration read from the environment

use chrono_tz::Tz;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_DATABASE_PATH: &str = "assistbot.sqlite";
pub const DEFAULT_DOWNLOAD_PATH: &str = "downloads";
pub const DEFAULT_YTDL_BIN: &str = "yt-dlp";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("ADMINS contains an invalid user id: {0:?}")]
    InvalidAdmin(String),
    #[error("unknown timezone: {0:?}")]
    InvalidTimezone(String),
    #[error("{key} must be a non-negative integer, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },
}

/// Bot settings shared with every handler
#[derive(Debug, Clone)]
pub struct Config {
    pub admins: HashSet<u64>,
    pub database_path: PathBuf,
    pub download_path: PathBuf,
    pub timezone: Tz,
    pub proxy: Option<String>,
    pub ytdl_bin: String,
    pub download_retries: u32,
    pub download_retry_delay: Duration,
}

impl Config {
    /// Load from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` to resolve variables; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let admins = match var("ADMINS") {
            Some(list) => parse_admins(&list)?,
            None => {
                tracing::warn!("ADMINS is not set, admin commands are disabled");
                HashSet::new()
            }
        };

        let timezone = match var("TIMEZONE") {
            Some(name) => name
                .parse::<Tz>()
                .map_err(|_| ConfigError::InvalidTimezone(name))?,
            None => Tz::UTC,
        };

        let download_retries = parse_number("DOWNLOAD_RETRIES", var("DOWNLOAD_RETRIES"), 3)?;
        let retry_delay = parse_number("DOWNLOAD_RETRY_DELAY", var("DOWNLOAD_RETRY_DELAY"), 5)?;

        Ok(Self {
            admins,
            database_path: var("DATABASE_PATH")
                .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string())
                .into(),
            download_path: var("DOWNLOAD_PATH")
                .unwrap_or_else(|| DEFAULT_DOWNLOAD_PATH.to_string())
                .into(),
            timezone,
            proxy: var("PROXY"),
            ytdl_bin: var("YTDL_BIN").unwrap_or_else(|| DEFAULT_YTDL_BIN.to_string()),
            download_retries,
            download_retry_delay: Duration::from_secs(u64::from(retry_delay)),
        })
    }

    pub fn is_admin(&self, user_id: u64) -> bool {
        self.admins.contains(&user_id)
    }
}

fn parse_admins(list: &str) -> Result<HashSet<u64>, ConfigError> {
    list.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| {
            id.parse::<u64>()
                .map_err(|_| ConfigError::InvalidAdmin(id.to_string()))
        })
        .collect()
}

fn parse_number(key: &'static str, value: Option<String>, default: u32) -> Result<u32, ConfigError> {
    match value {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { key, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert!(config.admins.is_empty());
        assert_eq!(config.database_path, PathBuf::from("assistbot.sqlite"));
        assert_eq!(config.download_path, PathBuf::from("downloads"));
        assert_eq!(config.timezone, Tz::UTC);
        assert_eq!(config.proxy, None);
        assert_eq!(config.ytdl_bin, "yt-dlp");
        assert_eq!(config.download_retries, 3);
        assert_eq!(config.download_retry_delay, Duration::from_secs(5));
    }

    #[test]
    fn test_custom_values() {
        let config = config_from(&[
            ("ADMINS", "123, 456,"),
            ("TIMEZONE", "Asia/Tehran"),
            ("PROXY", "socks5://127.0.0.1:1080"),
            ("DOWNLOAD_RETRIES", "5"),
            ("DOWNLOAD_RETRY_DELAY", "0"),
            ("DOWNLOAD_PATH", "/data/music"),
        ])
        .unwrap();

        assert!(config.is_admin(123));
        assert!(config.is_admin(456));
        assert!(!config.is_admin(789));
        assert_eq!(config.timezone, chrono_tz::Asia::Tehran);
        assert_eq!(config.proxy.as_deref(), Some("socks5://127.0.0.1:1080"));
        assert_eq!(config.download_retries, 5);
        assert_eq!(config.download_retry_delay, Duration::ZERO);
        assert_eq!(config.download_path, PathBuf::from("/data/music"));
    }

    #[test]
    fn test_empty_values_use_defaults() {
        let config = config_from(&[("PROXY", "  "), ("TIMEZONE", "")]).unwrap();
        assert_eq!(config.proxy, None);
        assert_eq!(config.timezone, Tz::UTC);
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            config_from(&[("ADMINS", "123,abc")]).unwrap_err(),
            ConfigError::InvalidAdmin("abc".into())
        );
        assert_eq!(
            config_from(&[("TIMEZONE", "Mars/Olympus")]).unwrap_err(),
            ConfigError::InvalidTimezone("Mars/Olympus".into())
        );
        assert_eq!(
            config_from(&[("DOWNLOAD_RETRIES", "-1")]).unwrap_err(),
            ConfigError::InvalidNumber {
                key: "DOWNLOAD_RETRIES",
                value: "-1".into()
            }
        );
    }
}
