//! Runtime configuration from environment variables.
//!
//! # Responsibility
//! - Resolve database path, log level and optional log directory.
//! - Load a local `.env` file before reading the process environment.
//!
//! # Invariants
//! - Unset variables fall back to documented defaults.
//! - Set-but-invalid values are rejected, never silently replaced.

use crate::logging::{default_log_level, normalize_level};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DATABASE_PATH_VAR: &str = "BLOG_DATABASE_PATH";
pub const LOG_LEVEL_VAR: &str = "BLOG_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "BLOG_LOG_DIR";
pub const DEFAULT_DATABASE_PATH: &str = "blog.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue { var: &'static str, message: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { var, message } => write!(f, "invalid {var}: {message}"),
        }
    }
}

impl Error for ConfigError {}

/// Resolved application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogConfig {
    pub database_path: PathBuf,
    pub log_level: &'static str,
    /// File logging is disabled when `None`.
    pub log_dir: Option<PathBuf>,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl BlogConfig {
    /// Reads configuration from `.env` (when present) and the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenv::dotenv();
        Self::from_vars(std::env::vars())
    }

    /// Builds configuration from explicit key/value pairs.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        let mut config = Self::default();

        if let Some(path) = non_empty(&vars, DATABASE_PATH_VAR) {
            config.database_path = PathBuf::from(path);
        }

        if let Some(level) = non_empty(&vars, LOG_LEVEL_VAR) {
            config.log_level =
                normalize_level(level).map_err(|err| ConfigError::InvalidValue {
                    var: LOG_LEVEL_VAR,
                    message: err.to_string(),
                })?;
        }

        if let Some(dir) = non_empty(&vars, LOG_DIR_VAR) {
            let dir = PathBuf::from(dir);
            if !dir.is_absolute() {
                return Err(ConfigError::InvalidValue {
                    var: LOG_DIR_VAR,
                    message: format!("must be an absolute path, got `{}`", dir.display()),
                });
            }
            config.log_dir = Some(dir);
        }

        Ok(config)
    }
}

fn non_empty<'a>(vars: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    vars.get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{BlogConfig, ConfigError, DEFAULT_DATABASE_PATH, LOG_DIR_VAR, LOG_LEVEL_VAR};
    use std::path::PathBuf;

    #[test]
    fn empty_environment_uses_defaults() {
        let config = BlogConfig::from_vars(Vec::<(String, String)>::new()).unwrap();
        assert_eq!(config.database_path, PathBuf::from(DEFAULT_DATABASE_PATH));
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn reads_all_variables() {
        let log_dir = std::env::temp_dir().join("blog-logs");
        let config = BlogConfig::from_vars([
            ("BLOG_DATABASE_PATH", "/tmp/blog-test.sqlite3".to_string()),
            ("BLOG_LOG_LEVEL", " Warning ".to_string()),
            ("BLOG_LOG_DIR", log_dir.display().to_string()),
        ])
        .unwrap();

        assert_eq!(
            config.database_path,
            PathBuf::from("/tmp/blog-test.sqlite3")
        );
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(log_dir));
    }

    #[test]
    fn rejects_invalid_values() {
        let err = BlogConfig::from_vars([(LOG_LEVEL_VAR, "loud")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var, .. } if var == LOG_LEVEL_VAR));

        let err = BlogConfig::from_vars([(LOG_DIR_VAR, "relative/logs")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var, .. } if var == LOG_DIR_VAR));
    }
}
