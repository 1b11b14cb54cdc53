//! Runtime configuration resolved from the environment.
//!
//! # Invariants
//! - Blank variables behave exactly like unset ones.
//! - Resolution never fails; invalid log settings surface later from
//!   `init_logging`.

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "KANBAN_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "KANBAN_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "KANBAN_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "kanban_board.sqlite3";

/// Settings for one board process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// SQLite file holding the column documents.
    pub db_path: PathBuf,
    pub log_level: String,
    /// File logging is skipped when `None`.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Reads `KANBAN_DB_PATH`, `KANBAN_LOG_LEVEL` and `KANBAN_LOG_DIR`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves settings through `lookup`, falling back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let defaults = Self::default();
        Self {
            db_path: non_blank(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            log_level: non_blank(LOG_LEVEL_ENV).unwrap_or(defaults.log_level),
            log_dir: non_blank(LOG_DIR_ENV).map(PathBuf::from),
        }
    }
}
