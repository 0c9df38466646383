mod config;
pub mod database;
pub mod store;

pub use config::{CalendarConfig, Config, ProgressConfig, StorageConfig, StreakConfig};
pub use database::Database;
pub use store::{Store, TaskStore};

use std::path::PathBuf;

use crate::error::ConfigError;

/// String-keyed blob storage, the persistence seam for [`TaskStore`].
pub trait KeyValueStore {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, crate::CoreError>;

    /// Replace the value stored under `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<(), crate::CoreError>;
}

/// Returns `~/.config/gardentodo[-dev]/` based on GARDENTODO_ENV.
///
/// Set GARDENTODO_ENV=dev to use development data directory, or
/// GARDENTODO_DATA_DIR to use an explicit directory.
///
/// # Errors
/// Returns an error if creating the data directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("GARDENTODO_DATA_DIR") {
        Some(explicit) if !explicit.is_empty() => PathBuf::from(explicit),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("GARDENTODO_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("gardentodo-dev")
            } else {
                base_dir.join("gardentodo")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
