mod config;
pub mod database;

pub use config::{
    Settings, NotificationSettings, PollingSettings, ReminderSettings, SoundSettings, UiSettings,
    VitaminDSettings,
};
pub use database::{Database, DEFAULT_QUOTA_BYTES};

use std::path::PathBuf;

use crate::error::StorageError;

/// Returns the data directory, creating it if needed.
///
/// `$EQUILIBRIO_HOME` wins when set. Otherwise `~/.config/equilibrio[-dev]/`
/// based on `EQUILIBRIO_ENV` (set it to `dev` for a development directory).
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("EQUILIBRIO_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("EQUILIBRIO_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("equilibrio-dev")
            } else {
                base_dir.join("equilibrio")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|source| StorageError::DataDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}
