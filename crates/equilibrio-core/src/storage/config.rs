//! TOML-based user settings.
//!
//! Stores user-tunable parameters including:
//! - Reminder lead time, smart nudges and catch-up window
//! - The daily vitamin D reminder
//! - Alarm sound and mute state
//! - Polling cadence and appearance
//!
//! Settings are stored at `<data_dir>/settings.toml`. The reminder engine
//! only ever reads them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::ConfigError;
use crate::routine::ClockTime;

/// Reminder behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderSettings {
    /// Minutes of warning before a block starts. 0 disables pre-notifications.
    #[serde(default = "default_lead_time")]
    pub lead_time_minutes: i64,
    /// Offer to shift the schedule shortly after a block start.
    #[serde(default = "default_true")]
    pub smart_nudges: bool,
    /// How many minutes past its target minute a reminder may still fire.
    #[serde(default)]
    pub catch_up_minutes: i64,
    /// Shift suggested by a late nudge and applied by "running late".
    #[serde(default = "default_nudge_shift")]
    pub nudge_shift_minutes: i64,
}

/// Fixed daily vitamin D reminder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VitaminDSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// `HH:MM`; a malformed value silently disables the reminder.
    #[serde(default = "default_vitamin_d_time")]
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundSettings {
    /// Mutes alarms only; toasts are still shown.
    #[serde(default)]
    pub muted: bool,
    /// Preset alarm name or path to a custom sound file.
    #[serde(default = "default_alarm")]
    pub alarm: String,
    #[serde(default = "default_50")]
    pub volume: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSettings {
    /// Whether system notifications are permitted.
    #[serde(default = "default_true")]
    pub system_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollingSettings {
    /// Seconds between evaluation cycles. Must stay below one minute.
    #[serde(default = "default_interval")]
    pub interval_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiSettings {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_accent_color")]
    pub accent_color: String,
}

/// Application settings.
///
/// Serialized to/from TOML at `<data_dir>/settings.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub reminders: ReminderSettings,
    #[serde(default)]
    pub vitamin_d: VitaminDSettings,
    #[serde(default)]
    pub sound: SoundSettings,
    #[serde(default)]
    pub notifications: NotificationSettings,
    #[serde(default)]
    pub polling: PollingSettings,
    #[serde(default)]
    pub ui: UiSettings,
}

pub const ACCENT_COLORS: [&str; 4] = ["teal", "indigo", "rose", "amber"];
pub const THEMES: [&str; 2] = ["light", "dark"];

// Default functions
fn default_true() -> bool {
    true
}
fn default_lead_time() -> i64 {
    5
}
fn default_nudge_shift() -> i64 {
    15
}
fn default_vitamin_d_time() -> String {
    "10:00".into()
}
fn default_alarm() -> String {
    "classic".into()
}
fn default_50() -> u32 {
    50
}
fn default_interval() -> u64 {
    10
}
fn default_theme() -> String {
    "dark".into()
}
fn default_accent_color() -> String {
    "teal".into()
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            lead_time_minutes: default_lead_time(),
            smart_nudges: true,
            catch_up_minutes: 0,
            nudge_shift_minutes: default_nudge_shift(),
        }
    }
}

impl Default for VitaminDSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            time: default_vitamin_d_time(),
        }
    }
}

impl Default for SoundSettings {
    fn default() -> Self {
        Self {
            muted: false,
            alarm: default_alarm(),
            volume: 50,
        }
    }
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            system_enabled: true,
        }
    }
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            interval_secs: default_interval(),
        }
    }
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            accent_color: default_accent_color(),
        }
    }
}

impl Settings {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value
                            .parse::<i64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as integer")))?;
                        serde_json::Value::Number(n.into())
                    }
                    serde_json::Value::Object(_) => return Err(unknown()),
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("settings.toml"),
            message: e.to_string(),
        })?;
        Ok(dir.join("settings.toml"))
    }

    /// Load from the data directory, writing defaults if no file exists.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed, or if the
    /// default settings cannot be written.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let settings = Self::default();
                settings.save_to(path)?;
                Ok(settings)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Load from disk, returning defaults on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default settings");
            Self::default()
        })
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key, then validate the result.
    ///
    /// On error the settings are left unchanged. Does not persist.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Settings =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, message: &str| -> Result<(), ConfigError> {
            Err(ConfigError::InvalidValue {
                key: key.to_string(),
                message: message.to_string(),
            })
        };

        if self.reminders.lead_time_minutes < 0 {
            return invalid("reminders.lead_time_minutes", "must not be negative");
        }
        if self.reminders.catch_up_minutes < 0 {
            return invalid("reminders.catch_up_minutes", "must not be negative");
        }
        if self.vitamin_d.time.parse::<ClockTime>().is_err() {
            return invalid("vitamin_d.time", "expected HH:MM");
        }
        if self.sound.volume > 100 {
            return invalid("sound.volume", "must be between 0 and 100");
        }
        if !(1..60).contains(&self.polling.interval_secs) {
            return invalid("polling.interval_secs", "must be between 1 and 59 seconds");
        }
        if !THEMES.contains(&self.ui.theme.as_str()) {
            return invalid("ui.theme", "expected light or dark");
        }
        if !ACCENT_COLORS.contains(&self.ui.accent_color.as_str()) {
            return invalid("ui.accent_color", "expected teal, indigo, rose or amber");
        }
        Ok(())
    }
}
