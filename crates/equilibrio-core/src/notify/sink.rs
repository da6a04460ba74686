//! Presentation side of reminders.
//!
//! A sink shows toasts, plays the alarm, raises system notifications and
//! toggles the lock screen. It holds no reminder logic.

use serde::{Deserialize, Serialize};

use crate::error::SinkError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
}

/// Follow-up the user can pick from a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ToastAction {
    ShiftSchedule { minutes: i64 },
}

impl ToastAction {
    pub fn label(&self) -> String {
        match self {
            ToastAction::ShiftSchedule { minutes } => format!("Delay {minutes}m"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub message: String,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<ToastAction>,
}

impl Toast {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
            action: None,
        }
    }

    pub fn with_action(mut self, action: ToastAction) -> Self {
        self.action = Some(action);
        self
    }
}

pub trait NotificationSink {
    fn show_toast(&mut self, toast: Toast);

    /// Play the configured alarm. `sound` is a preset name or file path.
    fn play_alarm(&mut self, sound: &str, volume: u32) -> Result<(), SinkError>;

    /// Best-effort OS notification; may be refused.
    fn system_notification(&mut self, title: &str, body: &str) -> Result<(), SinkError>;

    fn enter_lock(&mut self, activity: &str);

    fn exit_lock(&mut self);
}

/// One recorded sink call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkCall {
    Toast(Toast),
    Alarm { sound: String, volume: u32 },
    SystemNotification { title: String, body: String },
    EnterLock(String),
    ExitLock,
}

/// A sink that records every call instead of presenting it.
///
/// Failures can be injected to exercise error paths.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub calls: Vec<SinkCall>,
    pub fail_alarm: Option<SinkError>,
    pub fail_system: Option<SinkError>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toasts(&self) -> impl Iterator<Item = &Toast> {
        self.calls.iter().filter_map(|c| match c {
            SinkCall::Toast(t) => Some(t),
            _ => None,
        })
    }

    pub fn alarm_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, SinkCall::Alarm { .. }))
            .count()
    }
}

impl NotificationSink for MemorySink {
    fn show_toast(&mut self, toast: Toast) {
        self.calls.push(SinkCall::Toast(toast));
    }

    fn play_alarm(&mut self, sound: &str, volume: u32) -> Result<(), SinkError> {
        if let Some(err) = self.fail_alarm.clone() {
            return Err(err);
        }
        self.calls.push(SinkCall::Alarm {
            sound: sound.to_string(),
            volume,
        });
        Ok(())
    }

    fn system_notification(&mut self, title: &str, body: &str) -> Result<(), SinkError> {
        if let Some(err) = self.fail_system.clone() {
            return Err(err);
        }
        self.calls.push(SinkCall::SystemNotification {
            title: title.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }

    fn enter_lock(&mut self, activity: &str) {
        self.calls.push(SinkCall::EnterLock(activity.to_string()));
    }

    fn exit_lock(&mut self) {
        self.calls.push(SinkCall::ExitLock);
    }
}
