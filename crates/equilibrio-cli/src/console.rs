//! Terminal presentation of reminders.
//!
//! Everything goes to stderr so command output on stdout stays parseable.

use std::io::Write;
use std::path::Path;

use equilibrio_core::{NotificationSink, Severity, SinkError, Toast, ToastAction};

/// Alarm names that map to the terminal bell.
pub const PRESET_ALARMS: [&str; 4] = ["classic", "digital", "chime", "birds"];

#[derive(Debug, Default)]
pub struct ConsoleSink;

impl NotificationSink for ConsoleSink {
    fn show_toast(&mut self, toast: Toast) {
        let tag = match toast.severity {
            Severity::Info => "info",
            Severity::Success => "ok",
            Severity::Warning => "warn",
        };
        eprintln!("[{tag}] {}", toast.message);
        if let Some(action) = toast.action {
            let ToastAction::ShiftSchedule { minutes } = action;
            eprintln!("       {} -> equilibrio routine shift {minutes}", action.label());
        }
    }

    fn play_alarm(&mut self, sound: &str, volume: u32) -> Result<(), SinkError> {
        if volume == 0 {
            return Ok(());
        }
        if !PRESET_ALARMS.contains(&sound) && !Path::new(sound).is_file() {
            return Err(SinkError::AudioRejected(format!("no such sound: {sound}")));
        }
        let mut err = std::io::stderr();
        err.write_all(b"\x07")
            .and_then(|_| err.flush())
            .map_err(|e| SinkError::AudioRejected(e.to_string()))
    }

    fn system_notification(&mut self, title: &str, body: &str) -> Result<(), SinkError> {
        eprintln!("[{title}] {body}");
        Ok(())
    }

    fn enter_lock(&mut self, activity: &str) {
        eprintln!();
        eprintln!("==== SACRED BLOCK: {activity} ====");
        eprintln!("     running late: equilibrio lock late");
        eprintln!("     skip block:   equilibrio lock skip");
        eprintln!();
    }

    fn exit_lock(&mut self) {
        eprintln!("lock released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_sound_is_rejected() {
        let mut sink = ConsoleSink;
        assert!(matches!(
            sink.play_alarm("/definitely/not/here.mp3", 50),
            Err(SinkError::AudioRejected(_))
        ));
        assert!(sink.play_alarm("classic", 0).is_ok());
    }
}
