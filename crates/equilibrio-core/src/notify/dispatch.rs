//! Turns engine decisions into sink calls.
//!
//! Failures of audio or system notifications are logged and swallowed so a
//! refused side effect never stops the remaining reminders.

use super::event::Reminder;
use super::lock::LockState;
use super::sink::{NotificationSink, Severity, Toast, ToastAction};
use crate::storage::Settings;

/// Title used for system notifications.
pub const APP_TITLE: &str = "Equilibrio";

pub const VITAMIN_D_MESSAGE: &str = "Time for your vitamin D! Keep your health in balance.";

/// Text and follow-up shown for a reminder.
pub fn toast_for(reminder: &Reminder) -> Toast {
    match reminder {
        Reminder::VitaminD { .. } => Toast::new(VITAMIN_D_MESSAGE, Severity::Info),
        Reminder::PreNotify {
            block,
            lead_minutes,
            ..
        } => Toast::new(
            format!("Get ready: \"{}\" starts in {lead_minutes} min.", block.activity),
            Severity::Info,
        ),
        Reminder::BlockStart { block, .. } => Toast::new(
            format!("It's time! Starting: {}", block.activity),
            Severity::Success,
        ),
        Reminder::LateNudge {
            block,
            suggested_shift_minutes,
            ..
        } => Toast::new(
            format!("Running late for \"{}\"?", block.activity),
            Severity::Warning,
        )
        .with_action(ToastAction::ShiftSchedule {
            minutes: *suggested_shift_minutes,
        }),
    }
}

fn play_alarm<K: NotificationSink + ?Sized>(sink: &mut K, settings: &Settings) {
    if let Err(e) = sink.play_alarm(&settings.sound.alarm, settings.sound.volume) {
        tracing::warn!(error = %e, "alarm playback failed");
    }
}

fn notify_system<K: NotificationSink + ?Sized>(sink: &mut K, settings: &Settings, body: &str) {
    if !settings.notifications.system_enabled {
        return;
    }
    if let Err(e) = sink.system_notification(APP_TITLE, body) {
        tracing::warn!(error = %e, "system notification not delivered");
    }
}

/// Present each reminder in order, updating `lock` for lock-enforced starts.
pub fn dispatch<K: NotificationSink + ?Sized>(
    reminders: &[Reminder],
    settings: &Settings,
    lock: &mut LockState,
    sink: &mut K,
) {
    for reminder in reminders {
        let toast = toast_for(reminder);
        match reminder {
            Reminder::VitaminD { play_alarm: alarm, .. } => {
                notify_system(sink, settings, &toast.message);
                if *alarm {
                    play_alarm(sink, settings);
                }
            }
            Reminder::PreNotify { .. } => {
                notify_system(sink, settings, &toast.message);
            }
            Reminder::BlockStart {
                block,
                play_alarm: alarm,
                enter_lock,
                ..
            } => {
                if *enter_lock {
                    lock.enter(&block.activity);
                    sink.enter_lock(&block.activity);
                }
                if *alarm {
                    play_alarm(sink, settings);
                }
            }
            Reminder::LateNudge { .. } => {}
        }
        sink.show_toast(toast);
    }
}
