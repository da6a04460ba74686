//! A running reminder session: the engine plus everything it reads, the
//! state it keeps between cycles, and the sink it reports to.
//!
//! Other processes may change the same database and settings file while a
//! session runs (`equilibrio lock late` next to `equilibrio watch`), so every
//! tick starts by reloading routines, lock, ledger and settings.
//!
//! Persistence failures are reported as warning toasts. In-memory state is
//! kept as it was updated, and is not reloaded over until the next
//! successful write catches up.

use std::path::PathBuf;

use chrono::NaiveDateTime;

use super::dispatch::dispatch;
use super::engine::NotificationEngine;
use super::event::Reminder;
use super::ledger::NotificationLedger;
use super::lock::{LockResolution, LockState};
use super::sink::{NotificationSink, Severity, Toast, ToastAction};
use crate::error::CoreError;
use crate::routine::RoutineStore;
use crate::storage::database::{Database, KEY_LEDGER, KEY_LOCK};
use crate::storage::Settings;

/// Which pieces of state hold changes the database does not have yet.
#[derive(Debug, Default)]
struct Unsaved {
    store: bool,
    ledger: bool,
    lock: bool,
}

pub struct ReminderSession<K: NotificationSink> {
    engine: NotificationEngine,
    store: RoutineStore,
    settings: Settings,
    settings_path: Option<PathBuf>,
    ledger: NotificationLedger,
    lock: LockState,
    unsaved: Unsaved,
    db: Database,
    sink: K,
}

/// Stored value under `key`, default when absent, `None` when unreadable.
fn reload<T: serde::de::DeserializeOwned + Default>(db: &Database, key: &str) -> Option<T> {
    match db.load_json::<T>(key) {
        Ok(value) => Some(value.unwrap_or_default()),
        Err(e) => {
            tracing::warn!(key, error = %e, "cannot reload state");
            None
        }
    }
}

impl<K: NotificationSink> ReminderSession<K> {
    /// Restore routines, ledger and lock state from `db`.
    pub fn new(db: Database, settings: Settings, sink: K) -> Self {
        let store = RoutineStore::load(&db);
        let ledger = reload(&db, KEY_LEDGER).unwrap_or_default();
        let lock = reload(&db, KEY_LOCK).unwrap_or_default();
        Self {
            engine: NotificationEngine::new(),
            store,
            settings,
            settings_path: None,
            ledger,
            lock,
            unsaved: Unsaved::default(),
            db,
            sink,
        }
    }

    /// Re-read settings from `path` on every tick.
    pub fn with_settings_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings_path = Some(path.into());
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &RoutineStore {
        &self.store
    }

    pub fn ledger(&self) -> &NotificationLedger {
        &self.ledger
    }

    pub fn lock(&self) -> &LockState {
        &self.lock
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut K {
        &mut self.sink
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Swap in a new settings snapshot.
    ///
    /// With a settings file attached, the next tick reloads over it.
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    /// Pick up changes other processes made to the shared state.
    ///
    /// Anything holding an unsaved change keeps its in-memory value. A lock
    /// released elsewhere is released on the sink too.
    pub fn refresh(&mut self) {
        if !self.unsaved.store {
            self.store = RoutineStore::load(&self.db);
        }
        if !self.unsaved.ledger {
            if let Some(ledger) = reload(&self.db, KEY_LEDGER) {
                self.ledger = ledger;
            }
        }
        if !self.unsaved.lock {
            if let Some(lock) = reload::<LockState>(&self.db, KEY_LOCK) {
                if self.lock.is_active() && !lock.is_active() {
                    tracing::info!(activity = %self.lock.activity, "lock released elsewhere");
                    self.sink.exit_lock();
                }
                self.lock = lock;
            }
        }
        if let Some(path) = &self.settings_path {
            match Settings::load_from(path).and_then(|s| s.validate().map(|()| s)) {
                Ok(settings) => self.settings = settings,
                Err(e) => tracing::warn!(error = %e, "keeping previous settings"),
            }
        }
    }

    /// One evaluation cycle at `now`, after a [`refresh`](Self::refresh).
    pub fn tick(&mut self, now: NaiveDateTime) -> Vec<Reminder> {
        self.refresh();
        let reminders = self.engine.evaluate(
            now,
            self.store.current(),
            &self.settings,
            &mut self.ledger,
        );
        if reminders.is_empty() {
            return reminders;
        }

        dispatch(&reminders, &self.settings, &mut self.lock, &mut self.sink);
        let saved = self.db.save_json(KEY_LEDGER, &self.ledger);
        self.unsaved.ledger = !self.report("reminder history", saved);
        if reminders.iter().any(|r| matches!(r, Reminder::BlockStart { enter_lock: true, .. })) {
            let saved = self.db.save_json(KEY_LOCK, &self.lock);
            self.unsaved.lock = !self.report("lock state", saved);
        }
        reminders
    }

    /// Move every block of the current routine by `minutes`.
    ///
    /// Returns `false` when there is no current routine.
    pub fn shift_schedule(&mut self, minutes: i64) -> bool {
        let id = self.store.current_id().to_string();
        if self.store.apply_time_shift(&id, minutes).is_err() {
            tracing::debug!(routine = %id, "no current routine to shift");
            return false;
        }
        let saved = self.store.save(&self.db);
        self.unsaved.store = !self.report("routine", saved);
        if !self.unsaved.store {
            self.sink.show_toast(Toast::new(
                format!("Schedule shifted {minutes:+} min."),
                Severity::Success,
            ));
        }
        true
    }

    /// Carry out the follow-up the user picked on a toast.
    ///
    /// Does not leave the lock screen.
    pub fn accept(&mut self, action: ToastAction) {
        match action {
            ToastAction::ShiftSchedule { minutes } => {
                self.shift_schedule(minutes);
            }
        }
    }

    /// Leave the lock screen. No-op when not locked.
    pub fn resolve_lock(&mut self, resolution: LockResolution) {
        if !self.lock.is_active() {
            return;
        }
        if resolution == LockResolution::RunningLate {
            self.shift_schedule(self.settings.reminders.nudge_shift_minutes);
        }
        self.lock.exit();
        self.sink.exit_lock();
        let saved = self.db.save_json(KEY_LOCK, &self.lock);
        self.unsaved.lock = !self.report("lock state", saved);
    }

    /// Forget every delivered reminder.
    pub fn clear_ledger(&mut self) -> Result<(), CoreError> {
        self.ledger.clear();
        self.db.save_json(KEY_LEDGER, &self.ledger)?;
        self.unsaved.ledger = false;
        Ok(())
    }

    /// Turn a persistence failure into a warning toast. Returns success.
    fn report(&mut self, what: &str, result: Result<(), CoreError>) -> bool {
        match result {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, what, "failed to persist");
                let message = if e.is_quota_exceeded() {
                    format!("Could not save {what}: local storage is full.")
                } else {
                    format!("Could not save {what}: {e}")
                };
                self.sink.show_toast(Toast::new(message, Severity::Warning));
                false
            }
        }
    }
}
