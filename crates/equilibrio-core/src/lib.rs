//! # Equilibrio Core Library
//!
//! Business logic for the Equilibrio routine tracker. The CLI is a thin
//! presentation layer over this crate.
//!
//! ## Architecture
//!
//! - **Routines**: named, ordered day plans of time blocks, with schedule
//!   shifting and duration/progress accounting
//! - **Reminder engine**: a pure per-cycle decision over `(now, routine,
//!   settings, ledger)` that yields pre-notifications, block starts (with
//!   optional lock), late nudges and the daily vitamin D reminder, each at
//!   most once per day
//! - **Session**: wires the engine to a [`NotificationSink`], the routine
//!   store and persistence, and is driven by a polling loop
//! - **Storage**: TOML settings and a quota-bounded SQLite key-value store
//!
//! ## Key Components
//!
//! - [`NotificationEngine`]: reminder decisions
//! - [`ReminderSession`]: stateful driver around the engine
//! - [`RoutineStore`]: routine ownership and time shifts
//! - [`Settings`]: user configuration

pub mod error;
pub mod notify;
pub mod routine;
pub mod storage;

pub use error::{ConfigError, CoreError, SinkError, StorageError, ValidationError};
pub use notify::{
    LockResolution, LockState, NotificationEngine, NotificationKind, NotificationLedger,
    NotificationSink, Reminder, ReminderSession, Severity, Toast, ToastAction,
};
pub use routine::{BlockKind, ClockTime, Routine, RoutineStore, TimeBlock};
pub use storage::{Database, Settings};
