mod dispatch;
mod engine;
mod event;
mod ledger;
mod lock;
mod poller;
mod session;
mod sink;

pub use dispatch::{dispatch, toast_for, APP_TITLE};
pub use engine::{NotificationEngine, LATE_NUDGE_DELAY_MIN};
pub use event::{BlockRef, NotificationKind, NotificationTarget, Reminder};
pub use ledger::{FiredKey, NotificationLedger};
pub use lock::{LockResolution, LockState};
pub use poller::{polling_period, run_polling, Clock, FixedClock, SystemClock};
pub use session::ReminderSession;
pub use sink::{MemorySink, NotificationSink, Severity, SinkCall, Toast, ToastAction};
