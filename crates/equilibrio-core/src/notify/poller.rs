//! Time source and polling loop.
//!
//! The loop only produces timestamps and hands them to the session; all
//! decisions stay in the engine. Cycles run one at a time on the calling
//! task, so no state is shared across threads.

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use tokio::time::MissedTickBehavior;

use super::session::ReminderSession;
use super::sink::NotificationSink;
use crate::error::ValidationError;
use crate::storage::Settings;

/// Source of local wall-clock time.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<NaiveDateTime>,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: NaiveDateTime) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = now;
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Poll period from settings.
///
/// Minute-exact matching needs at least one cycle inside every minute, so
/// the period must be shorter than 60 seconds.
pub fn polling_period(settings: &Settings) -> Result<Duration, ValidationError> {
    match settings.polling.interval_secs {
        secs @ 1..=59 => Ok(Duration::from_secs(secs)),
        other => Err(ValidationError::InvalidValue {
            field: "polling.interval_secs".into(),
            message: format!("{other} is not between 1 and 59"),
        }),
    }
}

/// Tick `session` every `period` until `shutdown` resolves.
///
/// The first cycle runs immediately. Returns the number of cycles run.
pub async fn run_polling<K, C, F>(
    session: &mut ReminderSession<K>,
    clock: &C,
    period: Duration,
    shutdown: F,
) -> u64
where
    K: NotificationSink,
    C: Clock + ?Sized,
    F: Future<Output = ()>,
{
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    let mut cycles = 0;
    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => break,
            _ = interval.tick() => {
                session.tick(clock.now());
                cycles += 1;
            }
        }
    }
    tracing::debug!(cycles, "polling stopped");
    cycles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::sink::MemorySink;
    use crate::storage::Database;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 18)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn period_must_be_under_a_minute() {
        let mut settings = Settings::default();
        assert_eq!(polling_period(&settings).unwrap(), Duration::from_secs(10));
        settings.polling.interval_secs = 60;
        assert!(polling_period(&settings).is_err());
        settings.polling.interval_secs = 0;
        assert!(polling_period(&settings).is_err());
    }

    #[test]
    fn fixed_clock_advances() {
        let clock = FixedClock::new(at(23, 59));
        clock.advance(chrono::Duration::minutes(2));
        assert_eq!(clock.now(), NaiveDate::from_ymd_opt(2026, 10, 19).unwrap().and_hms_opt(0, 1, 0).unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn polls_until_shutdown_without_duplicates() {
        let mut settings = Settings::default();
        settings.vitamin_d.enabled = false;
        let mut session =
            ReminderSession::new(Database::open_in_memory().unwrap(), settings, MemorySink::new());
        let clock = FixedClock::new(at(8, 0));

        let cycles = run_polling(
            &mut session,
            &clock,
            Duration::from_secs(10),
            tokio::time::sleep(Duration::from_secs(35)),
        )
        .await;

        assert_eq!(cycles, 4);
        assert_eq!(session.sink().toasts().count(), 1);
    }
}
