//! Reminder decision engine.
//!
//! Each cycle compares the current wall-clock minute with the vitamin D time
//! and with every block of the current routine, and returns the reminders
//! that are due and not yet delivered today. The engine has no state of its
//! own; everything that must survive between cycles lives in the
//! [`NotificationLedger`] the caller passes in.
//!
//! ## Conditions
//!
//! ```text
//! VitaminD    now == vitamin_d.time
//! PreNotify   start - now == lead_time  (lead_time > 0, block not started)
//! BlockStart  now == start
//! LateNudge   now == start + 2          (smart nudges on)
//! ```
//!
//! With a catch-up window of `n` minutes, `==` becomes "at or up to `n`
//! minutes after". Block-relative minutes do not wrap past midnight.

use chrono::NaiveDateTime;

use super::event::{BlockRef, NotificationKind, NotificationTarget, Reminder};
use super::ledger::NotificationLedger;
use crate::routine::{ClockTime, Routine};
use crate::storage::Settings;

/// Minutes after a block's start at which the late nudge is offered.
pub const LATE_NUDGE_DELAY_MIN: i64 = 2;

#[derive(Debug, Clone, Copy, Default)]
pub struct NotificationEngine;

/// `now` is at `target` or within `catch_up` minutes after it.
fn due(now_min: i64, target_min: i64, catch_up: i64) -> bool {
    now_min >= target_min && now_min - target_min <= catch_up.max(0)
}

impl NotificationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Run one evaluation cycle.
    ///
    /// Reminders come out in a fixed order: vitamin D first, then per block
    /// in routine order (pre-notify, start, late nudge). Every returned
    /// reminder has been recorded in `ledger`. Days before `now` are pruned.
    pub fn evaluate(
        &self,
        now: NaiveDateTime,
        routine: Option<&Routine>,
        settings: &Settings,
        ledger: &mut NotificationLedger,
    ) -> Vec<Reminder> {
        let day = now.date();
        let now_min = ClockTime::of(now).minutes_since_midnight();
        let catch_up = settings.reminders.catch_up_minutes;
        ledger.prune_before(day);

        let mut due_now = Vec::new();

        if settings.vitamin_d.enabled {
            match settings.vitamin_d.time.parse::<ClockTime>() {
                Ok(time) if due(now_min, time.minutes_since_midnight(), catch_up) => {
                    due_now.push(Reminder::VitaminD {
                        play_alarm: !settings.sound.muted,
                        at: now,
                    });
                }
                Ok(_) => {}
                Err(e) => tracing::debug!(error = %e, "skipping vitamin D check"),
            }
        }

        let Some(routine) = routine else {
            tracing::debug!("no current routine, skipping block checks");
            return self.commit(day, due_now, ledger);
        };

        let lead = settings.reminders.lead_time_minutes;
        for block in &routine.blocks {
            let Some(time) = block.start() else {
                tracing::debug!(block = %block.id, time = %block.time, "skipping block with malformed time");
                continue;
            };
            let start = time.minutes_since_midnight();

            if lead > 0 && start - now_min > 0 && due(now_min, start - lead, catch_up) {
                due_now.push(Reminder::PreNotify {
                    block: BlockRef::new(block, time),
                    lead_minutes: lead,
                    at: now,
                });
            }

            if due(now_min, start, catch_up) {
                due_now.push(Reminder::BlockStart {
                    block: BlockRef::new(block, time),
                    play_alarm: block.alarm_enabled && !settings.sound.muted,
                    enter_lock: block.locks_on_start(),
                    at: now,
                });
            }

            if settings.reminders.smart_nudges
                && due(now_min, start + LATE_NUDGE_DELAY_MIN, catch_up)
            {
                due_now.push(Reminder::LateNudge {
                    block: BlockRef::new(block, time),
                    suggested_shift_minutes: settings.reminders.nudge_shift_minutes,
                    at: now,
                });
            }
        }

        self.commit(day, due_now, ledger)
    }

    /// Keep only reminders not yet delivered today, recording them.
    fn commit(
        &self,
        day: chrono::NaiveDate,
        candidates: Vec<Reminder>,
        ledger: &mut NotificationLedger,
    ) -> Vec<Reminder> {
        candidates
            .into_iter()
            .filter(|reminder| {
                let kind: NotificationKind = reminder.kind();
                let target: NotificationTarget = reminder.target();
                let fresh = ledger.record(day, target, kind);
                if fresh {
                    tracing::info!(?kind, block = ?reminder.block().map(|b| &b.id), "reminder due");
                }
                fresh
            })
            .collect()
    }
}
