//! At-most-once delivery bookkeeping.
//!
//! A reminder is identified by `(day, target, kind)`. The ledger groups keys
//! by calendar day so a new day starts with nothing fired and old days can
//! be dropped wholesale.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::event::{NotificationKind, NotificationTarget};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FiredKey {
    pub target: NotificationTarget,
    pub kind: NotificationKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationLedger {
    days: BTreeMap<NaiveDate, BTreeSet<FiredKey>>,
}

impl NotificationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark as delivered. Returns `false` if it already was.
    pub fn record(&mut self, day: NaiveDate, target: NotificationTarget, kind: NotificationKind) -> bool {
        self.days
            .entry(day)
            .or_default()
            .insert(FiredKey { target, kind })
    }

    /// Drop every day before `day`. Returns the number of keys removed.
    pub fn prune_before(&mut self, day: NaiveDate) -> usize {
        let kept = self.days.split_off(&day);
        let removed = self.days.values().map(BTreeSet::len).sum();
        self.days = kept;
        removed
    }

    pub fn fired_on(&self, day: NaiveDate) -> impl Iterator<Item = &FiredKey> {
        self.days.get(&day).into_iter().flatten()
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.days.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.days.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    #[test]
    fn record_is_idempotent_per_day() {
        let mut ledger = NotificationLedger::new();
        let target = NotificationTarget::Block("b1".into());
        assert!(ledger.record(day(1), target.clone(), NotificationKind::BlockStart));
        assert!(!ledger.record(day(1), target.clone(), NotificationKind::BlockStart));
        assert!(ledger.record(day(1), target.clone(), NotificationKind::PreNotify));
        assert!(ledger.record(day(2), target.clone(), NotificationKind::BlockStart));
        assert!(ledger
            .fired_on(day(1))
            .any(|key| key.target == target && key.kind == NotificationKind::BlockStart));
        assert_eq!(ledger.fired_on(day(3)).count(), 0);
        assert_eq!(ledger.len(), 3);
    }

    #[test]
    fn prune_drops_only_older_days() {
        let mut ledger = NotificationLedger::new();
        ledger.record(day(1), NotificationTarget::VitaminD, NotificationKind::VitaminD);
        ledger.record(day(2), NotificationTarget::VitaminD, NotificationKind::VitaminD);
        ledger.record(day(3), NotificationTarget::VitaminD, NotificationKind::VitaminD);
        assert_eq!(ledger.prune_before(day(3)), 2);
        assert_eq!(ledger.days().collect::<Vec<_>>(), vec![day(3)]);
        assert_eq!(ledger.fired_on(day(3)).count(), 1);
    }

    #[test]
    fn survives_json_round_trip() {
        let mut ledger = NotificationLedger::new();
        ledger.record(day(5), NotificationTarget::Block("x".into()), NotificationKind::LateNudge);
        ledger.record(day(5), NotificationTarget::VitaminD, NotificationKind::VitaminD);
        let json = serde_json::to_string(&ledger).unwrap();
        let back: NotificationLedger = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ledger);
    }
}
