use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::routine::{ClockTime, TimeBlock};

/// What a reminder is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    VitaminD,
    PreNotify,
    BlockStart,
    LateNudge,
}

/// The subject a reminder is keyed on: a block, or the vitamin D sentinel.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "target", content = "id", rename_all = "snake_case")]
pub enum NotificationTarget {
    VitaminD,
    Block(String),
}

/// The parts of a block a reminder needs to describe it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRef {
    pub id: String,
    pub activity: String,
    pub time: ClockTime,
}

impl BlockRef {
    pub fn new(block: &TimeBlock, time: ClockTime) -> Self {
        Self {
            id: block.id.clone(),
            activity: block.activity.clone(),
            time,
        }
    }
}

/// A decision of the reminder engine for one cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Reminder {
    /// Fixed daily reminder, independent of any routine.
    VitaminD { play_alarm: bool, at: NaiveDateTime },
    /// A block starts in `lead_minutes`.
    PreNotify {
        block: BlockRef,
        lead_minutes: i64,
        at: NaiveDateTime,
    },
    /// A block starts now.
    BlockStart {
        block: BlockRef,
        play_alarm: bool,
        enter_lock: bool,
        at: NaiveDateTime,
    },
    /// A block started a little while ago; offer to shift the schedule.
    LateNudge {
        block: BlockRef,
        suggested_shift_minutes: i64,
        at: NaiveDateTime,
    },
}

impl Reminder {
    pub fn kind(&self) -> NotificationKind {
        match self {
            Reminder::VitaminD { .. } => NotificationKind::VitaminD,
            Reminder::PreNotify { .. } => NotificationKind::PreNotify,
            Reminder::BlockStart { .. } => NotificationKind::BlockStart,
            Reminder::LateNudge { .. } => NotificationKind::LateNudge,
        }
    }

    pub fn target(&self) -> NotificationTarget {
        match self.block() {
            Some(block) => NotificationTarget::Block(block.id.clone()),
            None => NotificationTarget::VitaminD,
        }
    }

    pub fn block(&self) -> Option<&BlockRef> {
        match self {
            Reminder::VitaminD { .. } => None,
            Reminder::PreNotify { block, .. }
            | Reminder::BlockStart { block, .. }
            | Reminder::LateNudge { block, .. } => Some(block),
        }
    }
}
