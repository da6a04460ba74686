//! Built-in routines available before the user saves any of their own.

use super::block::{BlockKind, TimeBlock};
use super::clock::ClockTime;
use super::model::Routine;

pub const MORNING_PRODUCTIVE: &str = "morning-productive";
pub const AFTERNOON_FOCUS: &str = "afternoon-focus";
pub const SPLIT_SHIFT: &str = "split-shift";
pub const WEEKEND_RECHARGE: &str = "weekend-recharge";

/// Routine selected when nothing else has been chosen.
pub const DEFAULT_ROUTINE: &str = MORNING_PRODUCTIVE;

fn block(id: &str, time: (u8, u8), activity: &str, kind: BlockKind) -> TimeBlock {
    let at = ClockTime::new(time.0, time.1).unwrap_or_else(|_| ClockTime::from_minutes(0));
    TimeBlock::new(at, activity, kind).with_id(id)
}

pub fn presets() -> Vec<Routine> {
    vec![
        Routine {
            id: MORNING_PRODUCTIVE.into(),
            name: "Morning Productive".into(),
            description: "Deep work first, admin after lunch.".into(),
            blocks: vec![
                block("mp-wake", (6, 30), "Wake up & hydrate", BlockKind::Personal),
                block("mp-exercise", (7, 0), "Exercise", BlockKind::Personal),
                block("mp-deep", (8, 0), "Deep Work", BlockKind::Sacred).with_lock(),
                block("mp-break", (10, 0), "Break", BlockKind::Break),
                block("mp-work", (10, 15), "Meetings & email", BlockKind::Work),
                block("mp-lunch", (13, 0), "Lunch", BlockKind::Break),
                block("mp-admin", (14, 0), "Admin", BlockKind::Work),
                block("mp-close", (17, 0), "Close the day", BlockKind::Personal),
            ],
        },
        Routine {
            id: AFTERNOON_FOCUS.into(),
            name: "Afternoon Focus".into(),
            description: "Slow morning, focused afternoon.".into(),
            blocks: vec![
                block("af-wake", (8, 0), "Wake up", BlockKind::Personal),
                block("af-admin", (9, 30), "Admin", BlockKind::Work),
                block("af-lunch", (12, 30), "Lunch", BlockKind::Break),
                block("af-deep", (14, 0), "Deep Work", BlockKind::Sacred).with_lock(),
                block("af-break", (16, 0), "Break", BlockKind::Break),
                block("af-review", (16, 15), "Review", BlockKind::Work),
                block("af-close", (18, 0), "Close the day", BlockKind::Personal),
            ],
        },
        Routine {
            id: SPLIT_SHIFT.into(),
            name: "Split Shift".into(),
            description: "Two work blocks with a long midday break.".into(),
            blocks: vec![
                block("ss-work-1", (8, 0), "Morning shift", BlockKind::Work),
                block("ss-break", (12, 0), "Long break", BlockKind::Break),
                block("ss-family", (13, 0), "Family time", BlockKind::Sacred),
                block("ss-work-2", (16, 0), "Afternoon shift", BlockKind::Work),
                block("ss-close", (20, 0), "Wind down", BlockKind::Personal),
            ],
        },
        Routine {
            id: WEEKEND_RECHARGE.into(),
            name: "Weekend Recharge".into(),
            description: "Rest, movement and people.".into(),
            blocks: vec![
                block("wr-wake", (9, 0), "Slow breakfast", BlockKind::Personal),
                block("wr-outdoors", (10, 30), "Outdoors", BlockKind::Personal),
                block("wr-lunch", (13, 0), "Lunch", BlockKind::Break),
                block("wr-people", (16, 0), "Friends & family", BlockKind::Sacred),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_sorted_and_well_formed() {
        for routine in presets() {
            let starts: Vec<_> = routine
                .blocks
                .iter()
                .map(|b| b.start().expect("preset times parse").minutes_since_midnight())
                .collect();
            assert!(starts.windows(2).all(|w| w[0] < w[1]), "{} unsorted", routine.id);
        }
    }

    #[test]
    fn default_routine_is_a_preset() {
        assert!(presets().iter().any(|r| r.id == DEFAULT_ROUTINE));
    }
}
