//! Schedule shifting laws.

use equilibrio_core::routine::MINUTES_PER_DAY;
use equilibrio_core::{BlockKind, ClockTime, Routine, TimeBlock};
use proptest::prelude::*;

fn routine_from(minutes: &[i64]) -> Routine {
    let blocks = minutes
        .iter()
        .enumerate()
        .map(|(i, m)| {
            TimeBlock::new(ClockTime::from_minutes(*m), format!("Block {i}"), BlockKind::Work)
                .with_id(format!("b{i}"))
        })
        .collect();
    Routine::new("p", "Prop").with_blocks(blocks)
}

#[test]
fn shift_wraps_past_midnight() {
    let routine = routine_from(&[23 * 60 + 50]);
    assert_eq!(routine.shifted(15).blocks[0].time, "00:05");
    assert_eq!(routine.shifted(15).shifted(-15), routine);
}

proptest! {
    #[test]
    fn shift_then_unshift_restores_times(
        minutes in prop::collection::vec(0i64..MINUTES_PER_DAY, 0..12),
        offset in -2000i64..2000,
    ) {
        let routine = routine_from(&minutes);
        prop_assert_eq!(routine.shifted(offset).shifted(-offset), routine);
    }

    #[test]
    fn shifts_compose_additively(
        minutes in prop::collection::vec(0i64..MINUTES_PER_DAY, 1..12),
        a in -720i64..720,
        b in -720i64..720,
    ) {
        let routine = routine_from(&minutes);
        prop_assert_eq!(routine.shifted(a).shifted(b), routine.shifted(a + b));
    }

    #[test]
    fn shift_preserves_identity_and_order(
        minutes in prop::collection::vec(0i64..MINUTES_PER_DAY, 0..12),
        offset in -2000i64..2000,
    ) {
        let routine = routine_from(&minutes);
        let shifted = routine.shifted(offset);
        let ids: Vec<_> = routine.blocks.iter().map(|b| &b.id).collect();
        let shifted_ids: Vec<_> = shifted.blocks.iter().map(|b| &b.id).collect();
        prop_assert_eq!(ids, shifted_ids);
    }
}
