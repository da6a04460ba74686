use serde::{Deserialize, Serialize};

use super::block::{BlockKind, TimeBlock};
use super::clock::ClockTime;

/// Assumed length of the last block, which has no successor to end it.
pub const DEFAULT_LAST_BLOCK_MIN: i64 = 60;

/// A named, ordered day plan.
///
/// Blocks are expected in ascending start order; a block's end is inferred
/// from the next block's start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Routine {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub blocks: Vec<TimeBlock>,
}

/// Minutes planned per block kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutineSummary {
    pub work_min: i64,
    pub sacred_min: i64,
    pub personal_min: i64,
    pub break_min: i64,
}

/// How far through the routine the day is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutineProgress {
    pub started: usize,
    pub total: usize,
    pub percent: u8,
}

impl Routine {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            blocks: Vec::new(),
        }
    }

    pub fn with_blocks(mut self, blocks: Vec<TimeBlock>) -> Self {
        self.blocks = blocks;
        self
    }

    pub fn block(&self, id: &str) -> Option<&TimeBlock> {
        self.blocks.iter().find(|b| b.id == id)
    }

    /// Effective `(start, end)` in minutes since midnight for the block at `index`.
    ///
    /// The end is the next block's start, or start + 60 for the last block
    /// (and for a block whose successor has a malformed time).
    pub fn effective_span(&self, index: usize) -> Option<(i64, i64)> {
        let start = self.blocks.get(index)?.start()?.minutes_since_midnight();
        let end = self
            .blocks
            .get(index + 1)
            .and_then(TimeBlock::start)
            .map(|t| t.minutes_since_midnight())
            .unwrap_or(start + DEFAULT_LAST_BLOCK_MIN);
        Some((start, end))
    }

    /// Planned minutes per kind. Spans that run backwards count as zero.
    pub fn summary(&self) -> RoutineSummary {
        let mut summary = RoutineSummary::default();
        for (i, block) in self.blocks.iter().enumerate() {
            let Some((start, end)) = self.effective_span(i) else {
                continue;
            };
            let minutes = (end - start).max(0);
            match block.kind {
                BlockKind::Work => summary.work_min += minutes,
                BlockKind::Sacred => summary.sacred_min += minutes,
                BlockKind::Personal => summary.personal_min += minutes,
                BlockKind::Break => summary.break_min += minutes,
            }
        }
        summary
    }

    /// Blocks whose start time has been reached.
    pub fn progress(&self, now: ClockTime) -> RoutineProgress {
        let total = self.blocks.len();
        let now_min = now.minutes_since_midnight();
        let started = self
            .blocks
            .iter()
            .filter_map(TimeBlock::start)
            .filter(|t| now_min >= t.minutes_since_midnight())
            .count();
        let percent = if total == 0 {
            0
        } else {
            ((started as f64 / total as f64) * 100.0).round() as u8
        };
        RoutineProgress {
            started,
            total,
            percent,
        }
    }

    /// The block whose effective span contains `now`.
    pub fn current_block(&self, now: ClockTime) -> Option<&TimeBlock> {
        let now_min = now.minutes_since_midnight();
        (0..self.blocks.len())
            .find(|&i| {
                self.effective_span(i)
                    .is_some_and(|(start, end)| now_min >= start && now_min < end)
            })
            .map(|i| &self.blocks[i])
    }

    /// A copy with every block moved by `minutes`, wrapping within the day.
    ///
    /// Ids, order and all other fields are preserved. Blocks with a malformed
    /// time are left as they are.
    pub fn shifted(&self, minutes: i64) -> Routine {
        let blocks = self
            .blocks
            .iter()
            .map(|block| match block.start() {
                Some(start) => TimeBlock {
                    time: start.shifted(minutes).to_string(),
                    ..block.clone()
                },
                None => block.clone(),
            })
            .collect();
        Routine {
            blocks,
            ..self.clone()
        }
    }

    /// Insert keeping ascending start order. Malformed times sort last.
    pub fn insert_block(&mut self, block: TimeBlock) {
        let key = |b: &TimeBlock| b.start().map(|t| t.minutes_since_midnight()).unwrap_or(i64::MAX);
        let new_key = key(&block);
        let pos = self
            .blocks
            .iter()
            .position(|b| key(b) > new_key)
            .unwrap_or(self.blocks.len());
        self.blocks.insert(pos, block);
    }

    pub fn remove_block(&mut self, id: &str) -> Option<TimeBlock> {
        let pos = self.blocks.iter().position(|b| b.id == id)?;
        Some(self.blocks.remove(pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> ClockTime {
        s.parse().unwrap()
    }

    fn sample() -> Routine {
        Routine::new("r", "Sample").with_blocks(vec![
            TimeBlock::new(t("09:00"), "Deep Work", BlockKind::Sacred).with_id("a"),
            TimeBlock::new(t("10:30"), "Email", BlockKind::Work).with_id("b"),
            TimeBlock::new(t("11:00"), "Walk", BlockKind::Break).with_id("c"),
        ])
    }

    #[test]
    fn summary_infers_durations_from_next_block() {
        let s = sample().summary();
        assert_eq!(s.sacred_min, 90);
        assert_eq!(s.work_min, 30);
        assert_eq!(s.break_min, DEFAULT_LAST_BLOCK_MIN);
    }

    #[test]
    fn progress_counts_started_blocks() {
        let r = sample();
        assert_eq!(r.progress(t("08:59")).started, 0);
        let p = r.progress(t("10:30"));
        assert_eq!((p.started, p.total, p.percent), (2, 3, 67));
    }

    #[test]
    fn current_block_uses_effective_span() {
        let r = sample();
        assert_eq!(r.current_block(t("10:29")).unwrap().id, "a");
        assert_eq!(r.current_block(t("11:59")).unwrap().id, "c");
        assert!(r.current_block(t("12:00")).is_none());
        assert!(r.current_block(t("08:00")).is_none());
    }

    #[test]
    fn shift_keeps_identity_and_order() {
        let r = sample();
        let shifted = r.shifted(15);
        let ids: Vec<_> = shifted.blocks.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert_eq!(shifted.blocks[0].time, "09:15");
        assert_eq!(shifted.blocks[0].activity, "Deep Work");
        assert_eq!(shifted.shifted(15).blocks[2].time, "11:30");
    }

    #[test]
    fn shift_leaves_malformed_time_alone() {
        let mut r = sample();
        r.blocks[1].time = "later".into();
        let shifted = r.shifted(30);
        assert_eq!(shifted.blocks[1].time, "later");
        assert_eq!(shifted.blocks[2].time, "11:30");
    }

    #[test]
    fn insert_keeps_ascending_order() {
        let mut r = sample();
        r.insert_block(TimeBlock::new(t("10:00"), "Standup", BlockKind::Work).with_id("d"));
        r.insert_block(TimeBlock::new(t("06:00"), "Wake", BlockKind::Personal).with_id("e"));
        let ids: Vec<_> = r.blocks.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, ["e", "a", "d", "b", "c"]);
        assert_eq!(r.remove_block("d").unwrap().activity, "Standup");
        assert!(r.remove_block("d").is_none());
    }
}
