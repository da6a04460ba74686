mod block;
mod clock;
mod model;
pub mod presets;
mod store;

pub use block::{BlockKind, Subtask, TimeBlock};
pub use clock::{ClockTime, MINUTES_PER_DAY};
pub use model::{Routine, RoutineProgress, RoutineSummary, DEFAULT_LAST_BLOCK_MIN};
pub use store::RoutineStore;
