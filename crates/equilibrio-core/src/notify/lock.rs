use serde::{Deserialize, Serialize};

/// Full-screen lock entered when a lock-enforced sacred block starts.
///
/// Only an explicit user action leaves it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockState {
    pub active: bool,
    pub activity: String,
}

/// How the user leaves the lock screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockResolution {
    /// Shift the schedule forward, then unlock.
    RunningLate,
    /// Unlock without changing the schedule.
    Skip,
}

impl LockState {
    pub fn enter(&mut self, activity: &str) {
        self.active = true;
        self.activity = activity.to_string();
    }

    pub fn exit(&mut self) {
        self.active = false;
        self.activity.clear();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}
