use serde::{Deserialize, Serialize};

use super::clock::ClockTime;

/// Classification of a block.
///
/// Drives duration accounting and whether lock enforcement is allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Work,
    Sacred,
    Personal,
    Break,
}

impl std::str::FromStr for BlockKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "work" => Ok(BlockKind::Work),
            "sacred" => Ok(BlockKind::Sacred),
            "personal" => Ok(BlockKind::Personal),
            "break" => Ok(BlockKind::Break),
            other => Err(format!("unknown block kind: {other}")),
        }
    }
}

/// A checklist item inside a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

/// One scheduled activity in a routine.
///
/// `time` is kept as the raw `HH:MM` string the user entered. A string that
/// does not parse is carried along untouched and ignored by every
/// time-based computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBlock {
    pub id: String,
    pub time: String,
    pub activity: String,
    pub kind: BlockKind,
    #[serde(default = "default_true")]
    pub alarm_enabled: bool,
    #[serde(default)]
    pub enforce_lock: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
    /// Display colour overriding the kind's default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_color: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subtasks: Vec<Subtask>,
}

fn default_true() -> bool {
    true
}

impl TimeBlock {
    /// Create a block with a fresh id, alarm on and no lock.
    pub fn new(time: ClockTime, activity: impl Into<String>, kind: BlockKind) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            time: time.to_string(),
            activity: activity.into(),
            kind,
            alarm_enabled: true,
            enforce_lock: false,
            location: None,
            notes: String::new(),
            custom_color: None,
            subtasks: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_lock(mut self) -> Self {
        self.enforce_lock = true;
        self
    }

    pub fn without_alarm(mut self) -> Self {
        self.alarm_enabled = false;
        self
    }

    /// Append an unchecked subtask and return its id.
    pub fn add_subtask(&mut self, text: impl Into<String>) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        self.subtasks.push(Subtask {
            id: id.clone(),
            text: text.into(),
            completed: false,
        });
        id
    }

    /// Flip a subtask's completion. `None` if no subtask has that id.
    pub fn toggle_subtask(&mut self, subtask_id: &str) -> Option<bool> {
        let subtask = self.subtasks.iter_mut().find(|s| s.id == subtask_id)?;
        subtask.completed = !subtask.completed;
        Some(subtask.completed)
    }

    /// (completed, total) subtasks.
    pub fn subtask_progress(&self) -> (usize, usize) {
        let done = self.subtasks.iter().filter(|s| s.completed).count();
        (done, self.subtasks.len())
    }

    /// Parsed start time, `None` when `time` is malformed.
    pub fn start(&self) -> Option<ClockTime> {
        self.time.parse().ok()
    }

    /// Reaching this block's start forces the lock screen.
    ///
    /// Only sacred blocks may lock; the flag is ignored on any other kind.
    pub fn locks_on_start(&self) -> bool {
        self.kind == BlockKind::Sacred && self.enforce_lock
    }
}
