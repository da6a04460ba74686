//! Owner of all routines and of the current-routine selection.

use std::collections::BTreeMap;

use super::block::TimeBlock;
use super::model::Routine;
use super::presets::{presets, DEFAULT_ROUTINE};
use crate::error::{CoreError, ValidationError};
use crate::storage::database::{Database, KEY_CURRENT_ROUTINE, KEY_ROUTINES};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutineStore {
    routines: BTreeMap<String, Routine>,
    current: String,
}

impl Default for RoutineStore {
    fn default() -> Self {
        Self::with_presets()
    }
}

impl RoutineStore {
    /// Built-in routines only, with the default one selected.
    pub fn with_presets() -> Self {
        Self {
            routines: presets().into_iter().map(|r| (r.id.clone(), r)).collect(),
            current: DEFAULT_ROUTINE.to_string(),
        }
    }

    /// Presets overlaid with whatever the user has saved.
    ///
    /// Unreadable saved data is logged and ignored.
    pub fn load(db: &Database) -> Self {
        let mut store = Self::with_presets();
        match db.load_json::<BTreeMap<String, Routine>>(KEY_ROUTINES) {
            Ok(Some(saved)) => store.routines.extend(saved),
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "ignoring unreadable saved routines"),
        }
        match db.load_json::<String>(KEY_CURRENT_ROUTINE) {
            Ok(Some(current)) => store.current = current,
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "ignoring unreadable routine selection"),
        }
        store
    }

    pub fn save(&self, db: &Database) -> Result<(), CoreError> {
        db.save_json(KEY_ROUTINES, &self.routines)?;
        db.save_json(KEY_CURRENT_ROUTINE, &self.current)?;
        Ok(())
    }

    pub fn current_id(&self) -> &str {
        &self.current
    }

    /// The selected routine, if it still exists.
    pub fn current(&self) -> Option<&Routine> {
        self.routines.get(&self.current)
    }

    pub fn get(&self, id: &str) -> Option<&Routine> {
        self.routines.get(id)
    }

    pub fn routines(&self) -> impl Iterator<Item = &Routine> {
        self.routines.values()
    }

    pub fn select(&mut self, id: &str) -> Result<(), ValidationError> {
        if !self.routines.contains_key(id) {
            return Err(ValidationError::UnknownRoutine(id.to_string()));
        }
        self.current = id.to_string();
        Ok(())
    }

    pub fn upsert(&mut self, routine: Routine) {
        self.routines.insert(routine.id.clone(), routine);
    }

    /// Add an empty routine. Ids must be new and non-blank.
    pub fn create(
        &mut self,
        id: &str,
        name: &str,
        description: &str,
    ) -> Result<&Routine, ValidationError> {
        if self.routines.contains_key(id) {
            return Err(ValidationError::DuplicateRoutine(id.to_string()));
        }
        if id.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "id".into(),
                message: "must not be empty".into(),
            });
        }
        let routine = self
            .routines
            .entry(id.to_string())
            .or_insert_with(|| Routine {
                description: description.to_string(),
                ..Routine::new(id, name)
            });
        Ok(routine)
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Routine, ValidationError> {
        self.routines
            .get_mut(id)
            .ok_or_else(|| ValidationError::UnknownRoutine(id.to_string()))
    }

    pub fn add_block(&mut self, routine_id: &str, block: TimeBlock) -> Result<(), ValidationError> {
        self.get_mut(routine_id)?.insert_block(block);
        Ok(())
    }

    pub fn remove_block(
        &mut self,
        routine_id: &str,
        block_id: &str,
    ) -> Result<TimeBlock, ValidationError> {
        self.get_mut(routine_id)?
            .remove_block(block_id)
            .ok_or_else(|| ValidationError::UnknownBlock {
                routine_id: routine_id.to_string(),
                block_id: block_id.to_string(),
            })
    }

    /// Flip a subtask's completion, returning the new state.
    pub fn toggle_subtask(
        &mut self,
        routine_id: &str,
        block_id: &str,
        subtask_id: &str,
    ) -> Result<bool, ValidationError> {
        let unknown_block = || ValidationError::UnknownBlock {
            routine_id: routine_id.to_string(),
            block_id: block_id.to_string(),
        };
        let block = self
            .get_mut(routine_id)?
            .blocks
            .iter_mut()
            .find(|b| b.id == block_id)
            .ok_or_else(unknown_block)?;
        block
            .toggle_subtask(subtask_id)
            .ok_or_else(|| ValidationError::UnknownSubtask {
                block_id: block_id.to_string(),
                subtask_id: subtask_id.to_string(),
            })
    }

    /// Replace a routine's blocks with their shifted copies.
    pub fn apply_time_shift(
        &mut self,
        routine_id: &str,
        minutes: i64,
    ) -> Result<&Routine, ValidationError> {
        let routine = self.get_mut(routine_id)?;
        *routine = routine.shifted(minutes);
        tracing::info!(routine = routine_id, minutes, "schedule shifted");
        Ok(routine)
    }
}
