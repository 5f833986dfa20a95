//! The fixed-size entity table.

use crate::error::DemoError;
use crate::types::EntityState;
use crate::MAX_ENTITIES;

/// The most recently observed state of every entity slot.
///
/// Slots are overwritten whenever a gamestate or snapshot references them
/// and are never destroyed, only replaced or reset wholesale.
#[derive(Clone, Debug, PartialEq)]
pub struct EntityTable {
    slots: Box<[EntityState]>,
}

impl Default for EntityTable {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityTable {
    /// Create a table of [`MAX_ENTITIES`] default slots.
    pub fn new() -> Self {
        Self {
            slots: vec![EntityState::default(); MAX_ENTITIES].into_boxed_slice(),
        }
    }

    /// Overwrite one slot.
    pub fn set(&mut self, index: usize, state: EntityState) -> Result<(), DemoError> {
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(DemoError::EntityIndexOutOfRange {
                index: i32::try_from(index).unwrap_or(i32::MAX),
            })?;
        *slot = state;
        Ok(())
    }

    /// Read one slot.
    pub fn get(&self, index: usize) -> Option<&EntityState> {
        self.slots.get(index)
    }

    /// Reset every slot to its default.
    pub fn reset(&mut self) {
        self.slots.fill(EntityState::default());
    }

    /// Iterate over `(index, state)` for every player entity.
    pub fn players(&self) -> impl Iterator<Item = (usize, &EntityState)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_player())
    }

    /// Number of slots (always [`MAX_ENTITIES`]).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
