//! The shared spell stack.

use serde::{Deserialize, Serialize};

use crate::core::EntityId;

/// Spells waiting to be cast (index 0 = bottom, last = top).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellStack {
    entries: Vec<EntityId>,
}

impl SpellStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a spell, returning its stack index.
    pub fn push(&mut self, spell: EntityId) -> usize {
        self.entries.push(spell);
        self.entries.len() - 1
    }

    pub fn pop(&mut self) -> Option<EntityId> {
        self.entries.pop()
    }

    #[must_use]
    pub fn top(&self) -> Option<EntityId> {
        self.entries.last().copied()
    }

    /// Remove a spell wherever it sits, returning its old index.
    pub fn remove(&mut self, spell: EntityId) -> Option<usize> {
        let index = self.entries.iter().position(|&s| s == spell)?;
        self.entries.remove(index);
        Some(index)
    }

    #[must_use]
    pub fn contains(&self, spell: EntityId) -> bool {
        self.entries.contains(&spell)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entries.iter().copied()
    }
}
