//! Per-team card containers.
//!
//! The board only stores ids. It does not know about card stats or the
//! recorded zone of each card; [`GameState::move_card`] keeps those in
//! sync.
//!
//! The deck's top is the end of its vector. Battlefield lanes are
//! `Option`s: gaps appear while blockers are lined up against attackers
//! and when a unit dies mid-combat.
//!
//! [`GameState::move_card`]: crate::core::GameState::move_card

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::Zone;
use crate::core::EntityId;

/// Position for inserting a card into an ordered zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZonePosition {
    /// Top of the deck, end of any other container.
    Top,
    /// Bottom of the deck, start of any other container.
    Bottom,
    /// Insert at a specific index (lane for the battlefield).
    Index(usize),
}

/// One team's zones.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub deck: Vec<EntityId>,
    pub hand: Vec<EntityId>,
    pub camp: Vec<EntityId>,
    pub battlefield: Vec<Option<EntityId>>,
    pub graveyard: Vec<EntityId>,
    pub spellyard: Vec<EntityId>,
    pub tossed: Vec<EntityId>,
    /// Field cards waiting for a camp slot, oldest first.
    pub queue: VecDeque<EntityId>,
}

impl Board {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Linear container backing a zone, if this board owns one.
    #[must_use]
    pub fn container(&self, zone: Zone) -> Option<&Vec<EntityId>> {
        match zone {
            Zone::Deck => Some(&self.deck),
            Zone::Hand => Some(&self.hand),
            Zone::Camp => Some(&self.camp),
            Zone::Graveyard => Some(&self.graveyard),
            Zone::Spellyard => Some(&self.spellyard),
            Zone::Tossed => Some(&self.tossed),
            _ => None,
        }
    }

    fn container_mut(&mut self, zone: Zone) -> Option<&mut Vec<EntityId>> {
        match zone {
            Zone::Deck => Some(&mut self.deck),
            Zone::Hand => Some(&mut self.hand),
            Zone::Camp => Some(&mut self.camp),
            Zone::Graveyard => Some(&mut self.graveyard),
            Zone::Spellyard => Some(&mut self.spellyard),
            Zone::Tossed => Some(&mut self.tossed),
            _ => None,
        }
    }

    /// Insert into a linear container, returning the index used.
    ///
    /// Returns `None` if the zone is not a linear container.
    pub fn insert(&mut self, zone: Zone, id: EntityId, position: ZonePosition) -> Option<usize> {
        let list = self.container_mut(zone)?;
        let index = match position {
            ZonePosition::Top => list.len(),
            ZonePosition::Bottom => 0,
            ZonePosition::Index(i) => i.min(list.len()),
        };
        list.insert(index, id);
        Some(index)
    }

    /// Remove from a linear container, returning the old index.
    pub fn remove(&mut self, zone: Zone, id: EntityId) -> Option<usize> {
        let list = self.container_mut(zone)?;
        let index = list.iter().position(|&c| c == id)?;
        list.remove(index);
        Some(index)
    }

    /// Unit in a battlefield lane.
    #[must_use]
    pub fn lane(&self, lane: usize) -> Option<EntityId> {
        self.battlefield.get(lane).copied().flatten()
    }

    /// Put a unit in a lane, padding with gaps as needed.
    pub fn set_lane(&mut self, lane: usize, id: EntityId) {
        if self.battlefield.len() <= lane {
            self.battlefield.resize(lane + 1, None);
        }
        self.battlefield[lane] = Some(id);
    }

    /// Empty the lane holding `id`, returning the lane.
    pub fn clear_unit(&mut self, id: EntityId) -> Option<usize> {
        let lane = self.battlefield.iter().position(|&u| u == Some(id))?;
        self.battlefield[lane] = None;
        Some(lane)
    }

    /// Pad the battlefield with gaps up to `len` lanes.
    pub fn pad_battlefield(&mut self, len: usize) {
        if self.battlefield.len() < len {
            self.battlefield.resize(len, None);
        }
    }

    /// Drop trailing gaps.
    pub fn trim_battlefield(&mut self) {
        while self.battlefield.last() == Some(&None) {
            self.battlefield.pop();
        }
    }

    /// Units currently on the battlefield, lane order.
    pub fn battlefield_units(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.battlefield.iter().filter_map(|&u| u)
    }

    /// First lane without a unit (gap or past the end).
    #[must_use]
    pub fn first_free_lane(&self) -> usize {
        self.battlefield
            .iter()
            .position(Option::is_none)
            .unwrap_or(self.battlefield.len())
    }

    /// Field cards in camp plus units on the battlefield.
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.camp.len() + self.battlefield_units().count()
    }

    /// Whether `id` is held anywhere on this board.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.deck.contains(&id)
            || self.hand.contains(&id)
            || self.camp.contains(&id)
            || self.battlefield.contains(&Some(id))
            || self.graveyard.contains(&id)
            || self.spellyard.contains(&id)
            || self.tossed.contains(&id)
            || self.queue.contains(&id)
    }
}
