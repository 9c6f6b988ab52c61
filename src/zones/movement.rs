//! Moving cards between zones.
//!
//! [`GameState::move_card`] is the only place that touches both a board
//! container and the card's recorded zone and position. After every move
//! the positions of the source and destination containers are rewritten so
//! they always equal the container index (lane for the battlefield).

use super::{Zone, ZonePosition};
use crate::core::{EngineError, EntityId, GameState, Team};

impl GameState {
    /// Move a card into `to` on its owner's side, returning its new index.
    ///
    /// The battlefield takes `Index(lane)`; `Top` and `Bottom` pick the
    /// first free lane. `Pending` and `Nowhere` have no container.
    pub fn move_card(
        &mut self,
        id: EntityId,
        to: Zone,
        position: ZonePosition,
    ) -> Result<usize, EngineError> {
        let (owner, from) = {
            let card = self.get_card(id)?;
            (card.owner, card.zone)
        };
        self.detach(id, owner, from)?;

        let board = &mut self.boards[owner];
        let index = match to {
            Zone::Battlefield => {
                let lane = match position {
                    ZonePosition::Index(lane) => lane,
                    ZonePosition::Top | ZonePosition::Bottom => board.first_free_lane(),
                };
                board.set_lane(lane, id);
                lane
            }
            Zone::SpellStack => self.spell_stack.push(id),
            Zone::Queue => match position {
                ZonePosition::Bottom => {
                    board.queue.push_front(id);
                    0
                }
                _ => {
                    board.queue.push_back(id);
                    board.queue.len() - 1
                }
            },
            Zone::Pending | Zone::Nowhere => 0,
            _ => board
                .insert(to, id, position)
                .ok_or(EngineError::ZoneMismatch {
                    card: id,
                    expected: to,
                    found: from,
                })?,
        };

        let card = self.get_card_mut(id)?;
        card.zone = to;
        card.position = index;
        card.hidden = matches!(to, Zone::Deck | Zone::Hand);

        self.sync_positions(owner, from);
        self.sync_positions(owner, to);
        Ok(index)
    }

    /// Take a card out of the container it is recorded in.
    fn detach(&mut self, id: EntityId, owner: Team, from: Zone) -> Result<(), EngineError> {
        let board = &mut self.boards[owner];
        let found = match from {
            Zone::Battlefield => board.clear_unit(id).is_some(),
            Zone::SpellStack => self.spell_stack.remove(id).is_some(),
            Zone::Queue => match board.queue.iter().position(|&c| c == id) {
                Some(i) => board.queue.remove(i).is_some(),
                None => false,
            },
            Zone::Pending | Zone::Nowhere => true,
            _ => board.remove(from, id).is_some(),
        };
        if found {
            Ok(())
        } else {
            Err(EngineError::ZoneMismatch {
                card: id,
                expected: from,
                found: Zone::Nowhere,
            })
        }
    }

    /// Rewrite recorded positions to match a container.
    pub(crate) fn sync_positions(&mut self, team: Team, zone: Zone) {
        let ids: Vec<(usize, EntityId)> = match zone {
            Zone::Battlefield => self.boards[team]
                .battlefield
                .iter()
                .enumerate()
                .filter_map(|(lane, u)| u.map(|id| (lane, id)))
                .collect(),
            Zone::SpellStack => self.spell_stack.iter().enumerate().collect(),
            Zone::Queue => self.boards[team].queue.iter().copied().enumerate().collect(),
            _ => self.boards[team]
                .container(zone)
                .map(|list| list.iter().copied().enumerate().collect())
                .unwrap_or_default(),
        };
        for (index, id) in ids {
            if let Some(card) = self.cards.get_mut(&id) {
                card.position = index;
            }
        }
    }

    /// Check that every card sits exactly where it says it is.
    ///
    /// Returns a description of the first inconsistency found.
    pub fn verify_zones(&self) -> Result<(), String> {
        let mut seen = 0usize;
        let mut placed = 0usize;

        for (id, card) in &self.cards {
            if !matches!(card.zone, Zone::Nowhere | Zone::Pending) {
                placed += 1;
            }
            if card.zone == Zone::Pending && self.play_buffer.map(|p| p.card) != Some(*id) {
                return Err(format!("{id} is pending outside the play buffer"));
            }
        }

        for team in Team::ALL {
            let board = &self.boards[team];
            let mut check = |zone: Zone, index: usize, id: EntityId| -> Result<(), String> {
                seen += 1;
                let card = self
                    .card(id)
                    .ok_or_else(|| format!("{id} in {zone:?} is not in the arena"))?;
                if card.owner != team {
                    return Err(format!("{id} sits on the {team} board but belongs to {}", card.owner));
                }
                if card.zone != zone || card.position != index {
                    return Err(format!(
                        "{id} recorded at {:?}[{}] but stored at {zone:?}[{index}]",
                        card.zone, card.position
                    ));
                }
                Ok(())
            };

            for zone in [
                Zone::Deck,
                Zone::Hand,
                Zone::Camp,
                Zone::Graveyard,
                Zone::Spellyard,
                Zone::Tossed,
            ] {
                for (index, &id) in board.container(zone).into_iter().flatten().enumerate() {
                    check(zone, index, id)?;
                }
            }
            for (lane, unit) in board.battlefield.iter().enumerate() {
                if let Some(id) = unit {
                    check(Zone::Battlefield, lane, *id)?;
                }
            }
            for (index, &id) in board.queue.iter().enumerate() {
                check(Zone::Queue, index, id)?;
            }
            if board.camp.len() > self.config.camp_size {
                return Err(format!("{team} camp holds {} cards", board.camp.len()));
            }
        }

        for (index, id) in self.spell_stack.iter().enumerate() {
            seen += 1;
            match self.card(id) {
                Some(card) if card.zone == Zone::SpellStack && card.position == index => {}
                _ => return Err(format!("{id} on the spell stack is recorded elsewhere")),
            }
        }

        if seen != placed {
            return Err(format!("{placed} cards are placed but {seen} slots are filled"));
        }
        Ok(())
    }
}
