//! Card creation and movement with lifecycle side effects.

use std::rc::Rc;

use tracing::debug;

use crate::cards::{Card, CardDefinition, UnitState};
use crate::core::{EngineError, EntityId, GameState, Team};
use crate::events::Event;
use crate::zones::{Zone, ZonePosition};

impl GameState {
    /// Create a card instance outside every zone.
    pub fn create_card_from(
        &mut self,
        definition: Rc<CardDefinition>,
        owner: Team,
        creator: Option<EntityId>,
    ) -> Result<EntityId, EngineError> {
        let id = self.alloc_entity();
        let mut card = Card::new(id, definition, owner);
        card.creator = creator;
        self.cards.insert(id, card);
        self.instantiate_effects(id)?;
        Ok(id)
    }

    /// Create a card from the catalogue, outside every zone.
    pub fn create_card(
        &mut self,
        code: &str,
        owner: Team,
        creator: Option<EntityId>,
    ) -> Result<EntityId, EngineError> {
        let definition = self
            .catalogue
            .definition(code)
            .ok_or_else(|| EngineError::UnknownCardCode(code.to_string()))?;
        self.create_card_from(definition, owner, creator)
    }

    /// Create a card and put it into `zone`.
    ///
    /// Hand placement respects the hand limit; camp placement summons.
    pub fn create_card_in(
        &mut self,
        code: &str,
        owner: Team,
        creator: Option<EntityId>,
        zone: Zone,
    ) -> Result<EntityId, EngineError> {
        let id = self.create_card(code, owner, creator)?;
        self.place_new_card(id, zone)?;
        Ok(id)
    }

    /// Copy a card: same definition, base stats and keywords, fresh
    /// effects and no grants.
    pub fn clone_card(
        &mut self,
        source: EntityId,
        owner: Team,
        zone: Zone,
    ) -> Result<EntityId, EngineError> {
        let (definition, keywords, unit, mana_base_delta) = {
            let card = self.get_card(source)?;
            let grants_free_unit = card.unit.as_ref().map(|u| {
                let mut unit = UnitState::new(u.power_base, u.health_base);
                unit.damage_fn = u.damage_fn.clone();
                unit.kill_fn = u.kill_fn.clone();
                unit
            });
            (
                Rc::clone(&card.definition),
                card.keywords,
                grants_free_unit,
                card.mana_base_delta,
            )
        };
        let id = self.create_card_from(definition, owner, Some(source))?;
        let card = self.get_card_mut(id)?;
        card.keywords = keywords;
        card.unit = unit;
        card.mana_base_delta = mana_base_delta;
        self.place_new_card(id, zone)?;
        debug!("{} cloned from {}", id, source);
        Ok(id)
    }

    fn place_new_card(&mut self, id: EntityId, zone: Zone) -> Result<(), EngineError> {
        match zone {
            Zone::Hand => {
                self.add_to_hand(id)?;
            }
            Zone::Camp | Zone::Battlefield => {
                self.summon(id, None)?;
            }
            Zone::Deck => {
                let owner = self.get_card(id)?.owner;
                let len = self.boards[owner].deck.len();
                let index = self.rng.gen_range_usize(0..len + 1);
                self.move_card(id, Zone::Deck, ZonePosition::Index(index))?;
            }
            Zone::Nowhere => {}
            _ => {
                self.move_card(id, zone, ZonePosition::Top)?;
                self.refresh_subscriptions(id)?;
            }
        }
        Ok(())
    }

    /// Put a card into its owner's hand. A full hand obliterates it.
    ///
    /// Returns whether the card reached the hand.
    pub fn add_to_hand(&mut self, card: EntityId) -> Result<bool, EngineError> {
        let owner = self.get_card(card)?.owner;
        if self.boards[owner].hand.len() >= self.config.hand_cards_limit {
            debug!("{} hand is full, {} obliterated", owner, card);
            self.obliterate(card)?;
            return Ok(false);
        }
        self.move_card(card, Zone::Hand, ZonePosition::Top)?;
        self.refresh_subscriptions(card)?;
        Ok(true)
    }

    /// Draw the top card of a deck into hand.
    ///
    /// Returns `None` when the deck is empty; the caller decides whether
    /// that loses the game.
    pub fn draw(&mut self, team: Team) -> Result<Option<EntityId>, EngineError> {
        let Some(&card) = self.boards[team].deck.last() else {
            return Ok(None);
        };
        if self.add_to_hand(card)? {
            self.trigger(Event::DrawCard { team, card })?;
        }
        Ok(Some(card))
    }

    /// Draw `count` cards, ending the game if the deck runs out.
    pub fn draw_cards(&mut self, team: Team, count: usize) -> Result<(), EngineError> {
        for _ in 0..count {
            if self.status.is_over() {
                break;
            }
            if self.draw(team)?.is_none() {
                self.lose_by_draw_out(team)?;
            }
        }
        Ok(())
    }

    /// Remove a card from the game: strip grants, disconnect effects, toss.
    pub fn obliterate(&mut self, card: EntityId) -> Result<(), EngineError> {
        let (owner, zone) = {
            let c = self.get_card(card)?;
            (c.owner, c.zone)
        };
        if zone == Zone::Tossed {
            return Ok(());
        }
        self.strip_grants(card)?;
        self.unsubscribe_all(card)?;
        self.targeting.remove_card(card);
        self.reservations.remove(&card);
        self.spell_buffer.retain(|&c| c != card);
        self.move_card(card, Zone::Tossed, ZonePosition::Top)?;
        debug!("{} obliterated from {:?}", card, zone);

        if zone.is_field() {
            self.drain_queue(owner)?;
        }
        Ok(())
    }

    /// Return a unit on the field to its owner's hand, stripped of grants
    /// and damage.
    pub fn recall(&mut self, card: EntityId) -> Result<(), EngineError> {
        let (owner, zone) = {
            let c = self.get_card(card)?;
            (c.owner, c.zone)
        };
        if !zone.is_field() {
            return Ok(());
        }
        self.strip_grants(card)?;
        if let Some(unit) = self.get_card_mut(card)?.unit.as_mut() {
            unit.damage = 0;
        }
        self.unsubscribe_all(card)?;
        if self.add_to_hand(card)? {
            self.trigger(Event::Recall { team: owner, card })?;
        }
        self.drain_queue(owner)?;
        Ok(())
    }
}
