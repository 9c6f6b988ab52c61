//! Effect subscription lifecycle.
//!
//! A card's effects are connected according to their
//! [`RegistrationTime`] and the zone the card currently occupies:
//!
//! | Registration | Subscribed while in                         |
//! |--------------|---------------------------------------------|
//! | Creation     | hand, play buffer, spell stack, camp, battlefield |
//! | Draw         | same as Creation                            |
//! | Summon       | camp, battlefield                           |
//! | Death        | only while its owner's DIE event is fired   |
//!
//! Nexus effects are always subscribed.

use std::rc::Rc;

use tracing::trace;

use super::registry::EffectId;
use crate::core::{EngineError, EntityId, GameState};
use crate::effects::{Effect, EffectTemplate, RegistrationTime};
use crate::zones::Zone;

/// Whether an effect with `registration` listens while its card is in `zone`.
fn active_in(registration: RegistrationTime, zone: Zone) -> bool {
    match registration {
        RegistrationTime::Creation | RegistrationTime::Draw => matches!(
            zone,
            Zone::Hand | Zone::Pending | Zone::SpellStack | Zone::Camp | Zone::Battlefield
        ),
        RegistrationTime::Summon => zone.is_field(),
        RegistrationTime::Death => false,
    }
}

impl GameState {
    /// Instantiate the definition's effect templates for a fresh card.
    pub(crate) fn instantiate_effects(&mut self, card: EntityId) -> Result<(), EngineError> {
        let definition = Rc::clone(&self.get_card(card)?.definition);
        let ids: Vec<EffectId> = definition
            .effects
            .iter()
            .map(|template| self.effects.insert(Effect::from_template(template, card)))
            .collect();
        self.get_card_mut(card)?.effects.extend(ids);
        Ok(())
    }

    /// Attach an extra effect to a card or nexus, subscribing it when its
    /// registration time already applies.
    pub fn attach_effect(
        &mut self,
        owner: EntityId,
        template: &EffectTemplate,
    ) -> Result<EffectId, EngineError> {
        let id = self.effects.insert(Effect::from_template(template, owner));
        if owner.is_nexus() {
            self.effects.subscribe(id);
            return Ok(id);
        }

        let card = self.get_card_mut(owner)?;
        card.effects.push(id);
        if active_in(template.registration, card.zone) {
            self.effects.subscribe(id);
        }
        Ok(id)
    }

    /// Detach and drop an effect previously attached to `owner`.
    pub fn detach_effect(&mut self, owner: EntityId, effect: EffectId) -> Result<(), EngineError> {
        self.effects
            .remove(effect)
            .ok_or(EngineError::UnknownEffect(effect))?;
        if let Some(card) = self.card_mut(owner) {
            card.effects.retain(|&e| e != effect);
        }
        Ok(())
    }

    /// Bring a card's subscriptions in line with its current zone.
    pub(crate) fn refresh_subscriptions(&mut self, card: EntityId) -> Result<(), EngineError> {
        let (zone, effects) = {
            let card = self.get_card(card)?;
            (card.zone, card.effects.clone())
        };
        for id in effects {
            let registration = self
                .effects
                .get(id)
                .ok_or(EngineError::UnknownEffect(id))?
                .registration;
            if active_in(registration, zone) {
                self.effects.subscribe(id);
            } else {
                self.effects.unsubscribe(id);
            }
        }
        trace!("{} subscriptions refreshed for {:?}", card, zone);
        Ok(())
    }

    /// Disconnect every effect of a card.
    pub(crate) fn unsubscribe_all(&mut self, card: EntityId) -> Result<(), EngineError> {
        let effects = self.get_card(card)?.effects.clone();
        for id in effects {
            self.effects.unsubscribe(id);
        }
        Ok(())
    }

    /// Connect a dying card's death-time effects.
    pub(crate) fn subscribe_death_effects(&mut self, card: EntityId) -> Result<(), EngineError> {
        let effects = self.get_card(card)?.effects.clone();
        for id in effects {
            if self
                .effects
                .get(id)
                .is_some_and(|e| e.registration == RegistrationTime::Death)
            {
                self.effects.subscribe(id);
            }
        }
        Ok(())
    }
}
