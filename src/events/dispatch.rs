//! Synchronous event delivery.

use std::rc::Rc;

use smallvec::SmallVec;
use tracing::{debug, trace};

use super::event::Event;
use super::registry::EffectId;
use crate::core::{EngineError, EntityId, GameState, Team};
use crate::effects::{EffectContext, TargetSelector, TargetSpec};
use crate::zones::Zone;

impl GameState {
    /// Fire an event: record it, then deliver it to the current subscribers.
    ///
    /// The subscriber list is captured before the first delivery. Effects
    /// subscribed while the event is being delivered wait for the next
    /// event; effects unsubscribed meanwhile are skipped.
    pub fn trigger(&mut self, event: Event) -> Result<(), EngineError> {
        debug!("Trigger {:?}", event);
        self.record_event(&event);

        let mut subscribers = self.effects.subscribers(event.kind());
        if subscribers.is_empty() {
            return Ok(());
        }

        let played = match &event {
            Event::Play { card, .. } => Some(*card),
            _ => None,
        };
        subscribers.sort_by_key(|&id| self.delivery_key(id, played));

        for id in subscribers {
            self.deliver(id, &event)?;
        }
        Ok(())
    }

    /// Sort key for one subscriber. Lower keys fire first.
    fn delivery_key(&self, id: EffectId, played: Option<EntityId>) -> (u8, usize) {
        let Some(owner) = self.effects.get(id).map(|e| e.owner) else {
            return (u8::MAX, 0);
        };
        if played == Some(owner) {
            return (0, 0);
        }
        if owner.is_nexus() {
            return (1, 0);
        }
        match self.card(owner) {
            Some(card) if card.zone.is_field() => (1, card.position + 1),
            Some(card) => (2, card.position),
            None => (u8::MAX, 0),
        }
    }

    /// Run one subscriber's callback for `event`.
    fn deliver(&mut self, id: EffectId, event: &Event) -> Result<(), EngineError> {
        let Some(effect) = self.effects.get(id) else {
            return Ok(());
        };
        if !effect.subscribed {
            trace!("{} unsubscribed during delivery, skipped", id);
            return Ok(());
        }

        let owner = effect.owner;
        let team = self.owner_team(id, owner)?;

        if effect.self_only && !event.concerns(owner) {
            return Ok(());
        }

        let mut targets = effect.targets.clone();
        let targeter = effect.targeter.clone();
        let callback = Rc::clone(&effect.callback);
        let consumable = effect.consumable;

        if targets.is_empty() {
            if let Some(spec) = targeter {
                if spec.is_manual() {
                    if !spec.optional {
                        trace!("{} has no chosen targets, skipped", id);
                        return Ok(());
                    }
                } else {
                    targets = self.pick_targets(&spec, team, owner);
                }
            }
        }

        trace!("Deliver {:?} to {} owned by {}", event.kind(), id, owner);
        let context = EffectContext {
            effect: id,
            owner,
            team,
            targets,
        };
        callback(self, event, &context)?;

        if consumable {
            self.effects.consume(id);
        }
        if let Some(effect) = self.effects.get_mut(id) {
            effect.targets.clear();
        }
        Ok(())
    }

    /// Team of an effect's owner, failing if the owner left play.
    fn owner_team(&self, effect: EffectId, owner: EntityId) -> Result<Team, EngineError> {
        if let Some(team) = owner.as_team() {
            return Ok(team);
        }
        let card = self.get_card(owner)?;
        if !card.zone.is_live() {
            return Err(EngineError::OrphanedEffect {
                effect,
                owner,
                zone: card.zone,
            });
        }
        Ok(card.owner)
    }

    /// Resolve an automatic targeter against the current board.
    pub(crate) fn pick_targets(
        &mut self,
        spec: &TargetSpec,
        team: Team,
        source: EntityId,
    ) -> SmallVec<[EntityId; 4]> {
        let selector = TargetSelector::new(spec, team).with_source(source);
        let candidates = selector.valid_targets(self);
        selector.pick(&candidates, &mut self.rng)
    }

    /// Whether an entity can still be affected: a nexus, or a card in a
    /// live zone outside the graveyard (units must also be alive).
    #[must_use]
    pub fn is_targetable(&self, entity: EntityId) -> bool {
        if entity.is_nexus() {
            return true;
        }
        self.card(entity).is_some_and(|card| {
            card.zone.is_live()
                && card.zone != Zone::Graveyard
                && card.unit.as_ref().map_or(true, |u| u.alive)
        })
    }
}
