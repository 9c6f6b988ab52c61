//! Playing cards: summoning, casting and targeting requests.

use tracing::{debug, info};

use crate::cards::Keyword;
use crate::core::{Action, EngineError, EntityId, GameState, Team};
use crate::effects::TargetSelector;
use crate::events::{Event, EventKind};
use crate::rules::Phase;
use crate::stack::{PendingChoice, PendingTargeting};
use crate::zones::{Zone, ZonePosition};

/// Event kinds whose effects are targeted when their card is played.
pub(crate) const PLAY_TARGET_KINDS: &[EventKind] = &[EventKind::Play, EventKind::Summon];

/// Event kinds whose effects are targeted when their spell is placed.
pub(crate) const CAST_TARGET_KINDS: &[EventKind] = &[EventKind::Play, EventKind::Cast];

impl GameState {
    // === Summoning ===

    /// Summon a field card into its owner's camp, or queue it when the
    /// camp is full. Returns whether it reached the camp.
    pub fn summon(&mut self, card: EntityId, camp_index: Option<usize>) -> Result<bool, EngineError> {
        let team = self.get_card(card)?.owner;
        if self.boards[team].camp.len() >= self.config.camp_size {
            debug!("{} camp is full, {} queued", team, card);
            self.unsubscribe_all(card)?;
            self.move_card(card, Zone::Queue, ZonePosition::Top)?;
            return Ok(false);
        }

        let position = camp_index.map_or(ZonePosition::Top, ZonePosition::Index);
        self.move_card(card, Zone::Camp, position)?;
        self.refresh_subscriptions(card)?;
        self.trigger(Event::Summon { team, card })?;
        Ok(true)
    }

    /// Move queued cards into free camp slots, oldest first.
    pub fn drain_queue(&mut self, team: Team) -> Result<(), EngineError> {
        while self.boards[team].camp.len() < self.config.camp_size {
            let Some(&card) = self.boards[team].queue.front() else {
                break;
            };
            self.summon(card, None)?;
        }
        Ok(())
    }

    // === Targeting requests ===

    /// Resolve automatic targeters of a card's effects inline and push
    /// manual ones to the targeting buffer.
    ///
    /// Returns whether any manual request was queued; the phase switches
    /// to targeting in that case.
    pub(crate) fn request_targets(
        &mut self,
        card: EntityId,
        kinds: &[EventKind],
    ) -> Result<bool, EngineError> {
        let (team, effects) = {
            let c = self.get_card(card)?;
            (c.owner, c.effects.clone())
        };

        let mut manual = false;
        for id in effects {
            let effect = self.effects.get(id).ok_or(EngineError::UnknownEffect(id))?;
            if !kinds.contains(&effect.kind) {
                continue;
            }
            let Some(spec) = effect.targeter.clone() else {
                continue;
            };

            if spec.is_manual() {
                self.targeting.push(PendingTargeting {
                    effect: id,
                    card,
                    team,
                    spec,
                });
                manual = true;
            } else {
                let targets = self.pick_targets(&spec, team, card);
                if let Some(effect) = self.effects.get_mut(id) {
                    effect.targets = targets.clone();
                }
                if !targets.is_empty() {
                    self.trigger(Event::Target {
                        team,
                        source: card,
                        targets,
                    })?;
                }
            }
        }

        if manual {
            self.enter_targeting();
        }
        Ok(manual)
    }

    /// Whether a card has a mandatory manual targeter with no candidate.
    #[must_use]
    pub fn lacks_required_targets(&self, card: EntityId, kinds: &[EventKind]) -> bool {
        let Some(c) = self.card(card) else {
            return false;
        };
        c.effects.iter().any(|&id| {
            self.effects.get(id).is_some_and(|effect| {
                kinds.contains(&effect.kind)
                    && effect.targeter.as_ref().is_some_and(|spec| {
                        spec.is_manual()
                            && !spec.optional
                            && spec.min_count(1) > 0
                            && TargetSelector::new(spec, c.owner)
                                .with_source(card)
                                .valid_targets(self)
                                .is_empty()
                    })
            })
        })
    }

    /// Clear chosen targets on every effect of a card.
    pub(crate) fn reset_targets(&mut self, card: EntityId) -> Result<(), EngineError> {
        let effects = self.get_card(card)?.effects.clone();
        for id in effects {
            if let Some(effect) = self.effects.get_mut(id) {
                effect.targets.clear();
            }
        }
        self.targeting.remove_card(card);
        Ok(())
    }

    /// Offer the team a choice between card codes; the chosen card is
    /// created in its hand.
    pub fn offer_choice(&mut self, team: Team, source: EntityId, options: Vec<String>) {
        if options.is_empty() {
            return;
        }
        self.choices.push(PendingChoice {
            team,
            source,
            options,
        });
        self.enter_targeting();
    }

    pub(crate) fn enter_targeting(&mut self) {
        if self.phase != Phase::Targeting {
            self.phase_before = self.phase;
            self.phase = Phase::Targeting;
        }
    }

    /// Leave targeting once nothing awaits input anymore.
    pub(crate) fn leave_targeting(&mut self) {
        if self.phase == Phase::Targeting && self.targeting.is_empty() && self.choices.is_empty() {
            self.phase = self.phase_before;
        }
    }

    /// Switch to `phase`, or make targeting return to it when input is
    /// still awaited.
    pub(crate) fn settle_phase(&mut self, phase: Phase) {
        if self.phase == Phase::Targeting {
            self.phase_before = phase;
        } else {
            self.phase = phase;
        }
    }

    // === Finishing plays ===

    /// Summon the card in the play buffer and fire its play events.
    pub(crate) fn finish_field_play(&mut self) -> Result<(), EngineError> {
        let buffer = self
            .play_buffer
            .take()
            .ok_or(EngineError::MissingPending("play buffer"))?;
        let card = buffer.card;
        let team = buffer.team;
        let cost = self.get_card(card)?.cost();
        self.spend_mana(team, cost, false)?;

        let mut camp_index = buffer.camp_index;
        if buffer.replace {
            if let Some(&occupant) = self.boards[team].camp.get(buffer.camp_index) {
                self.obliterate(occupant)?;
            }
        }
        camp_index = camp_index.min(self.boards[team].camp.len());

        info!("{} plays {} ({})", team, card, self.get_card(card)?.name());
        self.summon(card, Some(camp_index))?;
        self.trigger(Event::Play { team, card })?;
        self.mark_played(team, card)?;
        Ok(())
    }

    /// Cast a spell from the stack: pay the reservation, drop stale
    /// targets, fire PLAY and CAST, then move it to the spellyard.
    pub fn cast_spell(&mut self, spell: EntityId) -> Result<(), EngineError> {
        let (team, is_skill, effects) = {
            let card = self.get_card(spell)?;
            if card.zone != Zone::SpellStack {
                return Err(EngineError::ZoneMismatch {
                    card: spell,
                    expected: Zone::SpellStack,
                    found: card.zone,
                });
            }
            (card.owner, card.definition.is_skill(), card.effects.clone())
        };

        let reserved = self.reservations.remove(&spell).unwrap_or(0);
        if !is_skill {
            self.spend_mana(team, reserved, true)?;
        }
        self.spell_buffer.retain(|&c| c != spell);
        self.targeting.remove_card(spell);

        for id in effects {
            let stale: Vec<EntityId> = self
                .effects
                .get(id)
                .map(|e| e.targets.iter().copied().filter(|&t| !self.is_targetable(t)).collect())
                .unwrap_or_default();
            if let Some(effect) = self.effects.get_mut(id) {
                effect.targets.retain(|t| !stale.contains(t));
            }
        }

        info!("{} casts {} ({})", team, spell, self.get_card(spell)?.name());
        self.trigger(Event::Play { team, card: spell })?;
        self.trigger(Event::Cast { team, spell })?;
        if !is_skill {
            self.mark_played(team, spell)?;
        }

        if self.get_card(spell)?.zone == Zone::SpellStack {
            self.move_card(spell, Zone::Spellyard, ZonePosition::Top)?;
        }
        self.unsubscribe_all(spell)?;
        Ok(())
    }

    /// Cast every spell on the stack, newest first.
    pub fn resolve_stack(&mut self) -> Result<(), EngineError> {
        while let Some(top) = self.spell_stack.top() {
            if self.status.is_over() {
                break;
            }
            self.cast_spell(top)?;
        }
        self.spell_buffer.clear();
        Ok(())
    }

    /// Put a skill on top of the stack; it is cast with the stack.
    pub fn push_skill(&mut self, code: &str, team: Team, source: EntityId) -> Result<EntityId, EngineError> {
        let skill = self.create_card(code, team, Some(source))?;
        self.move_card(skill, Zone::SpellStack, ZonePosition::Top)?;
        self.refresh_subscriptions(skill)?;
        self.request_targets(skill, CAST_TARGET_KINDS)?;
        Ok(skill)
    }

    /// Bookkeeping for a played card: daybreak or nightfall.
    fn mark_played(&mut self, team: Team, card: EntityId) -> Result<(), EngineError> {
        let flags = self.players[team].flags;
        {
            let player = &mut self.players[team];
            player.flags.played = true;
            player.flags.daybreak = false;
            player.flags.nightfall = true;
            player.played_this_round.push(card);
        }
        if flags.daybreak {
            self.trigger(Event::Daybreak { team, card })?;
        } else if flags.nightfall {
            self.trigger(Event::Nightfall { team, card })?;
        }
        Ok(())
    }

    /// Whether a follow-up with this label is already queued.
    pub(crate) fn follow_up_queued(&self, action: &Action) -> bool {
        self.action_buffer.iter().any(|a| a.label() == action.label())
    }

    /// Whether a spell resolves on its own without waiting for a response.
    #[must_use]
    pub fn resolves_immediately(&self, spell: EntityId) -> bool {
        self.card(spell).is_some_and(|c| {
            c.is_spell() && (c.has(Keyword::Burst) || c.has(Keyword::Focus))
        })
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use crate::cards::{CardDefinition, CardRegistry};
    use crate::core::{Config, GameState, Team};
    use crate::events::EventKind;
    use crate::zones::Zone;

    fn state(camp_size: usize) -> GameState {
        let catalogue = CardRegistry::new().with(CardDefinition::unit("U", "Grunt", 1, 1, 1));
        GameState::new(Config::default().with_camp_size(camp_size), Rc::new(catalogue), 2)
    }

    #[test]
    fn test_summon_queues_when_full() {
        let mut state = state(1);
        let first = state.create_card_in("U", Team::Blue, None, Zone::Camp).unwrap();
        let second = state.create_card_in("U", Team::Blue, None, Zone::Camp).unwrap();

        assert_eq!(state.card(second).unwrap().zone, Zone::Queue);
        assert!(state.verify_zones().is_ok());

        state.kill(first, None).unwrap();
        assert_eq!(state.card(second).unwrap().zone, Zone::Camp);
        assert!(state.boards[Team::Blue].queue.is_empty());
    }

    #[test]
    fn test_summon_fires_event() {
        let mut state = state(6);
        let unit = state.create_card_in("U", Team::Red, None, Zone::Camp).unwrap();
        let summons: Vec<_> = state
            .events()
            .filter(|e| e.kind() == EventKind::Summon)
            .collect();
        assert_eq!(summons.len(), 1);
        assert!(summons[0].concerns(unit));
    }
}
