//! Action execution.
//!
//! Every handler assumes its action passed validation. A handler returns
//! whether initiative passes to the opponent.

use tracing::{debug, info};

use crate::core::{Action, EngineError, EntityId, GameState, Movement, PlayBuffer, Team};
use crate::events::Event;
use crate::logic::play::{CAST_TARGET_KINDS, PLAY_TARGET_KINDS};
use crate::rules::Phase;
use crate::zones::{Zone, ZonePosition};

impl GameState {
    /// Validate and execute a controller action.
    ///
    /// A rejected action leaves the state untouched and comes back as
    /// [`EngineError::Rejected`].
    pub fn apply(&mut self, action: &Action) -> Result<bool, EngineError> {
        self.validate(action)?;
        self.execute(action)
    }

    /// Execute an engine-issued follow-up action.
    pub fn apply_follow_up(&mut self, action: &Action) -> Result<bool, EngineError> {
        self.check_action(action)?;
        self.execute(action)
    }

    /// Run the transition for an already validated action.
    pub(crate) fn execute(&mut self, action: &Action) -> Result<bool, EngineError> {
        debug!("{} executes {:?}", action.team(), action.label());
        self.record_action(action);
        if !matches!(action, Action::Accept { .. }) {
            self.clear_passes();
        }

        let team = action.team();
        let pass = match action {
            Action::Accept { team } => self.accept(*team)?,
            Action::Cancel { team } => {
                self.cancel(*team)?;
                false
            }
            Action::Choice { index, .. } => {
                self.choose(*index)?;
                false
            }
            Action::DragEnemy {
                team,
                lane,
                camp_index,
            } => {
                self.drag_enemy(*team, *lane, *camp_index)?;
                false
            }
            Action::Mulligan { team, replace } => {
                self.mulligan(*team, replace)?;
                false
            }
            Action::PlaceSpell {
                team,
                index,
                to_stack,
            } => {
                if *to_stack {
                    self.place_spell(*team, *index)?;
                } else {
                    self.unplace_spell(*index)?;
                }
                false
            }
            Action::PlaceUnit {
                team,
                indices,
                lanes,
                to_battlefield,
            } => {
                if !*to_battlefield {
                    self.withdraw_units(*team, indices)?;
                } else if self.in_combat() {
                    self.place_blockers(*team, indices, lanes)?;
                } else {
                    self.place_attackers(*team, indices)?;
                }
                false
            }
            Action::PlayRequest { team, hand_index } => {
                self.request_play(*team, *hand_index)?;
                false
            }
            Action::PlayFieldCardFinish { .. } => {
                self.finish_field_play()?;
                false
            }
            Action::PlaySpellFinish { burst, .. } => self.finish_spells(*burst)?,
            Action::Targeting { team, targets } => {
                self.assign_targets(*team, targets)?;
                false
            }
            Action::Replace { camp_index, .. } => {
                self.choose_replacement(*camp_index)?;
                false
            }
        };

        if pass && self.status.is_ongoing() {
            self.initiative = team.opponent();
        }
        Ok(pass)
    }

    fn clear_passes(&mut self) {
        for team in Team::ALL {
            self.players[team].flags.passed = false;
        }
    }

    // === Accept ===

    /// Declare moved units, commit placed spells, resolve the stack, or
    /// pass. The round ends when both teams pass in a row.
    fn accept(&mut self, team: Team) -> Result<bool, EngineError> {
        if !self.movement.is_empty() {
            self.clear_passes();
            if self.in_combat() {
                self.declare_blocks(team)?;
            } else {
                self.declare_attack(team)?;
            }
            return Ok(true);
        }

        if !self.spell_buffer.is_empty() {
            self.clear_passes();
            debug!("{} commits {} spells", team, self.spell_buffer.len());
            self.spell_buffer.clear();
            return Ok(true);
        }

        if !self.spell_stack.is_empty() || self.in_combat() {
            self.clear_passes();
            self.resolve()?;
            return Ok(false);
        }

        self.players[team].flags.passed = true;
        if !self.players[team.opponent()].flags.passed {
            debug!("{} passes", team);
            return Ok(true);
        }

        self.end_round()?;
        if self.status.is_ongoing() {
            self.start_round()?;
        }
        Ok(false)
    }

    // === Field cards ===

    /// Lift a field card out of hand into the play buffer.
    fn request_play(&mut self, team: Team, hand_index: usize) -> Result<(), EngineError> {
        let card = *self.boards[team]
            .hand
            .get(hand_index)
            .ok_or(EngineError::MissingPending("hand card"))?;
        self.move_card(card, Zone::Pending, ZonePosition::Top)?;
        self.refresh_subscriptions(card)?;

        let camp_len = self.boards[team].camp.len();
        self.play_buffer = Some(PlayBuffer {
            card,
            team,
            hand_index,
            camp_index: camp_len,
            replace: false,
        });

        if camp_len >= self.config.camp_size {
            debug!("{} camp is full, {} awaits a replacement", team, card);
            self.phase_before = self.phase;
            self.phase = Phase::Replacing;
            return Ok(());
        }
        self.queue_field_finish(team, card)
    }

    /// Pick the camp unit the pending card replaces.
    fn choose_replacement(&mut self, camp_index: usize) -> Result<(), EngineError> {
        let buffer = self
            .play_buffer
            .as_mut()
            .ok_or(EngineError::MissingPending("play buffer"))?;
        buffer.camp_index = camp_index;
        buffer.replace = true;
        let (team, card) = (buffer.team, buffer.card);
        if self.phase == Phase::Replacing {
            self.phase = self.phase_before;
        }
        self.queue_field_finish(team, card)
    }

    fn queue_field_finish(&mut self, team: Team, card: EntityId) -> Result<(), EngineError> {
        self.action_buffer
            .push_back(Action::PlayFieldCardFinish { team });
        self.request_targets(card, PLAY_TARGET_KINDS)?;
        Ok(())
    }

    // === Spells ===

    /// Put a spell from hand on the stack and reserve its cost.
    fn place_spell(&mut self, team: Team, index: usize) -> Result<(), EngineError> {
        let spell = *self.boards[team]
            .hand
            .get(index)
            .ok_or(EngineError::MissingPending("hand spell"))?;
        let cost = self.get_card(spell)?.cost();
        self.move_card(spell, Zone::SpellStack, ZonePosition::Top)?;
        self.refresh_subscriptions(spell)?;
        self.spell_buffer.push(spell);
        self.reservations.insert(spell, cost);
        debug!("{} places {} reserving {}", team, spell, cost);

        let manual = self.request_targets(spell, CAST_TARGET_KINDS)?;
        if !manual && self.resolves_immediately(spell) {
            self.action_buffer
                .push_back(Action::PlaySpellFinish { team, burst: true });
        }
        Ok(())
    }

    /// Take a placed spell back to hand and release its reservation.
    fn unplace_spell(&mut self, index: usize) -> Result<(), EngineError> {
        if index >= self.spell_buffer.len() {
            return Err(EngineError::MissingPending("placed spell"));
        }
        let spell = self.spell_buffer.remove(index);
        self.reset_targets(spell)?;
        self.reservations.remove(&spell);
        self.move_card(spell, Zone::Hand, ZonePosition::Top)?;
        self.refresh_subscriptions(spell)?;
        Ok(())
    }

    /// Cast the newest spell alone, or the whole stack.
    fn finish_spells(&mut self, burst: bool) -> Result<bool, EngineError> {
        if !burst {
            self.resolve()?;
            return Ok(true);
        }
        if let Some(top) = self.spell_stack.top() {
            self.cast_spell(top)?;
        }
        Ok(false)
    }

    // === Units ===

    fn place_attackers(&mut self, team: Team, indices: &[usize]) -> Result<(), EngineError> {
        let mut sorted = indices.to_vec();
        sorted.sort_unstable();
        let units: Vec<(usize, EntityId)> = sorted
            .iter()
            .filter_map(|&i| self.boards[team].camp.get(i).map(|&u| (i, u)))
            .collect();

        for (from_camp, unit) in units {
            self.movement.push(Movement {
                unit,
                team,
                from_camp,
            });
            self.move_card(unit, Zone::Battlefield, ZonePosition::Top)?;
        }
        Ok(())
    }

    fn place_blockers(&mut self, team: Team, indices: &[usize], lanes: &[usize]) -> Result<(), EngineError> {
        let units: Vec<(usize, EntityId, usize)> = indices
            .iter()
            .zip(lanes)
            .filter_map(|(&i, &lane)| self.boards[team].camp.get(i).map(|&u| (i, u, lane)))
            .collect();

        for (from_camp, unit, lane) in units {
            self.movement.push(Movement {
                unit,
                team,
                from_camp,
            });
            self.move_card(unit, Zone::Battlefield, ZonePosition::Index(lane))?;
        }
        Ok(())
    }

    /// Pull an enemy camp unit into a lane facing a challenger.
    fn drag_enemy(&mut self, team: Team, lane: usize, camp_index: usize) -> Result<(), EngineError> {
        let enemy = team.opponent();
        let unit = *self.boards[enemy]
            .camp
            .get(camp_index)
            .ok_or(EngineError::MissingPending("challenged unit"))?;
        self.movement.push(Movement {
            unit,
            team: enemy,
            from_camp: camp_index,
        });
        self.move_card(unit, Zone::Battlefield, ZonePosition::Index(lane))?;
        debug!("{} drags {} into lane {}", team, unit, lane);
        Ok(())
    }

    /// Send moved units in the given lanes back to camp, together with
    /// enemies they dragged.
    fn withdraw_units(&mut self, team: Team, lanes: &[usize]) -> Result<(), EngineError> {
        let mut entries = Vec::new();
        for &lane in lanes {
            for side in [team, team.opponent()] {
                let moved = self.boards[side]
                    .lane(lane)
                    .and_then(|unit| self.movement.iter().find(|m| m.unit == unit).copied());
                entries.extend(moved);
            }
        }
        self.return_to_camp(entries)
    }

    fn return_to_camp(&mut self, mut entries: Vec<Movement>) -> Result<(), EngineError> {
        entries.sort_by_key(|m| m.from_camp);
        for entry in &entries {
            self.movement.retain(|m| m.unit != entry.unit);
            let at = entry.from_camp.min(self.boards[entry.team].camp.len());
            self.move_card(entry.unit, Zone::Camp, ZonePosition::Index(at))?;
        }
        for team in Team::ALL {
            if self.combat.is_none() {
                self.boards[team].trim_battlefield();
            }
        }
        Ok(())
    }

    // === Input answers ===

    fn assign_targets(&mut self, team: Team, targets: &[EntityId]) -> Result<(), EngineError> {
        let request = self
            .targeting
            .pop()
            .ok_or(EngineError::MissingPending("targeting request"))?;
        if let Some(effect) = self.effects.get_mut(request.effect) {
            effect.targets = targets.iter().copied().collect();
        }
        if !targets.is_empty() {
            self.trigger(Event::Target {
                team,
                source: request.card,
                targets: targets.iter().copied().collect(),
            })?;
        }

        let card = request.card;
        if !self.targeting.has_card(card) {
            let finish_spell = Action::PlaySpellFinish { team, burst: true };
            let finish_play = Action::PlayFieldCardFinish { team };
            if self.spell_stack.contains(card) && self.resolves_immediately(card) {
                self.action_buffer.push_back(finish_spell);
            } else if self.play_buffer.is_some_and(|p| p.card == card)
                && !self.follow_up_queued(&finish_play)
            {
                self.action_buffer.push_back(finish_play);
            }
        }
        self.leave_targeting();
        Ok(())
    }

    fn choose(&mut self, index: usize) -> Result<(), EngineError> {
        let choice = self
            .choices
            .pop()
            .ok_or(EngineError::MissingPending("choice"))?;
        let code = choice
            .options
            .get(index)
            .ok_or(EngineError::MissingPending("choice option"))?;
        let card = self.create_card_in(code, choice.team, Some(choice.source), Zone::Hand)?;
        debug!("{} chose {} ({})", choice.team, card, code);
        self.leave_targeting();
        Ok(())
    }

    // === Cancel ===

    /// Undo the newest uncommitted thing: a choice, the pending field
    /// card, placed spells, moved units, or a lone targeting request.
    fn cancel(&mut self, team: Team) -> Result<(), EngineError> {
        if self.play_buffer.is_some() && !self.spell_buffer.is_empty() {
            return Err(EngineError::BothPlayBuffersPopulated);
        }

        if self.choices.pop().is_some() {
            debug!("{} declines a choice", team);
        } else if let Some(buffer) = self.play_buffer.take() {
            self.reset_targets(buffer.card)?;
            let at = buffer.hand_index.min(self.boards[buffer.team].hand.len());
            self.move_card(buffer.card, Zone::Hand, ZonePosition::Index(at))?;
            self.refresh_subscriptions(buffer.card)?;
            self.action_buffer
                .retain(|a| !matches!(a, Action::PlayFieldCardFinish { .. }));
            if self.phase == Phase::Replacing {
                self.phase = self.phase_before;
            }
            info!("{} cancels playing {}", team, buffer.card);
        } else if !self.spell_buffer.is_empty() {
            while let Some(last) = self.spell_buffer.len().checked_sub(1) {
                self.unplace_spell(last)?;
            }
            self.action_buffer
                .retain(|a| !matches!(a, Action::PlaySpellFinish { .. }));
        } else if !self.movement.is_empty() {
            let entries = std::mem::take(&mut self.movement);
            self.return_to_camp(entries)?;
        } else if let Some(request) = self.targeting.pop() {
            debug!("{} skips targeting for {}", team, request.card);
        }

        self.leave_targeting();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use crate::cards::{CardDefinition, CardRegistry, Keyword};
    use crate::core::{Action, Config, EngineError, GameState, InvalidAction, Team, TeamMap};
    use crate::effects::{EffectTemplate, TargetSpec};
    use crate::events::EventKind;
    use crate::rules::Phase;
    use crate::zones::Zone;

    fn state() -> GameState {
        let catalogue = CardRegistry::new()
            .with(CardDefinition::unit("U", "Grunt", 1, 2, 2))
            .with(CardDefinition::spell("F", "Quick Jab", 1, Keyword::Fast).with_effect(
                EffectTemplate::on_cast(|state, _, ctx| {
                    for &target in &ctx.targets {
                        state.damage_unit(target, 1, Some(ctx.owner))?;
                    }
                    Ok(())
                })
                .with_targeter(TargetSpec::unit()),
            ))
            .with(CardDefinition::spell("B", "Blink", 0, Keyword::Burst).with_effect(
                EffectTemplate::on_cast(|state, _, ctx| {
                    state.heal_nexus(ctx.team, 1);
                    Ok(())
                }),
            ));
        let mut state = GameState::new(Config::default(), Rc::new(catalogue), 4);
        state.phase = Phase::Idle;
        state.mulligan_done = TeamMap::with_value(true);
        state.round = 1;
        for team in Team::ALL {
            state.players[team].mana.common = 5;
        }
        state
    }

    /// Run queued follow-ups the way the game driver does.
    fn drain(state: &mut GameState) {
        while !state.phase.awaits_input() {
            let Some(action) = state.action_buffer.pop_front() else {
                break;
            };
            state.apply_follow_up(&action).unwrap();
        }
    }

    #[test]
    fn test_play_unit_spends_mana() {
        let mut state = state();
        let unit = state.create_card_in("U", Team::Blue, None, Zone::Hand).unwrap();

        let pass = state
            .apply(&Action::PlayRequest {
                team: Team::Blue,
                hand_index: 0,
            })
            .unwrap();
        assert!(!pass);
        assert_eq!(state.card(unit).unwrap().zone, Zone::Pending);
        drain(&mut state);

        assert_eq!(state.card(unit).unwrap().zone, Zone::Camp);
        assert_eq!(state.players[Team::Blue].mana.common, 4);
        assert!(state.play_buffer.is_none());
        assert_eq!(state.initiative, Team::Blue);
    }

    #[test]
    fn test_cancel_play_restores_hand() {
        let mut state = state();
        state.create_card_in("U", Team::Blue, None, Zone::Hand).unwrap();
        let second = state.create_card_in("U", Team::Blue, None, Zone::Hand).unwrap();
        let before = state.boards[Team::Blue].hand.clone();

        state
            .apply(&Action::PlayRequest {
                team: Team::Blue,
                hand_index: 0,
            })
            .unwrap();
        state.apply(&Action::Cancel { team: Team::Blue }).unwrap();

        assert_eq!(state.boards[Team::Blue].hand, before);
        assert_eq!(state.boards[Team::Blue].hand[1], second);
        assert!(state.action_buffer.is_empty());
        assert_eq!(state.players[Team::Blue].mana.common, 5);
    }

    #[test]
    fn test_fast_spell_waits_for_response() {
        let mut state = state();
        let target = state.create_card_in("U", Team::Red, None, Zone::Camp).unwrap();
        let jab = state.create_card_in("F", Team::Blue, None, Zone::Hand).unwrap();

        state
            .apply(&Action::PlaceSpell {
                team: Team::Blue,
                index: 0,
                to_stack: true,
            })
            .unwrap();
        assert_eq!(state.phase, Phase::Targeting);
        state
            .apply(&Action::targets(Team::Blue, &[target]))
            .unwrap();
        assert_eq!(state.phase, Phase::Idle);
        assert_eq!(state.available_mana(Team::Blue, true), 4);

        assert!(state.apply(&Action::Accept { team: Team::Blue }).unwrap());
        assert_eq!(state.initiative, Team::Red);
        assert_eq!(state.card(jab).unwrap().zone, Zone::SpellStack);

        assert!(!state.apply(&Action::Accept { team: Team::Red }).unwrap());
        assert_eq!(state.card(jab).unwrap().zone, Zone::Spellyard);
        assert_eq!(state.card(target).unwrap().health(), 1);
        assert_eq!(state.players[Team::Blue].mana.common, 4);
    }

    #[test]
    fn test_burst_resolves_without_passing() {
        let mut state = state();
        state.players[Team::Blue].nexus.health = 10;
        state.create_card_in("B", Team::Blue, None, Zone::Hand).unwrap();

        state
            .apply(&Action::PlaceSpell {
                team: Team::Blue,
                index: 0,
                to_stack: true,
            })
            .unwrap();
        drain(&mut state);

        assert!(state.spell_stack.is_empty());
        assert_eq!(state.players[Team::Blue].nexus.health, 11);
        assert_eq!(state.initiative, Team::Blue);
    }

    #[test]
    fn test_double_pass_ends_round() {
        let mut state = state();
        for team in Team::ALL {
            state.create_card_in("U", team, None, Zone::Deck).unwrap();
        }

        assert!(state.apply(&Action::Accept { team: Team::Blue }).unwrap());
        assert!(!state.apply(&Action::Accept { team: Team::Red }).unwrap());

        assert_eq!(state.round, 2);
        let kinds: Vec<EventKind> = state.events().map(|e| e.kind()).collect();
        assert!(kinds.contains(&EventKind::RoundEnd));
        assert!(kinds.contains(&EventKind::RoundStart));
    }

    #[test]
    fn test_full_camp_asks_for_replacement() {
        let mut state = state();
        let mut camp = Vec::new();
        for _ in 0..state.config.camp_size {
            camp.push(state.create_card_in("U", Team::Blue, None, Zone::Camp).unwrap());
        }
        let fresh = state.create_card_in("U", Team::Blue, None, Zone::Hand).unwrap();

        state
            .apply(&Action::PlayRequest {
                team: Team::Blue,
                hand_index: 0,
            })
            .unwrap();
        assert_eq!(state.phase, Phase::Replacing);

        state
            .apply(&Action::Replace {
                team: Team::Blue,
                camp_index: 2,
            })
            .unwrap();
        drain(&mut state);

        assert_eq!(state.card(camp[2]).unwrap().zone, Zone::Tossed);
        assert_eq!(state.boards[Team::Blue].camp[2], fresh);
        assert_eq!(state.phase, Phase::Idle);
    }

    #[test]
    fn test_rejected_action_changes_nothing() {
        let mut state = state();
        let history = state.history.len();
        let err = state.apply(&Action::PlayRequest {
            team: Team::Blue,
            hand_index: 3,
        });
        assert!(matches!(
            err,
            Err(EngineError::Rejected(InvalidAction::IndexOutOfRange { .. }))
        ));
        assert_eq!(state.history.len(), history);
    }
}
