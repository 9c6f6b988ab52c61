//! Action validation.
//!
//! Validation is side-effect free. Everything an executed action relies on
//! is checked here; anything that still goes wrong during execution is an
//! [`EngineError`](crate::core::EngineError).

use rustc_hash::FxHashSet;

use crate::cards::Keyword;
use crate::core::{Action, EntityId, GameState, InvalidAction, Team};
use crate::effects::TargetSelector;
use crate::logic::play::{CAST_TARGET_KINDS, PLAY_TARGET_KINDS};
use crate::rules::Phase;

/// Minimum power a blocker needs against a fearsome attacker.
const FEARSOME_MIN_POWER: i32 = 3;

impl GameState {
    /// Check an action submitted by a controller.
    pub fn validate(&self, action: &Action) -> Result<(), InvalidAction> {
        if self.status.is_over() {
            return Err(InvalidAction::GameOver);
        }
        let label = action.label();
        if label.is_follow_up() {
            return Err(InvalidAction::FollowUpOnly { label });
        }
        self.check_action(action)
    }

    /// Phase, team and payload checks shared by controller actions and
    /// engine follow-ups.
    pub(crate) fn check_action(&self, action: &Action) -> Result<(), InvalidAction> {
        let label = action.label();
        if !self.phase.accepts(label) {
            return Err(InvalidAction::LabelNotAccepted {
                label,
                phase: self.phase,
            });
        }

        let team = action.team();
        let expected = self.acting_team();
        let wrong_team = if self.phase == Phase::Mulligan {
            self.mulligan_done[team]
        } else {
            team != expected
        };
        if wrong_team {
            return Err(InvalidAction::WrongTeam {
                expected,
                got: team,
            });
        }

        match action {
            Action::Accept { .. } => Ok(()),
            Action::Cancel { .. } => self.check_cancel(),
            Action::Choice { index, .. } => {
                let choice = self.choices.top().ok_or(InvalidAction::NothingPending)?;
                in_range(*index, choice.options.len())
            }
            Action::DragEnemy {
                lane, camp_index, ..
            } => self.check_drag(team, *lane, *camp_index),
            Action::Mulligan { replace, .. } => {
                let expected = self.boards[team].hand.len();
                if replace.len() == expected {
                    Ok(())
                } else {
                    Err(InvalidAction::MulliganLength {
                        expected,
                        got: replace.len(),
                    })
                }
            }
            Action::PlaceSpell {
                index, to_stack, ..
            } => {
                if *to_stack {
                    self.check_place_spell(team, *index)
                } else {
                    in_range(*index, self.spell_buffer.len())
                }
            }
            Action::PlaceUnit {
                indices,
                lanes,
                to_battlefield,
                ..
            } => {
                if !*to_battlefield {
                    self.check_withdraw(team, indices)
                } else if self.in_combat() {
                    self.check_blocks(team, indices, lanes)
                } else {
                    self.check_attack(team, indices)
                }
            }
            Action::PlayRequest { hand_index, .. } => self.check_play_request(team, *hand_index),
            Action::PlayFieldCardFinish { .. } => match self.play_buffer {
                Some(_) => Ok(()),
                None => Err(InvalidAction::NothingPending),
            },
            Action::PlaySpellFinish { .. } => {
                if self.spell_stack.is_empty() {
                    Err(InvalidAction::NothingPending)
                } else {
                    Ok(())
                }
            }
            Action::Targeting { targets, .. } => {
                if !self.choices.is_empty() {
                    return Err(InvalidAction::InvalidTargets {
                        reason: "a choice must be answered first".into(),
                    });
                }
                let pending = self.targeting.top().ok_or(InvalidAction::NothingPending)?;
                TargetSelector::new(&pending.spec, pending.team)
                    .with_source(pending.card)
                    .validate(self, targets)
                    .map_err(|reason| InvalidAction::InvalidTargets { reason })
            }
            Action::Replace { camp_index, .. } => {
                if self.play_buffer.is_none() {
                    return Err(InvalidAction::NothingPending);
                }
                in_range(*camp_index, self.boards[team].camp.len())
            }
        }
    }

    fn check_cancel(&self) -> Result<(), InvalidAction> {
        let nothing = self.buffers_empty() && self.choices.is_empty() && self.targeting.is_empty();
        if nothing {
            Err(InvalidAction::NothingToCancel)
        } else {
            Ok(())
        }
    }

    fn check_play_request(&self, team: Team, hand_index: usize) -> Result<(), InvalidAction> {
        if !self.buffers_empty() {
            return Err(InvalidAction::BufferBusy);
        }
        let hand = &self.boards[team].hand;
        in_range(hand_index, hand.len())?;
        let id = hand[hand_index];
        let card = self.card(id).ok_or(InvalidAction::WrongCardType { card: id })?;
        if !card.is_field_card() {
            return Err(InvalidAction::WrongCardType { card: id });
        }
        let available = self.available_mana(team, false);
        if card.cost() > available {
            return Err(InvalidAction::NotEnoughMana {
                cost: card.cost(),
                available,
            });
        }
        if self.lacks_required_targets(id, PLAY_TARGET_KINDS) {
            return Err(InvalidAction::InvalidTargets {
                reason: format!("{id} has nothing to target"),
            });
        }
        Ok(())
    }

    fn check_place_spell(&self, team: Team, index: usize) -> Result<(), InvalidAction> {
        if self.play_buffer.is_some() {
            return Err(InvalidAction::BufferBusy);
        }
        let hand = &self.boards[team].hand;
        in_range(index, hand.len())?;
        let id = hand[index];
        let card = self.card(id).ok_or(InvalidAction::WrongCardType { card: id })?;

        let allowed = match card.definition.spell_speed() {
            None => return Err(InvalidAction::WrongCardType { card: id }),
            Some(Keyword::Burst | Keyword::Fast) => true,
            // Focus and Slow
            Some(_) => !self.in_combat() && self.spell_stack.is_empty(),
        };
        if !allowed {
            return Err(InvalidAction::WrongSpellSpeed { card: id });
        }

        let available = self.available_mana(team, true);
        if card.cost() > available {
            return Err(InvalidAction::NotEnoughMana {
                cost: card.cost(),
                available,
            });
        }
        if self.lacks_required_targets(id, CAST_TARGET_KINDS) {
            return Err(InvalidAction::InvalidTargets {
                reason: format!("{id} has nothing to target"),
            });
        }
        Ok(())
    }

    fn check_attack(&self, team: Team, indices: &[usize]) -> Result<(), InvalidAction> {
        if !self.players[team].flags.attack_token {
            return Err(InvalidAction::NoAttackToken { team });
        }
        if self.play_buffer.is_some() {
            return Err(InvalidAction::BufferBusy);
        }
        let units = self.camp_units(team, indices)?;
        for &unit in &units {
            if self.card(unit).is_some_and(|c| c.has(Keyword::Immobile)) {
                return Err(InvalidAction::CannotAttack { unit });
            }
        }
        let occupied = self.boards[team].battlefield_units().count();
        if occupied + units.len() > self.config.battlefield_size {
            return Err(InvalidAction::BattlefieldFull);
        }
        Ok(())
    }

    fn check_blocks(&self, team: Team, indices: &[usize], lanes: &[usize]) -> Result<(), InvalidAction> {
        let Some(combat) = self.combat else {
            return Err(InvalidAction::NothingPending);
        };
        if combat.attacker == team {
            return Err(InvalidAction::NoAttackToken { team });
        }
        if combat.blocked {
            return Err(InvalidAction::BlocksAlreadyDeclared);
        }
        if indices.len() != lanes.len() {
            return Err(InvalidAction::IndexOutOfRange {
                index: lanes.len(),
                len: indices.len(),
            });
        }
        distinct(lanes)?;
        let blockers = self.camp_units(team, indices)?;

        for (&unit, &lane) in blockers.iter().zip(lanes) {
            let Some(attacker) = self.boards[combat.attacker].lane(lane) else {
                return Err(InvalidAction::LaneUnavailable { lane });
            };
            if self.boards[team].lane(lane).is_some() {
                return Err(InvalidAction::LaneUnavailable { lane });
            }
            let (Some(blocker), Some(attacker)) = (self.card(unit), self.card(attacker)) else {
                return Err(InvalidAction::LaneUnavailable { lane });
            };
            let refused = blocker.has(Keyword::Immobile)
                || blocker.has(Keyword::CantBlock)
                || attacker.has(Keyword::Elusive) && !blocker.has(Keyword::Elusive)
                || attacker.has(Keyword::Fearsome) && blocker.power() < FEARSOME_MIN_POWER;
            if refused {
                return Err(InvalidAction::CannotBlock { unit, lane });
            }
        }
        Ok(())
    }

    fn check_withdraw(&self, team: Team, lanes: &[usize]) -> Result<(), InvalidAction> {
        if lanes.is_empty() {
            return Err(InvalidAction::NothingToCancel);
        }
        distinct(lanes)?;
        for &lane in lanes {
            let moved = self.boards[team]
                .lane(lane)
                .is_some_and(|unit| self.movement.iter().any(|m| m.unit == unit));
            if !moved {
                return Err(InvalidAction::LaneUnavailable { lane });
            }
        }
        Ok(())
    }

    fn check_drag(&self, team: Team, lane: usize, camp_index: usize) -> Result<(), InvalidAction> {
        let challenger = self.boards[team].lane(lane).filter(|&unit| {
            self.movement.iter().any(|m| m.unit == unit)
                && self.card(unit).is_some_and(|c| c.has(Keyword::Challenger))
        });
        if challenger.is_none() {
            return Err(InvalidAction::NoChallenger { lane });
        }
        let enemy = team.opponent();
        if self.boards[enemy].lane(lane).is_some() {
            return Err(InvalidAction::LaneUnavailable { lane });
        }
        let camp = &self.boards[enemy].camp;
        in_range(camp_index, camp.len())?;
        let unit = camp[camp_index];
        if !self.card(unit).is_some_and(|c| c.is_unit()) {
            return Err(InvalidAction::WrongCardType { card: unit });
        }
        Ok(())
    }

    /// Units at distinct camp indices.
    fn camp_units(&self, team: Team, indices: &[usize]) -> Result<Vec<EntityId>, InvalidAction> {
        if indices.is_empty() {
            return Err(InvalidAction::NothingPending);
        }
        distinct(indices)?;
        let camp = &self.boards[team].camp;
        indices
            .iter()
            .map(|&index| {
                in_range(index, camp.len())?;
                let unit = camp[index];
                if self.card(unit).is_some_and(|c| c.is_unit()) {
                    Ok(unit)
                } else {
                    Err(InvalidAction::WrongCardType { card: unit })
                }
            })
            .collect()
    }
}

fn in_range(index: usize, len: usize) -> Result<(), InvalidAction> {
    if index < len {
        Ok(())
    } else {
        Err(InvalidAction::IndexOutOfRange { index, len })
    }
}

fn distinct(indices: &[usize]) -> Result<(), InvalidAction> {
    let mut seen = FxHashSet::default();
    for &index in indices {
        if !seen.insert(index) {
            return Err(InvalidAction::DuplicateIndex { index });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use crate::cards::{CardDefinition, CardRegistry, Keyword};
    use crate::core::{Action, ActionLabel, Config, GameState, InvalidAction, Team, TeamMap};
    use crate::effects::{EffectTemplate, TargetSpec};
    use crate::rules::{Phase, Status};
    use crate::zones::Zone;

    fn state() -> GameState {
        let catalogue = CardRegistry::new()
            .with(CardDefinition::unit("U", "Grunt", 2, 2, 2))
            .with(CardDefinition::unit("I", "Statue", 1, 0, 4).with_keyword(Keyword::Immobile))
            .with(CardDefinition::unit("E", "Ghost", 2, 2, 1).with_keyword(Keyword::Elusive))
            .with(CardDefinition::spell("S", "Slowpoke", 1, Keyword::Slow))
            .with(
                CardDefinition::spell("T", "Smite", 1, Keyword::Fast).with_effect(
                    EffectTemplate::on_cast(|_, _, _| Ok(())).with_targeter(TargetSpec::unit()),
                ),
            );
        let mut state = GameState::new(Config::default(), Rc::new(catalogue), 8);
        state.phase = Phase::Idle;
        state.mulligan_done = TeamMap::with_value(true);
        for team in Team::ALL {
            state.players[team].mana.common = 3;
        }
        state
    }

    #[test]
    fn test_phase_gating() {
        let state = state();
        let err = state.validate(&Action::Choice {
            team: Team::Blue,
            index: 0,
        });
        assert_eq!(
            err,
            Err(InvalidAction::LabelNotAccepted {
                label: ActionLabel::Choice,
                phase: Phase::Idle
            })
        );
    }

    #[test]
    fn test_wrong_team_and_game_over() {
        let mut state = state();
        let err = state.validate(&Action::Accept { team: Team::Red });
        assert!(matches!(err, Err(InvalidAction::WrongTeam { .. })));

        state.status = Status::Tie;
        assert_eq!(
            state.validate(&Action::Accept { team: Team::Blue }),
            Err(InvalidAction::GameOver)
        );
    }

    #[test]
    fn test_follow_ups_rejected_from_controllers() {
        let state = state();
        let err = state.validate(&Action::PlayFieldCardFinish { team: Team::Blue });
        assert!(matches!(err, Err(InvalidAction::FollowUpOnly { .. })));
    }

    #[test]
    fn test_play_request_checks_mana_and_kind() {
        let mut state = state();
        state.create_card_in("U", Team::Blue, None, Zone::Hand).unwrap();
        state.create_card_in("S", Team::Blue, None, Zone::Hand).unwrap();

        let play = |index| Action::PlayRequest {
            team: Team::Blue,
            hand_index: index,
        };
        assert!(state.validate(&play(0)).is_ok());
        assert!(matches!(
            state.validate(&play(1)),
            Err(InvalidAction::WrongCardType { .. })
        ));
        assert!(matches!(
            state.validate(&play(5)),
            Err(InvalidAction::IndexOutOfRange { index: 5, len: 2 })
        ));

        state.players[Team::Blue].mana.common = 1;
        assert!(matches!(
            state.validate(&play(0)),
            Err(InvalidAction::NotEnoughMana { cost: 2, available: 1 })
        ));
    }

    #[test]
    fn test_spell_without_targets_rejected() {
        let mut state = state();
        state.create_card_in("T", Team::Blue, None, Zone::Hand).unwrap();
        let place = Action::PlaceSpell {
            team: Team::Blue,
            index: 0,
            to_stack: true,
        };
        assert!(matches!(
            state.validate(&place),
            Err(InvalidAction::InvalidTargets { .. })
        ));

        state.create_card_in("U", Team::Red, None, Zone::Camp).unwrap();
        assert!(state.validate(&place).is_ok());
    }

    #[test]
    fn test_attack_needs_token_and_mobility() {
        let mut state = state();
        state.create_card_in("U", Team::Blue, None, Zone::Camp).unwrap();
        state.create_card_in("I", Team::Blue, None, Zone::Camp).unwrap();

        let attack = Action::attack(Team::Blue, &[0]);
        assert_eq!(
            state.validate(&attack),
            Err(InvalidAction::NoAttackToken { team: Team::Blue })
        );

        state.players[Team::Blue].flags.attack_token = true;
        assert!(state.validate(&attack).is_ok());
        assert!(matches!(
            state.validate(&Action::attack(Team::Blue, &[1])),
            Err(InvalidAction::CannotAttack { .. })
        ));
        assert_eq!(
            state.validate(&Action::attack(Team::Blue, &[0, 0])),
            Err(InvalidAction::DuplicateIndex { index: 0 })
        );
    }

    #[test]
    fn test_elusive_needs_elusive_blocker() {
        let mut state = state();
        state.players[Team::Blue].flags.attack_token = true;
        state.create_card_in("E", Team::Blue, None, Zone::Camp).unwrap();
        state.create_card_in("U", Team::Red, None, Zone::Camp).unwrap();
        state.create_card_in("E", Team::Red, None, Zone::Camp).unwrap();

        state.apply(&Action::attack(Team::Blue, &[0])).unwrap();
        state.apply(&Action::Accept { team: Team::Blue }).unwrap();
        assert_eq!(state.initiative, Team::Red);

        assert!(matches!(
            state.validate(&Action::block(Team::Red, &[(0, 0)])),
            Err(InvalidAction::CannotBlock { lane: 0, .. })
        ));
        assert!(state.validate(&Action::block(Team::Red, &[(1, 0)])).is_ok());
        assert!(matches!(
            state.validate(&Action::block(Team::Red, &[(1, 3)])),
            Err(InvalidAction::LaneUnavailable { lane: 3 })
        ));
    }

    #[test]
    fn test_cancel_needs_something() {
        let state = state();
        assert_eq!(
            state.validate(&Action::Cancel { team: Team::Blue }),
            Err(InvalidAction::NothingToCancel)
        );
    }
}
