//! Attack and block declaration, lane resolution and retreat.
//!
//! Lanes resolve left to right. The lane count is re-read on every
//! iteration because strike and death effects may move units around.

use smallvec::SmallVec;
use tracing::{debug, info};

use crate::cards::Keyword;
use crate::core::{Combat, EngineError, EntityId, GameState, Team};
use crate::events::Event;
use crate::rules::Phase;
use crate::zones::{Zone, ZonePosition};

impl GameState {
    // === Declarations ===

    /// Turn the movement buffer into a declared attack.
    pub(crate) fn declare_attack(&mut self, team: Team) -> Result<(), EngineError> {
        let scouting = {
            let own: Vec<EntityId> = self
                .movement
                .iter()
                .filter(|m| m.team == team)
                .map(|m| m.unit)
                .collect();
            !own.is_empty()
                && own
                    .iter()
                    .all(|&u| self.card(u).is_some_and(|c| c.has(Keyword::Scout)))
        };

        self.players[team].flags.attack_token = false;
        self.movement.clear();
        self.spell_buffer.clear();
        self.combat = Some(Combat {
            attacker: team,
            blocked: false,
            scouting,
        });
        self.settle_phase(Phase::Combat);

        let attackers: SmallVec<[EntityId; 6]> = self.boards[team].battlefield_units().collect();
        let lanes = self.boards[team].battlefield.len();
        self.boards[team.opponent()].pad_battlefield(lanes);
        info!("{} attacks with {} units", team, attackers.len());
        self.trigger(Event::Attack { team, attackers })
    }

    /// Turn the movement buffer into declared blocks.
    pub(crate) fn declare_blocks(&mut self, team: Team) -> Result<(), EngineError> {
        if let Some(combat) = self.combat.as_mut() {
            combat.blocked = true;
        }
        self.movement.clear();
        self.spell_buffer.clear();

        let blockers: SmallVec<[EntityId; 6]> = self.boards[team].battlefield_units().collect();
        debug!("{} blocks with {} units", team, blockers.len());
        self.trigger(Event::Block { team, blockers })
    }

    /// Cast the whole spell stack, then fight out an active combat.
    pub fn resolve(&mut self) -> Result<(), EngineError> {
        self.resolve_stack()?;
        if self.combat.is_some() && self.status.is_ongoing() {
            self.resolve_combat()?;
        }
        Ok(())
    }

    // === Lane resolution ===

    fn resolve_combat(&mut self) -> Result<(), EngineError> {
        let Some(combat) = self.combat else {
            return Ok(());
        };
        let attacking = combat.attacker;
        let defending = attacking.opponent();

        let mut lane = 0;
        while lane < self.boards[attacking].battlefield.len() {
            if self.status.is_over() {
                break;
            }
            if let Some(attacker) = self.boards[attacking].lane(lane) {
                match self.boards[defending].lane(lane) {
                    None => self.strike_nexus(attacker, defending)?,
                    Some(blocker) => self.fight(attacker, blocker)?,
                }
            }
            lane += 1;
        }

        for team in [attacking, defending] {
            self.retreat(team)?;
        }

        if combat.scouting && !self.players[attacking].flags.scout_token {
            let flags = &mut self.players[attacking].flags;
            flags.scout_token = true;
            flags.attack_token = true;
            debug!("{} scouts and may attack again", attacking);
            self.trigger(Event::Scout { team: attacking })?;
        }

        self.combat = None;
        self.settle_phase(Phase::Idle);
        self.initiative = defending;
        for team in Team::ALL {
            self.drain_queue(team)?;
        }
        Ok(())
    }

    /// One contested lane.
    fn fight(&mut self, attacker: EntityId, blocker: EntityId) -> Result<(), EngineError> {
        let card = self.get_card(attacker)?;
        if card.has(Keyword::DoubleAttack) {
            self.strike(attacker, blocker)?;
            if self.both_alive(attacker, blocker) {
                self.exchange(attacker, blocker)?;
            }
        } else if card.has(Keyword::QuickAttack) {
            self.strike(attacker, blocker)?;
            if self.both_alive(attacker, blocker) {
                self.strike(blocker, attacker)?;
            }
        } else {
            self.exchange(attacker, blocker)?;
        }
        Ok(())
    }

    fn both_alive(&self, a: EntityId, b: EntityId) -> bool {
        [a, b]
            .iter()
            .all(|&u| self.card(u).is_some_and(|c| c.is_alive() && c.zone == Zone::Battlefield))
    }

    /// An unblocked attacker hits the enemy nexus.
    fn strike_nexus(&mut self, attacker: EntityId, defending: Team) -> Result<(), EngineError> {
        let (team, power) = {
            let card = self.get_card(attacker)?;
            (card.owner, card.power())
        };
        if power <= 0 {
            return Ok(());
        }
        self.trigger(Event::NexusStrike {
            team,
            striker: attacker,
            amount: power,
        })?;
        self.damage_nexus(defending, power, attacker)?;
        if self.get_card(attacker)?.has(Keyword::Lifesteal) {
            self.heal_nexus(team, power);
        }
        Ok(())
    }

    /// One-sided strike of `striker` against `target`.
    fn strike(&mut self, striker: EntityId, target: EntityId) -> Result<(), EngineError> {
        let power = self.get_card(striker)?.power();
        if power <= 0 {
            return Ok(());
        }
        let health_before = self.get_card(target)?.health();
        self.trigger(Event::Strike {
            striker,
            target,
            amount: power,
        })?;
        if !self.both_alive(striker, target) {
            return Ok(());
        }

        let dealt = self.mitigate(target, power)?;
        self.apply_damage(target, dealt)?;
        if dealt > 0 {
            self.trigger(Event::UnitDamage {
                unit: target,
                source: Some(striker),
                amount: dealt,
            })?;
        }
        self.after_strike(striker, target, power, health_before, dealt)?;
        self.check_death(target, Some(striker))?;
        Ok(())
    }

    /// Simultaneous strike: both amounts are known before either applies.
    fn exchange(&mut self, a: EntityId, b: EntityId) -> Result<(), EngineError> {
        let power_a = self.get_card(a)?.power();
        let power_b = self.get_card(b)?.power();
        let health_a = self.get_card(a)?.health();
        let health_b = self.get_card(b)?.health();

        let to_b = self.mitigate(b, power_a)?;
        let to_a = self.mitigate(a, power_b)?;

        if power_a > 0 {
            self.trigger(Event::Strike {
                striker: a,
                target: b,
                amount: power_a,
            })?;
        }
        if power_b > 0 {
            self.trigger(Event::Strike {
                striker: b,
                target: a,
                amount: power_b,
            })?;
        }
        if !self.both_alive(a, b) {
            return Ok(());
        }

        self.apply_damage(b, to_b)?;
        self.apply_damage(a, to_a)?;

        for (unit, source, amount) in [(b, a, to_b), (a, b, to_a)] {
            if amount > 0 {
                self.trigger(Event::UnitDamage {
                    unit,
                    source: Some(source),
                    amount,
                })?;
            }
        }
        if power_a > 0 {
            self.after_strike(a, b, power_a, health_b, to_b)?;
        }
        if power_b > 0 {
            self.after_strike(b, a, power_b, health_a, to_a)?;
        }

        self.check_death(b, Some(a))?;
        self.check_death(a, Some(b))?;
        Ok(())
    }

    /// Overwhelm spill-over and lifesteal for one strike.
    fn after_strike(
        &mut self,
        striker: EntityId,
        target: EntityId,
        power: i32,
        health_before: i32,
        dealt: i32,
    ) -> Result<(), EngineError> {
        let (team, overwhelm, lifesteal) = {
            let card = self.get_card(striker)?;
            (
                card.owner,
                card.has(Keyword::Overwhelm),
                card.has(Keyword::Lifesteal),
            )
        };

        let mut excess = 0;
        if overwhelm && self.attacker() == Some(team) {
            excess = (power - health_before).max(0);
            if excess > 0 {
                let defending = self.get_card(target)?.owner;
                debug!("{} overwhelms for {}", striker, excess);
                self.damage_nexus(defending, excess, striker)?;
            }
        }
        if lifesteal {
            self.heal_nexus(team, dealt + excess);
        }
        Ok(())
    }

    /// Move surviving battlefield units back to camp, left to right.
    ///
    /// Units that no longer fit are obliterated.
    fn retreat(&mut self, team: Team) -> Result<(), EngineError> {
        let survivors: Vec<EntityId> = self.boards[team].battlefield_units().collect();
        for unit in survivors {
            if self.boards[team].camp.len() < self.config.camp_size {
                self.move_card(unit, Zone::Camp, ZonePosition::Top)?;
            } else {
                debug!("{} has no camp slot to retreat to", unit);
                self.obliterate(unit)?;
            }
        }
        self.boards[team].battlefield.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use crate::cards::{CardDefinition, CardRegistry, Keyword};
    use crate::core::{Combat, Config, EntityId, GameState, Team};
    use crate::effects::EffectTemplate;
    use crate::events::{Event, EventKind};
    use crate::grants::GrantKind;
    use crate::rules::Phase;
    use crate::zones::{Zone, ZonePosition};

    fn catalogue() -> Rc<CardRegistry> {
        Rc::new(
            CardRegistry::new()
                .with(CardDefinition::unit("Q", "Duelist", 2, 3, 2).with_keyword(Keyword::QuickAttack))
                .with(CardDefinition::unit("D", "Twin Blade", 3, 2, 3).with_keyword(Keyword::DoubleAttack))
                .with(CardDefinition::unit("S", "Pathfinder", 1, 1, 1).with_keyword(Keyword::Scout))
                .with(CardDefinition::unit("L", "Leech", 2, 2, 5).with_keyword(Keyword::Lifesteal))
                .with(CardDefinition::unit("W", "Wall", 2, 2, 3))
                .with(CardDefinition::unit("F", "Flincher", 2, 2, 3).with_effect(EffectTemplate::new(
                    EventKind::Strike,
                    |state, event, ctx| {
                        if let Event::Strike { target, .. } = event {
                            if *target == ctx.owner {
                                let barrier = GrantKind::Keyword {
                                    keyword: Keyword::Barrier,
                                    add: true,
                                };
                                state.grant(ctx.owner, ctx.owner, barrier, false)?;
                            }
                        }
                        Ok(())
                    },
                ))),
        )
    }

    fn state() -> GameState {
        let mut state = GameState::new(Config::default(), catalogue(), 11);
        state.phase = Phase::Idle;
        state
    }

    fn on_lane(state: &mut GameState, code: &str, team: Team, lane: usize) -> EntityId {
        let unit = state.create_card_in(code, team, None, Zone::Camp).unwrap();
        state
            .move_card(unit, Zone::Battlefield, ZonePosition::Index(lane))
            .unwrap();
        unit
    }

    fn fight(state: &mut GameState, attacker: Team) {
        state.combat = Some(Combat {
            attacker,
            blocked: true,
            scouting: false,
        });
        state.phase = Phase::Combat;
        state.resolve().unwrap();
    }

    #[test]
    fn test_quick_attack_kills_first() {
        let mut state = state();
        let duelist = on_lane(&mut state, "Q", Team::Blue, 0);
        let wall = on_lane(&mut state, "W", Team::Red, 0);
        state.get_card_mut(wall).unwrap().unit.as_mut().unwrap().damage = 1;

        fight(&mut state, Team::Blue);

        assert_eq!(state.card(wall).unwrap().zone, Zone::Graveyard);
        assert_eq!(state.card(duelist).unwrap().health(), 2);
        assert_eq!(state.card(duelist).unwrap().zone, Zone::Camp);
    }

    #[test]
    fn test_double_attack_strikes_twice() {
        let mut state = state();
        let twin = on_lane(&mut state, "D", Team::Blue, 0);
        let wall = on_lane(&mut state, "W", Team::Red, 0);

        fight(&mut state, Team::Blue);

        assert_eq!(state.card(wall).unwrap().zone, Zone::Graveyard);
        assert_eq!(state.card(twin).unwrap().health(), 1);
    }

    #[test]
    fn test_unblocked_hits_nexus_with_lifesteal() {
        let mut state = state();
        state.players[Team::Blue].nexus.health = 15;
        on_lane(&mut state, "L", Team::Blue, 0);

        fight(&mut state, Team::Blue);

        assert_eq!(state.players[Team::Red].nexus.health, 18);
        assert_eq!(state.players[Team::Blue].nexus.health, 17);
        assert!(state.players[Team::Blue].flags.plunder);
    }

    #[test]
    fn test_combat_hands_initiative_to_defender() {
        let mut state = state();
        on_lane(&mut state, "W", Team::Red, 0);
        state.initiative = Team::Red;

        fight(&mut state, Team::Red);

        assert_eq!(state.phase, Phase::Idle);
        assert_eq!(state.initiative, Team::Blue);
        assert!(state.combat.is_none());
        assert!(state.boards[Team::Red].battlefield.is_empty());
    }

    #[test]
    fn test_all_scout_attack_refunds_token_once() {
        let mut state = state();
        on_lane(&mut state, "S", Team::Blue, 0);
        state.combat = Some(Combat {
            attacker: Team::Blue,
            blocked: false,
            scouting: true,
        });
        state.resolve().unwrap();

        let flags = state.players[Team::Blue].flags;
        assert!(flags.attack_token);
        assert!(flags.scout_token);
    }

    #[test]
    fn test_retreat_overflow_obliterates() {
        let mut state = GameState::new(Config::default().with_camp_size(1), catalogue(), 3);
        let first = on_lane(&mut state, "W", Team::Blue, 0);
        let second = on_lane(&mut state, "W", Team::Blue, 1);
        state.create_card_in("W", Team::Blue, None, Zone::Camp).unwrap();

        fight(&mut state, Team::Blue);

        assert_eq!(state.boards[Team::Blue].camp.len(), 1);
        assert_eq!(state.card(first).unwrap().zone, Zone::Tossed);
        assert_eq!(state.card(second).unwrap().zone, Zone::Tossed);
        assert!(state.verify_zones().is_ok());
    }

    #[test]
    fn test_exchange_damage_fixed_before_strike() {
        let mut state = state();
        let wall = on_lane(&mut state, "W", Team::Blue, 0);
        let flincher = on_lane(&mut state, "F", Team::Red, 0);

        fight(&mut state, Team::Blue);

        let flincher = state.card(flincher).unwrap();
        assert_eq!(flincher.health(), 1);
        assert!(flincher.has(Keyword::Barrier));
        assert_eq!(state.card(wall).unwrap().health(), 1);
    }
}
