//! Damage, healing, death and game end.

use tracing::{debug, info};

use crate::cards::Keyword;
use crate::core::{EngineError, EntityId, GameState, Team};
use crate::events::Event;
use crate::rules::{Status, WinReason};
use crate::zones::{Zone, ZonePosition};

impl GameState {
    /// Damage a hit of `amount` deals to `unit` after its keywords.
    ///
    /// Tough removes one point, then a custom damage function may rewrite
    /// the amount. Barrier negates the whole instance and is removed.
    pub fn mitigate(&mut self, unit: EntityId, amount: i32) -> Result<i32, EngineError> {
        let card = self.get_card_mut(unit)?;
        if amount <= 0 {
            return Ok(0);
        }
        if card.keywords.remove(Keyword::Barrier) {
            debug!("{} barrier absorbs {}", unit, amount);
            return Ok(0);
        }
        let mut amount = amount;
        if card.has(Keyword::Tough) {
            amount = (amount - 1).max(0);
        }
        let stats = card.unit.as_ref().ok_or(EngineError::NotAUnit(unit))?;
        if let Some(damage_fn) = &stats.damage_fn {
            amount = damage_fn(amount).max(0);
        }
        Ok(amount)
    }

    /// Add mitigated damage to a unit without firing events.
    pub(crate) fn apply_damage(&mut self, unit: EntityId, amount: i32) -> Result<(), EngineError> {
        self.unit_mut(unit)?.damage += amount;
        Ok(())
    }

    /// Deal damage to a unit, fire UNIT_DAMAGE and kill it if lethal.
    ///
    /// Returns the damage actually dealt.
    pub fn damage_unit(
        &mut self,
        unit: EntityId,
        amount: i32,
        source: Option<EntityId>,
    ) -> Result<i32, EngineError> {
        if !self.get_card(unit)?.is_alive() {
            return Ok(0);
        }
        let dealt = self.mitigate(unit, amount)?;
        self.apply_damage(unit, dealt)?;
        if dealt > 0 {
            self.trigger(Event::UnitDamage {
                unit,
                source,
                amount: dealt,
            })?;
        }
        self.check_death(unit, source)?;
        Ok(dealt)
    }

    /// Kill a unit if its lethality check says so.
    pub(crate) fn check_death(
        &mut self,
        unit: EntityId,
        killer: Option<EntityId>,
    ) -> Result<bool, EngineError> {
        let card = self.get_card(unit)?;
        let lethal = card.is_alive() && card.unit.as_ref().is_some_and(|u| u.is_lethal());
        if lethal {
            self.kill(unit, killer)?;
        }
        Ok(lethal)
    }

    /// Kill a unit: SLAY, graveyard, then last-breath effects on DIE.
    pub fn kill(&mut self, unit: EntityId, killer: Option<EntityId>) -> Result<(), EngineError> {
        let (team, zone) = {
            let card = self.get_card(unit)?;
            if !card.is_alive() {
                return Ok(());
            }
            (card.owner, card.zone)
        };

        self.unit_mut(unit)?.alive = false;
        self.targeting.remove_card(unit);
        info!("{} {} dies", team, unit);

        if let Some(killer) = killer {
            self.trigger(Event::Slay {
                killer,
                victim: unit,
            })?;
        }
        self.move_card(unit, Zone::Graveyard, ZonePosition::Top)?;
        self.unsubscribe_all(unit)?;
        self.subscribe_death_effects(unit)?;
        self.trigger(Event::Die { team, unit, killer })?;
        self.unsubscribe_all(unit)?;

        if zone.is_field() {
            self.drain_queue(team)?;
        }
        Ok(())
    }

    /// Heal a unit, never above its maximum health.
    pub fn heal_unit(&mut self, unit: EntityId, amount: i32) -> Result<(), EngineError> {
        let stats = self.unit_mut(unit)?;
        stats.damage = (stats.damage - amount.max(0)).max(0);
        Ok(())
    }

    /// Damage a nexus and end the game if it falls.
    pub fn damage_nexus(
        &mut self,
        team: Team,
        amount: i32,
        source: EntityId,
    ) -> Result<(), EngineError> {
        if amount <= 0 {
            return Ok(());
        }
        self.players[team].nexus.health -= amount;
        if self.team_of(source) == Some(team.opponent()) {
            self.players[team.opponent()].flags.plunder = true;
        }
        debug!("{} nexus takes {} from {}", team, amount, source);
        self.trigger(Event::NexusDamage {
            team,
            source,
            amount,
        })?;
        self.check_nexus_health()
    }

    /// Heal a nexus up to the starting health.
    pub fn heal_nexus(&mut self, team: Team, amount: i32) {
        let max = self.config.start_nexus_health;
        let nexus = &mut self.players[team].nexus;
        nexus.health = (nexus.health + amount.max(0)).min(max).max(nexus.health);
    }

    /// End the game when a nexus has fallen.
    pub(crate) fn check_nexus_health(&mut self) -> Result<(), EngineError> {
        let fallen: Vec<Team> = Team::ALL
            .into_iter()
            .filter(|&t| self.players[t].nexus.health <= 0)
            .collect();
        match fallen.as_slice() {
            [] => Ok(()),
            [loser] => self.end_game(Status::Win {
                team: loser.opponent(),
                reason: WinReason::Nexus,
            }),
            _ => self.end_game(Status::Tie),
        }
    }

    /// A team had to draw from an empty deck.
    pub(crate) fn lose_by_draw_out(&mut self, team: Team) -> Result<(), EngineError> {
        self.end_game(Status::Win {
            team: team.opponent(),
            reason: WinReason::DrawOut,
        })
    }

    /// Record the final status once and fire GAME_END.
    pub fn end_game(&mut self, status: Status) -> Result<(), EngineError> {
        if self.status.is_over() || status.is_ongoing() {
            return Ok(());
        }
        self.status = status;
        info!("Game over in round {}: {:?}", self.round, status);
        self.trigger(Event::GameEnd { status })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use crate::cards::{CardDefinition, CardRegistry, Keyword};
    use crate::core::{Config, EntityId, GameState, Team};
    use crate::effects::EffectTemplate;
    use crate::events::EventKind;
    use crate::rules::{Status, WinReason};
    use crate::zones::Zone;

    fn state() -> GameState {
        let catalogue = CardRegistry::new()
            .with(CardDefinition::unit("T", "Tough Guy", 2, 2, 3).with_keyword(Keyword::Tough))
            .with(CardDefinition::unit("B", "Bubble", 2, 1, 1).with_keyword(Keyword::Barrier))
            .with(CardDefinition::unit("P", "Plain", 1, 1, 1));
        GameState::new(Config::default(), Rc::new(catalogue), 4)
    }

    #[test]
    fn test_tough_reduces_damage() {
        let mut state = state();
        let unit = state.create_card_in("T", Team::Blue, None, Zone::Camp).unwrap();
        assert_eq!(state.damage_unit(unit, 2, None).unwrap(), 1);
        assert_eq!(state.card(unit).unwrap().health(), 2);
    }

    #[test]
    fn test_barrier_negates_once() {
        let mut state = state();
        let unit = state.create_card_in("B", Team::Blue, None, Zone::Camp).unwrap();
        assert_eq!(state.damage_unit(unit, 5, None).unwrap(), 0);
        assert!(!state.card(unit).unwrap().has(Keyword::Barrier));

        state.damage_unit(unit, 1, None).unwrap();
        assert_eq!(state.card(unit).unwrap().zone, Zone::Graveyard);
    }

    #[test]
    fn test_custom_damage_fn() {
        let mut state = state();
        let unit = state.create_card_in("T", Team::Blue, None, Zone::Camp).unwrap();
        state.unit_mut(unit).unwrap().damage_fn = Some(Rc::new(|_| 0));
        assert_eq!(state.damage_unit(unit, 9, None).unwrap(), 0);
        assert!(state.card(unit).unwrap().is_alive());
    }

    #[test]
    fn test_last_breath_fires_after_death() {
        let fired = Rc::new(Cell::new(false));
        let flag = Rc::clone(&fired);
        let catalogue = CardRegistry::new().with(
            CardDefinition::unit("LB", "Martyr", 1, 1, 1).with_effect(EffectTemplate::last_breath(
                move |state, _, ctx| {
                    flag.set(state.card(ctx.owner).map(|c| c.zone) == Some(Zone::Graveyard));
                    Ok(())
                },
            )),
        );
        let mut state = GameState::new(Config::default(), Rc::new(catalogue), 4);
        let unit = state.create_card_in("LB", Team::Red, None, Zone::Camp).unwrap();

        state.damage_unit(unit, 1, None).unwrap();
        assert!(fired.get());
        assert!(state.effects.subscribed_for(unit).is_empty());
    }

    #[test]
    fn test_victim_hears_its_own_slay() {
        let seen = Rc::new(Cell::new(None));
        let zone = Rc::clone(&seen);
        let catalogue = CardRegistry::new()
            .with(CardDefinition::unit("P", "Plain", 1, 1, 1))
            .with(CardDefinition::unit("G", "Grudge", 1, 1, 1).with_effect(EffectTemplate::new(
                EventKind::Slay,
                move |state, _, ctx| {
                    zone.set(state.card(ctx.owner).map(|c| c.zone));
                    Ok(())
                },
            )));
        let mut state = GameState::new(Config::default(), Rc::new(catalogue), 4);
        let killer = state.create_card_in("P", Team::Blue, None, Zone::Camp).unwrap();
        let victim = state.create_card_in("G", Team::Red, None, Zone::Camp).unwrap();

        state.damage_unit(victim, 1, Some(killer)).unwrap();

        assert_eq!(seen.get(), Some(Zone::Camp));
        assert_eq!(state.card(victim).unwrap().zone, Zone::Graveyard);
        assert!(state.effects.subscribed_for(victim).is_empty());
    }

    #[test]
    fn test_nexus_death_ends_game() {
        let mut state = state();
        let source = state.create_card_in("P", Team::Blue, None, Zone::Camp).unwrap();
        state.damage_nexus(Team::Red, 25, source).unwrap();

        assert_eq!(
            state.status,
            Status::Win {
                team: Team::Blue,
                reason: WinReason::Nexus
            }
        );
        assert!(state.players[Team::Blue].flags.plunder);
    }

    #[test]
    fn test_heal_nexus_capped() {
        let mut state = state();
        state.damage_nexus(Team::Blue, 3, EntityId::nexus(Team::Red)).unwrap();
        state.heal_nexus(Team::Blue, 10);
        assert_eq!(state.players[Team::Blue].nexus.health, 20);
    }
}
