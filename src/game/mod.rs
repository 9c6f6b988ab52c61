//! Game driver.
//!
//! [`Game`] owns a [`GameState`] and one [`Controller`] per team. Each
//! [`Game::step`] either runs one queued follow-up action or asks the
//! acting team's controller for input, retrying rejected answers up to
//! the configured limit before substituting a fallback.

pub mod deck;

pub use deck::{DeckError, DeckList};

use std::rc::Rc;

use tracing::{info, warn};

use crate::cards::CardCatalogue;
use crate::controller::{Controller, RandomController};
use crate::core::{Action, Config, EngineError, GameState, Team, TeamMap};
use crate::effects::TargetSelector;
use crate::rules::{Phase, Status};

/// A game in progress.
pub struct Game {
    pub state: GameState,
    controllers: TeamMap<Box<dyn Controller>>,
}

impl Game {
    /// Validate both decks, build the state and deal opening hands.
    pub fn new(
        config: Config,
        catalogue: Rc<dyn CardCatalogue>,
        decks: &TeamMap<DeckList>,
        seed: u64,
        controllers: TeamMap<Box<dyn Controller>>,
    ) -> Result<Self, EngineError> {
        let state = Self::prepare(config, catalogue, decks, seed)?;
        Ok(Self { state, controllers })
    }

    /// Like [`Game::new`], with a [`RandomController`] per team playing
    /// from forks of the game RNG. The whole game follows from `seed`.
    pub fn random(
        config: Config,
        catalogue: Rc<dyn CardCatalogue>,
        decks: &TeamMap<DeckList>,
        seed: u64,
    ) -> Result<Self, EngineError> {
        let mut state = Self::prepare(config, catalogue, decks, seed)?;
        let forks = [state.rng.fork(), state.rng.fork()];
        let controllers = TeamMap::new(|team| {
            Box::new(RandomController::from_rng(forks[team.index()].clone())) as Box<dyn Controller>
        });
        Ok(Self { state, controllers })
    }

    fn prepare(
        config: Config,
        catalogue: Rc<dyn CardCatalogue>,
        decks: &TeamMap<DeckList>,
        seed: u64,
    ) -> Result<GameState, EngineError> {
        for (team, deck) in decks.iter() {
            deck.validate(&config, catalogue.as_ref())
                .map_err(|source| EngineError::InvalidDeck { team, source })?;
        }

        let mut state = GameState::new(config, catalogue, seed);
        let codes = TeamMap::new(|team| decks[team].codes.clone());
        state.setup(&codes)?;
        Ok(state)
    }

    /// Wrap an already prepared state.
    #[must_use]
    pub fn from_state(state: GameState, controllers: TeamMap<Box<dyn Controller>>) -> Self {
        Self { state, controllers }
    }

    #[must_use]
    pub fn status(&self) -> Status {
        self.state.status
    }

    /// Advance the game by one action.
    pub fn step(&mut self) -> Result<(), EngineError> {
        if self.state.status.is_over() {
            return Ok(());
        }

        if !self.state.phase.awaits_input() {
            if let Some(action) = self.state.action_buffer.pop_front() {
                self.state.apply_follow_up(&action)?;
                return Ok(());
            }
        }

        let team = self.state.acting_team();
        let limit = self.state.config.invalid_actions_limit;
        for attempt in 1..=limit {
            let action = self.ask(team);
            match self.state.validate(&action) {
                Ok(()) => {
                    self.state.execute(&action)?;
                    return Ok(());
                }
                Err(reason) => {
                    warn!(
                        "{} action {:?} rejected ({}/{}): {}",
                        team,
                        action.label(),
                        attempt,
                        limit,
                        reason
                    );
                }
            }
        }

        let fallback = self.fallback(team)?;
        warn!("{} ran out of attempts, substituting {:?}", team, fallback.label());
        self.state.execute(&fallback)?;
        Ok(())
    }

    /// Step until the game ends or `max_steps` actions were taken.
    pub fn run(&mut self, max_steps: usize) -> Result<Status, EngineError> {
        for _ in 0..max_steps {
            if self.state.status.is_over() {
                break;
            }
            self.step()?;
        }
        if self.state.status.is_over() {
            info!("Game finished after round {}: {:?}", self.state.round, self.state.status);
        }
        Ok(self.state.status)
    }

    fn ask(&mut self, team: Team) -> Action {
        let state = &self.state;
        let controller = &mut self.controllers[team];
        match state.phase {
            Phase::Mulligan => controller.choose_mulligan(state, team, &state.boards[team].hand),
            Phase::Targeting if state.choices.is_empty() => match state.targeting.top() {
                Some(pending) => controller.choose_targets(state, team, pending),
                None => controller.choose_action(state, team),
            },
            _ => controller.choose_action(state, team),
        }
    }

    /// Accept, then Cancel, then the phase's neutral answer.
    fn fallback(&self, team: Team) -> Result<Action, EngineError> {
        let state = &self.state;
        let mut candidates = vec![Action::Accept { team }, Action::Cancel { team }];
        match state.phase {
            Phase::Mulligan => candidates.push(Action::Mulligan {
                team,
                replace: vec![false; state.boards[team].hand.len()],
            }),
            Phase::Targeting => {
                if state.choices.top().is_some() {
                    candidates.push(Action::Choice { team, index: 0 });
                } else if let Some(pending) = state.targeting.top() {
                    let candidates_for = TargetSelector::new(&pending.spec, pending.team)
                        .with_source(pending.card)
                        .valid_targets(state);
                    let count = pending.spec.min_count(candidates_for.len());
                    candidates.push(Action::targets(team, &candidates_for[..count]));
                }
            }
            Phase::Replacing => candidates.push(Action::Replace {
                team,
                camp_index: 0,
            }),
            Phase::Idle | Phase::Combat => {}
        }

        candidates
            .into_iter()
            .find(|action| state.validate(action).is_ok())
            .ok_or(EngineError::NoValidFallback {
                team,
                phase: state.phase,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDefinition, CardRegistry};
    use crate::controller::ScriptedController;
    use crate::core::EntityId;
    use crate::stack::PendingTargeting;

    fn catalogue() -> Rc<CardRegistry> {
        Rc::new(
            CardRegistry::new()
                .with(CardDefinition::unit("A", "Footman", 1, 1, 2))
                .with(CardDefinition::unit("B", "Knight", 2, 3, 2))
                .with(CardDefinition::unit("C", "Giant", 4, 5, 5)),
        )
    }

    fn decks() -> TeamMap<DeckList> {
        TeamMap::with_value(DeckList::copies(&["A", "B", "C"], 3))
    }

    /// Controller answering with garbage forever.
    struct Stubborn;

    impl Controller for Stubborn {
        fn choose_action(&mut self, _: &GameState, team: Team) -> Action {
            Action::PlayRequest {
                team,
                hand_index: 99,
            }
        }

        fn choose_targets(&mut self, _: &GameState, team: Team, _: &PendingTargeting) -> Action {
            Action::Replace {
                team,
                camp_index: 99,
            }
        }

        fn choose_mulligan(&mut self, _: &GameState, team: Team, _: &[EntityId]) -> Action {
            Action::Mulligan {
                team,
                replace: Vec::new(),
            }
        }
    }

    #[test]
    fn test_invalid_deck_rejected() {
        let decks = TeamMap::with_value(DeckList::copies(&["A"], 4));
        let controllers: TeamMap<Box<dyn Controller>> =
            TeamMap::new(|_| Box::new(ScriptedController::default()) as Box<dyn Controller>);
        let err = Game::new(Config::default(), catalogue(), &decks, 1, controllers);
        assert!(matches!(err, Err(EngineError::InvalidDeck { .. })));
    }

    #[test]
    fn test_stubborn_controllers_fall_back() {
        let controllers: TeamMap<Box<dyn Controller>> =
            TeamMap::new(|_| Box::new(Stubborn) as Box<dyn Controller>);
        let mut game = Game::new(Config::default(), catalogue(), &decks(), 5, controllers).unwrap();

        for _ in 0..6 {
            game.step().unwrap();
        }
        assert!(game.state.round >= 1);
        assert!(game.state.verify_zones().is_ok());
    }

    #[test]
    fn test_random_games_finish() {
        for seed in 0..4 {
            let mut game = Game::random(Config::default(), catalogue(), &decks(), seed).unwrap();
            let status = game.run(20_000).unwrap();
            assert!(status.is_over(), "seed {seed} did not finish");
            assert!(game.state.verify_zones().is_ok());
        }
    }

    #[test]
    fn test_random_game_replays_from_seed() {
        let play = |seed| {
            let mut game = Game::random(Config::default(), catalogue(), &decks(), seed).unwrap();
            game.run(500).unwrap();
            game.state.events().cloned().collect::<Vec<_>>()
        };

        assert_eq!(play(17), play(17));
    }
}
