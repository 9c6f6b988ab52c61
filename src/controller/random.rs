//! Controller picking uniformly among legal actions.

use crate::controller::{legal_actions, Controller};
use crate::core::{Action, EntityId, GameRng, GameState, Team};
use crate::effects::TargetSelector;
use crate::stack::PendingTargeting;

/// Plays random legal actions from its own seeded RNG.
///
/// Accept is weighted down so games make progress through plays and
/// attacks instead of passing straight to round end.
#[derive(Clone, Debug)]
pub struct RandomController {
    rng: GameRng,
    /// Probability of accepting when other actions exist.
    accept_bias: f64,
}

impl RandomController {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::from_rng(GameRng::new(seed))
    }

    /// Play from an existing RNG, usually a fork of the game's own.
    #[must_use]
    pub fn from_rng(rng: GameRng) -> Self {
        Self {
            rng,
            accept_bias: 0.25,
        }
    }

    #[must_use]
    pub fn with_accept_bias(mut self, bias: f64) -> Self {
        self.accept_bias = bias.clamp(0.0, 1.0);
        self
    }
}

impl Controller for RandomController {
    fn choose_action(&mut self, state: &GameState, team: Team) -> Action {
        let actions = legal_actions(state, team);
        let accept = Action::Accept { team };
        let can_accept = actions.contains(&accept);
        let others: Vec<&Action> = actions.iter().filter(|a| **a != accept).collect();

        if others.is_empty() || can_accept && self.rng.gen_bool(self.accept_bias) {
            return accept;
        }
        self.rng
            .choose(&others)
            .map_or(accept, |&action| action.clone())
    }

    fn choose_targets(&mut self, state: &GameState, team: Team, pending: &PendingTargeting) -> Action {
        let candidates = TargetSelector::new(&pending.spec, pending.team)
            .with_source(pending.card)
            .valid_targets(state);
        let min = pending.spec.min_count(candidates.len());
        let max = pending.spec.max_count(candidates.len());
        let count = if min >= max {
            max
        } else {
            self.rng.gen_range_usize(min..max + 1)
        };
        let chosen = self.rng.sample(&candidates, count);
        Action::targets(team, &chosen)
    }

    fn choose_mulligan(&mut self, _state: &GameState, team: Team, hand: &[EntityId]) -> Action {
        let replace = hand.iter().map(|_| self.rng.gen_bool(0.5)).collect();
        Action::Mulligan { team, replace }
    }
}
