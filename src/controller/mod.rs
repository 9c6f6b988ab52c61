//! Decision makers.
//!
//! A [`Controller`] answers the three kinds of questions the game driver
//! asks: what to do next, which targets to pick, and which opening cards
//! to replace. Answers are validated by the driver; a controller may
//! return anything and is retried when it does not fit.

pub mod legal;
pub mod random;
pub mod scripted;

pub use legal::legal_actions;
pub use random::RandomController;
pub use scripted::ScriptedController;

use crate::core::{Action, EntityId, GameState, Team};
use crate::stack::PendingTargeting;

/// Source of actions for one team.
pub trait Controller {
    /// Next action in the idle, combat or replacing phase, or the answer to
    /// a pending choice.
    fn choose_action(&mut self, state: &GameState, team: Team) -> Action;

    /// Targets for a pending request: a `Targeting` or `Cancel` action.
    fn choose_targets(&mut self, state: &GameState, team: Team, pending: &PendingTargeting) -> Action;

    /// A `Mulligan` action for the opening hand.
    fn choose_mulligan(&mut self, state: &GameState, team: Team, hand: &[EntityId]) -> Action;
}

impl<C: Controller + ?Sized> Controller for Box<C> {
    fn choose_action(&mut self, state: &GameState, team: Team) -> Action {
        (**self).choose_action(state, team)
    }

    fn choose_targets(&mut self, state: &GameState, team: Team, pending: &PendingTargeting) -> Action {
        (**self).choose_targets(state, team, pending)
    }

    fn choose_mulligan(&mut self, state: &GameState, team: Team, hand: &[EntityId]) -> Action {
        (**self).choose_mulligan(state, team, hand)
    }
}
